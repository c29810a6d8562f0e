//! Build parameters.
//!
//! Everything the caller configures about one cargo invocation. The core
//! only ever reads these.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::profile::BuildProfile;
use crate::util::errors::FerryError;

/// Default cargo executable, looked up on PATH.
pub const DEFAULT_CARGO: &str = "cargo";

/// Cargo output verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// No flag, cargo's default
    #[default]
    Normal,
    /// `-q`
    Quiet,
    /// `-v`
    Verbose,
    /// `-vv`
    VeryVerbose,
}

impl Verbosity {
    /// The cargo flag, if any.
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            Verbosity::Normal => None,
            Verbosity::Quiet => Some("-q"),
            Verbosity::Verbose => Some("-v"),
            Verbosity::VeryVerbose => Some("-vv"),
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag().unwrap_or(""))
    }
}

impl FromStr for Verbosity {
    type Err = FerryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Verbosity::Normal),
            "-q" => Ok(Verbosity::Quiet),
            "-v" => Ok(Verbosity::Verbose),
            "-vv" => Ok(Verbosity::VeryVerbose),
            other => Err(FerryError::InvalidConfig {
                key: "verbosity".to_string(),
                reason: format!("`{}` must be one of: -q, -v, -vv or empty", other),
            }),
        }
    }
}

/// Options for building one crate.
#[derive(Debug, Clone)]
pub struct BuildParameters {
    /// Cargo executable. `~/` is expanded on non-Windows hosts; a bare
    /// name is looked up on PATH.
    pub cargo_path: String,

    /// Environment variables set on top of the inherited environment
    pub env: BTreeMap<String, String>,

    /// Debug or release
    pub profile: BuildProfile,

    /// Features to activate (`--features`)
    pub features: Vec<String>,

    /// `--all-features`
    pub all_features: bool,

    /// `--no-default-features`
    pub no_default_features: bool,

    /// Build tests too (`--tests`)
    pub tests: bool,

    /// Extra arguments appended verbatim
    pub extra_args: Vec<String>,

    /// Cargo verbosity flag
    pub verbosity: Verbosity,

    /// Directory to copy artifacts into; `None` skips copying
    pub copy_to: Option<PathBuf>,

    /// Nest copies under a `{os}-{arch}` subdirectory of `copy_to`
    pub copy_with_platform_dir: bool,
}

impl Default for BuildParameters {
    fn default() -> Self {
        BuildParameters {
            cargo_path: DEFAULT_CARGO.to_string(),
            env: BTreeMap::new(),
            profile: BuildProfile::Debug,
            features: Vec::new(),
            all_features: false,
            no_default_features: false,
            tests: false,
            extra_args: Vec::new(),
            verbosity: Verbosity::Normal,
            copy_to: None,
            copy_with_platform_dir: false,
        }
    }
}

impl BuildParameters {
    /// Features with surrounding whitespace trimmed and empty entries dropped.
    pub fn cleaned_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect()
    }
}
