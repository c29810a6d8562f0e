//! Configuration file support for ferry.
//!
//! ferry reads two configuration file locations:
//! - Global: `~/.ferry/config.toml` - User-wide defaults
//! - Project: `.ferry/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::params::{BuildParameters, Verbosity};
use crate::core::profile::BuildProfile;
use crate::util::errors::FerryResult;

/// Name of the per-user and per-project config directory.
pub const CONFIG_DIR: &str = ".ferry";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Where build outputs go when nothing else is configured.
pub const DEFAULT_TARGET_ROOT: &str = "target/ferry";

/// ferry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Environment variables passed to cargo
    pub env: BTreeMap<String, String>,
}

/// Build-related configuration.
///
/// Every field is optional so that layers can be merged: an unset field
/// never overrides a lower layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Crate directory (the one holding Cargo.toml)
    pub path: Option<PathBuf>,

    /// Root under which each crate gets its own target directory
    pub target_root: Option<PathBuf>,

    /// Cargo executable
    pub cargo_path: Option<String>,

    /// Build the release profile
    pub release: Option<bool>,

    /// Features to activate
    pub features: Option<Vec<String>>,

    /// Activate all features
    pub all_features: Option<bool>,

    /// Skip the default features
    pub no_default_features: Option<bool>,

    /// Build tests too
    pub tests: Option<bool>,

    /// Extra cargo arguments
    pub extra_args: Option<Vec<String>>,

    /// One of `""`, `"-q"`, `"-v"`, `"-vv"`
    pub verbosity: Option<String>,

    /// Directory to copy artifacts into
    pub copy_to: Option<PathBuf>,

    /// Nest copies under a platform subdirectory
    pub copy_with_platform_dir: Option<bool>,

    /// Set to `false` to skip building entirely
    pub enabled: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        let build = other.build;
        if build.path.is_some() {
            self.build.path = build.path;
        }
        if build.target_root.is_some() {
            self.build.target_root = build.target_root;
        }
        if build.cargo_path.is_some() {
            self.build.cargo_path = build.cargo_path;
        }
        if build.release.is_some() {
            self.build.release = build.release;
        }
        if build.features.is_some() {
            self.build.features = build.features;
        }
        if build.all_features.is_some() {
            self.build.all_features = build.all_features;
        }
        if build.no_default_features.is_some() {
            self.build.no_default_features = build.no_default_features;
        }
        if build.tests.is_some() {
            self.build.tests = build.tests;
        }
        if build.extra_args.is_some() {
            self.build.extra_args = build.extra_args;
        }
        if build.verbosity.is_some() {
            self.build.verbosity = build.verbosity;
        }
        if build.copy_to.is_some() {
            self.build.copy_to = build.copy_to;
        }
        if build.copy_with_platform_dir.is_some() {
            self.build.copy_with_platform_dir = build.copy_with_platform_dir;
        }
        if build.enabled.is_some() {
            self.build.enabled = build.enabled;
        }

        // Env vars merge key by key
        self.env.extend(other.env);
    }

    /// Whether building is enabled at all.
    pub fn is_enabled(&self) -> bool {
        self.build.enabled.unwrap_or(true)
    }

    /// The crate directory, resolved against `cwd`.
    pub fn crate_root(&self, cwd: &Path) -> PathBuf {
        match self.build.path {
            Some(ref path) => cwd.join(path),
            None => cwd.to_path_buf(),
        }
    }

    /// The target root, resolved against `cwd`.
    pub fn target_root(&self, cwd: &Path) -> PathBuf {
        match self.build.target_root {
            Some(ref root) => cwd.join(root),
            None => cwd.join(DEFAULT_TARGET_ROOT),
        }
    }

    /// Turn the merged settings into build parameters.
    pub fn build_parameters(&self, cwd: &Path) -> FerryResult<BuildParameters> {
        let build = &self.build;
        let defaults = BuildParameters::default();

        let verbosity = match build.verbosity {
            Some(ref v) => v.parse::<Verbosity>()?,
            None => Verbosity::Normal,
        };

        Ok(BuildParameters {
            cargo_path: build.cargo_path.clone().unwrap_or(defaults.cargo_path),
            env: self.env.clone(),
            profile: BuildProfile::from_release(build.release.unwrap_or(false)),
            features: build.features.clone().unwrap_or_default(),
            all_features: build.all_features.unwrap_or(false),
            no_default_features: build.no_default_features.unwrap_or(false),
            tests: build.tests.unwrap_or(false),
            extra_args: build.extra_args.clone().unwrap_or_default(),
            verbosity,
            copy_to: build.copy_to.as_ref().map(|dest| cwd.join(dest)),
            copy_with_platform_dir: build.copy_with_platform_dir.unwrap_or(false),
        })
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.ferry/config.toml)
/// 2. Global config (~/.ferry/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    // Project config overrides global
    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global ferry config directory (~/.ferry).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR))
}

/// Get the global config path (~/.ferry/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Get the project config path (.ferry/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::errors::FerryError;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.build.path.is_none());
        assert!(config.build.verbosity.is_none());
        assert!(config.env.is_empty());
        assert!(config.is_enabled());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[build]
path = "native/engine"
cargo-path = "~/.cargo/bin/cargo"
release = true
features = ["simd", "ffi"]
no-default-features = true
verbosity = "-v"
copy-to = "dist"
copy-with-platform-dir = true

[env]
RUSTFLAGS = "-C target-cpu=native"
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.build.path, Some(PathBuf::from("native/engine")));
        assert_eq!(config.build.cargo_path.as_deref(), Some("~/.cargo/bin/cargo"));
        assert_eq!(config.build.release, Some(true));
        assert_eq!(
            config.build.features,
            Some(vec!["simd".to_string(), "ffi".to_string()])
        );
        assert_eq!(config.build.no_default_features, Some(true));
        assert_eq!(config.build.copy_with_platform_dir, Some(true));
        assert_eq!(
            config.env.get("RUSTFLAGS").map(String::as_str),
            Some("-C target-cpu=native")
        );
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[build\nrelease = ").unwrap();

        assert!(Config::load(&config_path).is_err());
        let config = Config::load_or_default(&config_path);
        assert!(config.build.release.is_none());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.build.cargo_path = Some("cargo".to_string());
        base.build.features = Some(vec!["a".to_string()]);
        base.env.insert("A".to_string(), "1".to_string());
        base.env.insert("B".to_string(), "1".to_string());

        let mut override_cfg = Config::default();
        override_cfg.build.features = Some(vec!["b".to_string()]);
        override_cfg.env.insert("B".to_string(), "2".to_string());

        base.merge(override_cfg);

        assert_eq!(base.build.features, Some(vec!["b".to_string()]));
        assert_eq!(base.build.cargo_path.as_deref(), Some("cargo")); // Not overridden
        assert_eq!(base.env.get("A").map(String::as_str), Some("1"));
        assert_eq!(base.env.get("B").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            "[build]\ncargo-path = \"/opt/rust/bin/cargo\"\nrelease = true\n",
        )
        .unwrap();
        std::fs::write(&project_path, "[build]\nrelease = false\n").unwrap();

        let config = load_config(Some(&global_path), &project_path);
        assert_eq!(config.build.cargo_path.as_deref(), Some("/opt/rust/bin/cargo"));
        assert_eq!(config.build.release, Some(false));
    }

    #[test]
    fn test_load_config_missing_files() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &project_config_path(tmp.path()));
        assert!(config.build.cargo_path.is_none());
    }

    #[test]
    fn test_build_parameters() {
        let cwd = Path::new("/work");
        let mut config = Config::default();
        config.build.release = Some(true);
        config.build.verbosity = Some("-vv".to_string());
        config.build.copy_to = Some(PathBuf::from("out"));
        config.env.insert("K".to_string(), "V".to_string());

        let params = config.build_parameters(cwd).unwrap();
        assert_eq!(params.profile, BuildProfile::Release);
        assert_eq!(params.verbosity, Verbosity::VeryVerbose);
        assert_eq!(params.copy_to, Some(PathBuf::from("/work/out")));
        assert_eq!(params.cargo_path, "cargo");
        assert_eq!(params.env.get("K").map(String::as_str), Some("V"));
    }

    #[test]
    fn test_build_parameters_rejects_bad_verbosity() {
        let mut config = Config::default();
        config.build.verbosity = Some("--loud".to_string());

        let err = config.build_parameters(Path::new("/work")).unwrap_err();
        assert!(matches!(err, FerryError::InvalidConfig { ref key, .. } if key == "verbosity"));
    }

    #[test]
    fn test_paths_resolve_against_cwd() {
        let cwd = Path::new("/work");
        let mut config = Config::default();
        assert_eq!(config.crate_root(cwd), PathBuf::from("/work"));
        assert_eq!(config.target_root(cwd), PathBuf::from("/work/target/ferry"));

        config.build.path = Some(PathBuf::from("rust/engine"));
        config.build.target_root = Some(PathBuf::from("/abs/out"));
        assert_eq!(config.crate_root(cwd), PathBuf::from("/work/rust/engine"));
        assert_eq!(config.target_root(cwd), PathBuf::from("/abs/out"));
    }

    #[test]
    fn test_disabled() {
        let mut config = Config::default();
        config.build.enabled = Some(false);
        assert!(!config.is_enabled());
    }
}
