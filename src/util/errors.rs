//! Error types for manifest reading, toolchain invocation and artifact copying.
//!
//! Every variant carries the path, exit code or manifest key needed to act
//! on it. None of these are retried.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while building a crate and collecting its artifacts.
#[derive(Debug, Error, Diagnostic)]
pub enum FerryError {
    #[error("Cargo.toml file expected under: {}", .path.display())]
    #[diagnostic(
        code(ferry::manifest::not_found),
        help("check that the crate path points at a directory containing Cargo.toml")
    )]
    ManifestNotFound { path: PathBuf },

    #[error("malformed Cargo.toml at {}: `{key}`: {reason}", .path.display())]
    #[diagnostic(code(ferry::manifest::malformed))]
    ManifestMalformed {
        path: PathBuf,
        key: String,
        reason: String,
    },

    #[error("{message}")]
    #[diagnostic(code(ferry::toolchain::not_found), help("see https://www.rust-lang.org/tools/install"))]
    ToolchainNotFound { cargo: String, message: String },

    #[error("{message}")]
    #[diagnostic(code(ferry::toolchain::broken), help("see https://www.rust-lang.org/tools/install"))]
    ToolchainBroken { cargo: String, message: String },

    #[error("failed to invoke `{cargo}`")]
    #[diagnostic(code(ferry::toolchain::launch))]
    ToolchainLaunch {
        cargo: String,
        #[source]
        source: io::Error,
    },

    #[error("cargo command failed with {}: {command}", describe_exit(.code))]
    #[diagnostic(code(ferry::toolchain::invocation))]
    ToolchainInvocation { command: String, code: Option<i32> },

    #[error("could not find expected artifact: {}", .path.display())]
    #[diagnostic(
        code(ferry::artifact::missing),
        help("the build finished but did not produce this file; check the crate's [lib] and [[bin]] sections")
    )]
    ArtifactMissing { path: PathBuf },

    #[error("{} is not a directory", .path.display())]
    #[diagnostic(code(ferry::copy::not_a_directory))]
    DestinationNotADirectory { path: PathBuf },

    #[error("failed to create directory {}", .path.display())]
    #[diagnostic(code(ferry::copy::create_dir))]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy {} to {}", .source_path.display(), .destination.display())]
    #[diagnostic(code(ferry::copy::failed))]
    CopyFailed {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid `{key}`: {reason}")]
    #[diagnostic(code(ferry::config::invalid))]
    InvalidConfig { key: String, reason: String },
}

impl FerryError {
    /// Build a `ManifestMalformed` error.
    pub fn malformed(
        path: impl Into<PathBuf>,
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FerryError::ManifestMalformed {
            path: path.into(),
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// The toolchain exit code, if this error came from a finished process.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            FerryError::ToolchainInvocation { code, .. } => *code,
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Result alias for library operations.
pub type FerryResult<T> = std::result::Result<T, FerryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_message_includes_exit_code() {
        let err = FerryError::ToolchainInvocation {
            command: "cargo build".to_string(),
            code: Some(101),
        };
        assert_eq!(
            err.to_string(),
            "cargo command failed with exit code 101: cargo build"
        );
        assert_eq!(err.exit_code(), Some(101));
    }

    #[test]
    fn test_invocation_without_code() {
        let err = FerryError::ToolchainInvocation {
            command: "cargo build".to_string(),
            code: None,
        };
        assert!(err.to_string().contains("terminated by signal"));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_malformed_names_key() {
        let err = FerryError::malformed("/x/Cargo.toml", "bin[2].name", "missing `name` key");
        let msg = err.to_string();
        assert!(msg.contains("bin[2].name"));
        assert!(msg.contains("/x/Cargo.toml"));
    }
}
