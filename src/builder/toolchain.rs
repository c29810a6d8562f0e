//! Is cargo even installed?
//!
//! When a cargo invocation fails, the orchestrator asks this module whether
//! the toolchain itself is missing or broken, so the error can say so. The
//! answer is probed by running `{cargo} --version` once per cargo path and
//! remembered for the life of the process.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use crate::builder::params::DEFAULT_CARGO;
use crate::util::errors::{FerryError, FerryResult};
use crate::util::process::{find_executable, ProcessBuilder};
use crate::util::shlex;

/// Probe results keyed by cargo path.
static INSTALL_STATES: LazyLock<Mutex<HashMap<String, InstallState>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// What `{cargo} --version` told us.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    /// Ran and exited zero
    Installed,
    /// Ran but exited non-zero
    Broken,
    /// Could not be started at all
    NotInstalled,
}

/// Installed state of the cargo at `cargo_path`, probing on first use.
///
/// The lookup, probe and update happen under one lock, so concurrent builds
/// against the same path probe it once.
pub fn install_state(cargo_path: &str) -> InstallState {
    let mut states = INSTALL_STATES
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(state) = states.get(cargo_path) {
        return *state;
    }

    let state = probe(cargo_path);
    tracing::debug!("`{} --version`: {:?}", cargo_path, state);
    states.insert(cargo_path.to_string(), state);
    state
}

fn probe(cargo_path: &str) -> InstallState {
    match ProcessBuilder::new(cargo_path).arg("--version").status_quiet() {
        Ok(status) if status.success() => InstallState::Installed,
        Ok(_) => InstallState::Broken,
        Err(_) => InstallState::NotInstalled,
    }
}

/// Fail with a toolchain error if cargo is missing or broken.
pub fn check(cargo_path: &str) -> FerryResult<()> {
    match install_state(cargo_path) {
        InstallState::Installed => Ok(()),
        InstallState::Broken => Err(FerryError::ToolchainBroken {
            cargo: cargo_path.to_string(),
            message: broken_message(cargo_path),
        }),
        InstallState::NotInstalled => Err(FerryError::ToolchainNotFound {
            cargo: cargo_path.to_string(),
            message: not_found_message(cargo_path),
        }),
    }
}

fn broken_message(cargo_path: &str) -> String {
    let subject = if cargo_path == DEFAULT_CARGO {
        match find_executable(DEFAULT_CARGO) {
            Some(found) => format!("Rust's `cargo` ({})", shlex::quote(&found.to_string_lossy())),
            None => "Rust's `cargo`".to_string(),
        }
    } else {
        format!("Rust's `cargo` at {}", shlex::quote(cargo_path))
    };

    format!(
        "{} is a broken install: running `cargo --version` returned a non-zero exit code",
        subject
    )
}

fn not_found_message(cargo_path: &str) -> String {
    if cargo_path == DEFAULT_CARGO {
        let path = std::env::var("PATH").unwrap_or_default();
        format!("Rust's `cargo` not found in PATH={}", shlex::quote(&path))
    } else {
        format!("Rust's `cargo` not found at {}", shlex::quote(cargo_path))
    }
}
