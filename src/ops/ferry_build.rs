//! Implementation of `ferry build`.

use std::path::PathBuf;

use crate::builder::RustCrate;
use crate::core::artifact::ArtifactSpec;
use crate::core::platform::Conventions;
use crate::ops::copy::copy_artifacts;
use crate::util::errors::FerryResult;

/// Build result.
#[derive(Debug)]
pub struct BuildResult {
    /// Artifacts the build was expected to produce
    pub artifacts: Vec<ArtifactSpec>,

    /// Where they were copied to (empty when copying is off)
    pub copied: Vec<PathBuf>,
}

/// Run `cargo build`, then copy the artifacts if a destination is set.
pub fn build(krate: &RustCrate) -> FerryResult<BuildResult> {
    krate.build()?;

    let conventions = Conventions::host();
    let artifacts = krate.artifacts(&conventions);
    let params = krate.params();

    let copied = match params.copy_to.as_deref() {
        Some(dest) => {
            tracing::info!("Copying {}'s artifacts", krate.name());
            copy_artifacts(&artifacts, Some(dest), params.copy_with_platform_dir, &conventions)?
        }
        None => Vec::new(),
    };

    Ok(BuildResult { artifacts, copied })
}
