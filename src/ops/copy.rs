//! Copying build outputs to a destination directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::artifact::ArtifactSpec;
use crate::core::platform::Conventions;
use crate::util::errors::{FerryError, FerryResult};

/// Copy resolved artifacts into `destination`.
///
/// With `nest` set, files go to `destination/{platform tag}/`. Existing
/// files are overwritten. A `None` destination is a no-op. The first
/// failure stops the remaining copies.
pub fn copy_artifacts(
    artifacts: &[ArtifactSpec],
    destination: Option<&Path>,
    nest: bool,
    conventions: &Conventions,
) -> FerryResult<Vec<PathBuf>> {
    let Some(destination) = destination else {
        return Ok(Vec::new());
    };

    let dest_dir = prepare_destination(destination, nest, conventions)?;

    let mut copied = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        if !artifact.path.is_file() {
            return Err(FerryError::ArtifactMissing {
                path: artifact.path.clone(),
            });
        }

        let target = dest_dir.join(&artifact.file_name);
        if is_same_file(&artifact.path, &target) {
            tracing::debug!("{} is already in place", target.display());
            copied.push(target);
            continue;
        }

        fs::copy(&artifact.path, &target).map_err(|source| FerryError::CopyFailed {
            source_path: artifact.path.clone(),
            destination: target.clone(),
            source,
        })?;

        tracing::info!("Copied {} to {}", artifact.path.display(), target.display());
        copied.push(target);
    }

    Ok(copied)
}

/// Whether `dest` already is `source`. Copying a file onto itself would
/// truncate it.
fn is_same_file(source: &Path, dest: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(dest)) {
        (Ok(source), Ok(dest)) => source == dest,
        _ => false,
    }
}

/// Create the destination directory (and platform subdirectory when
/// `nest` is set) and return the directory files should land in.
pub fn prepare_destination(
    destination: &Path,
    nest: bool,
    conventions: &Conventions,
) -> FerryResult<PathBuf> {
    ensure_directory(destination)?;

    if !nest {
        return Ok(destination.to_path_buf());
    }

    let nested = destination.join(&conventions.platform_tag);
    ensure_directory(&nested)?;
    Ok(nested)
}

fn ensure_directory(path: &Path) -> FerryResult<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(FerryError::DestinationNotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("Creating {}", path.display());
            fs::create_dir_all(path).map_err(|source| FerryError::CreateDestination {
                path: path.to_path_buf(),
                source,
            })
        }
        Err(source) => Err(FerryError::CreateDestination {
            path: path.to_path_buf(),
            source,
        }),
    }
}
