//! Test utilities for ferry unit tests.
//!
//! [`MockCrate`] lays out a crate directory and a fake cargo target
//! directory inside a temp dir, so manifest parsing, artifact resolution
//! and copying can be tested without running cargo.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::platform::Conventions;
use crate::core::profile::BuildProfile;

/// A crate on disk plus the target directory a build would have filled.
pub struct MockCrate {
    tmp: TempDir,
    name: String,
    crate_root: PathBuf,
    target_root: PathBuf,
}

impl MockCrate {
    /// Create an empty crate directory named `name`.
    pub fn new(name: &str) -> Self {
        let tmp = TempDir::new().unwrap();
        let crate_root = tmp.path().join(name);
        fs::create_dir_all(&crate_root).unwrap();
        let target_root = tmp.path().join("target").join("ferry");
        fs::create_dir_all(&target_root).unwrap();

        MockCrate {
            tmp,
            name: name.to_string(),
            crate_root,
            target_root,
        }
    }

    pub fn crate_root(&self) -> &Path {
        &self.crate_root
    }

    /// Root under which per-crate target directories live.
    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    /// Target directory cargo would be pointed at for this crate.
    pub fn target_dir(&self) -> PathBuf {
        self.target_root.join(&self.name)
    }

    /// A path inside the temp dir that does not exist yet.
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.tmp.path().join(name)
    }

    pub fn write_manifest(&self, contents: &str) {
        fs::write(self.crate_root.join("Cargo.toml"), contents).unwrap();
    }

    /// Create an empty file under `src/`.
    pub fn touch_src(&self, rel: &str) -> PathBuf {
        let path = self.crate_root.join("src").join(rel);
        touch(&path, b"");
        path
    }

    /// Create a fake shared library build output.
    pub fn touch_lib(&self, name: &str, profile: BuildProfile, conventions: &Conventions) -> PathBuf {
        let path = self
            .target_dir()
            .join(profile.dir_name())
            .join(conventions.lib_file_name(name));
        touch(&path, format!("lib {}", name).as_bytes());
        path
    }

    /// Create a fake executable build output.
    pub fn touch_bin(&self, name: &str, profile: BuildProfile, conventions: &Conventions) -> PathBuf {
        let path = self
            .target_dir()
            .join(profile.dir_name())
            .join(conventions.exe_file_name(name));
        touch(&path, format!("bin {}", name).as_bytes());
        path
    }

    /// Write an executable shell script into the temp dir, for standing in
    /// for cargo.
    #[cfg(unix)]
    pub fn write_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.tmp.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).unwrap();
        path
    }
}

fn touch(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}
