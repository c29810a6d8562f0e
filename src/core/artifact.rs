//! Artifact resolution.
//!
//! Works out which files a build of a crate is expected to leave in the
//! target directory. This is pure path computation; whether the files
//! exist is only checked when copying them.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::manifest::Manifest;
use crate::core::platform::Conventions;
use crate::core::profile::BuildProfile;

/// What kind of file an artifact is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Shared library (.so / .dylib / .dll)
    Library,
    /// Executable
    Binary,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Library => write!(f, "lib"),
            ArtifactKind::Binary => write!(f, "bin"),
        }
    }
}

/// One expected build output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSpec {
    pub kind: ArtifactKind,
    /// Name as written in the manifest
    pub logical_name: String,
    /// Platform-specific file name
    pub file_name: String,
    /// Where the build leaves the file
    pub path: PathBuf,
}

/// Compute the ordered list of artifacts a build produces.
///
/// The library (when a `[lib]` section exists) comes first, then binaries
/// in manifest order.
pub fn resolve(
    manifest: &Manifest,
    target_dir: &Path,
    profile: BuildProfile,
    conventions: &Conventions,
) -> Vec<ArtifactSpec> {
    let out_dir = target_dir.join(profile.dir_name());
    let mut artifacts = Vec::with_capacity(manifest.bins().len() + 1);

    if let Some(lib_name) = manifest.lib_name() {
        if !manifest.is_cdylib() {
            tracing::warn!(
                "[lib] `{}` does not list `cdylib` in its crate types; cargo may not produce {}",
                lib_name,
                conventions.lib_file_name(lib_name)
            );
        }

        let file_name = conventions.lib_file_name(lib_name);
        artifacts.push(ArtifactSpec {
            kind: ArtifactKind::Library,
            logical_name: lib_name.to_string(),
            path: out_dir.join(&file_name),
            file_name,
        });
    }

    for bin in manifest.bins() {
        let file_name = conventions.exe_file_name(&bin.name);
        artifacts.push(ArtifactSpec {
            kind: ArtifactKind::Binary,
            logical_name: bin.name.clone(),
            path: out_dir.join(&file_name),
            file_name,
        });
    }

    artifacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::Platform;
    use crate::test_support::MockCrate;

    fn linux() -> Conventions {
        Platform::new("linux", "x86_64").conventions()
    }

    fn resolve_mock(mock: &MockCrate, profile: BuildProfile, conventions: &Conventions) -> Vec<ArtifactSpec> {
        let manifest = Manifest::parse(mock.crate_root()).unwrap();
        resolve(&manifest, &mock.target_dir(), profile, conventions)
    }

    #[test]
    fn test_default_bin() {
        for profile in [BuildProfile::Debug, BuildProfile::Release] {
            let mock = MockCrate::new("test-bin-1");
            mock.write_manifest("[package]\nname = \"test-bin\"\nversion = \"0.1.0\"\nedition = \"2021\"\n");
            mock.touch_src("main.rs");
            let expected = mock.touch_bin("test-bin", profile, &Conventions::host());

            let artifacts = resolve_mock(&mock, profile, &Conventions::host());
            assert_eq!(artifacts.len(), 1);
            assert_eq!(artifacts[0].path, expected);
            assert_eq!(artifacts[0].kind, ArtifactKind::Binary);
        }
    }

    #[test]
    fn test_windows_exe_suffix() {
        let mock = MockCrate::new("winbin");
        mock.write_manifest("[package]\nname = \"winbin\"\n");
        mock.touch_src("main.rs");

        let windows = Platform::new("windows", "x86_64").conventions();
        let artifacts = resolve_mock(&mock, BuildProfile::Release, &windows);
        assert_eq!(artifacts[0].file_name, "winbin.exe");
        assert_eq!(
            artifacts[0].path,
            mock.target_dir().join("release").join("winbin.exe")
        );
    }

    #[test]
    fn test_cdylib() {
        let mock = MockCrate::new("test-lib-1");
        mock.write_manifest("[package]\nname = \"test-lib\"\n\n[lib]\ncrate-type = [\"cdylib\"]\n");
        mock.touch_src("lib.rs");

        let artifacts = resolve_mock(&mock, BuildProfile::Debug, &linux());
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].kind, ArtifactKind::Library);
        assert_eq!(artifacts[0].logical_name, "test-lib");
        assert_eq!(artifacts[0].file_name, "libtest_lib.so");
    }

    #[test]
    fn test_custom_cdylib_name() {
        let mock = MockCrate::new("test-lib-1");
        mock.write_manifest("[package]\nname = \"test-lib\"\n\n[lib]\nname = \"mylib\"\ncrate-type = [\"cdylib\"]\n");

        let mac = Platform::new("macos", "aarch64").conventions();
        let artifacts = resolve_mock(&mock, BuildProfile::Debug, &mac);
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].file_name, "libmylib.dylib");
    }

    #[test]
    fn test_lib_section_without_cdylib_still_resolves() {
        let mock = MockCrate::new("rlib-only");
        mock.write_manifest("[package]\nname = \"rlib-only\"\n\n[lib]\ncrate-type = [\"rlib\"]\n");

        let artifacts = resolve_mock(&mock, BuildProfile::Debug, &linux());
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].file_name, "librlib_only.so");
    }

    #[test]
    fn test_default_bin_and_cdylib() {
        let mock = MockCrate::new("test42");
        mock.write_manifest("[package]\nname = \"test42\"\n\n[lib]\ncrate-type = [\"cdylib\"]\n");
        mock.touch_src("lib.rs");
        mock.touch_src("main.rs");

        let artifacts = resolve_mock(&mock, BuildProfile::Debug, &linux());
        let names: Vec<_> = artifacts.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, vec!["libtest42.so", "test42"]);
    }

    #[test]
    fn test_cdylib_default_bin_and_explicit_bin() {
        let mock = MockCrate::new("mixed");
        mock.write_manifest(
            "[package]\nname = \"mixed\"\n\n[lib]\ncrate-type = [\"cdylib\"]\n\n[[bin]]\nname = \"extra-bin\"\npath = \"src/extra-bin/main.rs\"\n",
        );
        mock.touch_src("lib.rs");
        mock.touch_src("main.rs");
        mock.touch_src("extra-bin/main.rs");

        let artifacts = resolve_mock(&mock, BuildProfile::Release, &linux());
        let out = mock.target_dir().join("release");
        let paths: Vec<_> = artifacts.iter().map(|a| a.path.clone()).collect();
        assert_eq!(
            paths,
            vec![out.join("libmixed.so"), out.join("mixed"), out.join("extra-bin")]
        );
    }

    #[test]
    fn test_renamed_default_bin() {
        let mock = MockCrate::new("test-custom-name-bin");
        mock.write_manifest(
            "[package]\nname = \"test-custom-name-bin\"\n\n[[bin]]\nname = \"test43\"\npath = \"src/main.rs\"\n",
        );
        mock.touch_src("main.rs");

        let artifacts = resolve_mock(&mock, BuildProfile::Debug, &linux());
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].logical_name, "test43");
    }

    #[test]
    fn test_resolution_does_not_touch_disk() {
        let mock = MockCrate::new("ghost");
        mock.write_manifest("[package]\nname = \"ghost\"\n");
        mock.touch_src("main.rs");

        let artifacts = resolve_mock(&mock, BuildProfile::Debug, &linux());
        assert_eq!(artifacts.len(), 1);
        assert!(!artifacts[0].path.exists());
    }
}
