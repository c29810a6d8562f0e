//! Platform naming conventions.
//!
//! Maps an OS identifier to the file naming cargo uses for shared libraries
//! and executables, plus a canonical `{os}-{arch}` tag used to namespace
//! per-platform artifact directories.
//!
//! Nothing here is cached: [`Platform::host`] reads the running platform on
//! every call, and any other OS/arch pair can be described with
//! [`Platform::new`].

use std::fmt;

use serde::Serialize;

/// Operating system families that differ in artifact naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    MacOs,
    /// Linux and the other UNIX-likes.
    Unix,
}

impl OsFamily {
    /// Classify an OS identifier.
    ///
    /// Accepts Rust's `std::env::consts::OS` values as well as the
    /// longer display names some hosts report (`"Windows 10"`, `"Mac OS X"`).
    pub fn classify(os: &str) -> Self {
        let os = os.trim().to_lowercase();
        if os.starts_with("windows") {
            OsFamily::Windows
        } else if os.contains("mac") || os == "darwin" {
            OsFamily::MacOs
        } else {
            OsFamily::Unix
        }
    }
}

/// An OS/architecture pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// OS identifier as reported by the host
    pub os: String,
    /// CPU architecture (x86_64, aarch64, ...)
    pub arch: String,
}

impl Platform {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Platform {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The platform this process is running on.
    pub fn host() -> Self {
        Platform::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    pub fn family(&self) -> OsFamily {
        OsFamily::classify(&self.os)
    }

    pub fn is_windows(&self) -> bool {
        self.family() == OsFamily::Windows
    }

    /// Canonical `{os}-{arch}` tag, lowercase, spaces replaced by underscores.
    ///
    /// All Windows flavours collapse to `windows`; their binaries are
    /// compatible.
    pub fn tag(&self) -> String {
        let os = match self.family() {
            OsFamily::Windows => "windows".to_string(),
            _ => self.os.trim().to_string(),
        };
        format!("{}-{}", os, self.arch.trim())
            .to_lowercase()
            .replace(' ', "_")
    }

    /// Naming conventions for this platform.
    pub fn conventions(&self) -> Conventions {
        conventions(self)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Artifact file naming for one platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conventions {
    pub lib_prefix: &'static str,
    pub lib_suffix: &'static str,
    pub exe_suffix: &'static str,
    pub platform_tag: String,
}

impl Conventions {
    /// Conventions for the running host.
    pub fn host() -> Self {
        conventions(&Platform::host())
    }

    /// File name of a shared library.
    ///
    /// Cargo replaces `-` with `_` in library names.
    pub fn lib_file_name(&self, name: &str) -> String {
        format!(
            "{}{}{}",
            self.lib_prefix,
            name.replace('-', "_"),
            self.lib_suffix
        )
    }

    /// File name of an executable.
    pub fn exe_file_name(&self, name: &str) -> String {
        format!("{}{}", name, self.exe_suffix)
    }
}

/// Compute the naming conventions for a platform.
pub fn conventions(platform: &Platform) -> Conventions {
    let (lib_prefix, lib_suffix, exe_suffix) = match platform.family() {
        OsFamily::Windows => ("", ".dll", ".exe"),
        OsFamily::MacOs => ("lib", ".dylib", ""),
        OsFamily::Unix => ("lib", ".so", ""),
    };

    Conventions {
        lib_prefix,
        lib_suffix,
        exe_suffix,
        platform_tag: platform.tag(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_conventions() {
        let c = Platform::new("windows", "x86_64").conventions();
        assert_eq!(c.lib_prefix, "");
        assert_eq!(c.lib_suffix, ".dll");
        assert_eq!(c.exe_suffix, ".exe");
        assert_eq!(c.platform_tag, "windows-x86_64");
    }

    #[test]
    fn test_windows_flavours_share_tag() {
        assert_eq!(Platform::new("Windows 10", "amd64").tag(), "windows-amd64");
        assert_eq!(Platform::new("Windows Server 2019", "amd64").tag(), "windows-amd64");
        assert!(Platform::new("Windows 11", "amd64").is_windows());
    }

    #[test]
    fn test_macos_conventions() {
        let c = Platform::new("macos", "aarch64").conventions();
        assert_eq!(c.lib_prefix, "lib");
        assert_eq!(c.lib_suffix, ".dylib");
        assert_eq!(c.exe_suffix, "");
        assert_eq!(c.platform_tag, "macos-aarch64");
    }

    #[test]
    fn test_mac_display_name_tag() {
        let p = Platform::new("Mac OS X", "x86_64");
        assert_eq!(p.family(), OsFamily::MacOs);
        assert_eq!(p.tag(), "mac_os_x-x86_64");
    }

    #[test]
    fn test_unix_conventions() {
        for os in ["linux", "freebsd", "openbsd", "android", "solaris"] {
            let c = Platform::new(os, "x86_64").conventions();
            assert_eq!(c.lib_prefix, "lib", "{}", os);
            assert_eq!(c.lib_suffix, ".so", "{}", os);
            assert_eq!(c.exe_suffix, "", "{}", os);
        }
    }

    #[test]
    fn test_file_names() {
        let linux = Platform::new("linux", "x86_64").conventions();
        assert_eq!(linux.lib_file_name("my-lib"), "libmy_lib.so");
        assert_eq!(linux.exe_file_name("my-bin"), "my-bin");

        let windows = Platform::new("windows", "x86_64").conventions();
        assert_eq!(windows.lib_file_name("my-lib"), "my_lib.dll");
        assert_eq!(windows.exe_file_name("my-bin"), "my-bin.exe");
    }

    #[test]
    fn test_host_is_fresh() {
        let host = Platform::host();
        assert_eq!(host.os, std::env::consts::OS);
        assert_eq!(host.arch, std::env::consts::ARCH);
        assert_eq!(Conventions::host(), host.conventions());
    }
}
