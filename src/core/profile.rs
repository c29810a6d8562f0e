//! Build profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Build mode, selecting cargo's output subdirectory and optimization level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildProfile {
    #[default]
    Debug,
    Release,
}

impl BuildProfile {
    pub fn from_release(release: bool) -> Self {
        if release {
            BuildProfile::Release
        } else {
            BuildProfile::Debug
        }
    }

    /// Subdirectory of the target dir cargo writes this profile's outputs to.
    pub fn dir_name(&self) -> &'static str {
        match self {
            BuildProfile::Debug => "debug",
            BuildProfile::Release => "release",
        }
    }

    pub fn is_release(&self) -> bool {
        *self == BuildProfile::Release
    }
}

impl fmt::Display for BuildProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for BuildProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dev" => Ok(BuildProfile::Debug),
            "release" => Ok(BuildProfile::Release),
            other => Err(format!(
                "unknown profile `{}`, expected `debug` or `release`",
                other
            )),
        }
    }
}
