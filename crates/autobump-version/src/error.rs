use std::fmt;

use thiserror::Error;

/// Which side of a comparison a version string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSide {
    Current,
    Remote,
}

impl fmt::Display for VersionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("{side} version is empty")]
    Empty { side: VersionSide },

    #[error("invalid {side} version '{version}'")]
    Parse {
        side: VersionSide,
        version: String,
        #[source]
        source: semver::Error,
    },
}

impl VersionError {
    #[must_use]
    pub fn side(&self) -> VersionSide {
        match self {
            Self::Empty { side } | Self::Parse { side, .. } => *side,
        }
    }
}
