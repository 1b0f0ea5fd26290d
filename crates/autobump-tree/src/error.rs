use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("tree root '{0}' is not a directory")]
    RootNotFound(PathBuf),

    #[error("failed to walk tree at '{path}'")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read package file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse package file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
}
