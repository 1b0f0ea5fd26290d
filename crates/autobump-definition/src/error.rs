use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read definition at '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML at '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("unexpected definition layout in '{path}': {reason}")]
    Shape { path: PathBuf, reason: &'static str },

    #[error("expected exactly one record for '{package}' in '{path}', found {matches}")]
    AmbiguousTarget {
        path: PathBuf,
        package: String,
        matches: usize,
    },

    #[error("'{package}' already has a record in '{path}'")]
    DuplicateTarget { path: PathBuf, package: String },

    #[error("failed to serialize definition for '{path}'")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("failed to write definition at '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("expected '{package}' at version '{expected}' in '{path}' but found {actual}")]
    VerificationFailed {
        path: PathBuf,
        package: String,
        expected: String,
        actual: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_target_reports_match_count() {
        let err = DefinitionError::AmbiguousTarget {
            path: PathBuf::from("/tree/foo/collection.yaml"),
            package: "dev-libs/foo@1.0.0".to_string(),
            matches: 2,
        };

        let msg = err.to_string();

        assert!(msg.contains("dev-libs/foo@1.0.0"));
        assert!(msg.contains("found 2"));
        assert!(msg.contains("/tree/foo/collection.yaml"));
    }

    #[test]
    fn read_error_has_source_chain() {
        let err = DefinitionError::Read {
            path: PathBuf::from("/missing"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };

        assert!(std::error::Error::source(&err).is_some());
    }
}
