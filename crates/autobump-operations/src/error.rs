use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use autobump_core::labels::{STRATEGY, VERSION_HOOK};
use thiserror::Error;

use crate::strategies::StrategyKind;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Tree(#[from] autobump_tree::TreeError),

    #[error(transparent)]
    Definition(#[from] autobump_definition::DefinitionError),

    #[error(transparent)]
    Version(#[from] autobump_version::VersionError),

    #[error("package '{package}' has no '{}' label", STRATEGY)]
    MissingStrategy { package: String },

    #[error("unknown strategy '{name}' (available: {available})")]
    UnknownStrategy { name: String, available: String },

    #[error("strategy '{0}' is not enabled")]
    StrategyNotRegistered(StrategyKind),

    #[error("package '{package}' has no '{}' label", VERSION_HOOK)]
    MissingHook { package: String },

    #[error("failed to run version hook '{command}'")]
    HookSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("version hook '{command}' failed ({status}): {output}")]
    HookFailed {
        command: String,
        status: String,
        output: String,
    },

    #[error("version hook '{command}' timed out after {}s", timeout.as_secs())]
    HookTimeout { command: String, timeout: Duration },

    #[error("strategy '{strategy}' returned an empty version")]
    EmptyVersion { strategy: StrategyKind },

    #[error("no definition file for '{package}' in '{}'", dir.display())]
    MissingDefinition { package: String, dir: PathBuf },
}

/// The part of the per-package pipeline an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    Load,
    Strategy,
    Version,
    Rewrite,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Strategy => "strategy",
            Self::Version => "version",
            Self::Rewrite => "rewrite",
        })
    }
}

impl OperationError {
    #[must_use]
    pub fn stage(&self) -> FailureStage {
        match self {
            Self::Tree(_) => FailureStage::Load,
            Self::MissingStrategy { .. }
            | Self::UnknownStrategy { .. }
            | Self::StrategyNotRegistered(_)
            | Self::MissingHook { .. }
            | Self::HookSpawn { .. }
            | Self::HookFailed { .. }
            | Self::HookTimeout { .. }
            | Self::EmptyVersion { .. } => FailureStage::Strategy,
            Self::Version(_) => FailureStage::Version,
            Self::Definition(_) | Self::MissingDefinition { .. } => FailureStage::Rewrite,
        }
    }
}

pub type Result<T> = std::result::Result<T, OperationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_strategy_error_includes_name_and_available() {
        let err = OperationError::UnknownStrategy {
            name: "github".to_string(),
            available: "custom, git".to_string(),
        };

        let msg = err.to_string();

        assert!(msg.contains("github"));
        assert!(msg.contains("custom, git"));
    }

    #[test]
    fn missing_labels_name_the_label() {
        let strategy = OperationError::MissingStrategy {
            package: "app/tool".to_string(),
        };
        let hook = OperationError::MissingHook {
            package: "app/tool".to_string(),
        };

        assert!(strategy.to_string().contains("autobump.strategy"));
        assert!(hook.to_string().contains("autobump.version_hook"));
    }

    #[test]
    fn hook_timeout_reports_seconds() {
        let err = OperationError::HookTimeout {
            command: "sleep 10".to_string(),
            timeout: Duration::from_secs(5),
        };

        assert!(err.to_string().contains("after 5s"));
    }

    #[test]
    fn errors_map_to_their_pipeline_stage() {
        let version = OperationError::from(
            autobump_version::compare("1.0.0", "nope").expect_err("invalid remote"),
        );
        let rewrite = OperationError::MissingDefinition {
            package: "app/tool".to_string(),
            dir: PathBuf::from("/tree/app/tool"),
        };
        let strategy = OperationError::EmptyVersion {
            strategy: StrategyKind::Custom,
        };

        assert_eq!(version.stage(), FailureStage::Version);
        assert_eq!(rewrite.stage(), FailureStage::Rewrite);
        assert_eq!(strategy.stage(), FailureStage::Strategy);
    }
}
