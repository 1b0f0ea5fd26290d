use std::time::Duration;

use autobump_core::PackageView;
use tracing::debug;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{CommandRunner, VersionResolver};

/// Default limit for a single version hook.
pub const DEFAULT_HOOK_TIMEOUT: Duration = Duration::from_secs(300);

/// Resolves the remote version by running the package's
/// `autobump.version_hook` command.
pub struct CustomStrategy<C> {
    runner: C,
    timeout: Duration,
}

impl<C: CommandRunner> CustomStrategy<C> {
    #[must_use]
    pub fn new(runner: C) -> Self {
        Self {
            runner,
            timeout: DEFAULT_HOOK_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl<C: CommandRunner> VersionResolver for CustomStrategy<C> {
    fn resolve(&self, package: &PackageView) -> Result<String> {
        let hook = package
            .labels
            .version_hook()
            .ok_or_else(|| OperationError::MissingHook {
                package: package.id.package_name(),
            })?;

        debug!(package = %package.id, hook, "running version hook");
        self.runner.run(hook, self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use autobump_core::labels::VERSION_HOOK;
    use autobump_core::{Labels, PackageId};

    use super::*;
    use crate::mocks::MockCommandRunner;

    fn package(hook: Option<&str>) -> PackageView {
        let mut labels = Labels::new();
        if let Some(hook) = hook {
            labels.insert(VERSION_HOOK, hook);
        }
        PackageView {
            id: PackageId::new("app", "tool", "1.0.0"),
            labels,
            dir: "/tree/app/tool".into(),
            definition: None,
        }
    }

    #[test]
    fn runs_the_hook_with_the_configured_timeout() {
        let runner = MockCommandRunner::new().with_output("echo 1.3.0", "1.3.0\n");
        let calls = runner.calls();
        let strategy = CustomStrategy::new(runner).with_timeout(Duration::from_secs(7));

        let version = strategy.resolve(&package(Some("echo 1.3.0"))).expect("resolve");

        assert_eq!(version, "1.3.0\n");
        assert_eq!(
            *calls.lock().expect("lock"),
            vec![("echo 1.3.0".to_string(), Duration::from_secs(7))]
        );
    }

    #[test]
    fn missing_or_blank_hook_is_rejected_without_running_anything() {
        let runner = MockCommandRunner::new();
        let calls = runner.calls();
        let strategy = CustomStrategy::new(runner);

        for hook in [None, Some("   ")] {
            let err = strategy.resolve(&package(hook)).expect_err("should fail");
            assert!(matches!(err, OperationError::MissingHook { .. }));
        }
        assert!(calls.lock().expect("lock").is_empty());
    }

    #[test]
    fn hook_failures_are_propagated() {
        let strategy = CustomStrategy::new(MockCommandRunner::new().with_failure("exit 3", 3));

        let err = strategy.resolve(&package(Some("exit 3"))).expect_err("should fail");

        assert!(matches!(err, OperationError::HookFailed { .. }));
    }
}
