use std::time::Duration;

use crate::Result;

/// Runs shell commands on behalf of version resolvers.
pub trait CommandRunner: Send + Sync {
    /// Runs `command` through a shell and returns its combined output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started, exits unsuccessfully,
    /// or is still running after `timeout`.
    fn run(&self, command: &str, timeout: Duration) -> Result<String>;
}
