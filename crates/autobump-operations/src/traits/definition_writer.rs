use autobump_core::PackageView;

use crate::Result;

pub trait DefinitionWriter: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the package has no definition file or the file
    /// cannot be rewritten.
    fn apply_bump(&self, package: &PackageView, new_version: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the file on disk does not carry `new_version` as
    /// both the version and the `autobump.version` label of the package.
    fn verify_bump(&self, package: &PackageView, new_version: &str) -> Result<()>;
}
