use autobump_core::PackageView;

use crate::Result;

/// Finds the latest upstream version of a package.
pub trait VersionResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the package is missing the labels the resolver
    /// needs or the upstream version cannot be obtained.
    fn resolve(&self, package: &PackageView) -> Result<String>;
}
