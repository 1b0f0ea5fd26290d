use std::path::PathBuf;

use autobump_core::PackageView;

use crate::Result;
use crate::types::Scope;

pub trait PackageSource: Send + Sync {
    /// Lists the packages a run should check, in processing order.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be loaded.
    fn packages(&self, roots: &[PathBuf], scope: Scope) -> Result<Vec<PackageView>>;
}
