use std::collections::HashSet;
use std::path::PathBuf;

use autobump_core::PackageView;
use autobump_tree::{PackageTree, TreePackage};

use crate::Result;
use crate::traits::PackageSource;
use crate::types::Scope;

/// Reads packages from tree directories on disk.
pub struct FileSystemPackageSource;

impl FileSystemPackageSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemPackageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageSource for FileSystemPackageSource {
    fn packages(&self, roots: &[PathBuf], scope: Scope) -> Result<Vec<PackageView>> {
        let tree = PackageTree::load(roots)?;

        let selected: Vec<&TreePackage> = match scope {
            Scope::Packages => tree.world().iter().collect(),
            Scope::ReverseDependencies => tree
                .world()
                .iter()
                .flat_map(|package| tree.revdeps(&package.id))
                .collect(),
        };

        // A dependent shared by several packages is checked once.
        let mut seen = HashSet::new();
        Ok(selected
            .into_iter()
            .filter(|package| seen.insert(package.id.clone()))
            .map(|package| {
                PackageView::probe(package.id.clone(), package.labels.clone(), &package.dir)
            })
            .collect())
    }
}
