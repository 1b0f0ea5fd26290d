use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use autobump_core::{COLLECTION_FILE, DEFINITION_FILE, Labels, PackageId, Requirement};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::TreeError;
use crate::record::{RawCollection, RawPackage};

/// One package as loaded from a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePackage {
    pub id: PackageId,
    pub labels: Labels,
    pub requires: Vec<Requirement>,
    /// Directory holding the file the package was declared in.
    pub dir: PathBuf,
}

impl TreePackage {
    fn from_raw(raw: RawPackage, dir: &Path) -> Self {
        Self {
            id: raw.id(),
            labels: raw.labels,
            requires: raw.requires.into_iter().map(Requirement::from).collect(),
            dir: dir.to_path_buf(),
        }
    }

    #[must_use]
    pub fn requires(&self, id: &PackageId) -> bool {
        self.requires.iter().any(|requirement| requirement.matches(id))
    }
}

/// In-memory database of every package found under one or more tree roots.
#[derive(Debug, Clone, Default)]
pub struct PackageTree {
    packages: Vec<TreePackage>,
}

impl PackageTree {
    /// Loads every root in order into a single tree.
    ///
    /// # Errors
    ///
    /// Returns `TreeError` if a root is missing or a package file cannot be
    /// read or parsed.
    pub fn load(roots: &[PathBuf]) -> Result<Self, TreeError> {
        let mut tree = Self::default();
        for root in roots {
            tree.load_root(root)?;
        }
        Ok(tree)
    }

    /// # Errors
    ///
    /// Returns `TreeError` if `root` is not a directory or a package file
    /// cannot be read or parsed.
    pub fn load_root(&mut self, root: &Path) -> Result<(), TreeError> {
        if !root.is_dir() {
            return Err(TreeError::RootNotFound(root.to_path_buf()));
        }

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|source| TreeError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let dir = path.parent().unwrap_or(root);
            let file_name = entry.file_name();

            if file_name == DEFINITION_FILE {
                let raw: RawPackage = parse_file(path)?;
                self.packages.push(TreePackage::from_raw(raw, dir));
            } else if file_name == COLLECTION_FILE {
                let raw: RawCollection = parse_file(path)?;
                self.packages.extend(
                    raw.packages
                        .into_iter()
                        .map(|package| TreePackage::from_raw(package, dir)),
                );
            }
        }

        debug!(root = %root.display(), total = self.packages.len(), "loaded tree");
        Ok(())
    }

    /// Every package, in load order.
    #[must_use]
    pub fn world(&self) -> &[TreePackage] {
        &self.packages
    }

    /// Packages that depend on `id`, directly or through other packages.
    ///
    /// Requirements match on category and name; version selectors are not
    /// evaluated. `id` itself is never part of the result.
    #[must_use]
    pub fn revdeps(&self, id: &PackageId) -> Vec<&TreePackage> {
        let mut found = BTreeSet::new();
        let mut queue = VecDeque::from([id.clone()]);

        while let Some(current) = queue.pop_front() {
            for (index, package) in self.packages.iter().enumerate() {
                if package.id == *id || found.contains(&index) || !package.requires(&current) {
                    continue;
                }
                found.insert(index);
                queue.push_back(package.id.clone());
            }
        }

        found.into_iter().map(|index| &self.packages[index]).collect()
    }
}

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, TreeError> {
    let content = std::fs::read_to_string(path).map_err(|source| TreeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yml::from_str(&content).map_err(|source| TreeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
