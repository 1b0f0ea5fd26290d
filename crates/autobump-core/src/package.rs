use std::path::{Path, PathBuf};

use crate::labels::Labels;
use crate::types::PackageId;

/// File holding exactly one package record at the document root.
pub const DEFINITION_FILE: &str = "definition.yaml";
/// File holding a sequence of package records under `packages`.
pub const COLLECTION_FILE: &str = "collection.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Single,
    Collection,
}

impl DefinitionKind {
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Single => DEFINITION_FILE,
            Self::Collection => COLLECTION_FILE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DefinitionFile {
    pub path: PathBuf,
    pub kind: DefinitionKind,
}

impl DefinitionFile {
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.kind == DefinitionKind::Collection
    }
}

/// A package entry together with the file it was declared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageView {
    pub id: PackageId,
    pub labels: Labels,
    pub dir: PathBuf,
    /// `None` when neither definition file exists in `dir`; such a package
    /// cannot be rewritten.
    pub definition: Option<DefinitionFile>,
}

impl PackageView {
    /// Builds a view by probing `dir` for a definition file, single-package
    /// file first.
    #[must_use]
    pub fn probe(id: PackageId, labels: Labels, dir: &Path) -> Self {
        let definition = [DefinitionKind::Single, DefinitionKind::Collection]
            .into_iter()
            .map(|kind| DefinitionFile {
                path: dir.join(kind.file_name()),
                kind,
            })
            .find(|file| file.path.is_file());

        Self {
            id,
            labels,
            dir: dir.to_path_buf(),
            definition,
        }
    }

    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.definition
            .as_ref()
            .is_some_and(DefinitionFile::is_collection)
    }

    #[must_use]
    pub fn definition_path(&self) -> Option<&Path> {
        self.definition.as_ref().map(|file| file.path.as_path())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn id() -> PackageId {
        PackageId::new("dev-libs", "foo", "1.2.0")
    }

    #[test]
    fn probe_prefers_single_definition() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join(DEFINITION_FILE), "name: foo\n").expect("write definition");
        fs::write(dir.path().join(COLLECTION_FILE), "packages: []\n").expect("write collection");

        let view = PackageView::probe(id(), Labels::new(), dir.path());

        let definition = view.definition.as_ref().expect("definition found");
        assert_eq!(definition.kind, DefinitionKind::Single);
        assert_eq!(definition.path, dir.path().join(DEFINITION_FILE));
        assert!(!view.is_collection());
    }

    #[test]
    fn probe_falls_back_to_collection() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join(COLLECTION_FILE), "packages: []\n").expect("write collection");

        let view = PackageView::probe(id(), Labels::new(), dir.path());

        assert!(view.is_collection());
        assert_eq!(
            view.definition_path(),
            Some(dir.path().join(COLLECTION_FILE).as_path())
        );
    }

    #[test]
    fn probe_leaves_definition_empty_when_nothing_exists() {
        let dir = tempfile::tempdir().expect("create temp dir");

        let view = PackageView::probe(id(), Labels::new(), dir.path());

        assert!(view.definition.is_none());
        assert!(!view.is_collection());
    }

    #[test]
    fn probe_ignores_directories_named_like_definitions() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir(dir.path().join(DEFINITION_FILE)).expect("create dir");

        let view = PackageView::probe(id(), Labels::new(), dir.path());

        assert!(view.definition.is_none());
    }
}
