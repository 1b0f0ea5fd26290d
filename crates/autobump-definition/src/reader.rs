use std::path::Path;

use autobump_core::{DefinitionKind, PackageId};
use serde_yml::{Mapping, Value};

use crate::error::DefinitionError;

pub(crate) const PACKAGES_KEY: &str = "packages";

/// # Errors
///
/// Returns `DefinitionError::Read` if the file cannot be read.
pub fn read_source(path: &Path) -> Result<String, DefinitionError> {
    std::fs::read_to_string(path).map_err(|source| DefinitionError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// # Errors
///
/// Returns `DefinitionError::Parse` if the content is not valid YAML.
pub fn parse_document(path: &Path, content: &str) -> Result<Value, DefinitionError> {
    serde_yml::from_str(content).map_err(|source| DefinitionError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// String form of a scalar, so `version: 1.0` and `version: "1.0"` read
/// the same.
#[must_use]
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn records<'a>(
    path: &Path,
    doc: &'a Value,
    kind: DefinitionKind,
) -> Result<Vec<&'a Mapping>, DefinitionError> {
    let shape = |reason| DefinitionError::Shape {
        path: path.to_path_buf(),
        reason,
    };

    match kind {
        DefinitionKind::Single => doc
            .as_mapping()
            .map(|record| vec![record])
            .ok_or_else(|| shape("expected a mapping at the document root")),
        DefinitionKind::Collection => doc
            .get(PACKAGES_KEY)
            .and_then(Value::as_sequence)
            .ok_or_else(|| shape("expected a 'packages' sequence"))?
            .iter()
            .map(|entry| {
                entry
                    .as_mapping()
                    .ok_or_else(|| shape("expected every package to be a mapping"))
            })
            .collect(),
    }
}

pub(crate) fn record_mut<'a>(
    path: &Path,
    doc: &'a mut Value,
    kind: DefinitionKind,
    index: usize,
) -> Result<&'a mut Mapping, DefinitionError> {
    let shape = |reason| DefinitionError::Shape {
        path: path.to_path_buf(),
        reason,
    };

    let record = match kind {
        DefinitionKind::Single => Some(doc),
        DefinitionKind::Collection => doc
            .get_mut(PACKAGES_KEY)
            .and_then(Value::as_sequence_mut)
            .and_then(|packages| packages.get_mut(index)),
    };

    record
        .and_then(Value::as_mapping_mut)
        .ok_or_else(|| shape("target record is not a mapping"))
}

fn field(record: &Mapping, key: &str) -> Option<String> {
    record.get(key).and_then(scalar_string)
}

pub(crate) fn is_target(record: &Mapping, id: &PackageId) -> bool {
    field(record, "name").as_deref() == Some(id.name.as_str())
        && field(record, "category").as_deref() == Some(id.category.as_str())
        && field(record, "version").as_deref() == Some(id.version.as_str())
}

/// Index of the one record matching `id` by name, category and version.
///
/// # Errors
///
/// Returns `DefinitionError::Shape` if the document does not have the
/// layout `kind` implies, or `DefinitionError::AmbiguousTarget` unless
/// exactly one record matches.
pub fn locate_record(
    path: &Path,
    doc: &Value,
    kind: DefinitionKind,
    id: &PackageId,
) -> Result<usize, DefinitionError> {
    let matches: Vec<usize> = records(path, doc, kind)?
        .into_iter()
        .enumerate()
        .filter(|(_, record)| is_target(record, id))
        .map(|(index, _)| index)
        .collect();

    match matches.as_slice() {
        [index] => Ok(*index),
        _ => Err(DefinitionError::AmbiguousTarget {
            path: path.to_path_buf(),
            package: id.to_string(),
            matches: matches.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn path() -> PathBuf {
        PathBuf::from("collection.yaml")
    }

    fn doc(yaml: &str) -> Value {
        parse_document(&path(), yaml).expect("valid yaml")
    }

    #[test]
    fn locates_record_by_identity() {
        let doc = doc(r"
packages:
  - category: dev-libs
    name: foo
    version: 1.0.0
  - category: dev-libs
    name: foo
    version: 2.0.0
");

        let index = locate_record(
            &path(),
            &doc,
            DefinitionKind::Collection,
            &PackageId::new("dev-libs", "foo", "2.0.0"),
        )
        .expect("record found");

        assert_eq!(index, 1);
    }

    #[test]
    fn numeric_versions_match_their_string_form() {
        let doc = doc("category: app\nname: bar\nversion: 1.5\n");

        let index = locate_record(
            &path(),
            &doc,
            DefinitionKind::Single,
            &PackageId::new("app", "bar", "1.5"),
        )
        .expect("record found");

        assert_eq!(index, 0);
    }

    #[test]
    fn duplicate_records_are_ambiguous() {
        let doc = doc(r"
packages:
  - {category: dev-libs, name: foo, version: 1.0.0}
  - {category: dev-libs, name: foo, version: 1.0.0}
");

        let err = locate_record(
            &path(),
            &doc,
            DefinitionKind::Collection,
            &PackageId::new("dev-libs", "foo", "1.0.0"),
        )
        .expect_err("should be ambiguous");

        assert!(matches!(
            err,
            DefinitionError::AmbiguousTarget { matches: 2, .. }
        ));
    }

    #[test]
    fn missing_record_is_reported_as_zero_matches() {
        let doc = doc("category: app\nname: bar\nversion: 1.0.0\n");

        let err = locate_record(
            &path(),
            &doc,
            DefinitionKind::Single,
            &PackageId::new("app", "bar", "0.9.0"),
        )
        .expect_err("should not match");

        assert!(matches!(
            err,
            DefinitionError::AmbiguousTarget { matches: 0, .. }
        ));
    }

    #[test]
    fn collection_without_packages_is_a_shape_error() {
        let doc = doc("name: foo\n");

        let err = locate_record(
            &path(),
            &doc,
            DefinitionKind::Collection,
            &PackageId::new("dev-libs", "foo", "1.0.0"),
        )
        .expect_err("should fail");

        assert!(matches!(err, DefinitionError::Shape { .. }));
    }
}
