use std::io::Write;
use std::path::Path;

use autobump_core::labels::VERSION as VERSION_LABEL;
use autobump_core::{DefinitionKind, PackageId};
use serde_yml::{Mapping, Value};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::edit;
use crate::error::DefinitionError;
use crate::reader::{
    is_target, locate_record, parse_document, read_source, record_mut, records, scalar_string,
};

/// How the new content was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Only the target lines changed; the rest of the file is untouched.
    Edited,
    /// The layout could not be edited in place and the document was
    /// serialized again.
    Reserialized,
}

/// Sets the version and the `autobump.version` label of the record matching
/// `id`, leaving every other field and record as it was.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, if exactly one
/// matching record cannot be found, if another record already has the same
/// name and category at `new_version`, or if the new content cannot be
/// written. The file is left untouched on every error before the write.
pub fn apply_bump(
    path: &Path,
    kind: DefinitionKind,
    id: &PackageId,
    new_version: &str,
) -> Result<WriteMode, DefinitionError> {
    let source = read_source(path)?;
    let mut doc = parse_document(path, &source)?;
    let index = locate_record(path, &doc, kind, id)?;
    reject_duplicate(path, &doc, kind, id, index, new_version)?;

    set_version(path, record_mut(path, &mut doc, kind, index)?, new_version)?;

    let (content, mode) = match edit::rewrite(&source, kind, index, new_version) {
        Some(edited) if reads_back_as(&edited, &doc) => (edited, WriteMode::Edited),
        _ => {
            debug!(
                file = %path.display(),
                package = %id,
                "layout not editable in place, serializing document"
            );
            let content = serde_yml::to_string(&doc).map_err(|source| {
                DefinitionError::Serialize {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            (content, WriteMode::Reserialized)
        }
    };

    persist(path, &content)?;
    Ok(mode)
}

/// # Errors
///
/// Returns `DefinitionError::VerificationFailed` unless exactly one record for
/// `id` now carries `expected` as both its version and its
/// `autobump.version` label.
pub fn verify_bump(
    path: &Path,
    kind: DefinitionKind,
    id: &PackageId,
    expected: &str,
) -> Result<(), DefinitionError> {
    let source = read_source(path)?;
    let doc = parse_document(path, &source)?;

    let bumped = PackageId {
        version: expected.to_string(),
        ..id.clone()
    };
    let failed = |actual: String| DefinitionError::VerificationFailed {
        path: path.to_path_buf(),
        package: id.package_name(),
        expected: expected.to_string(),
        actual,
    };

    let index = match locate_record(path, &doc, kind, &bumped) {
        Ok(index) => index,
        Err(DefinitionError::AmbiguousTarget { matches, .. }) => {
            return Err(failed(format!("{matches} records at that version")));
        }
        Err(err) => return Err(err),
    };

    let label = records(path, &doc, kind)?[index]
        .get("labels")
        .and_then(|labels| labels.get(VERSION_LABEL))
        .and_then(scalar_string);

    match label {
        Some(label) if label == expected => Ok(()),
        Some(label) => Err(failed(format!("label '{VERSION_LABEL}' set to '{label}'"))),
        None => Err(failed(format!("no '{VERSION_LABEL}' label"))),
    }
}

/// Fails if a record other than `index` already has the identity `id` takes
/// at `new_version`.
fn reject_duplicate(
    path: &Path,
    doc: &Value,
    kind: DefinitionKind,
    id: &PackageId,
    index: usize,
    new_version: &str,
) -> Result<(), DefinitionError> {
    let bumped = PackageId {
        version: new_version.to_string(),
        ..id.clone()
    };
    let taken = records(path, doc, kind)?
        .into_iter()
        .enumerate()
        .any(|(other, record)| other != index && is_target(record, &bumped));

    if taken {
        return Err(DefinitionError::DuplicateTarget {
            path: path.to_path_buf(),
            package: bumped.to_string(),
        });
    }
    Ok(())
}

fn set_version(
    path: &Path,
    record: &mut Mapping,
    new_version: &str,
) -> Result<(), DefinitionError> {
    record.insert(
        Value::String("version".to_string()),
        Value::String(new_version.to_string()),
    );

    if record.get("labels").is_none_or(Value::is_null) {
        record.insert(
            Value::String("labels".to_string()),
            Value::Mapping(Mapping::new()),
        );
    }

    record
        .get_mut("labels")
        .and_then(Value::as_mapping_mut)
        .ok_or_else(|| DefinitionError::Shape {
            path: path.to_path_buf(),
            reason: "expected 'labels' to be a mapping",
        })?
        .insert(
            Value::String(VERSION_LABEL.to_string()),
            Value::String(new_version.to_string()),
        );

    Ok(())
}

fn reads_back_as(content: &str, expected: &Value) -> bool {
    serde_yml::from_str::<Value>(content).is_ok_and(|actual| actual == *expected)
}

/// Replaces `path` with `content` through a temporary file in the same
/// directory, so the original stays intact until the new content is complete.
fn persist(path: &Path, content: &str) -> Result<(), DefinitionError> {
    let write_error = |source| DefinitionError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let permissions = std::fs::metadata(path).map_err(write_error)?.permissions();

    let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    temp.write_all(content.as_bytes()).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.as_file()
        .set_permissions(permissions)
        .map_err(write_error)?;
    temp.persist(path).map_err(|err| write_error(err.error))?;

    Ok(())
}
