use autobump_core::{DefinitionFile, PackageView};
use tracing::debug;

use crate::Result;
use crate::error::OperationError;
use crate::traits::DefinitionWriter;

/// Rewrites definition files in place.
pub struct FileSystemDefinitionWriter;

impl FileSystemDefinitionWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemDefinitionWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn definition(package: &PackageView) -> Result<&DefinitionFile> {
    package
        .definition
        .as_ref()
        .ok_or_else(|| OperationError::MissingDefinition {
            package: package.id.package_name(),
            dir: package.dir.clone(),
        })
}

impl DefinitionWriter for FileSystemDefinitionWriter {
    fn apply_bump(&self, package: &PackageView, new_version: &str) -> Result<()> {
        let file = definition(package)?;
        let mode =
            autobump_definition::apply_bump(&file.path, file.kind, &package.id, new_version)?;
        debug!(file = %file.path.display(), package = %package.id, ?mode, "definition rewritten");
        Ok(())
    }

    fn verify_bump(&self, package: &PackageView, new_version: &str) -> Result<()> {
        let file = definition(package)?;
        Ok(autobump_definition::verify_bump(
            &file.path,
            file.kind,
            &package.id,
            new_version,
        )?)
    }
}
