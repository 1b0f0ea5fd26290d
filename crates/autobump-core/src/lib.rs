pub mod labels;
mod package;
pub mod types;

pub use labels::Labels;
pub use package::{COLLECTION_FILE, DEFINITION_FILE, DefinitionFile, DefinitionKind, PackageView};
pub use types::{PackageId, Requirement};
