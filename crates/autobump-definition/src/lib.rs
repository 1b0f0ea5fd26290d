mod edit;
mod error;
mod reader;
mod writer;

pub use error::DefinitionError;
pub use reader::{locate_record, parse_document, read_source, scalar_string};
pub use writer::{WriteMode, apply_bump, verify_bump};
