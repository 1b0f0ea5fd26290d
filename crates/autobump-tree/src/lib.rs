mod error;
mod record;
mod tree;

pub use error::TreeError;
pub use tree::{PackageTree, TreePackage};
