mod error;
pub mod operations;
pub mod providers;
pub mod strategies;
pub mod traits;
mod types;

#[cfg(test)]
pub mod mocks;

pub use error::{FailureStage, OperationError, Result};
pub use types::Scope;
