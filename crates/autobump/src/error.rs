use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("no tree directory given (use --treedir or set TREE_DIR)")]
    MissingTreeDir,

    #[error("failed to load the package tree")]
    Operation(#[from] autobump_operations::OperationError),

    #[error("{0} package(s) failed")]
    PackagesFailed(usize),
}

pub type Result<T> = std::result::Result<T, CliError>;
