mod definition;
mod shell;
mod tree;

pub use definition::FileSystemDefinitionWriter;
pub use shell::ShellCommandRunner;
pub use tree::FileSystemPackageSource;
