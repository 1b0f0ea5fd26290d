mod command_runner;
mod definition_writer;
mod package_source;
mod version_resolver;

pub use command_runner::CommandRunner;
pub use definition_writer::DefinitionWriter;
pub use package_source::PackageSource;
pub use version_resolver::VersionResolver;
