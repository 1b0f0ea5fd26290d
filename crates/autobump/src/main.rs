mod error;
mod output;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use autobump_operations::Scope;
use autobump_operations::operations::{BumpInput, BumpOperation, BumpReport};
use autobump_operations::providers::{
    FileSystemDefinitionWriter, FileSystemPackageSource, ShellCommandRunner,
};
use autobump_operations::strategies::{CustomStrategy, StrategyKind, StrategyRegistry};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, Result};
use crate::output::{PlainTextReportFormatter, ReportFormatter};

const LOG_ENV: &str = "AUTOBUMP_LOG";

#[derive(Parser)]
#[command(name = "autobump")]
#[command(version)]
#[command(about = "Bump package definitions to their latest upstream versions", long_about = None)]
struct Cli {
    /// Package tree root; repeat the flag or separate paths with spaces
    #[arg(long = "treedir", env = "TREE_DIR", value_delimiter = ' ')]
    treedir: Vec<String>,

    /// Check the reverse dependencies of every package instead of the package itself
    #[arg(long, env = "AUTOBUMP_REVDEPS")]
    revdeps: bool,

    /// Seconds a version hook may run before it is killed
    #[arg(long, env = "AUTOBUMP_HOOK_TIMEOUT", default_value_t = 300)]
    hook_timeout: u64,

    /// Exit with a failure status if any package failed
    #[arg(long, env = "AUTOBUMP_FAIL_ON_ERROR")]
    fail_on_error: bool,
}

impl Cli {
    fn tree_roots(&self) -> Result<Vec<PathBuf>> {
        let roots: Vec<PathBuf> = self
            .treedir
            .iter()
            .map(|dir| dir.trim())
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .collect();

        if roots.is_empty() {
            return Err(CliError::MissingTreeDir);
        }
        Ok(roots)
    }

    fn scope(&self) -> Scope {
        if self.revdeps {
            Scope::ReverseDependencies
        } else {
            Scope::Packages
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: &Cli) -> Result<()> {
    let input = BumpInput {
        roots: cli.tree_roots()?,
        scope: cli.scope(),
    };

    let strategies = StrategyRegistry::new().with(
        StrategyKind::Custom,
        CustomStrategy::new(ShellCommandRunner::new())
            .with_timeout(Duration::from_secs(cli.hook_timeout)),
    );
    let operation = BumpOperation::new(
        FileSystemPackageSource::new(),
        strategies,
        FileSystemDefinitionWriter::new(),
    );

    let formatter = PlainTextReportFormatter;
    let mut stdout = std::io::stdout().lock();
    let report = operation.execute_with(&input, |package| {
        let _ = stdout.write_all(formatter.format_package(package).as_bytes());
        let _ = stdout.flush();
    })?;
    let _ = stdout.write_all(formatter.format_summary(&report).as_bytes());

    check_failures(&report, cli.fail_on_error)
}

fn check_failures(report: &BumpReport, fail_on_error: bool) -> Result<()> {
    if fail_on_error && report.has_failures() {
        return Err(CliError::PackagesFailed(report.failed()));
    }
    Ok(())
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_treedir_flags_are_collected_in_order() {
        let cli = Cli::try_parse_from(["autobump", "--treedir", "/a", "--treedir", "/b"])
            .expect("parse");

        assert_eq!(
            cli.tree_roots().expect("roots"),
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn space_separated_treedir_drops_empty_segments() {
        let cli = Cli::try_parse_from(["autobump", "--treedir", "/a  /b "]).expect("parse");

        assert_eq!(
            cli.tree_roots().expect("roots"),
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn defaults_check_packages_directly() {
        let cli = Cli::try_parse_from(["autobump", "--treedir", "/a"]).expect("parse");

        assert_eq!(cli.scope(), Scope::Packages);
        assert_eq!(cli.hook_timeout, 300);
        assert!(!cli.fail_on_error);
    }

    #[test]
    fn revdeps_flag_selects_reverse_dependencies() {
        let cli = Cli::try_parse_from(["autobump", "--treedir", "/a", "--revdeps"])
            .expect("parse");

        assert_eq!(cli.scope(), Scope::ReverseDependencies);
    }

    #[test]
    fn blank_treedir_is_a_configuration_error() {
        let cli = Cli::try_parse_from(["autobump", "--treedir", "  "]).expect("parse");

        assert!(matches!(cli.tree_roots(), Err(CliError::MissingTreeDir)));
    }

    #[test]
    fn failures_only_fail_the_run_when_requested() {
        let report = BumpReport {
            packages: vec![autobump_operations::operations::PackageReport {
                id: autobump_core::PackageId::new("app", "tool", "1.0.0"),
                labels: autobump_core::Labels::new(),
                definition: None,
                outcome: autobump_operations::operations::PackageOutcome::Failed(
                    autobump_operations::OperationError::EmptyVersion {
                        strategy: StrategyKind::Custom,
                    },
                ),
            }],
            cancelled: false,
        };

        assert!(check_failures(&report, false).is_ok());
        assert!(matches!(
            check_failures(&report, true),
            Err(CliError::PackagesFailed(1))
        ));
    }

    #[test]
    fn hook_timeout_must_be_a_number() {
        let result = Cli::try_parse_from(["autobump", "--treedir", "/a", "--hook-timeout", "soon"]);

        assert!(result.is_err());
    }
}
