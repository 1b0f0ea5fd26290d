use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use autobump_core::{Labels, PackageId, PackageView};
use tracing::{debug, info, warn};

use crate::error::OperationError;
use crate::strategies::StrategyRegistry;
use crate::traits::{DefinitionWriter, PackageSource};
use crate::types::Scope;
use crate::{FailureStage, Result};

#[derive(Debug, Clone, Default)]
pub struct BumpInput {
    pub roots: Vec<PathBuf>,
    pub scope: Scope,
}

#[derive(Debug)]
pub enum PackageOutcome {
    /// The package carries `autobump.ignore: "true"`.
    Ignored,
    UpToDate {
        current: String,
        remote: String,
    },
    Bumped {
        previous: String,
        version: String,
    },
    Failed(OperationError),
}

#[derive(Debug)]
pub struct PackageReport {
    pub id: PackageId,
    /// Labels as read from the tree, before any bump.
    pub labels: Labels,
    pub definition: Option<PathBuf>,
    pub outcome: PackageOutcome,
}

impl PackageReport {
    #[must_use]
    pub fn failure_stage(&self) -> Option<FailureStage> {
        match &self.outcome {
            PackageOutcome::Failed(error) => Some(error.stage()),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct BumpReport {
    pub packages: Vec<PackageReport>,
    /// Set when the run stopped before every package was checked.
    pub cancelled: bool,
}

impl BumpReport {
    fn count(&self, predicate: impl Fn(&PackageOutcome) -> bool) -> usize {
        self.packages
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }

    #[must_use]
    pub fn bumped(&self) -> usize {
        self.count(|outcome| matches!(outcome, PackageOutcome::Bumped { .. }))
    }

    #[must_use]
    pub fn up_to_date(&self) -> usize {
        self.count(|outcome| matches!(outcome, PackageOutcome::UpToDate { .. }))
    }

    #[must_use]
    pub fn ignored(&self) -> usize {
        self.count(|outcome| matches!(outcome, PackageOutcome::Ignored))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, PackageOutcome::Failed(_)))
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// Checks every selected package against its upstream version and rewrites
/// the definitions that are behind.
///
/// Packages are processed one at a time. A failure is recorded for its
/// package and the run moves on; only a tree that cannot be loaded aborts.
pub struct BumpOperation<S, W> {
    source: S,
    strategies: StrategyRegistry,
    writer: W,
    cancel: Arc<AtomicBool>,
}

impl<S, W> BumpOperation<S, W>
where
    S: PackageSource,
    W: DefinitionWriter,
{
    pub fn new(source: S, strategies: StrategyRegistry, writer: W) -> Self {
        Self {
            source,
            strategies,
            writer,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stops the run before the next package once `flag` is set.
    #[must_use]
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    /// # Errors
    ///
    /// Returns an error if the package tree cannot be loaded.
    pub fn execute(&self, input: &BumpInput) -> Result<BumpReport> {
        self.execute_with(input, |_| {})
    }

    /// Like [`execute`](Self::execute), calling `on_package` as soon as each
    /// package has been handled.
    ///
    /// # Errors
    ///
    /// Returns an error if the package tree cannot be loaded.
    pub fn execute_with(
        &self,
        input: &BumpInput,
        mut on_package: impl FnMut(&PackageReport),
    ) -> Result<BumpReport> {
        let packages = self.source.packages(&input.roots, input.scope)?;
        info!(count = packages.len(), scope = ?input.scope, "checking packages");

        let mut report = BumpReport::default();
        for package in packages {
            if self.cancel.load(Ordering::SeqCst) {
                warn!(
                    checked = report.packages.len(),
                    "run cancelled, skipping remaining packages"
                );
                report.cancelled = true;
                break;
            }

            let outcome = self.process(&package);
            let package_report = PackageReport {
                id: package.id,
                labels: package.labels,
                definition: package.definition.map(|file| file.path),
                outcome,
            };
            on_package(&package_report);
            report.packages.push(package_report);
        }

        info!(
            bumped = report.bumped(),
            up_to_date = report.up_to_date(),
            ignored = report.ignored(),
            failed = report.failed(),
            "run finished"
        );
        Ok(report)
    }

    fn process(&self, package: &PackageView) -> PackageOutcome {
        if package.labels.is_ignored() {
            debug!(package = %package.id, "ignored by label");
            return PackageOutcome::Ignored;
        }

        match self.check(package) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(
                    package = %package.id,
                    stage = %error.stage(),
                    error = %error,
                    "package failed"
                );
                PackageOutcome::Failed(error)
            }
        }
    }

    fn check(&self, package: &PackageView) -> Result<PackageOutcome> {
        let strategy = package.labels.strategy().ok_or_else(|| {
            OperationError::MissingStrategy {
                package: package.id.package_name(),
            }
        })?;

        let remote = self.strategies.resolve(strategy, package)?;
        let remote = remote.trim();
        let comparison = autobump_version::compare(&package.id.version, remote)?;

        if !comparison.needs_bump() {
            debug!(package = %package.id, remote, "up to date");
            return Ok(PackageOutcome::UpToDate {
                current: package.id.version.clone(),
                remote: remote.to_string(),
            });
        }

        self.writer.apply_bump(package, remote)?;
        self.writer.verify_bump(package, remote)?;
        info!(package = %package.id, version = remote, "bumped");

        Ok(PackageOutcome::Bumped {
            previous: package.id.version.clone(),
            version: remote.to_string(),
        })
    }
}
