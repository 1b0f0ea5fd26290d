use std::error::Error;

use autobump_operations::OperationError;
use autobump_operations::operations::{BumpReport, PackageOutcome, PackageReport};

pub(crate) trait ReportFormatter {
    fn format_package(&self, package: &PackageReport) -> String;
    fn format_summary(&self, report: &BumpReport) -> String;
}

/// One status block per package, in the order packages are checked.
pub(crate) struct PlainTextReportFormatter;

impl PlainTextReportFormatter {
    fn format_versions(output: &mut String, current: &str, remote: &str) {
        output.push_str(&format!(
            "🟦 Current version {current}, remote version {remote}\n"
        ));
    }

    fn format_labels(output: &mut String, package: &PackageReport) {
        for (key, value) in package.labels.iter() {
            output.push_str(&format!("📝 {key} ➡ {}\n", value.trim()));
        }
    }

    fn format_error(error: &OperationError) -> String {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

impl ReportFormatter for PlainTextReportFormatter {
    fn format_package(&self, package: &PackageReport) -> String {
        let mut output = format!(
            "⏳ Checking updates for package: {}\n",
            package.id.package_name()
        );
        Self::format_labels(&mut output, package);

        match &package.outcome {
            PackageOutcome::Ignored => {
                output.push_str("⏩ Ignored by label, skipping\n");
            }
            PackageOutcome::UpToDate { current, remote } => {
                Self::format_versions(&mut output, current, remote);
                output.push_str("✅ Version is equal or lower, nothing to do\n");
            }
            PackageOutcome::Bumped { previous, version } => {
                Self::format_versions(&mut output, previous, version);
                output.push_str("⏫ Remote version is higher, lets bump it!\n");
                match &package.definition {
                    Some(path) => output.push_str(&format!(
                        "📝 Updated {} to {version}\n",
                        path.display()
                    )),
                    None => output.push_str(&format!("📝 Updated to {version}\n")),
                }
            }
            PackageOutcome::Failed(error) => {
                output.push_str(&format!(
                    "❌ Failed ({} stage): {}\n",
                    error.stage(),
                    Self::format_error(error)
                ));
            }
        }

        output
    }

    fn format_summary(&self, report: &BumpReport) -> String {
        let mut output = format!(
            "Checked {} package(s): {} bumped, {} up to date, {} ignored, {} failed\n",
            report.packages.len(),
            report.bumped(),
            report.up_to_date(),
            report.ignored(),
            report.failed(),
        );
        if report.cancelled {
            output.push_str("Run cancelled before all packages were checked\n");
        }
        output
    }
}
