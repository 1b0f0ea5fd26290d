mod report;

pub(crate) use report::{PlainTextReportFormatter, ReportFormatter};
