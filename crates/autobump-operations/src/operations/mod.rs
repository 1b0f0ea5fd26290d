mod bump;

pub use bump::{BumpInput, BumpOperation, BumpReport, PackageOutcome, PackageReport};
