mod error;

use std::cmp::Ordering;

pub use error::{VersionError, VersionSide};
pub use semver::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Bump,
    UpToDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub current: Version,
    pub remote: Version,
    pub decision: Decision,
}

impl Comparison {
    #[must_use]
    pub fn needs_bump(&self) -> bool {
        self.decision == Decision::Bump
    }
}

/// Parses both versions and decides whether `remote` warrants a bump.
///
/// # Errors
///
/// Returns `VersionError` naming the side whose string is not a version.
pub fn compare(current: &str, remote: &str) -> Result<Comparison, VersionError> {
    let current = parse_version(current, VersionSide::Current)?;
    let remote = parse_version(remote, VersionSide::Remote)?;

    let decision = if needs_bump(&current, &remote) {
        Decision::Bump
    } else {
        Decision::UpToDate
    };

    Ok(Comparison {
        current,
        remote,
        decision,
    })
}

/// True iff `remote` has strictly greater precedence than `current`.
/// Build metadata does not take part in precedence.
#[must_use]
pub fn needs_bump(current: &Version, remote: &Version) -> bool {
    remote.cmp_precedence(current) == Ordering::Greater
}

/// Parses a version as printed by upstream tooling.
///
/// Accepts surrounding whitespace, a leading `v` and missing minor/patch
/// components (`1.2` is read as `1.2.0`).
///
/// # Errors
///
/// Returns `VersionError::Empty` for a blank string and
/// `VersionError::Parse` if the normalized string is not semver.
pub fn parse_version(raw: &str, side: VersionSide) -> Result<Version, VersionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(VersionError::Empty { side });
    }

    let normalized = normalize(trimmed);
    Version::parse(&normalized).map_err(|source| VersionError::Parse {
        side,
        version: trimmed.to_string(),
        source,
    })
}

fn normalize(version: &str) -> String {
    let version = version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version);

    let split_at = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(split_at);

    let components = core.split('.').count();
    let all_numeric = core
        .split('.')
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()));

    if !all_numeric || components >= 3 {
        return version.to_string();
    }

    let padding = ".0".repeat(3 - components);
    format!("{core}{padding}{suffix}")
}
