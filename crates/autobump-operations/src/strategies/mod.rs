mod custom;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use autobump_core::PackageView;

pub use custom::{CustomStrategy, DEFAULT_HOOK_TIMEOUT};

use crate::Result;
use crate::error::OperationError;
use crate::traits::VersionResolver;

/// Strategy names accepted in the `autobump.strategy` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyKind {
    /// Runs the shell command in `autobump.version_hook`.
    Custom,
    /// Latest git tag of the upstream repository.
    Git,
    /// Latest git reference of the upstream repository.
    Ref,
    /// Latest published release.
    Release,
    /// Latest snapshot build.
    Snapshot,
    /// Latest version known to the Gentoo tree.
    Gentoo,
    /// Latest version known to the Sabayon tree.
    Sabayon,
}

impl StrategyKind {
    pub const ALL: [Self; 7] = [
        Self::Custom,
        Self::Git,
        Self::Ref,
        Self::Release,
        Self::Snapshot,
        Self::Gentoo,
        Self::Sabayon,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::Git => "git",
            Self::Ref => "ref",
            Self::Release => "release",
            Self::Snapshot => "snapshot",
            Self::Gentoo => "gentoo",
            Self::Sabayon => "sabayon",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| OperationError::UnknownStrategy {
                name: s.to_string(),
                available: Self::ALL.map(Self::as_str).join(", "),
            })
    }
}

/// Resolvers keyed by strategy, fixed once the registry is built.
#[derive(Default)]
pub struct StrategyRegistry {
    resolvers: HashMap<StrategyKind, Box<dyn VersionResolver>>,
}

impl StrategyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, kind: StrategyKind, resolver: impl VersionResolver + 'static) -> Self {
        self.resolvers.insert(kind, Box::new(resolver));
        self
    }

    /// Enabled strategies in declaration order.
    #[must_use]
    pub fn kinds(&self) -> Vec<StrategyKind> {
        let mut kinds: Vec<_> = self.resolvers.keys().copied().collect();
        kinds.sort();
        kinds
    }

    #[must_use]
    pub fn contains(&self, kind: StrategyKind) -> bool {
        self.resolvers.contains_key(&kind)
    }

    /// Resolves the remote version of `package` with the strategy called
    /// `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` is not a known strategy, the strategy is not
    /// enabled, the resolver fails, or it produces a blank version.
    pub fn resolve(&self, name: &str, package: &PackageView) -> Result<String> {
        let kind: StrategyKind = name.parse()?;
        let resolver = self
            .resolvers
            .get(&kind)
            .ok_or(OperationError::StrategyNotRegistered(kind))?;

        let version = resolver.resolve(package)?;
        if version.trim().is_empty() {
            return Err(OperationError::EmptyVersion { strategy: kind });
        }
        Ok(version)
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
