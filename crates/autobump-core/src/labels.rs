use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Skip the package entirely when set to exactly `"true"`.
pub const IGNORE: &str = "autobump.ignore";
/// Name of the strategy used to resolve the upstream version.
pub const STRATEGY: &str = "autobump.strategy";
/// Shell command printing the upstream version, read by the `custom` strategy.
pub const VERSION_HOOK: &str = "autobump.version_hook";
/// Written on every bump with the new version.
pub const VERSION: &str = "autobump.version";

/// Key/value metadata attached to a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(IndexMap<String, String>);

impl Labels {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.get(IGNORE) == Some("true")
    }

    #[must_use]
    pub fn strategy(&self) -> Option<&str> {
        self.get(STRATEGY)
    }

    /// The version hook, treating an empty or blank value as absent.
    #[must_use]
    pub fn version_hook(&self) -> Option<&str> {
        self.get(VERSION_HOOK).filter(|hook| !hook.trim().is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Labels
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_requires_literal_true() {
        let ignored: Labels = [(IGNORE, "true")].into_iter().collect();
        let capitalised: Labels = [(IGNORE, "True")].into_iter().collect();
        let yes: Labels = [(IGNORE, "yes")].into_iter().collect();

        assert!(ignored.is_ignored());
        assert!(!capitalised.is_ignored());
        assert!(!yes.is_ignored());
        assert!(!Labels::new().is_ignored());
    }

    #[test]
    fn blank_version_hook_is_absent() {
        let blank: Labels = [(VERSION_HOOK, "  \n")].into_iter().collect();
        let hook: Labels = [(VERSION_HOOK, "echo 1.0.0")].into_iter().collect();

        assert_eq!(blank.version_hook(), None);
        assert_eq!(hook.version_hook(), Some("echo 1.0.0"));
    }

    #[test]
    fn insert_replaces_existing_value() {
        let mut labels: Labels = [(VERSION, "1.0.0")].into_iter().collect();

        let previous = labels.insert(VERSION, "1.1.0");

        assert_eq!(previous.as_deref(), Some("1.0.0"));
        assert_eq!(labels.get(VERSION), Some("1.1.0"));
        assert_eq!(labels.len(), 1);
    }
}
