use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a package record inside a tree.
///
/// Category, name and version together are what a definition rewrite
/// matches on; they are not guaranteed unique across collection files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId {
    pub category: String,
    pub name: String,
    pub version: String,
}

impl PackageId {
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// `category/name`, without the version.
    #[must_use]
    pub fn package_name(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.category, self.name, self.version)
    }
}

/// A dependency edge declared under `requires`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub category: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Requirement {
    #[must_use]
    pub fn matches(&self, id: &PackageId) -> bool {
        self.category == id.category && self.name == id.name
    }
}
