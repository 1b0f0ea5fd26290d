use autobump_core::{Labels, PackageId, Requirement};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yml::Value;

/// A package record as written in `definition.yaml` or in the `packages`
/// sequence of `collection.yaml`. Fields the tree does not need are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPackage {
    #[serde(deserialize_with = "scalar")]
    pub category: String,
    #[serde(deserialize_with = "scalar")]
    pub name: String,
    #[serde(deserialize_with = "scalar")]
    pub version: String,
    #[serde(default, deserialize_with = "labels")]
    pub labels: Labels,
    #[serde(default, deserialize_with = "nullable")]
    pub requires: Vec<RawRequirement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawCollection {
    pub packages: Vec<RawPackage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawRequirement {
    #[serde(deserialize_with = "scalar")]
    category: String,
    #[serde(deserialize_with = "scalar")]
    name: String,
    #[serde(default, deserialize_with = "optional_scalar")]
    version: Option<String>,
}

impl RawPackage {
    pub fn id(&self) -> PackageId {
        PackageId::new(&self.category, &self.name, &self.version)
    }
}

impl From<RawRequirement> for Requirement {
    fn from(raw: RawRequirement) -> Self {
        Self {
            category: raw.category,
            name: raw.name,
            version: raw.version,
        }
    }
}

fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Reads `1.0` and `"1.0"` alike.
fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    to_string(&value).ok_or_else(|| D::Error::custom("expected a scalar value"))
}

fn optional_scalar<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => to_string(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom("expected a scalar value")),
    }
}

fn labels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Labels, D::Error> {
    let raw: Option<IndexMap<String, Value>> = Option::deserialize(deserializer)?;

    raw.unwrap_or_default()
        .into_iter()
        .map(|(key, value)| {
            to_string(&value)
                .map(|value| (key.clone(), value))
                .ok_or_else(|| D::Error::custom(format!("label '{key}' is not a scalar")))
        })
        .collect()
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
