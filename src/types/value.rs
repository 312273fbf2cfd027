//! Leaf values for identity JSON and condition sets.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::deferred::{DeferredValue, ResolveContext};
use crate::error::PolicyError;

/// A value slot inside identity JSON or a condition set.
///
/// Values are either concrete (strings, lists, one level of nesting as maps)
/// or deferred until a resolution pass supplies the ambient environment.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyValue {
    String(String),
    List(Vec<PolicyValue>),
    Map(BTreeMap<String, PolicyValue>),
    Deferred(DeferredValue),
}

impl PolicyValue {
    pub fn is_deferred(&self) -> bool {
        matches!(self, PolicyValue::Deferred(_))
    }

    /// Replace every deferred value in the tree with its resolved form.
    pub fn resolve(&self, ctx: &dyn ResolveContext) -> Result<PolicyValue, PolicyError> {
        match self {
            PolicyValue::String(s) => Ok(PolicyValue::String(s.clone())),
            PolicyValue::List(values) => Ok(PolicyValue::List(
                values
                    .iter()
                    .map(|v| v.resolve(ctx))
                    .collect::<Result<Vec<_>, _>>()?,
            )),
            PolicyValue::Map(entries) => Ok(PolicyValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), v.resolve(ctx)?)))
                    .collect::<Result<BTreeMap<_, _>, PolicyError>>()?,
            )),
            PolicyValue::Deferred(value) => Ok(PolicyValue::String(value.resolve(ctx)?)),
        }
    }

    /// The concrete string form, if this value is a resolved string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PolicyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PolicyValue {
    fn from(value: &str) -> Self {
        PolicyValue::String(value.to_string())
    }
}

impl From<String> for PolicyValue {
    fn from(value: String) -> Self {
        PolicyValue::String(value)
    }
}

impl From<DeferredValue> for PolicyValue {
    fn from(value: DeferredValue) -> Self {
        PolicyValue::Deferred(value)
    }
}

impl<T: Into<PolicyValue>> From<Vec<T>> for PolicyValue {
    fn from(values: Vec<T>) -> Self {
        PolicyValue::List(values.into_iter().map(Into::into).collect())
    }
}

impl Display for PolicyValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            PolicyValue::String(s) => write!(f, "{s}"),
            PolicyValue::Deferred(value) => write!(f, "{value}"),
            other => {
                let rendered = serde_json::to_string(other).map_err(|_| std::fmt::Error)?;
                write!(f, "{rendered}")
            }
        }
    }
}

impl Serialize for PolicyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PolicyValue::String(s) => serializer.serialize_str(s),
            PolicyValue::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            PolicyValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            // Escapes before resolution: render the opaque placeholder.
            PolicyValue::Deferred(value) => value.serialize(serializer),
        }
    }
}

struct PolicyValueVisitor;

impl<'de> Visitor<'de> for PolicyValueVisitor {
    type Value = PolicyValue;

    fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("a string, a list of values, or a map of values")
    }

    fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(PolicyValue::String(value.to_string()))
    }

    fn visit_string<E: serde::de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(PolicyValue::String(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut values = Vec::new();
        while let Some(value) = seq.next_element()? {
            values.push(value);
        }
        Ok(PolicyValue::List(values))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, PolicyValue>()? {
            entries.insert(key, value);
        }
        Ok(PolicyValue::Map(entries))
    }
}

/// Deserialization never reconstructs a deferred value; placeholders come back
/// as plain strings.
impl<'de> Deserialize<'de> for PolicyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PolicyValueVisitor)
    }
}
