//! Condition sets and the rules for merging them.

use std::collections::BTreeMap;

use serde::de::{Error as DeError, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::deferred::{DeferredValue, ResolveContext};
use crate::error::PolicyError;

use super::value::PolicyValue;

/// The value attached to a single condition operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Condition-key to value entries, e.g. `{"aws:PrincipalOrgID": "o-..."}`.
    Keys(BTreeMap<String, PolicyValue>),
    /// A whole operator value that is still deferred. Must resolve to the JSON
    /// text of a key map.
    Unresolved(DeferredValue),
}

impl Condition {
    /// Build a key map from `(key, value)` pairs.
    pub fn keys<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<PolicyValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Condition::Keys(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Condition::Unresolved(_))
    }

    fn resolve(&self, ctx: &dyn ResolveContext) -> Result<Condition, PolicyError> {
        match self {
            Condition::Keys(entries) => Ok(Condition::Keys(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), v.resolve(ctx)?)))
                    .collect::<Result<BTreeMap<_, _>, PolicyError>>()?,
            )),
            Condition::Unresolved(value) => {
                let rendered = value.resolve(ctx)?;
                let entries: BTreeMap<String, PolicyValue> = serde_json::from_str(&rendered)
                    .map_err(|e| {
                        PolicyError::ResolutionError(format!(
                            "deferred condition did not resolve to a key map: {e}"
                        ))
                    })?;
                Ok(Condition::Keys(entries))
            }
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Condition::Keys(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Condition::Unresolved(value) => value.serialize(serializer),
        }
    }
}

struct ConditionVisitor;

impl<'de> Visitor<'de> for ConditionVisitor {
    type Value = Condition;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a map of condition keys to values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((key, value)) = map.next_entry::<String, PolicyValue>()? {
            entries.insert(key, value);
        }
        Ok(Condition::Keys(entries))
    }

    fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
        Err(E::custom(format!(
            "condition operators must map to condition keys, got the string '{value}'"
        )))
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ConditionVisitor)
    }
}

/// An operator → condition mapping with deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions(BTreeMap<String, Condition>);

impl Conditions {
    pub fn new() -> Self {
        Conditions::default()
    }

    /// Build a condition set from `(operator, condition)` pairs.
    pub fn of<O, I>(entries: I) -> Self
    where
        O: Into<String>,
        I: IntoIterator<Item = (O, Condition)>,
    {
        Conditions(entries.into_iter().map(|(o, c)| (o.into(), c)).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, operator: &str) -> Option<&Condition> {
        self.0.get(operator)
    }

    pub fn insert(&mut self, operator: impl Into<String>, condition: Condition) {
        self.0.insert(operator.into(), condition);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Condition)> {
        self.0.iter()
    }

    /// Merge `overlay` on top of `self`, returning the combined set.
    ///
    /// Operators present on only one side are carried over as-is. When both
    /// sides carry an operator, the two key maps are merged one level deep and
    /// the overlay wins on key collisions.
    ///
    /// Known restriction: a colliding operator whose value is still unresolved
    /// on either side cannot be merged, since the keys behind the deferred
    /// value are not inspectable at merge time. Such collisions fail with
    /// [`PolicyError::MergeConflict`]; callers must restructure their
    /// principals so unresolved condition blocks never share an operator.
    pub fn merge(&self, overlay: &Conditions) -> Result<Conditions, PolicyError> {
        use std::collections::btree_map::Entry;

        let mut merged = self.clone();
        for (operator, condition) in overlay.iter() {
            match merged.0.entry(operator.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(condition.clone());
                }
                Entry::Occupied(mut entry) => {
                    let (Condition::Keys(base_keys), Condition::Keys(overlay_keys)) =
                        (entry.get(), condition)
                    else {
                        return Err(PolicyError::MergeConflict(format!(
                            "multiple \"{operator}\" conditions cannot be merged if one of \
                             them contains an unresolved value"
                        )));
                    };
                    debug!(
                        event = "ConditionMerge",
                        operator = operator.as_str(),
                        overlay_keys = overlay_keys.len()
                    );
                    let mut keys = base_keys.clone();
                    for (key, value) in overlay_keys {
                        keys.insert(key.clone(), value.clone());
                    }
                    entry.insert(Condition::Keys(keys));
                }
            }
        }
        Ok(merged)
    }

    /// Replace every deferred value in the set with its resolved form.
    pub fn resolve(&self, ctx: &dyn ResolveContext) -> Result<Conditions, PolicyError> {
        Ok(Conditions(
            self.0
                .iter()
                .map(|(operator, condition)| Ok((operator.clone(), condition.resolve(ctx)?)))
                .collect::<Result<BTreeMap<_, _>, PolicyError>>()?,
        ))
    }
}

impl<O: Into<String>> FromIterator<(O, Condition)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (O, Condition)>>(iter: I) -> Self {
        Conditions::of(iter)
    }
}
