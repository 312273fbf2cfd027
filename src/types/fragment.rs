//! Principal policy fragments: identity JSON plus attached conditions.

use std::collections::BTreeMap;

use serde::de::{Error as DeError, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::deferred::ResolveContext;
use crate::error::PolicyError;

use super::conditions::Conditions;
use super::principal_type::PrincipalType;
use super::value::PolicyValue;

/// Identity JSON: principal type → list of identity values.
///
/// Generally this renders as `{ "<TYPE>": ["id", ...] }`. The one exception is
/// the literal-string type, which renders unwrapped (a bare `"*"` instead of
/// `{"AWS": ["*"]}`) because some services treat the two forms differently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrincipalJson(BTreeMap<PrincipalType, Vec<PolicyValue>>);

impl PrincipalJson {
    /// Single-type identity, the shape every direct principal produces.
    pub fn of<V, I>(ty: PrincipalType, values: I) -> Self
    where
        V: Into<PolicyValue>,
        I: IntoIterator<Item = V>,
    {
        PrincipalJson(BTreeMap::from([(
            ty,
            values.into_iter().map(Into::into).collect(),
        )]))
    }

    pub fn get(&self, ty: PrincipalType) -> Option<&[PolicyValue]> {
        self.0.get(&ty).map(Vec::as_slice)
    }

    pub fn types(&self) -> impl Iterator<Item = PrincipalType> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append `other`'s identity values per type, preserving insertion order
    /// and keeping duplicates.
    ///
    /// A bare-string identity cannot be combined with typed entries; that
    /// merge fails with [`PolicyError::ValidationError`].
    pub fn merge(&mut self, other: &PrincipalJson) -> Result<(), PolicyError> {
        let has_literal = self.0.contains_key(&PrincipalType::LiteralString)
            || other.0.contains_key(&PrincipalType::LiteralString);
        let has_typed = self
            .0
            .keys()
            .chain(other.0.keys())
            .any(|ty| *ty != PrincipalType::LiteralString);
        if has_literal && has_typed {
            return Err(PolicyError::ValidationError(
                "a literal-string principal cannot be combined with typed principal entries"
                    .to_string(),
            ));
        }

        for (ty, values) in &other.0 {
            self.0.entry(*ty).or_default().extend(values.iter().cloned());
        }
        Ok(())
    }

    /// Replace every deferred identity value with its resolved form.
    pub fn resolve(&self, ctx: &dyn ResolveContext) -> Result<PrincipalJson, PolicyError> {
        Ok(PrincipalJson(
            self.0
                .iter()
                .map(|(ty, values)| {
                    let resolved = values
                        .iter()
                        .map(|v| v.resolve(ctx))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok((*ty, resolved))
                })
                .collect::<Result<BTreeMap<_, _>, PolicyError>>()?,
        ))
    }
}

impl Serialize for PrincipalJson {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // A lone literal-string entry renders unwrapped.
        if self.0.len() == 1 {
            if let Some(values) = self.0.get(&PrincipalType::LiteralString) {
                return match values.as_slice() {
                    [single] => single.serialize(serializer),
                    many => {
                        let mut seq = serializer.serialize_seq(Some(many.len()))?;
                        for value in many {
                            seq.serialize_element(value)?;
                        }
                        seq.end()
                    }
                };
            }
        }
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (ty, values) in &self.0 {
            map.serialize_entry(ty, values)?;
        }
        map.end()
    }
}

struct PrincipalJsonVisitor;

impl<'de> Visitor<'de> for PrincipalJsonVisitor {
    type Value = PrincipalJson;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a bare principal string, a list of them, or a type-keyed map")
    }

    fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
        Ok(PrincipalJson::of(PrincipalType::LiteralString, [value]))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut values = Vec::new();
        while let Some(value) = seq.next_element::<String>()? {
            values.push(value);
        }
        Ok(PrincipalJson::of(PrincipalType::LiteralString, values))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some((ty, value)) = map.next_entry::<PrincipalType, PolicyValue>()? {
            // Scalar identity values are accepted and normalized to lists.
            let values = match value {
                PolicyValue::List(values) => values,
                PolicyValue::String(s) => vec![PolicyValue::String(s)],
                other => {
                    return Err(A::Error::custom(format!(
                        "identity values must be strings or lists, got {other:?}"
                    )));
                }
            };
            entries.insert(ty, values);
        }
        Ok(PrincipalJson(entries))
    }
}

impl<'de> Deserialize<'de> for PrincipalJson {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PrincipalJsonVisitor)
    }
}

/// The fields identifying a principal inside a policy statement: the JSON for
/// the `Principal` slot plus the conditions that must accompany it.
///
/// Immutable once constructed; decorators build new fragments rather than
/// editing existing ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipalPolicyFragment {
    principal_json: PrincipalJson,
    #[serde(default, skip_serializing_if = "Conditions::is_empty")]
    conditions: Conditions,
}

impl PrincipalPolicyFragment {
    pub fn new(principal_json: PrincipalJson, conditions: Conditions) -> Self {
        PrincipalPolicyFragment {
            principal_json,
            conditions,
        }
    }

    pub fn without_conditions(principal_json: PrincipalJson) -> Self {
        PrincipalPolicyFragment::new(principal_json, Conditions::new())
    }

    pub fn principal_json(&self) -> &PrincipalJson {
        &self.principal_json
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    /// Resolve every deferred value in the fragment against `ctx`.
    pub fn resolve(&self, ctx: &dyn ResolveContext) -> Result<PrincipalPolicyFragment, PolicyError> {
        debug!(
            event = "Resolve",
            types = self.principal_json.0.len(),
            operators = self.conditions.len()
        );
        Ok(PrincipalPolicyFragment {
            principal_json: self.principal_json.resolve(ctx)?,
            conditions: self.conditions.resolve(ctx)?,
        })
    }
}
