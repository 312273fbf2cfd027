//! Conditions adapter over a wrapped principal.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::PolicyError;
use crate::traits::{AddToPrincipalPolicyResult, Principal};
use crate::statement::PolicyStatement;

use super::conditions::{Condition, Conditions};
use super::fragment::PrincipalPolicyFragment;
use super::value::PolicyValue;

/// A principal with additional conditions specifying when the statement it
/// appears in is in effect.
///
/// Identity JSON is delegated to the wrapped principal unchanged; only the
/// condition set is layered. The overlay is append-only and single-writer:
/// nothing here coordinates concurrent `add_condition` calls.
#[derive(Debug, Clone)]
pub struct PrincipalWithConditions {
    wrapped: Arc<dyn Principal>,
    additional: Conditions,
}

impl PrincipalWithConditions {
    pub fn new(wrapped: Arc<dyn Principal>, conditions: Conditions) -> Self {
        PrincipalWithConditions {
            wrapped,
            additional: conditions,
        }
    }

    /// Add one operator's entries to the overlay.
    ///
    /// An operator already present in the overlay is merged key-by-key with
    /// the new entries winning, so later adds overwrite earlier ones.
    pub fn add_condition(
        &mut self,
        operator: impl Into<String>,
        condition: Condition,
    ) -> Result<(), PolicyError> {
        self.additional = self
            .additional
            .merge(&Conditions::of([(operator.into(), condition)]))?;
        Ok(())
    }

    /// Add multiple operators' entries to the overlay, with the same
    /// overwrite semantics as [`PrincipalWithConditions::add_condition`].
    pub fn add_conditions(&mut self, conditions: Conditions) -> Result<(), PolicyError> {
        self.additional = self.additional.merge(&conditions)?;
        Ok(())
    }

    /// The merged view: the wrapped principal's conditions with the overlay
    /// applied on top.
    pub fn conditions(&self) -> Result<Conditions, PolicyError> {
        self.wrapped
            .policy_fragment()?
            .conditions()
            .merge(&self.additional)
    }
}

impl Display for PrincipalWithConditions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.wrapped)
    }
}

impl Principal for PrincipalWithConditions {
    fn assume_role_action(&self) -> String {
        self.wrapped.assume_role_action()
    }

    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        let fragment = self.wrapped.policy_fragment()?;
        let conditions = fragment.conditions().merge(&self.additional)?;
        Ok(PrincipalPolicyFragment::new(
            fragment.principal_json().clone(),
            conditions,
        ))
    }

    fn principal_account(&self) -> Option<PolicyValue> {
        self.wrapped.principal_account()
    }

    fn add_to_principal_policy(&self, statement: &PolicyStatement) -> AddToPrincipalPolicyResult {
        self.wrapped.add_to_principal_policy(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::DeferredValue;
    use crate::statement::PolicyDocument;
    use crate::types::arn::ArnPrincipal;
    use crate::types::organization::OrganizationPrincipal;

    fn arn() -> ArnPrincipal {
        ArnPrincipal::new("arn:aws:iam::123456789012:role/ops")
    }

    #[test]
    fn test_conditions_overlay_wrapped_fragment() {
        let principal = arn().with_conditions(Conditions::of([(
            "BoolIfExists",
            Condition::keys([("aws:MultiFactorAuthPresent", "true")]),
        )]));

        let fragment = principal.policy_fragment().unwrap();
        assert_eq!(
            serde_json::to_value(fragment.principal_json()).unwrap(),
            serde_json::json!({ "AWS": ["arn:aws:iam::123456789012:role/ops"] })
        );
        assert_eq!(fragment.conditions().len(), 1);
    }

    #[test]
    fn test_add_condition_overwrites_same_key() {
        let mut principal = arn().with_conditions(Conditions::of([(
            "StringEquals",
            Condition::keys([("aws:username", "alice")]),
        )]));
        principal
            .add_condition("StringEquals", Condition::keys([("aws:username", "bob")]))
            .unwrap();

        let fragment = principal.policy_fragment().unwrap();
        assert_eq!(
            fragment.conditions().get("StringEquals").unwrap(),
            &Condition::keys([("aws:username", "bob")])
        );
    }

    #[test]
    fn test_add_conditions_extends_overlay() {
        let mut principal = arn().with_conditions(Conditions::new());
        principal
            .add_conditions(Conditions::of([
                ("StringEquals", Condition::keys([("aws:username", "alice")])),
                (
                    "IpAddress",
                    Condition::keys([("aws:SourceIp", "203.0.113.0/24")]),
                ),
            ]))
            .unwrap();

        assert_eq!(principal.conditions().unwrap().len(), 2);
    }

    #[test]
    fn test_overlay_merges_with_variant_conditions() {
        let organization = OrganizationPrincipal::new("o-1234567890").unwrap();
        let principal = organization.with_conditions(Conditions::of([(
            "StringEquals",
            Condition::keys([("aws:PrincipalTag/team", "storage")]),
        )]));

        let fragment = principal.policy_fragment().unwrap();
        assert_eq!(
            fragment.conditions().get("StringEquals").unwrap(),
            &Condition::keys([
                ("aws:PrincipalOrgID", "o-1234567890"),
                ("aws:PrincipalTag/team", "storage"),
            ])
        );
    }

    #[test]
    fn test_unresolved_overlay_collision_fails_at_fragment_time() {
        let organization = OrganizationPrincipal::new("o-1234567890").unwrap();
        let principal = organization.with_conditions(Conditions::of([(
            "StringEquals",
            Condition::Unresolved(DeferredValue::new(|_| Ok(String::new()))),
        )]));

        assert!(matches!(
            principal.policy_fragment(),
            Err(PolicyError::MergeConflict(_))
        ));
    }

    #[test]
    fn test_delegates_assume_action_and_display() {
        let principal = arn().with_conditions(Conditions::new());
        assert_eq!(principal.assume_role_action(), "sts:AssumeRole");
        assert_eq!(
            principal.to_string(),
            "ArnPrincipal(arn:aws:iam::123456789012:role/ops)"
        );
    }

    #[test]
    fn test_assume_role_policy_uses_merged_fragment() {
        let principal = arn().with_conditions(Conditions::of([(
            "StringEquals",
            Condition::keys([("sts:ExternalId", "vendor-42")]),
        )]));

        let mut doc = PolicyDocument::new();
        principal.add_to_assume_role_policy(&mut doc).unwrap();

        let statements = doc.statements();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].actions(), ["sts:AssumeRole"]);
        assert_eq!(statements[0].conditions().len(), 1);
    }
}
