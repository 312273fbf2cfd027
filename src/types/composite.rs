//! Composite principals.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use itertools::Itertools;

use crate::error::PolicyError;
use crate::statement::AssumeRoleDocument;
use crate::traits::Principal;

use super::fragment::{PrincipalJson, PrincipalPolicyFragment};

/// Multiple principals treated as one logical actor for assume-permission
/// purposes.
///
/// The two production paths are intentionally asymmetric and must stay that
/// way:
/// - [`Principal::policy_fragment`] renders every member into a single
///   statement, which is only sound while no member carries conditions;
///   otherwise it fails with [`PolicyError::ValidationError`].
/// - [`Principal::add_to_assume_role_policy`] emits one statement per member,
///   so per-member conditions survive on that path. Callers with conditioned
///   members should prefer it.
#[derive(Debug, Clone)]
pub struct CompositePrincipal {
    assume_role_action: String,
    principals: Vec<Arc<dyn Principal>>,
}

impl CompositePrincipal {
    /// Fails with [`PolicyError::ConstructionError`] when `principals` is
    /// empty. The composite's assume action is fixed to the first member's at
    /// construction and never recomputed, even as members are added.
    pub fn new(principals: Vec<Arc<dyn Principal>>) -> Result<Self, PolicyError> {
        let first = principals.first().ok_or_else(|| {
            PolicyError::ConstructionError(
                "composite principals must be constructed with at least one principal".to_string(),
            )
        })?;
        let assume_role_action = first.assume_role_action();
        Ok(CompositePrincipal {
            assume_role_action,
            principals,
        })
    }

    /// Append members. Existing members are never reordered or removed.
    pub fn add_principals(
        &mut self,
        principals: impl IntoIterator<Item = Arc<dyn Principal>>,
    ) -> &mut Self {
        self.principals.extend(principals);
        self
    }

    pub fn principals(&self) -> &[Arc<dyn Principal>] {
        &self.principals
    }
}

impl Display for CompositePrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "CompositePrincipal({})",
            self.principals.iter().map(|p| p.to_string()).join(", ")
        )
    }
}

impl Principal for CompositePrincipal {
    fn assume_role_action(&self) -> String {
        self.assume_role_action.clone()
    }

    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        // Conditions are only a problem when rendering members into a single
        // statement, which is exactly what this path does.
        let fragments = self
            .principals
            .iter()
            .map(|p| p.policy_fragment())
            .collect::<Result<Vec<_>, _>>()?;

        for fragment in &fragments {
            if !fragment.conditions().is_empty() {
                return Err(PolicyError::ValidationError(format!(
                    "components of a composite principal must not have conditions; \
                     offending fragment: {}",
                    serde_json::to_string(fragment)
                        .unwrap_or_else(|_| "<unserializable>".to_string())
                )));
            }
        }

        let mut principal_json = PrincipalJson::default();
        for fragment in &fragments {
            principal_json.merge(fragment.principal_json())?;
        }
        Ok(PrincipalPolicyFragment::without_conditions(principal_json))
    }

    fn add_to_assume_role_policy(
        &self,
        doc: &mut dyn AssumeRoleDocument,
    ) -> Result<(), PolicyError> {
        for principal in &self.principals {
            principal.add_to_assume_role_policy(doc)?;
        }
        Ok(())
    }
}
