//! Canonical-user principals, mainly for bucket policies addressing origin
//! access identities.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::traits::Principal;

use super::fragment::{PrincipalJson, PrincipalPolicyFragment};
use super::principal_type::PrincipalType;

/// A principal identified by canonical user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalUserPrincipal {
    canonical_user_id: String,
}

impl CanonicalUserPrincipal {
    pub fn new(canonical_user_id: impl Into<String>) -> Self {
        CanonicalUserPrincipal {
            canonical_user_id: canonical_user_id.into(),
        }
    }

    pub fn canonical_user_id(&self) -> &str {
        &self.canonical_user_id
    }
}

impl Display for CanonicalUserPrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "CanonicalUserPrincipal({})", self.canonical_user_id)
    }
}

impl Principal for CanonicalUserPrincipal {
    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        Ok(PrincipalPolicyFragment::without_conditions(
            PrincipalJson::of(PrincipalType::CanonicalUser, [self.canonical_user_id.clone()]),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment() {
        let principal = CanonicalUserPrincipal::new(
            "79a59df900b949e55d96a1e698fbacedfd6e09d98eacf8f8d5218e7cd47ef2be",
        );
        let fragment = principal.policy_fragment().unwrap();
        assert_eq!(
            serde_json::to_value(fragment.principal_json()).unwrap(),
            serde_json::json!({
                "CanonicalUser": ["79a59df900b949e55d96a1e698fbacedfd6e09d98eacf8f8d5218e7cd47ef2be"]
            })
        );
        assert!(fragment.conditions().is_empty());
    }
}
