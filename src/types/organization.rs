//! Organization-scoped principals.

use std::fmt::{Display, Formatter, Result as FmtResult};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::traits::Principal;

use super::conditions::{Condition, Conditions};
use super::fragment::{PrincipalJson, PrincipalPolicyFragment};
use super::principal_type::PrincipalType;

static ORGANIZATION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^o-[a-z0-9]{10,32}$").expect("valid pattern"));

/// All identities that are part of an organization.
///
/// Identity-wise this is every principal (`"*"`), scoped down by a
/// `StringEquals` condition on the organization id; the condition is part of
/// the variant, not something callers attach.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationPrincipal {
    organization_id: String,
}

impl OrganizationPrincipal {
    /// Fails with [`PolicyError::ConstructionError`] when `organization_id`
    /// does not look like `o-xxxxxxxxxx`.
    pub fn new(organization_id: impl Into<String>) -> Result<Self, PolicyError> {
        let organization_id = organization_id.into();
        if !ORGANIZATION_ID.is_match(&organization_id) {
            return Err(PolicyError::ConstructionError(format!(
                "expected an organization id matching {}, got '{organization_id}'",
                ORGANIZATION_ID.as_str()
            )));
        }
        Ok(OrganizationPrincipal { organization_id })
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }
}

impl Display for OrganizationPrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "OrganizationPrincipal({})", self.organization_id)
    }
}

impl Principal for OrganizationPrincipal {
    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        Ok(PrincipalPolicyFragment::new(
            PrincipalJson::of(PrincipalType::Aws, ["*"]),
            Conditions::of([(
                "StringEquals",
                Condition::keys([("aws:PrincipalOrgID", self.organization_id.clone())]),
            )]),
        ))
    }
}
