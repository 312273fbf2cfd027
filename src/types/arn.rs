//! ARN-addressed principals and the two star principals.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::traits::Principal;

use super::fragment::{PrincipalJson, PrincipalPolicyFragment};
use super::principal_type::PrincipalType;

/// A principal identified by Amazon Resource Name: accounts, users, roles and
/// specific assumed-role sessions. Groups and instance profiles cannot be
/// addressed this way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArnPrincipal {
    arn: String,
}

impl ArnPrincipal {
    pub fn new(arn: impl Into<String>) -> Self {
        ArnPrincipal { arn: arn.into() }
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }
}

impl Display for ArnPrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "ArnPrincipal({})", self.arn)
    }
}

impl Principal for ArnPrincipal {
    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        Ok(PrincipalPolicyFragment::without_conditions(
            PrincipalJson::of(PrincipalType::Aws, [self.arn.clone()]),
        ))
    }
}

/// All identities in all accounts, rendered as `{"AWS": ["*"]}`.
///
/// Some services treat `Principal: "*"` and `Principal: {"AWS": "*"}`
/// differently. This form is correct most of the time; for the other one use
/// [`StarPrincipal`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnyPrincipal;

impl AnyPrincipal {
    pub fn new() -> Self {
        AnyPrincipal
    }
}

impl Display for AnyPrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "AnyPrincipal()")
    }
}

impl Principal for AnyPrincipal {
    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        Ok(PrincipalPolicyFragment::without_conditions(
            PrincipalJson::of(PrincipalType::Aws, ["*"]),
        ))
    }
}

/// Deprecated alias for [`AnyPrincipal`].
#[deprecated(note = "use `AnyPrincipal`")]
pub type Anyone = AnyPrincipal;

/// The literal `"*"` principal, rendered as a bare string rather than
/// `{"AWS": ["*"]}`. Most of the time [`AnyPrincipal`] is what you want.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StarPrincipal;

impl StarPrincipal {
    pub fn new() -> Self {
        StarPrincipal
    }
}

impl Display for StarPrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "StarPrincipal()")
    }
}

impl Principal for StarPrincipal {
    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        Ok(PrincipalPolicyFragment::without_conditions(
            PrincipalJson::of(PrincipalType::LiteralString, ["*"]),
        ))
    }
}
