//! Session-tagging adapter over a wrapped principal.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::PolicyError;
use crate::statement::{AssumeRoleDocument, MutatingDocumentAdapter, PolicyStatement};
use crate::traits::{AddToPrincipalPolicyResult, Principal};

use super::fragment::PrincipalPolicyFragment;
use super::value::PolicyValue;

/// Action granted alongside the assume action so the assumed session can be
/// tagged.
pub const TAG_SESSION_ACTION: &str = "sts:TagSession";

/// Enables session tags on role assumptions from the wrapped principal.
///
/// Only assume-role-policy attachment changes: every statement the wrapped
/// principal generates additionally grants [`TAG_SESSION_ACTION`]. The
/// steady-state fragment is the wrapped principal's, untouched.
#[derive(Debug, Clone)]
pub struct SessionTagsPrincipal {
    wrapped: Arc<dyn Principal>,
}

impl SessionTagsPrincipal {
    pub fn new(wrapped: Arc<dyn Principal>) -> Self {
        SessionTagsPrincipal { wrapped }
    }
}

impl Display for SessionTagsPrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.wrapped)
    }
}

impl Principal for SessionTagsPrincipal {
    fn assume_role_action(&self) -> String {
        self.wrapped.assume_role_action()
    }

    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        self.wrapped.policy_fragment()
    }

    fn principal_account(&self) -> Option<PolicyValue> {
        self.wrapped.principal_account()
    }

    fn add_to_principal_policy(&self, statement: &PolicyStatement) -> AddToPrincipalPolicyResult {
        self.wrapped.add_to_principal_policy(statement)
    }

    fn add_to_assume_role_policy(
        &self,
        doc: &mut dyn AssumeRoleDocument,
    ) -> Result<(), PolicyError> {
        let mut adapter = MutatingDocumentAdapter::new(doc, |mut statement| {
            statement.add_actions([TAG_SESSION_ACTION]);
            statement
        });
        self.wrapped.add_to_assume_role_policy(&mut adapter)
    }
}
