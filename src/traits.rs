//! Capability seams for policy principals and their collaborators.

use std::fmt::{Debug, Display};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::statement::{AssumeRoleDocument, PolicyStatement};
use crate::types::{
    Conditions, PolicyValue, PrincipalPolicyFragment, PrincipalWithConditions,
    SessionTagsPrincipal,
};

/// Action granted when a principal appears in an assume-role policy, unless a
/// variant overrides it.
pub const DEFAULT_ASSUME_ROLE_ACTION: &str = "sts:AssumeRole";

/// Result of [`Principal::add_to_principal_policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToPrincipalPolicyResult {
    /// Whether the statement was added to the principal's own policy.
    pub statement_added: bool,
}

/// A logical entity that can be granted or denied permission in a policy
/// statement.
///
/// Simple principals are single identities (an ARN, an account, a service).
/// A single logical principal may also stand for a set of identities, like
/// every identity inside an organization. Decorators wrap another principal
/// behind a shared reference and override only the behavior they change,
/// forwarding everything else.
pub trait Principal: Debug + Display + Send + Sync {
    /// The action used when this principal appears in an assume-role policy.
    fn assume_role_action(&self) -> String {
        DEFAULT_ASSUME_ROLE_ACTION.to_string()
    }

    /// The fragment identifying this principal in a policy statement.
    ///
    /// Fragment production is all-or-nothing: merge and composition failures
    /// surface here and no partial fragment is returned.
    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError>;

    /// The account this principal belongs to, when one is known. May still be
    /// deferred (e.g. the ambient deployment account).
    fn principal_account(&self) -> Option<PolicyValue> {
        None
    }

    /// Add a statement to this principal's own policy.
    ///
    /// Identity-less principals have no policy document of their own, so the
    /// default reports that nothing was added.
    fn add_to_principal_policy(&self, _statement: &PolicyStatement) -> AddToPrincipalPolicyResult {
        AddToPrincipalPolicyResult {
            statement_added: false,
        }
    }

    /// Add a statement to this principal's own policy, reporting only whether
    /// it was added.
    #[deprecated(note = "use `add_to_principal_policy`")]
    fn add_to_policy(&self, statement: &PolicyStatement) -> bool {
        self.add_to_principal_policy(statement).statement_added
    }

    /// Attach the statements granting this principal permission to assume a
    /// role: by default, a single statement granting
    /// [`Principal::assume_role_action`] to the full fragment.
    fn add_to_assume_role_policy(
        &self,
        doc: &mut dyn AssumeRoleDocument,
    ) -> Result<(), PolicyError> {
        let statement = PolicyStatement::allow([self.assume_role_action()], self.policy_fragment()?);
        doc.add_statements(statement);
        Ok(())
    }

    /// Wrap this principal with additional conditions.
    ///
    /// When the principal and `conditions` carry a value for the same operator
    /// and key, the value from `conditions` wins.
    fn with_conditions(self, conditions: Conditions) -> PrincipalWithConditions
    where
        Self: Sized + 'static,
    {
        PrincipalWithConditions::new(Arc::new(self), conditions)
    }

    /// Wrap this principal so role assumptions also grant session tagging.
    fn with_session_tags(self) -> SessionTagsPrincipal
    where
        Self: Sized + 'static,
    {
        SessionTagsPrincipal::new(Arc::new(self))
    }
}

/// Any object with an associated principal that permissions can be granted to.
pub trait Grantable {
    /// The principal to grant permissions to.
    fn grant_principal(&self) -> &dyn Principal;
}

/// Every principal is its own grant principal.
impl<T: Principal + 'static> Grantable for T {
    fn grant_principal(&self) -> &dyn Principal {
        self
    }
}

/// Reference to an OpenID Connect identity provider registered elsewhere in
/// the system.
pub trait OpenIdConnectProvider {
    fn open_id_connect_provider_arn(&self) -> String;
}

/// Reference to a SAML identity provider registered elsewhere in the system.
pub trait SamlProvider {
    fn saml_provider_arn(&self) -> String;
}
