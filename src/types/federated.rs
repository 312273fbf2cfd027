//! Federated identity principals: web identity, OpenID Connect and SAML.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::error::PolicyError;
use crate::traits::{OpenIdConnectProvider, Principal, SamlProvider, DEFAULT_ASSUME_ROLE_ACTION};

use super::conditions::{Condition, Conditions};
use super::fragment::{PrincipalJson, PrincipalPolicyFragment};
use super::principal_type::PrincipalType;

/// Audience injected by [`SamlConsolePrincipal`] so assertions are usable for
/// console sign-in.
pub const SAML_CONSOLE_AUDIENCE: &str = "https://signin.aws.amazon.com/saml";

/// A federated identity provider principal, carrying the conditions limiting
/// which federated identities the statement applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct FederatedPrincipal {
    federated: String,
    conditions: Conditions,
    assume_role_action: String,
}

impl FederatedPrincipal {
    pub fn new(federated: impl Into<String>, conditions: Conditions) -> Self {
        FederatedPrincipal::with_assume_action(federated, conditions, DEFAULT_ASSUME_ROLE_ACTION)
    }

    /// A federated principal assumed through a non-default action.
    pub fn with_assume_action(
        federated: impl Into<String>,
        conditions: Conditions,
        assume_role_action: impl Into<String>,
    ) -> Self {
        FederatedPrincipal {
            federated: federated.into(),
            conditions,
            assume_role_action: assume_role_action.into(),
        }
    }

    pub fn federated(&self) -> &str {
        &self.federated
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }
}

impl Display for FederatedPrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "FederatedPrincipal({})", self.federated)
    }
}

impl Principal for FederatedPrincipal {
    fn assume_role_action(&self) -> String {
        self.assume_role_action.clone()
    }

    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        Ok(PrincipalPolicyFragment::new(
            PrincipalJson::of(PrincipalType::Federated, [self.federated.clone()]),
            self.conditions.clone(),
        ))
    }
}

/// A web-identity federation principal (Cognito, Amazon, Facebook, Google,
/// ...), assumed with `sts:AssumeRoleWithWebIdentity`.
#[derive(Debug, Clone, PartialEq)]
pub struct WebIdentityPrincipal {
    inner: FederatedPrincipal,
}

impl WebIdentityPrincipal {
    pub fn new(identity_provider: impl Into<String>, conditions: Conditions) -> Self {
        WebIdentityPrincipal {
            inner: FederatedPrincipal::with_assume_action(
                identity_provider,
                conditions,
                "sts:AssumeRoleWithWebIdentity",
            ),
        }
    }

    pub fn federated(&self) -> &str {
        self.inner.federated()
    }
}

impl Display for WebIdentityPrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "WebIdentityPrincipal({})", self.federated())
    }
}

impl Principal for WebIdentityPrincipal {
    fn assume_role_action(&self) -> String {
        self.inner.assume_role_action()
    }

    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        self.inner.policy_fragment()
    }
}

/// A web-identity principal whose federated id is a registered OpenID Connect
/// provider.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenIdConnectPrincipal {
    inner: WebIdentityPrincipal,
}

impl OpenIdConnectPrincipal {
    pub fn new(provider: &dyn OpenIdConnectProvider, conditions: Conditions) -> Self {
        OpenIdConnectPrincipal {
            inner: WebIdentityPrincipal::new(provider.open_id_connect_provider_arn(), conditions),
        }
    }

    pub fn federated(&self) -> &str {
        self.inner.federated()
    }
}

impl Display for OpenIdConnectPrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "OpenIdConnectPrincipal({})", self.federated())
    }
}

impl Principal for OpenIdConnectPrincipal {
    fn assume_role_action(&self) -> String {
        self.inner.assume_role_action()
    }

    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        self.inner.policy_fragment()
    }
}

/// A SAML federation principal, assumed with `sts:AssumeRoleWithSAML`.
#[derive(Debug, Clone, PartialEq)]
pub struct SamlPrincipal {
    inner: FederatedPrincipal,
}

impl SamlPrincipal {
    pub fn new(provider: &dyn SamlProvider, conditions: Conditions) -> Self {
        SamlPrincipal {
            inner: FederatedPrincipal::with_assume_action(
                provider.saml_provider_arn(),
                conditions,
                "sts:AssumeRoleWithSAML",
            ),
        }
    }

    pub fn federated(&self) -> &str {
        self.inner.federated()
    }
}

impl Display for SamlPrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "SamlPrincipal({})", self.federated())
    }
}

impl Principal for SamlPrincipal {
    fn assume_role_action(&self) -> String {
        self.inner.assume_role_action()
    }

    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        self.inner.policy_fragment()
    }
}

/// A SAML principal for programmatic and console access.
///
/// The console audience condition is applied on top of the caller's
/// conditions at fragment time, so a competing `SAML:aud` value is always
/// overwritten by the fixed one.
#[derive(Debug, Clone, PartialEq)]
pub struct SamlConsolePrincipal {
    inner: SamlPrincipal,
}

impl SamlConsolePrincipal {
    pub fn new(provider: &dyn SamlProvider, conditions: Conditions) -> Self {
        SamlConsolePrincipal {
            inner: SamlPrincipal::new(provider, conditions),
        }
    }

    pub fn federated(&self) -> &str {
        self.inner.federated()
    }
}

impl Display for SamlConsolePrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "SamlConsolePrincipal({})", self.federated())
    }
}

impl Principal for SamlConsolePrincipal {
    fn assume_role_action(&self) -> String {
        self.inner.assume_role_action()
    }

    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        let fragment = self.inner.policy_fragment()?;
        let audience = Conditions::of([(
            "StringEquals",
            Condition::keys([("SAML:aud", SAML_CONSOLE_AUDIENCE)]),
        )]);
        let conditions = fragment.conditions().merge(&audience)?;
        Ok(PrincipalPolicyFragment::new(
            fragment.principal_json().clone(),
            conditions,
        ))
    }
}
