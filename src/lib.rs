// src/lib.rs
pub use deferred::{DeferredValue, Environment, ResolveContext};
pub use error::PolicyError;
pub use facts::default_service_principal;
pub use statement::{
    AssumeRoleDocument, Effect, MutatingDocumentAdapter, PolicyDocument, PolicyStatement,
};
pub use traits::{
    AddToPrincipalPolicyResult, Grantable, OpenIdConnectProvider, Principal, SamlProvider,
    DEFAULT_ASSUME_ROLE_ACTION,
};
#[allow(deprecated)]
pub use types::{
    AccountPrincipal, AccountRootPrincipal, AnyPrincipal, Anyone, ArnPrincipal,
    CanonicalUserPrincipal, CompositePrincipal, Condition, Conditions, FederatedPrincipal,
    OpenIdConnectPrincipal, OrganizationPrincipal, PolicyValue, PrincipalJson,
    PrincipalPolicyFragment, PrincipalType, PrincipalWithConditions, SamlConsolePrincipal,
    SamlPrincipal, ServicePrincipal, ServicePrincipalOpts, SessionTagsPrincipal, StarPrincipal,
    WebIdentityPrincipal, SAML_CONSOLE_AUDIENCE, TAG_SESSION_ACTION,
};

mod deferred;
mod error;
mod facts;
mod statement;
mod traits;
mod types;

#[cfg(test)]
mod tests;
