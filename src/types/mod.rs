//! Data model types for principals and their policy fragments.
//!
//! Canonical fragment forms:
//! - direct principal: `{ "<TYPE>": ["id", ...] }` with an optional condition set
//! - literal star: the bare string `"*"` (distinct from `{"AWS": ["*"]}`)
//! - composite: several type keys merged into one map
//!
//! Deferred values render as `<hint>` placeholders anywhere a fragment is
//! serialized before the resolution pass.

mod account;
mod arn;
mod canonical_user;
mod composite;
mod conditions;
mod federated;
mod fragment;
mod organization;
mod principal_type;
mod service;
mod session_tags;
mod value;
mod with_conditions;

// Re-export everything at the types level.
pub use account::{AccountPrincipal, AccountRootPrincipal};
#[allow(deprecated)]
pub use arn::{AnyPrincipal, Anyone, ArnPrincipal, StarPrincipal};
pub use canonical_user::CanonicalUserPrincipal;
pub use composite::CompositePrincipal;
pub use conditions::{Condition, Conditions};
pub use federated::{
    FederatedPrincipal, OpenIdConnectPrincipal, SamlConsolePrincipal, SamlPrincipal,
    WebIdentityPrincipal, SAML_CONSOLE_AUDIENCE,
};
pub use fragment::{PrincipalJson, PrincipalPolicyFragment};
pub use organization::OrganizationPrincipal;
pub use principal_type::PrincipalType;
pub use service::{ServicePrincipal, ServicePrincipalOpts};
pub use session_tags::{SessionTagsPrincipal, TAG_SESSION_ACTION};
pub use value::PolicyValue;
pub use with_conditions::PrincipalWithConditions;
