//! Values deferred until an explicit resolution pass supplies the ambient
//! deployment environment.
//!
//! A [`DeferredValue`] holds a resolver closure instead of a concrete string.
//! It is created when a principal is constructed and resolved later by passing
//! a [`ResolveContext`] through [`DeferredValue::resolve`] (or one of the
//! `resolve` walkers on the container types). Outside of a resolution pass the
//! value renders as an opaque placeholder such as `<unresolved>` or
//! `<sqs.amazonaws.com>`.

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::PolicyError;

/// Ambient deployment scope a resolution pass runs against.
///
/// Implemented by whatever owns the deployment facts (for tests and simple
/// callers, [`Environment`] is a ready-made implementation).
pub trait ResolveContext {
    /// The partition the deployment lives in (e.g. `aws`).
    fn partition(&self) -> &str;

    /// The account id of the deployment.
    fn account(&self) -> &str;

    /// The region of the deployment.
    fn region(&self) -> &str;

    /// Domain suffix used when synthesizing service identity names.
    fn url_suffix(&self) -> &str {
        "amazonaws.com"
    }

    /// Region-specific override for a service's identity name.
    ///
    /// Returning `None` falls back to the built-in default rule
    /// ([`crate::default_service_principal`]).
    fn service_principal(&self, _service: &str, _region: &str) -> Option<String> {
        None
    }
}

/// A fixed partition/account/region triple implementing [`ResolveContext`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Environment {
    pub partition: String,
    pub account: String,
    pub region: String,
}

impl Environment {
    pub fn new(
        partition: impl Into<String>,
        account: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Environment {
            partition: partition.into(),
            account: account.into(),
            region: region.into(),
        }
    }
}

impl ResolveContext for Environment {
    fn partition(&self) -> &str {
        &self.partition
    }

    fn account(&self) -> &str {
        &self.account
    }

    fn region(&self) -> &str {
        &self.region
    }
}

type Resolver = dyn Fn(&dyn ResolveContext) -> Result<String, PolicyError> + Send + Sync;

/// A value that only becomes concrete when resolved against a [`ResolveContext`].
///
/// The resolver is re-invoked for every context it is resolved against;
/// nothing is cached between passes.
#[derive(Clone)]
pub struct DeferredValue {
    display_hint: Option<String>,
    resolver: Arc<Resolver>,
}

impl DeferredValue {
    pub fn new<F>(resolver: F) -> Self
    where
        F: Fn(&dyn ResolveContext) -> Result<String, PolicyError> + Send + Sync + 'static,
    {
        DeferredValue {
            display_hint: None,
            resolver: Arc::new(resolver),
        }
    }

    /// Like [`DeferredValue::new`], with a hint shown in placeholder renderings.
    pub fn with_display_hint<F>(hint: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&dyn ResolveContext) -> Result<String, PolicyError> + Send + Sync + 'static,
    {
        DeferredValue {
            display_hint: Some(hint.into()),
            resolver: Arc::new(resolver),
        }
    }

    /// Run the resolver against `ctx`.
    pub fn resolve(&self, ctx: &dyn ResolveContext) -> Result<String, PolicyError> {
        (self.resolver)(ctx)
    }

    /// Placeholder shown anywhere the value escapes before resolution.
    pub fn placeholder(&self) -> String {
        match &self.display_hint {
            Some(hint) => format!("<{hint}>"),
            None => "<unresolved>".to_string(),
        }
    }
}

impl Debug for DeferredValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "DeferredValue({})", self.placeholder())
    }
}

impl Display for DeferredValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.placeholder())
    }
}

/// Equality is handle identity: two deferred values are equal only when they
/// share the same resolver allocation.
impl PartialEq for DeferredValue {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.resolver), Arc::as_ptr(&other.resolver))
    }
}

impl Serialize for DeferredValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.placeholder())
    }
}
