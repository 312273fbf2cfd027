//! Service principals with region-aware identity names.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::deferred::DeferredValue;
use crate::error::PolicyError;
use crate::facts::default_service_principal;
use crate::traits::Principal;

use super::conditions::Conditions;
use super::fragment::{PrincipalJson, PrincipalPolicyFragment};
use super::principal_type::PrincipalType;

/// Options for a service principal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicePrincipalOpts {
    /// Region the service is addressed in, overriding the ambient
    /// environment's region at resolution time.
    pub region: Option<String>,
    /// Additional conditions attached to the principal.
    pub conditions: Conditions,
}

/// A principal representing a service (e.g. `sqs.amazonaws.com`).
///
/// The identity value is deferred: a few services have region-dependent
/// names, so the concrete string comes from the resolution context's fact
/// lookup (or the built-in default rule) during the resolution pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ServicePrincipal {
    service: String,
    opts: ServicePrincipalOpts,
}

impl ServicePrincipal {
    pub fn new(service: impl Into<String>) -> Self {
        ServicePrincipal::with_opts(service, ServicePrincipalOpts::default())
    }

    pub fn with_opts(service: impl Into<String>, opts: ServicePrincipalOpts) -> Self {
        ServicePrincipal {
            service: service.into(),
            opts,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn identity(&self) -> DeferredValue {
        let service = self.service.clone();
        let explicit_region = self.opts.region.clone();
        DeferredValue::with_display_hint(self.service.clone(), move |ctx| {
            let region = explicit_region.as_deref().unwrap_or(ctx.region());
            if let Some(name) = ctx.service_principal(&service, region) {
                return Ok(name);
            }
            Ok(default_service_principal(&service, region, ctx.url_suffix()))
        })
    }
}

impl Display for ServicePrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "ServicePrincipal({})", self.service)
    }
}

impl Principal for ServicePrincipal {
    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        Ok(PrincipalPolicyFragment::new(
            PrincipalJson::of(PrincipalType::Service, [self.identity()]),
            self.opts.conditions.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::{Environment, ResolveContext};
    use crate::types::conditions::Condition;
    use crate::types::value::PolicyValue;

    fn env() -> Environment {
        Environment::new("aws", "123456789012", "eu-north-1")
    }

    fn resolved_identity(principal: &ServicePrincipal, ctx: &dyn ResolveContext) -> PolicyValue {
        let fragment = principal.policy_fragment().unwrap();
        let resolved = fragment.resolve(ctx).unwrap();
        resolved.principal_json().get(PrincipalType::Service).unwrap()[0].clone()
    }

    #[test]
    fn test_identity_from_default_rule() {
        let principal = ServicePrincipal::new("sqs.amazonaws.com");
        assert_eq!(
            resolved_identity(&principal, &env()),
            PolicyValue::from("sqs.amazonaws.com")
        );
    }

    #[test]
    fn test_regionalized_service_uses_ambient_region() {
        let principal = ServicePrincipal::new("codedeploy");
        assert_eq!(
            resolved_identity(&principal, &env()),
            PolicyValue::from("codedeploy.eu-north-1.amazonaws.com")
        );
    }

    #[test]
    fn test_explicit_region_bypasses_ambient_context() {
        let principal = ServicePrincipal::with_opts(
            "codedeploy",
            ServicePrincipalOpts {
                region: Some("us-west-2".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(
            resolved_identity(&principal, &env()),
            PolicyValue::from("codedeploy.us-west-2.amazonaws.com")
        );
    }

    #[test]
    fn test_context_fact_overrides_default_rule() {
        struct FactContext(Environment);

        impl ResolveContext for FactContext {
            fn partition(&self) -> &str {
                self.0.partition()
            }
            fn account(&self) -> &str {
                self.0.account()
            }
            fn region(&self) -> &str {
                self.0.region()
            }
            fn service_principal(&self, service: &str, region: &str) -> Option<String> {
                (service == "ssm.amazonaws.com")
                    .then(|| format!("ssm.{region}.amazonaws.com"))
            }
        }

        let ctx = FactContext(env());
        let principal = ServicePrincipal::new("ssm.amazonaws.com");
        assert_eq!(
            resolved_identity(&principal, &ctx),
            PolicyValue::from("ssm.eu-north-1.amazonaws.com")
        );
    }

    #[test]
    fn test_placeholder_uses_service_as_hint() {
        let principal = ServicePrincipal::new("sns.amazonaws.com");
        let fragment = principal.policy_fragment().unwrap();
        assert_eq!(
            serde_json::to_value(fragment.principal_json()).unwrap(),
            serde_json::json!({ "Service": ["<sns.amazonaws.com>"] })
        );
    }

    #[test]
    fn test_opts_conditions_are_carried() {
        let principal = ServicePrincipal::with_opts(
            "sns.amazonaws.com",
            ServicePrincipalOpts {
                region: None,
                conditions: Conditions::of([(
                    "StringEquals",
                    Condition::keys([("aws:SourceAccount", "123456789012")]),
                )]),
            },
        );
        let fragment = principal.policy_fragment().unwrap();
        assert_eq!(fragment.conditions().len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ServicePrincipal::new("sqs.amazonaws.com").to_string(),
            "ServicePrincipal(sqs.amazonaws.com)"
        );
    }
}
