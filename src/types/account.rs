//! Account-scoped principals.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::deferred::DeferredValue;
use crate::error::PolicyError;
use crate::traits::Principal;

use super::fragment::{PrincipalJson, PrincipalPolicyFragment};
use super::principal_type::PrincipalType;
use super::value::PolicyValue;

/// Delegates authority to an entire account.
///
/// The identity ARN is deferred: the partition (and, for
/// [`AccountRootPrincipal`], the account itself) is only known once a
/// resolution pass supplies the deployment environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountPrincipal {
    account_id: PolicyValue,
    arn: DeferredValue,
}

impl AccountPrincipal {
    pub fn new(account_id: impl Into<PolicyValue>) -> Self {
        let account_id = account_id.into();
        let captured = account_id.clone();
        let arn = DeferredValue::with_display_hint("account-root-arn", move |ctx| {
            let account = match &captured {
                PolicyValue::String(s) => s.clone(),
                PolicyValue::Deferred(deferred) => deferred.resolve(ctx)?,
                other => {
                    return Err(PolicyError::ResolutionError(format!(
                        "account id must resolve to a string, got {other:?}"
                    )));
                }
            };
            Ok(format!("arn:{}:iam::{}:root", ctx.partition(), account))
        });
        AccountPrincipal { account_id, arn }
    }

    pub fn account_id(&self) -> &PolicyValue {
        &self.account_id
    }
}

impl Display for AccountPrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "AccountPrincipal({})", self.account_id)
    }
}

impl Principal for AccountPrincipal {
    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        Ok(PrincipalPolicyFragment::without_conditions(
            PrincipalJson::of(PrincipalType::Aws, [self.arn.clone()]),
        ))
    }

    fn principal_account(&self) -> Option<PolicyValue> {
        Some(self.account_id.clone())
    }
}

/// The account the enclosing deployment environment lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRootPrincipal {
    inner: AccountPrincipal,
}

impl AccountRootPrincipal {
    pub fn new() -> Self {
        let account = DeferredValue::with_display_hint("account-id", |ctx| {
            Ok(ctx.account().to_string())
        });
        AccountRootPrincipal {
            inner: AccountPrincipal::new(PolicyValue::from(account)),
        }
    }
}

impl Default for AccountRootPrincipal {
    fn default() -> Self {
        AccountRootPrincipal::new()
    }
}

impl Display for AccountRootPrincipal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "AccountRootPrincipal()")
    }
}

impl Principal for AccountRootPrincipal {
    fn policy_fragment(&self) -> Result<PrincipalPolicyFragment, PolicyError> {
        self.inner.policy_fragment()
    }

    fn principal_account(&self) -> Option<PolicyValue> {
        self.inner.principal_account()
    }
}
