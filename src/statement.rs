//! Minimal policy statement and document collaborators.
//!
//! These are the narrow seams the principal surface attaches through. The
//! full statement/document machinery (resources, NotPrincipal, Sid, ...)
//! lives with the policy builders elsewhere in the system; principals only
//! need "an allow statement with actions, a principal slot and conditions"
//! and "something statements can be appended to".

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::types::{Conditions, PrincipalJson, PrincipalPolicyFragment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum Effect {
    Allow,
    Deny,
}

/// A single statement granting `actions` to a principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyStatement {
    #[serde(rename = "Effect")]
    effect: Effect,
    #[serde(rename = "Action")]
    actions: Vec<String>,
    #[serde(rename = "Principal")]
    principal: PrincipalJson,
    #[serde(rename = "Condition", default, skip_serializing_if = "Conditions::is_empty")]
    conditions: Conditions,
}

impl PolicyStatement {
    /// An allow statement granting `actions` to the principal identified by
    /// `fragment`.
    pub fn allow<A, I>(actions: I, fragment: PrincipalPolicyFragment) -> Self
    where
        A: Into<String>,
        I: IntoIterator<Item = A>,
    {
        PolicyStatement {
            effect: Effect::Allow,
            actions: actions.into_iter().map(Into::into).collect(),
            principal: fragment.principal_json().clone(),
            conditions: fragment.conditions().clone(),
        }
    }

    /// Append actions to the statement. Existing actions are never removed.
    pub fn add_actions<A, I>(&mut self, actions: I)
    where
        A: Into<String>,
        I: IntoIterator<Item = A>,
    {
        self.actions.extend(actions.into_iter().map(Into::into));
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    pub fn principal(&self) -> &PrincipalJson {
        &self.principal
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }
}

/// Destination for assume-role statements.
pub trait AssumeRoleDocument {
    fn add_statements(&mut self, statement: PolicyStatement);
}

/// An ordered collection of statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Statement")]
    statements: Vec<PolicyStatement>,
}

impl PolicyDocument {
    pub fn new() -> Self {
        PolicyDocument {
            version: "2012-10-17".to_string(),
            statements: Vec::new(),
        }
    }

    pub fn statements(&self) -> &[PolicyStatement] {
        &self.statements
    }
}

impl Default for PolicyDocument {
    fn default() -> Self {
        PolicyDocument::new()
    }
}

impl AssumeRoleDocument for PolicyDocument {
    fn add_statements(&mut self, statement: PolicyStatement) {
        self.statements.push(statement);
    }
}

/// Wraps a document and rewrites each statement on its way in.
///
/// Used by decorators that need to alter the statements another principal
/// generates (e.g. granting an extra action) without reimplementing that
/// principal's attachment behavior.
pub struct MutatingDocumentAdapter<'a> {
    inner: &'a mut dyn AssumeRoleDocument,
    mutate: Box<dyn FnMut(PolicyStatement) -> PolicyStatement + 'a>,
}

impl<'a> MutatingDocumentAdapter<'a> {
    pub fn new<F>(inner: &'a mut dyn AssumeRoleDocument, mutate: F) -> Self
    where
        F: FnMut(PolicyStatement) -> PolicyStatement + 'a,
    {
        MutatingDocumentAdapter {
            inner,
            mutate: Box::new(mutate),
        }
    }
}

impl AssumeRoleDocument for MutatingDocumentAdapter<'_> {
    fn add_statements(&mut self, statement: PolicyStatement) {
        let statement = (self.mutate)(statement);
        self.inner.add_statements(statement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PrincipalJson, PrincipalType};

    fn fragment() -> PrincipalPolicyFragment {
        PrincipalPolicyFragment::without_conditions(PrincipalJson::of(
            PrincipalType::Service,
            ["sqs.amazonaws.com"],
        ))
    }

    #[test]
    fn test_allow_statement_from_fragment() {
        let statement = PolicyStatement::allow(["sts:AssumeRole"], fragment());
        assert_eq!(statement.effect(), Effect::Allow);
        assert_eq!(statement.actions(), ["sts:AssumeRole"]);
        assert!(statement.conditions().is_empty());
    }

    #[test]
    fn test_add_actions_appends() {
        let mut statement = PolicyStatement::allow(["sts:AssumeRole"], fragment());
        statement.add_actions(["sts:TagSession"]);
        assert_eq!(statement.actions(), ["sts:AssumeRole", "sts:TagSession"]);
    }

    #[test]
    fn test_document_serialization() {
        let mut doc = PolicyDocument::new();
        doc.add_statements(PolicyStatement::allow(["sts:AssumeRole"], fragment()));
        let serialized = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            serialized,
            serde_json::json!({
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Action": ["sts:AssumeRole"],
                    "Principal": { "Service": ["sqs.amazonaws.com"] },
                }],
            })
        );
    }

    #[test]
    fn test_mutating_adapter_rewrites_statements() {
        let mut doc = PolicyDocument::new();
        {
            let mut adapter = MutatingDocumentAdapter::new(&mut doc, |mut statement| {
                statement.add_actions(["sts:TagSession"]);
                statement
            });
            adapter.add_statements(PolicyStatement::allow(["sts:AssumeRole"], fragment()));
        }
        assert_eq!(
            doc.statements()[0].actions(),
            ["sts:AssumeRole", "sts:TagSession"]
        );
    }
}
