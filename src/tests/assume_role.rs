//! Assume-role attachment across decorator chains.

use std::sync::Arc;

use crate::statement::{PolicyDocument, PolicyStatement};
use crate::traits::{Grantable, Principal};
use crate::types::{
    ArnPrincipal, CompositePrincipal, Condition, Conditions, PrincipalJson, PrincipalType,
    ServicePrincipal,
};

fn attach(principal: &dyn Principal) -> PolicyDocument {
    let mut doc = PolicyDocument::new();
    principal.add_to_assume_role_policy(&mut doc).unwrap();
    doc
}

#[test]
fn test_default_attachment_is_one_statement() {
    let principal = ArnPrincipal::new("arn:aws:iam::123456789012:role/ops");
    let doc = attach(&principal);

    let statements = doc.statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].actions(), ["sts:AssumeRole"]);
    assert_eq!(
        statements[0].principal(),
        &PrincipalJson::of(PrincipalType::Aws, ["arn:aws:iam::123456789012:role/ops"])
    );
}

#[test]
fn test_session_tags_over_composite_tags_every_statement() {
    let composite = CompositePrincipal::new(vec![
        Arc::new(ServicePrincipal::new("a.amazonaws.com")) as Arc<dyn Principal>,
        Arc::new(ServicePrincipal::new("b.amazonaws.com")) as Arc<dyn Principal>,
    ])
    .unwrap();
    let tagged = composite.with_session_tags();

    let doc = attach(&tagged);

    let statements = doc.statements();
    assert_eq!(statements.len(), 2);
    for statement in statements {
        assert_eq!(statement.actions(), ["sts:AssumeRole", "sts:TagSession"]);
    }
}

#[test]
fn test_conditions_then_session_tags_chain() {
    let principal = ServicePrincipal::new("lambda.amazonaws.com")
        .with_conditions(Conditions::of([(
            "ArnLike",
            Condition::keys([("aws:SourceArn", "arn:aws:lambda:eu-north-1:123456789012:*")]),
        )]))
        .with_session_tags();

    let doc = attach(&principal);

    let statements = doc.statements();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].actions(), ["sts:AssumeRole", "sts:TagSession"]);
    assert_eq!(statements[0].conditions().len(), 1);
    assert_eq!(
        serde_json::to_value(statements[0].principal()).unwrap(),
        serde_json::json!({ "Service": ["<lambda.amazonaws.com>"] })
    );
}

#[test]
fn test_composite_of_decorated_members_keeps_member_conditions() {
    let conditioned = ServicePrincipal::new("sns.amazonaws.com").with_conditions(Conditions::of([
        (
            "StringEquals",
            Condition::keys([("aws:SourceAccount", "123456789012")]),
        ),
    ]));
    let composite = CompositePrincipal::new(vec![
        Arc::new(conditioned) as Arc<dyn Principal>,
        Arc::new(ServicePrincipal::new("sqs.amazonaws.com")) as Arc<dyn Principal>,
    ])
    .unwrap();

    let doc = attach(&composite);

    let statements = doc.statements();
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].conditions().len(), 1);
    assert!(statements[1].conditions().is_empty());
}

#[test]
fn test_add_to_principal_policy_defaults_to_not_added() {
    let principal = ArnPrincipal::new("arn:aws:iam::123456789012:role/ops");
    let statement = PolicyStatement::allow(
        ["sts:AssumeRole"],
        principal.policy_fragment().unwrap(),
    );
    let result = principal.add_to_principal_policy(&statement);
    assert!(!result.statement_added);
}

#[test]
fn test_every_principal_is_its_own_grant_principal() {
    let principal = ArnPrincipal::new("arn:aws:iam::123456789012:role/ops");
    assert_eq!(
        principal.grant_principal().policy_fragment().unwrap(),
        principal.policy_fragment().unwrap()
    );
}
