//! Rendered JSON for representative principals and documents.

use std::sync::Arc;

use insta::assert_snapshot;

use crate::deferred::Environment;
use crate::statement::PolicyDocument;
use crate::traits::Principal;
use crate::types::{
    AccountRootPrincipal, CompositePrincipal, OrganizationPrincipal, ServicePrincipal,
    StarPrincipal,
};

fn rendered_document(principal: &dyn Principal) -> String {
    let mut doc = PolicyDocument::new();
    principal.add_to_assume_role_policy(&mut doc).unwrap();
    serde_json::to_string(&doc).unwrap()
}

#[test]
fn test_star_principal_document() {
    assert_snapshot!(
        rendered_document(&StarPrincipal::new()),
        @r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":["sts:AssumeRole"],"Principal":"*"}]}"#
    );
}

#[test]
fn test_organization_principal_document() {
    let principal = OrganizationPrincipal::new("o-1234567890").unwrap();
    assert_snapshot!(
        rendered_document(&principal),
        @r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":["sts:AssumeRole"],"Principal":{"AWS":["*"]},"Condition":{"StringEquals":{"aws:PrincipalOrgID":"o-1234567890"}}}]}"#
    );
}

#[test]
fn test_tagged_composite_document_keeps_placeholders() {
    let composite = CompositePrincipal::new(vec![
        Arc::new(ServicePrincipal::new("a.amazonaws.com")) as Arc<dyn Principal>,
        Arc::new(ServicePrincipal::new("b.amazonaws.com")) as Arc<dyn Principal>,
    ])
    .unwrap();
    let tagged = composite.with_session_tags();

    assert_snapshot!(
        rendered_document(&tagged),
        @r#"{"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":["sts:AssumeRole","sts:TagSession"],"Principal":{"Service":["<a.amazonaws.com>"]}},{"Effect":"Allow","Action":["sts:AssumeRole","sts:TagSession"],"Principal":{"Service":["<b.amazonaws.com>"]}}]}"#
    );
}

#[test]
fn test_resolved_account_root_fragment() {
    let fragment = AccountRootPrincipal::new().policy_fragment().unwrap();
    let resolved = fragment
        .resolve(&Environment::new("aws", "123456789012", "eu-north-1"))
        .unwrap();

    assert_snapshot!(
        serde_json::to_string(&resolved).unwrap(),
        @r#"{"principal_json":{"AWS":["arn:aws:iam::123456789012:root"]}}"#
    );
}
