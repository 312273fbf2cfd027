//! Identity JSON key names.
//!
//! This module centralizes the principal type keys to reduce magic strings
//! throughout the codebase and provide a single source of truth for the
//! identity JSON shape.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The key naming a principal's type inside identity JSON.
///
/// Every fragment carries exactly one of these keys, except composite
/// fragments which may carry several after an identity merge.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
pub enum PrincipalType {
    /// An ARN-addressed identity (e.g. `arn:aws:iam::123456789012:root`).
    #[strum(serialize = "AWS")]
    #[serde(rename = "AWS")]
    Aws,
    /// A service identity (e.g. `sqs.amazonaws.com`).
    Service,
    /// A federated identity provider.
    Federated,
    /// A canonical user id.
    CanonicalUser,
    /// Marker for principals rendered as a bare JSON string rather than a
    /// typed map.
    LiteralString,
}
