//! Default rules for region-dependent service identity names.
//!
//! The authoritative source for a service's identity name in a region is the
//! [`crate::ResolveContext::service_principal`] fact override. When a context
//! has no fact for a service, [`default_service_principal`] synthesizes one
//! from the rules below.

use once_cell::sync::Lazy;
use regex::Regex;

/// A bare service token, optionally carrying one of the well-known domain
/// suffixes that older callers spell out in full.
static SERVICE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^.]+)(?:\.amazonaws\.com(?:\.cn)?)?$").expect("valid pattern"));

/// Services whose identity name embeds the region.
const REGIONALIZED: &[&str] = &["codedeploy", "logs"];

/// Fallback identity name for `service` in `region`.
///
/// Inputs that do not look like a service token (e.g. a fully custom domain)
/// are returned unchanged.
pub fn default_service_principal(service: &str, region: &str, url_suffix: &str) -> String {
    let Some(captures) = SERVICE_NAME.captures(service) else {
        return service.to_string();
    };
    let short = &captures[1];

    if REGIONALIZED.contains(&short) {
        return format!("{short}.{region}.{url_suffix}");
    }
    match short {
        // States kept its legacy suffix even in partitions with another one.
        "states" => format!("{short}.{region}.amazonaws.com"),
        "ec2" => format!("{short}.{url_suffix}"),
        _ => format!("{short}.amazonaws.com"),
    }
}
