//! Credential checks run before anything is touched.
//!
//! - `profile_info` describes which profile and region the SDK will pick up
//! - `check_credentials` verifies the resolved credentials against STS

use crate::{errors::BootstrapError, providers::IdentityApi};
use std::env;

/// Where the default credential chain looks, in order.
pub const CREDENTIAL_SOURCES: [&str; 3] = [
    "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY environment variables",
    "~/.aws/credentials file",
    "EC2 instance profile or ECS task role",
];

/// Verify credentials with one identity call and return the caller ARN.
///
/// Failures carry guidance listing the credential sources; callers must not
/// attempt any mutation after an error here.
pub async fn check_credentials(identity: &dyn IdentityApi) -> Result<String, BootstrapError> {
    identity.caller_arn().await.map_err(|err| {
        BootstrapError::Credentials(format!(
            "{}\n\nCredentials can be configured via:\n{}",
            err,
            credential_guidance()
        ))
    })
}

fn credential_guidance() -> String {
    CREDENTIAL_SOURCES
        .iter()
        .map(|source| format!("  - {}\n", source))
        .collect()
}

/// Describe the active profile and region from the environment.
pub fn profile_info() -> String {
    profile_info_from(|key| env::var(key).ok())
}

/// Same as [`profile_info`] with an injectable environment lookup.
pub fn profile_info_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    let profile = lookup("AWS_PROFILE")
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "default".into());
    let region = lookup("AWS_REGION")
        .filter(|v| !v.is_empty())
        .or_else(|| lookup("AWS_DEFAULT_REGION").filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".into());

    format!("AWS Profile: {}, Region: {}", profile, region)
}
