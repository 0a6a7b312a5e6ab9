//! Desired configuration of an S3 bucket.

use super::PolicyDocument;
use serde::{Deserialize, Serialize};

/// A bucket to ensure.
///
/// The name must be globally unique across the provider's namespace; that is
/// enforced by S3, not here.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BucketSpec {
    /// Bucket name.
    pub name: String,

    /// `"enabled"` turns on versioning; anything else leaves it alone.
    #[serde(default)]
    pub versioning: String,

    /// Server-side encryption algorithm. Empty means unset.
    #[serde(default)]
    pub encryption: String,

    /// Single CORS rule applied wholesale when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors: Option<CorsSpec>,

    /// Bucket policy, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyDocument>,
}

impl BucketSpec {
    pub fn versioning_enabled(&self) -> bool {
        self.versioning == "enabled"
    }

    /// Encryption algorithm if one is named.
    pub fn encryption(&self) -> Option<&str> {
        let algorithm = self.encryption.trim();
        (!algorithm.is_empty()).then_some(algorithm)
    }

    /// Bucket policy if a non-blank one is present.
    pub fn policy(&self) -> Option<&PolicyDocument> {
        self.policy.as_ref().filter(|doc| !doc.is_empty())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CorsSpec {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub allowed_methods: Vec<String>,
    #[serde(default)]
    pub allowed_headers: Vec<String>,
    #[serde(default)]
    pub expose_headers: Vec<String>,
    #[serde(default)]
    pub max_age_seconds: i32,
}
