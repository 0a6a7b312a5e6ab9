//! Desired configuration of an ECR repository.

use super::PolicyDocument;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RepositorySpec {
    pub name: String,

    /// Lifecycle policy text, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_policy: Option<PolicyDocument>,
}

impl RepositorySpec {
    pub fn lifecycle_policy(&self) -> Option<&PolicyDocument> {
        self.lifecycle_policy.as_ref().filter(|doc| !doc.is_empty())
    }
}
