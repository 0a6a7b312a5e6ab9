//! IAM users and the customer-managed policies attached to them.

use super::PolicyDocument;
use serde::{Deserialize, Serialize};

/// An IAM user plus the policies it should carry, in attachment order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PrincipalSpec {
    pub name: String,
    #[serde(default)]
    pub policies: Vec<PolicySpec>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PolicySpec {
    /// Short name; the provider-side name is `<user>-<name>`.
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub policy_document: PolicyDocument,
}

impl PolicySpec {
    /// Provider-side policy name, namespaced by the owning user so that two
    /// users may reuse the same short policy name.
    pub fn qualified_name(&self, principal: &str) -> String {
        format!("{}-{}", principal, self.name)
    }
}
