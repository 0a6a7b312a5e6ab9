//! Opaque JSON documents passed through to the provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A policy-like JSON document (bucket policy, lifecycle policy, IAM policy).
///
/// The raw text is kept verbatim and sent to the provider untouched. The MD5
/// digest of the text is computed once at load so documents can be compared
/// and logged without dumping their contents.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PolicyDocument {
    raw: String,
    digest: String,
}

impl PolicyDocument {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let digest = format!("{:x}", md5::compute(raw.as_bytes()));
        Self { raw, digest }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercase hex MD5 of the raw text.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn is_empty(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// Check that the document parses as JSON. Nothing beyond syntax is checked;
    /// the provider remains the authority on policy grammar.
    pub fn validate(&self) -> Result<(), serde_json::Error> {
        serde_json::from_str::<serde_json::Value>(&self.raw).map(|_| ())
    }
}

/// An empty document. Empty documents are never sent to the provider.
impl Default for PolicyDocument {
    fn default() -> Self {
        Self::new("")
    }
}

impl From<String> for PolicyDocument {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for PolicyDocument {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<PolicyDocument> for String {
    fn from(doc: PolicyDocument) -> Self {
        doc.raw
    }
}

impl fmt::Debug for PolicyDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyDocument")
            .field("digest", &self.digest)
            .field("len", &self.raw.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_follows_content() {
        let a = PolicyDocument::new(r#"{"Version":"2012-10-17"}"#);
        let b = PolicyDocument::new(r#"{"Version":"2012-10-17"}"#);
        let c = PolicyDocument::new(r#"{"Version": "2012-10-17"}"#);
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
        assert_eq!(a.digest().len(), 32);
    }

    #[test]
    fn raw_text_is_untouched() {
        let text = "{\n  \"Statement\": []\n}\n";
        assert_eq!(PolicyDocument::new(text).as_str(), text);
    }

    #[test]
    fn validation_only_checks_json_syntax() {
        assert!(PolicyDocument::new(r#"{"anything": [1, 2]}"#).validate().is_ok());
        assert!(PolicyDocument::new(r#"{"Statement": ["#).validate().is_err());
    }
}
