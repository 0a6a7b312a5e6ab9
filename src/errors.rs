use std::{fmt, io};
use thiserror::Error;

/// Broad classification of a failed provider call.
///
/// Reconcilers only branch on a handful of conditions (absence, "already
/// there", quota), everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    NotFound,
    AlreadyExists,
    LimitExceeded,
    Other,
}

impl ProviderErrorKind {
    /// Map an AWS error code to a kind.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(
                "NotFound"
                | "NoSuchBucket"
                | "NoSuchEntity"
                | "RepositoryNotFoundException"
                | "DBInstanceNotFound",
            ) => Self::NotFound,
            Some("EntityAlreadyExists" | "BucketAlreadyOwnedByYou" | "DBInstanceAlreadyExists") => {
                Self::AlreadyExists
            }
            Some("LimitExceeded") => Self::LimitExceeded,
            _ => Self::Other,
        }
    }
}

/// A lightweight provider failure that keeps the SDK message local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    /// Create a new ProviderError with a specific kind and message.
    pub fn new(kind: ProviderErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
        }
    }

    /// Shortcut for an unclassified failure.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, msg)
    }

    pub fn is_already_exists(&self) -> bool {
        self.kind == ProviderErrorKind::AlreadyExists
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == ProviderErrorKind::LimitExceeded {
            write!(
                f,
                "{} (old policy versions are never pruned; delete unused versions to continue)",
                self.message
            )
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ProviderError {}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("error reading config file `{path}`: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("error parsing YAML in `{path}`: {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid policy document `{name}`: {reason}")]
    InvalidPolicyDocument { name: String, reason: String },
    #[error("no region configured; set `region` in the config file or pass --region")]
    MissingRegion,
    #[error("failed to validate AWS credentials: {0}")]
    Credentials(String),
    #[error("failed to initialize AWS clients: {0}")]
    Init(String),
    #[error("failed to {operation} {resource}: {source}")]
    Provider {
        operation: &'static str,
        resource: String,
        #[source]
        source: ProviderError,
    },
}

impl BootstrapError {
    /// Wrap a provider failure with the attempted operation and resource name.
    pub fn provider(
        operation: &'static str,
        resource: impl Into<String>,
        source: ProviderError,
    ) -> Self {
        Self::Provider {
            operation,
            resource: resource.into(),
            source,
        }
    }
}

pub type BootstrapResult<T> = Result<T, BootstrapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_kinds() {
        assert_eq!(
            ProviderErrorKind::from_code(Some("NoSuchEntity")),
            ProviderErrorKind::NotFound
        );
        assert_eq!(
            ProviderErrorKind::from_code(Some("EntityAlreadyExists")),
            ProviderErrorKind::AlreadyExists
        );
        assert_eq!(
            ProviderErrorKind::from_code(Some("LimitExceeded")),
            ProviderErrorKind::LimitExceeded
        );
        assert_eq!(
            ProviderErrorKind::from_code(Some("AccessDenied")),
            ProviderErrorKind::Other
        );
        assert_eq!(ProviderErrorKind::from_code(None), ProviderErrorKind::Other);
    }

    #[test]
    fn provider_errors_name_operation_and_resource() {
        let err = BootstrapError::provider(
            "create bucket",
            "logs-bucket",
            ProviderError::other("AccessDenied: not allowed"),
        );
        assert_eq!(
            err.to_string(),
            "failed to create bucket logs-bucket: AccessDenied: not allowed"
        );
    }

    #[test]
    fn version_limit_carries_a_hint() {
        let err = ProviderError::new(ProviderErrorKind::LimitExceeded, "too many versions");
        assert!(err.to_string().contains("delete unused versions"));
    }
}
