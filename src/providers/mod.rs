//! Cloud capability seams.
//!
//! Each trait covers one provider service in the shape the reconcilers need:
//! an existence check, a create call and the handful of configuration calls
//! the tool owns. The AWS SDK implementations live in [`aws`]; tests use the
//! mockall doubles generated from these traits.

pub mod aws;

use crate::errors::ProviderError;
use crate::models::PolicyDocument;
use async_trait::async_trait;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

/// Region where S3 rejects an explicit location constraint.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Outcome of an existence check.
///
/// `Failed` keeps the lookup error apart from a genuine "not found" so the
/// caller decides whether to press on with a create.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Failed(ProviderError),
}

/// A single CORS rule as submitted to the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsRule {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub expose_headers: Vec<String>,
    pub max_age_seconds: i32,
}

/// A customer-managed IAM policy as returned by a list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedPolicy {
    pub name: String,
    pub arn: String,
}

/// Fields of an existing database instance the reconciler looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedInstance {
    pub status: String,
    pub allocated_storage: i32,
    pub instance_class: String,
    pub engine_version: String,
}

/// Parameters for creating a database instance. Optional fields are only
/// sent when `Some`. The master password travels in plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateInstanceRequest {
    pub identifier: String,
    pub engine: String,
    pub instance_class: String,
    pub allocated_storage: i32,
    pub db_name: String,
    pub engine_version: Option<String>,
    pub storage_type: Option<String>,
    pub master_username: Option<String>,
    pub master_password: Option<String>,
    pub publicly_accessible: bool,
    pub backup_retention_period: Option<i32>,
    pub multi_az: bool,
}

/// Caller identity (STS).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityApi: Send + Sync {
    /// ARN of the principal the resolved credentials belong to.
    async fn caller_arn(&self) -> Result<String, ProviderError>;
}

/// Object storage (S3).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStorageApi: Send + Sync {
    async fn head_bucket(&self, name: &str) -> Lookup<()>;

    /// Create a bucket. `location` must be `None` in [`DEFAULT_REGION`].
    async fn create_bucket(&self, name: &str, location: Option<String>)
    -> Result<(), ProviderError>;

    async fn enable_versioning(&self, name: &str) -> Result<(), ProviderError>;

    /// Set AES256 default server-side encryption.
    async fn enable_default_encryption(&self, name: &str) -> Result<(), ProviderError>;

    /// Replace the whole CORS configuration with a single rule.
    async fn put_cors(&self, name: &str, rule: &CorsRule) -> Result<(), ProviderError>;

    async fn put_policy(&self, name: &str, policy: &PolicyDocument) -> Result<(), ProviderError>;
}

/// Container image registry (ECR).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RegistryApi: Send + Sync {
    async fn describe_repository(&self, name: &str) -> Lookup<()>;

    async fn create_repository(&self, name: &str) -> Result<(), ProviderError>;

    async fn put_lifecycle_policy(
        &self,
        name: &str,
        policy: &PolicyDocument,
    ) -> Result<(), ProviderError>;
}

/// Identity and access management (IAM).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AccessApi: Send + Sync {
    async fn get_user(&self, name: &str) -> Lookup<()>;

    async fn create_user(&self, name: &str) -> Result<(), ProviderError>;

    /// All customer-managed (`Local` scope) policies in the account.
    async fn list_local_policies(&self) -> Result<Vec<ManagedPolicy>, ProviderError>;

    /// Create a policy and return its ARN.
    async fn create_policy(
        &self,
        name: &str,
        description: &str,
        document: &PolicyDocument,
    ) -> Result<String, ProviderError>;

    /// Add a version to an existing policy and make it the default.
    async fn create_default_policy_version(
        &self,
        arn: &str,
        document: &PolicyDocument,
    ) -> Result<(), ProviderError>;

    async fn attach_user_policy(&self, user: &str, arn: &str) -> Result<(), ProviderError>;
}

/// Managed relational databases (RDS).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatabaseApi: Send + Sync {
    async fn describe_instance(&self, identifier: &str) -> Lookup<ObservedInstance>;

    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<(), ProviderError>;

    /// Change allocated storage with immediate application. Returns once the
    /// modification is accepted, not when it completes.
    async fn modify_storage(&self, identifier: &str, allocated_storage: i32)
    -> Result<(), ProviderError>;
}

/// Client handles shared by every reconciler in a run. Identity checks run
/// before these are built and use their own client.
#[derive(Clone)]
pub struct CloudClients {
    pub object_storage: Arc<dyn ObjectStorageApi>,
    pub registry: Arc<dyn RegistryApi>,
    pub access: Arc<dyn AccessApi>,
    pub database: Arc<dyn DatabaseApi>,
}
