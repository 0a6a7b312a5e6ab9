//! AWS SDK implementations of the provider traits.

mod ecr;
mod iam;
mod rds;
mod s3;
mod sts;

pub use ecr::AwsRegistry;
pub use iam::AwsAccess;
pub use rds::AwsDatabase;
pub use s3::AwsObjectStorage;
pub use sts::AwsIdentity;

use super::CloudClients;
use crate::errors::{BootstrapError, BootstrapResult, ProviderError, ProviderErrorKind};
use aws_config::{BehaviorVersion, Region, SdkConfig, retry::RetryConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use std::{fmt, sync::Arc};

/// Attempts per call, including the first, under the standard retry mode.
pub const MAX_ATTEMPTS: u32 = 3;

/// Resolve shared SDK configuration for `region`.
///
/// Credentials come from the default chain: environment variables, then the
/// shared credentials file, then instance or task role credentials.
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_owned()))
        .retry_config(RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS))
        .load()
        .await
}

/// Build every service client from `config`, after making sure credentials
/// actually resolve.
pub async fn connect(config: &SdkConfig) -> BootstrapResult<CloudClients> {
    let provider = config
        .credentials_provider()
        .ok_or_else(|| BootstrapError::Init("no credentials provider configured".into()))?;
    provider.provide_credentials().await.map_err(|err| {
        BootstrapError::Init(format!(
            "failed to retrieve AWS credentials: {}",
            DisplayErrorContext(&err)
        ))
    })?;

    Ok(CloudClients {
        object_storage: Arc::new(AwsObjectStorage::new(config)),
        registry: Arc::new(AwsRegistry::new(config)),
        access: Arc::new(AwsAccess::new(config)),
        database: Arc::new(AwsDatabase::new(config)),
    })
}

/// Convert an SDK error into a classified [`ProviderError`], keeping the full
/// error chain in the message.
fn provider_error<E, R>(err: &SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: fmt::Debug,
{
    ProviderError::new(
        ProviderErrorKind::from_code(err.code()),
        DisplayErrorContext(err).to_string(),
    )
}

/// Request builders reject missing required members before anything is sent.
fn build_error(err: impl fmt::Display) -> ProviderError {
    ProviderError::other(format!("invalid request: {}", err))
}
