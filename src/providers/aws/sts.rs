use super::provider_error;
use crate::errors::ProviderError;
use crate::providers::IdentityApi;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sts::Client;

pub struct AwsIdentity {
    client: Client,
}

impl AwsIdentity {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl IdentityApi for AwsIdentity {
    async fn caller_arn(&self) -> Result<String, ProviderError> {
        let identity = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|err| provider_error(&err))?;
        Ok(identity.arn().unwrap_or_default().to_owned())
    }
}
