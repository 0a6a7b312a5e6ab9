use super::provider_error;
use crate::errors::ProviderError;
use crate::models::PolicyDocument;
use crate::providers::{Lookup, RegistryApi};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ecr::Client;

pub struct AwsRegistry {
    client: Client,
}

impl AwsRegistry {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl RegistryApi for AwsRegistry {
    async fn describe_repository(&self, name: &str) -> Lookup<()> {
        match self
            .client
            .describe_repositories()
            .repository_names(name)
            .send()
            .await
        {
            Ok(_) => Lookup::Found(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_repository_not_found_exception()) =>
            {
                Lookup::NotFound
            }
            Err(err) => Lookup::Failed(provider_error(&err)),
        }
    }

    async fn create_repository(&self, name: &str) -> Result<(), ProviderError> {
        self.client
            .create_repository()
            .repository_name(name)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| provider_error(&err))
    }

    async fn put_lifecycle_policy(
        &self,
        name: &str,
        policy: &PolicyDocument,
    ) -> Result<(), ProviderError> {
        self.client
            .put_lifecycle_policy()
            .repository_name(name)
            .lifecycle_policy_text(policy.as_str())
            .send()
            .await
            .map(|_| ())
            .map_err(|err| provider_error(&err))
    }
}
