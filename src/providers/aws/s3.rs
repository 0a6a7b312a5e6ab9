use super::{build_error, provider_error};
use crate::errors::ProviderError;
use crate::models::PolicyDocument;
use crate::providers::{CorsRule, Lookup, ObjectStorageApi};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{
    Client,
    types::{
        BucketLocationConstraint, BucketVersioningStatus, CorsConfiguration,
        CorsRule as S3CorsRule, CreateBucketConfiguration, ServerSideEncryption,
        ServerSideEncryptionByDefault, ServerSideEncryptionConfiguration,
        ServerSideEncryptionRule, VersioningConfiguration,
    },
};

pub struct AwsObjectStorage {
    client: Client,
}

impl AwsObjectStorage {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl ObjectStorageApi for AwsObjectStorage {
    async fn head_bucket(&self, name: &str) -> Lookup<()> {
        match self.client.head_bucket().bucket(name).send().await {
            Ok(_) => Lookup::Found(()),
            Err(err) if err.as_service_error().is_some_and(|e| e.is_not_found()) => {
                Lookup::NotFound
            }
            Err(err) => Lookup::Failed(provider_error(&err)),
        }
    }

    async fn create_bucket(
        &self,
        name: &str,
        location: Option<String>,
    ) -> Result<(), ProviderError> {
        let mut request = self.client.create_bucket().bucket(name);
        if let Some(location) = location {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(location.as_str()))
                    .build(),
            );
        }
        request
            .send()
            .await
            .map(|_| ())
            .map_err(|err| provider_error(&err))
    }

    async fn enable_versioning(&self, name: &str) -> Result<(), ProviderError> {
        self.client
            .put_bucket_versioning()
            .bucket(name)
            .versioning_configuration(
                VersioningConfiguration::builder()
                    .status(BucketVersioningStatus::Enabled)
                    .build(),
            )
            .send()
            .await
            .map(|_| ())
            .map_err(|err| provider_error(&err))
    }

    async fn enable_default_encryption(&self, name: &str) -> Result<(), ProviderError> {
        let by_default = ServerSideEncryptionByDefault::builder()
            .sse_algorithm(ServerSideEncryption::Aes256)
            .build()
            .map_err(build_error)?;
        let configuration = ServerSideEncryptionConfiguration::builder()
            .rules(
                ServerSideEncryptionRule::builder()
                    .apply_server_side_encryption_by_default(by_default)
                    .build(),
            )
            .build()
            .map_err(build_error)?;

        self.client
            .put_bucket_encryption()
            .bucket(name)
            .server_side_encryption_configuration(configuration)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| provider_error(&err))
    }

    async fn put_cors(&self, name: &str, rule: &CorsRule) -> Result<(), ProviderError> {
        let s3_rule = S3CorsRule::builder()
            .set_allowed_origins(Some(rule.allowed_origins.clone()))
            .set_allowed_methods(Some(rule.allowed_methods.clone()))
            .set_allowed_headers(Some(rule.allowed_headers.clone()))
            .set_expose_headers(Some(rule.expose_headers.clone()))
            .max_age_seconds(rule.max_age_seconds)
            .build()
            .map_err(build_error)?;
        let configuration = CorsConfiguration::builder()
            .cors_rules(s3_rule)
            .build()
            .map_err(build_error)?;

        self.client
            .put_bucket_cors()
            .bucket(name)
            .cors_configuration(configuration)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| provider_error(&err))
    }

    async fn put_policy(&self, name: &str, policy: &PolicyDocument) -> Result<(), ProviderError> {
        self.client
            .put_bucket_policy()
            .bucket(name)
            .policy(policy.as_str())
            .send()
            .await
            .map(|_| ())
            .map_err(|err| provider_error(&err))
    }
}
