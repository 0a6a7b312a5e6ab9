use super::provider_error;
use crate::errors::ProviderError;
use crate::models::PolicyDocument;
use crate::providers::{AccessApi, Lookup, ManagedPolicy};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_iam::{Client, types::PolicyScopeType};

pub struct AwsAccess {
    client: Client,
}

impl AwsAccess {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl AccessApi for AwsAccess {
    async fn get_user(&self, name: &str) -> Lookup<()> {
        match self.client.get_user().user_name(name).send().await {
            Ok(_) => Lookup::Found(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_entity_exception()) =>
            {
                Lookup::NotFound
            }
            Err(err) => Lookup::Failed(provider_error(&err)),
        }
    }

    async fn create_user(&self, name: &str) -> Result<(), ProviderError> {
        self.client
            .create_user()
            .user_name(name)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| provider_error(&err))
    }

    async fn list_local_policies(&self) -> Result<Vec<ManagedPolicy>, ProviderError> {
        let mut policies = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let page = self
                .client
                .list_policies()
                .scope(PolicyScopeType::Local)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|err| provider_error(&err))?;

            policies.extend(page.policies().iter().filter_map(|policy| {
                Some(ManagedPolicy {
                    name: policy.policy_name()?.to_owned(),
                    arn: policy.arn()?.to_owned(),
                })
            }));

            match page.marker() {
                Some(next) if page.is_truncated() => marker = Some(next.to_owned()),
                _ => break,
            }
        }
        Ok(policies)
    }

    async fn create_policy(
        &self,
        name: &str,
        description: &str,
        document: &PolicyDocument,
    ) -> Result<String, ProviderError> {
        let output = self
            .client
            .create_policy()
            .policy_name(name)
            .set_description((!description.is_empty()).then(|| description.to_owned()))
            .policy_document(document.as_str())
            .send()
            .await
            .map_err(|err| provider_error(&err))?;

        output
            .policy()
            .and_then(|policy| policy.arn())
            .map(str::to_owned)
            .ok_or_else(|| {
                ProviderError::other(format!("CreatePolicy returned no ARN for {}", name))
            })
    }

    async fn create_default_policy_version(
        &self,
        arn: &str,
        document: &PolicyDocument,
    ) -> Result<(), ProviderError> {
        self.client
            .create_policy_version()
            .policy_arn(arn)
            .policy_document(document.as_str())
            .set_as_default(true)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| provider_error(&err))
    }

    async fn attach_user_policy(&self, user: &str, arn: &str) -> Result<(), ProviderError> {
        self.client
            .attach_user_policy()
            .user_name(user)
            .policy_arn(arn)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| provider_error(&err))
    }
}
