use super::provider_error;
use crate::errors::ProviderError;
use crate::providers::{CreateInstanceRequest, DatabaseApi, Lookup, ObservedInstance};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_rds::Client;

pub struct AwsDatabase {
    client: Client,
}

impl AwsDatabase {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl DatabaseApi for AwsDatabase {
    async fn describe_instance(&self, identifier: &str) -> Lookup<ObservedInstance> {
        let output = match self
            .client
            .describe_db_instances()
            .db_instance_identifier(identifier)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_db_instance_not_found_fault()) =>
            {
                return Lookup::NotFound;
            }
            Err(err) => return Lookup::Failed(provider_error(&err)),
        };

        match output.db_instances().first() {
            Some(instance) => Lookup::Found(ObservedInstance {
                status: instance.db_instance_status().unwrap_or_default().to_owned(),
                allocated_storage: instance.allocated_storage().unwrap_or_default(),
                instance_class: instance.db_instance_class().unwrap_or_default().to_owned(),
                engine_version: instance.engine_version().unwrap_or_default().to_owned(),
            }),
            None => Lookup::NotFound,
        }
    }

    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<(), ProviderError> {
        self.client
            .create_db_instance()
            .db_instance_identifier(&request.identifier)
            .engine(&request.engine)
            .db_instance_class(&request.instance_class)
            .allocated_storage(request.allocated_storage)
            .db_name(&request.db_name)
            .set_engine_version(request.engine_version.clone())
            .set_storage_type(request.storage_type.clone())
            .set_master_username(request.master_username.clone())
            .set_master_user_password(request.master_password.clone())
            .publicly_accessible(request.publicly_accessible)
            .set_backup_retention_period(request.backup_retention_period)
            .multi_az(request.multi_az)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| provider_error(&err))
    }

    async fn modify_storage(
        &self,
        identifier: &str,
        allocated_storage: i32,
    ) -> Result<(), ProviderError> {
        self.client
            .modify_db_instance()
            .db_instance_identifier(identifier)
            .allocated_storage(allocated_storage)
            .apply_immediately(true)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| provider_error(&err))
    }
}
