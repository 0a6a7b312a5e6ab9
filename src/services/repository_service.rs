//! Ensures ECR repositories exist and sets lifecycle
//! policies.

use super::{FailurePolicy, ReconcileReport};
use crate::{
    errors::{BootstrapError, BootstrapResult},
    models::RepositorySpec,
    providers::{Lookup, RegistryApi},
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct RepositoryService {
    api: Arc<dyn RegistryApi>,
    policy: FailurePolicy,
}

impl RepositoryService {
    pub fn new(api: Arc<dyn RegistryApi>, policy: FailurePolicy) -> Self {
        Self { api, policy }
    }

    pub async fn ensure_all(
        &self,
        repositories: &[RepositorySpec],
    ) -> BootstrapResult<ReconcileReport> {
        let mut report = ReconcileReport::default();
        for repo in repositories {
            self.ensure(repo, &mut report).await?;
        }
        Ok(report)
    }

    async fn ensure(
        &self,
        repo: &RepositorySpec,
        report: &mut ReconcileReport,
    ) -> BootstrapResult<()> {
        let name = repo.name.as_str();
        info!("Ensuring ECR repository: {}", name);

        let exists = match self.api.describe_repository(name).await {
            Lookup::Found(()) => true,
            Lookup::NotFound => false,
            Lookup::Failed(err) => {
                self.policy
                    .lookup_failed(err, "check ECR repository", name, report)?;
                false
            }
        };

        if exists {
            info!("ECR repository {} already exists", name);
            report.existing.push(name.to_string());
        } else {
            self.api
                .create_repository(name)
                .await
                .map_err(|err| BootstrapError::provider("create ECR repository", name, err))?;
            info!("Created ECR repository: {}", name);
            report.created.push(name.to_string());
        }

        if let Some(lifecycle) = repo.lifecycle_policy() {
            let result = self.api.put_lifecycle_policy(name, lifecycle).await;
            self.policy.settle(
                result,
                "set lifecycle policy for ECR repository",
                name,
                report,
            )?;
        }

        Ok(())
    }
}
