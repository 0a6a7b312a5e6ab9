//! Ensures IAM users exist and carry their
//! customer-managed policies.
//!
//! IAM policy documents are immutable per version, so an "update" mints a new
//! version and promotes it to default. Old versions are never pruned; a policy
//! updated often enough will hit the per-policy version ceiling and the
//! version call will fail with `LimitExceeded`.

use super::{FailurePolicy, ReconcileReport};
use crate::{
    errors::{BootstrapError, BootstrapResult},
    models::{PolicySpec, PrincipalSpec},
    providers::{AccessApi, Lookup},
};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct PrincipalService {
    api: Arc<dyn AccessApi>,
    policy: FailurePolicy,
}

impl PrincipalService {
    pub fn new(api: Arc<dyn AccessApi>, policy: FailurePolicy) -> Self {
        Self { api, policy }
    }

    pub async fn ensure_all(
        &self,
        principals: &[PrincipalSpec],
    ) -> BootstrapResult<ReconcileReport> {
        let mut report = ReconcileReport::default();
        for principal in principals {
            self.ensure(principal, &mut report).await?;
        }
        Ok(report)
    }

    async fn ensure(
        &self,
        principal: &PrincipalSpec,
        report: &mut ReconcileReport,
    ) -> BootstrapResult<()> {
        let user = principal.name.as_str();
        info!("Ensuring IAM user: {}", user);

        let exists = match self.api.get_user(user).await {
            Lookup::Found(()) => true,
            Lookup::NotFound => false,
            Lookup::Failed(err) => {
                self.policy.lookup_failed(err, "check IAM user", user, report)?;
                false
            }
        };

        if exists {
            info!("IAM user {} already exists", user);
            report.existing.push(user.to_string());
        } else {
            self.api
                .create_user(user)
                .await
                .map_err(|err| BootstrapError::provider("create IAM user", user, err))?;
            info!("Created IAM user: {}", user);
            report.created.push(user.to_string());
        }

        for policy in &principal.policies {
            let arn = self.upsert_policy(user, policy, report).await?;

            match self.api.attach_user_policy(user, &arn).await {
                Ok(()) => info!("Attached policy {} to user {}", policy.name, user),
                Err(err) if err.is_already_exists() => {
                    info!("Policy {} already attached to user {}", policy.name, user)
                }
                Err(err) => {
                    let resource = format!("{} to user {}", policy.name, user);
                    self.policy.absorb(
                        BootstrapError::provider("attach policy", resource, err),
                        report,
                    )?;
                }
            }
        }

        Ok(())
    }

    /// Create the user's policy or, when one with the same qualified name
    /// already exists, push the document as its new default version. Returns
    /// the policy ARN either way.
    pub async fn upsert_policy(
        &self,
        user: &str,
        policy: &PolicySpec,
        report: &mut ReconcileReport,
    ) -> BootstrapResult<String> {
        let full_name = policy.qualified_name(user);
        debug!(
            "Policy {} document digest {}",
            full_name,
            policy.policy_document.digest()
        );

        let existing = self
            .api
            .list_local_policies()
            .await
            .map_err(|err| {
                BootstrapError::provider("list IAM policies for", full_name.clone(), err)
            })?;

        if let Some(found) = existing.into_iter().find(|p| p.name == full_name) {
            info!("IAM policy {} already exists, updating policy document", full_name);
            self.api
                .create_default_policy_version(&found.arn, &policy.policy_document)
                .await
                .map_err(|err| {
                    BootstrapError::provider("update IAM policy", full_name.clone(), err)
                })?;
            info!("Updated IAM policy: {}", full_name);
            report.updated.push(full_name);
            return Ok(found.arn);
        }

        let arn = self
            .api
            .create_policy(&full_name, &policy.description, &policy.policy_document)
            .await
            .map_err(|err| BootstrapError::provider("create IAM policy", full_name.clone(), err))?;
        info!("Created IAM policy: {}", full_name);
        report.created.push(full_name);
        Ok(arn)
    }
}
