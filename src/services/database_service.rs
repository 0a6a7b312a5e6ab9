//! Creates missing RDS instances and grows (or shrinks)
//! allocated storage on existing ones.
//!
//! Unlike the other reconcilers, a failed describe or create here ends the
//! whole database pass: the remaining instances are not attempted.

use super::{FailurePolicy, ReconcileReport};
use crate::{
    errors::{BootstrapError, BootstrapResult},
    models::DatabaseInstanceSpec,
    providers::{CreateInstanceRequest, DatabaseApi, Lookup, ObservedInstance},
};
use std::sync::Arc;
use tracing::{info, warn};

/// The only status in which a storage modification is attempted.
const AVAILABLE: &str = "available";

#[derive(Clone)]
pub struct DatabaseService {
    api: Arc<dyn DatabaseApi>,
    policy: FailurePolicy,
}

impl DatabaseService {
    pub fn new(api: Arc<dyn DatabaseApi>, policy: FailurePolicy) -> Self {
        Self { api, policy }
    }

    pub async fn ensure_all(
        &self,
        instances: &[DatabaseInstanceSpec],
    ) -> BootstrapResult<ReconcileReport> {
        let mut report = ReconcileReport::default();
        for instance in instances {
            self.ensure(instance, &mut report).await?;
        }
        Ok(report)
    }

    async fn ensure(
        &self,
        spec: &DatabaseInstanceSpec,
        report: &mut ReconcileReport,
    ) -> BootstrapResult<()> {
        let id = spec.identifier.as_str();
        info!("Ensuring RDS instance: {}", id);

        match self.api.describe_instance(id).await {
            Lookup::NotFound => {
                info!("Creating new RDS instance: {}", id);
                self.api
                    .create_instance(&create_request(spec))
                    .await
                    .map_err(|err| BootstrapError::provider("create RDS instance", id, err))?;
                info!("Created RDS instance: {}", id);
                report.created.push(id.to_string());
                Ok(())
            }
            Lookup::Failed(err) => Err(BootstrapError::provider("check RDS instance", id, err)),
            Lookup::Found(current) => self.reconcile_existing(spec, &current, report).await,
        }
    }

    async fn reconcile_existing(
        &self,
        spec: &DatabaseInstanceSpec,
        current: &ObservedInstance,
        report: &mut ReconcileReport,
    ) -> BootstrapResult<()> {
        let id = spec.identifier.as_str();

        if current.allocated_storage != spec.allocated_storage {
            info!(
                "Modifying storage size for RDS instance {} from {} GB to {} GB",
                id, current.allocated_storage, spec.allocated_storage
            );

            if current.status != AVAILABLE {
                let message = format!(
                    "Cannot modify RDS instance {} because it is in {} state. Must be '{}'.",
                    id, current.status, AVAILABLE
                );
                warn!("{}", message);
                report.warnings.push(message);
                return Ok(());
            }

            match self.api.modify_storage(id, spec.allocated_storage).await {
                Ok(()) => {
                    info!(
                        "Modified storage for RDS instance {} to {} GB; the change is in progress and may take several minutes",
                        id, spec.allocated_storage
                    );
                    report.updated.push(id.to_string());
                }
                Err(err) => {
                    self.policy.absorb(
                        BootstrapError::provider("modify storage for RDS instance", id, err),
                        report,
                    )?;
                }
            }
        } else {
            info!(
                "RDS instance {} already exists with correct storage size ({} GB)",
                id, current.allocated_storage
            );
            report.existing.push(id.to_string());
        }

        if !current.instance_class.is_empty() && current.instance_class != spec.instance_class {
            info!(
                "Instance class change detected for {} ({} -> {}), not applied",
                id, current.instance_class, spec.instance_class
            );
        }

        if !spec.engine_version.is_empty()
            && !current.engine_version.is_empty()
            && current.engine_version != spec.engine_version
        {
            info!(
                "Engine version change detected for {} ({} -> {}), not applied",
                id, current.engine_version, spec.engine_version
            );
        }

        Ok(())
    }
}

/// Build the create call for `spec`. Strings are only sent when non-empty and
/// backup retention only when positive; the two flags are always explicit.
pub fn create_request(spec: &DatabaseInstanceSpec) -> CreateInstanceRequest {
    fn non_empty(value: &str) -> Option<String> {
        (!value.is_empty()).then(|| value.to_string())
    }

    CreateInstanceRequest {
        identifier: spec.identifier.clone(),
        engine: spec.engine.clone(),
        instance_class: spec.instance_class.clone(),
        allocated_storage: spec.allocated_storage,
        db_name: spec.db_name.clone(),
        engine_version: non_empty(&spec.engine_version),
        storage_type: non_empty(&spec.storage_type),
        master_username: non_empty(&spec.master_username),
        master_password: non_empty(&spec.master_password),
        publicly_accessible: spec.publicly_accessible,
        backup_retention_period: (spec.backup_retention_period > 0)
            .then_some(spec.backup_retention_period),
        multi_az: spec.multi_az,
    }
}
