//! Runs every reconciler against one manifest, in a fixed
//! order: buckets, repositories, IAM users, database instances.

use super::{
    FailurePolicy, ReconcileReport, bucket_service::BucketService,
    database_service::DatabaseService, principal_service::PrincipalService,
    repository_service::RepositoryService,
};
use crate::{errors::BootstrapResult, models::ResourceManifest, providers::CloudClients};
use chrono::{DateTime, Utc};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

/// Aggregated result of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub report: ReconcileReport,
}

impl RunSummary {
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

#[derive(Clone)]
pub struct Provisioner {
    buckets: BucketService,
    repositories: RepositoryService,
    principals: PrincipalService,
    databases: DatabaseService,
}

impl Provisioner {
    pub fn new(clients: &CloudClients, region: &str, policy: FailurePolicy) -> Self {
        Self {
            buckets: BucketService::new(clients.object_storage.clone(), region, policy),
            repositories: RepositoryService::new(clients.registry.clone(), policy),
            principals: PrincipalService::new(clients.access.clone(), policy),
            databases: DatabaseService::new(clients.database.clone(), policy),
        }
    }

    /// Reconcile every resource in `manifest`. The first fatal error ends the
    /// run; warnings are collected in the summary.
    pub async fn provision(&self, manifest: &ResourceManifest) -> BootstrapResult<RunSummary> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        let report = self
            .run(manifest)
            .instrument(info_span!("provision", run_id = %run_id))
            .await?;

        let summary = RunSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            report,
        };
        info!(
            "Run {} finished in {} ms: {} created, {} updated, {} unchanged, {} warnings",
            summary.run_id,
            summary.elapsed_ms(),
            summary.report.created.len(),
            summary.report.updated.len(),
            summary.report.existing.len(),
            summary.report.warnings.len()
        );
        Ok(summary)
    }

    async fn run(&self, manifest: &ResourceManifest) -> BootstrapResult<ReconcileReport> {
        let mut report = ReconcileReport::default();
        report.merge(self.buckets.ensure_all(&manifest.s3_buckets).await?);
        report.merge(self.repositories.ensure_all(&manifest.ecr_repositories).await?);
        report.merge(self.principals.ensure_all(&manifest.iam_users).await?);
        if !manifest.rds_instances.is_empty() {
            report.merge(self.databases.ensure_all(&manifest.rds_instances).await?);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use crate::models::BucketSpec;
    use crate::providers::{
        Lookup, MockAccessApi, MockDatabaseApi, MockObjectStorageApi, MockRegistryApi,
    };
    use std::sync::Arc;

    fn clients(
        object_storage: MockObjectStorageApi,
        registry: MockRegistryApi,
        access: MockAccessApi,
        database: MockDatabaseApi,
    ) -> CloudClients {
        CloudClients {
            object_storage: Arc::new(object_storage),
            registry: Arc::new(registry),
            access: Arc::new(access),
            database: Arc::new(database),
        }
    }

    /// One versioned bucket in the default region: created without a
    /// location constraint, versioning enabled, nothing else touched.
    #[tokio::test]
    async fn single_bucket_in_default_region() {
        let manifest = ResourceManifest {
            region: "us-east-1".into(),
            s3_buckets: vec![BucketSpec {
                name: "logs-bucket".into(),
                versioning: "enabled".into(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let mut s3 = MockObjectStorageApi::new();
        s3.expect_head_bucket()
            .withf(|name| name == "logs-bucket")
            .times(1)
            .returning(|_| Lookup::NotFound);
        s3.expect_create_bucket()
            .withf(|name, location| name == "logs-bucket" && location.is_none())
            .times(1)
            .returning(|_, _| Ok(()));
        s3.expect_enable_versioning()
            .times(1)
            .returning(|_| Ok(()));
        s3.expect_enable_default_encryption().never();
        s3.expect_put_cors().never();
        s3.expect_put_policy().never();

        let mut db = MockDatabaseApi::new();
        db.expect_describe_instance().never();

        let provisioner = Provisioner::new(
            &clients(s3, MockRegistryApi::new(), MockAccessApi::new(), db),
            &manifest.region,
            FailurePolicy::default(),
        );
        let summary = provisioner
            .provision(&manifest)
            .await
            .expect("run should complete without fatal errors");

        assert_eq!(summary.report.created, vec!["logs-bucket"]);
        assert!(summary.report.warnings.is_empty());
        assert!(summary.finished_at >= summary.started_at);
    }

    #[tokio::test]
    async fn bucket_failure_stops_later_kinds() {
        let manifest = ResourceManifest {
            region: "eu-west-1".into(),
            s3_buckets: vec![BucketSpec {
                name: "taken".into(),
                ..Default::default()
            }],
            ecr_repositories: vec![crate::models::RepositorySpec {
                name: "api".into(),
                lifecycle_policy: None,
            }],
            ..Default::default()
        };

        let mut s3 = MockObjectStorageApi::new();
        s3.expect_head_bucket().returning(|_| Lookup::NotFound);
        s3.expect_create_bucket()
            .returning(|_, _| Err(ProviderError::other("BucketAlreadyExists")));
        let mut ecr = MockRegistryApi::new();
        ecr.expect_describe_repository().never();

        let provisioner = Provisioner::new(
            &clients(s3, ecr, MockAccessApi::new(), MockDatabaseApi::new()),
            &manifest.region,
            FailurePolicy::default(),
        );
        let err = provisioner
            .provision(&manifest)
            .await
            .expect_err("bucket creation failure must end the run");
        assert!(err.to_string().contains("create bucket taken"));
    }

    #[tokio::test]
    async fn warnings_from_every_kind_are_aggregated() {
        let manifest = ResourceManifest::parse(
            r#"
region: us-east-1
s3_buckets:
  - name: logs
    versioning: enabled
ecr_repositories:
  - name: api
    lifecycle_policy: '{"rules":[]}'
"#,
            "inline",
        )
        .expect("manifest should parse");

        let mut s3 = MockObjectStorageApi::new();
        s3.expect_head_bucket().returning(|_| Lookup::Found(()));
        s3.expect_enable_versioning()
            .returning(|_| Err(ProviderError::other("AccessDenied")));
        let mut ecr = MockRegistryApi::new();
        ecr.expect_describe_repository()
            .returning(|_| Lookup::Found(()));
        ecr.expect_put_lifecycle_policy()
            .returning(|_, _| Err(ProviderError::other("AccessDenied")));

        let provisioner = Provisioner::new(
            &clients(s3, ecr, MockAccessApi::new(), MockDatabaseApi::new()),
            &manifest.region,
            FailurePolicy::ContinueWithWarnings,
        );
        let summary = provisioner
            .provision(&manifest)
            .await
            .expect("tolerant run should complete");
        assert_eq!(summary.report.warnings.len(), 2);
        assert_eq!(summary.report.existing, vec!["logs", "api"]);
    }
}
