//! Ensures S3 buckets exist and carry their versioning,
//! encryption, CORS and policy settings.

use super::{FailurePolicy, ReconcileReport};
use crate::{
    errors::{BootstrapError, BootstrapResult},
    models::{BucketSpec, CorsSpec},
    providers::{CorsRule, DEFAULT_REGION, Lookup, ObjectStorageApi},
};
use std::sync::Arc;
use tracing::{info, warn};

const SUPPORTED_ALGORITHM: &str = "AES256";

#[derive(Clone)]
pub struct BucketService {
    api: Arc<dyn ObjectStorageApi>,
    region: String,
    policy: FailurePolicy,
}

impl BucketService {
    pub fn new(
        api: Arc<dyn ObjectStorageApi>,
        region: impl Into<String>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            api,
            region: region.into(),
            policy,
        }
    }

    /// Location constraint for new buckets. S3 rejects an explicit
    /// constraint naming the default region, so it is omitted there.
    pub fn location_constraint(&self) -> Option<String> {
        (self.region != DEFAULT_REGION).then(|| self.region.clone())
    }

    /// Ensure every bucket in order. Stops at the first fatal error.
    pub async fn ensure_all(&self, buckets: &[BucketSpec]) -> BootstrapResult<ReconcileReport> {
        let mut report = ReconcileReport::default();
        for bucket in buckets {
            self.ensure(bucket, &mut report).await?;
        }
        Ok(report)
    }

    async fn ensure(
        &self,
        bucket: &BucketSpec,
        report: &mut ReconcileReport,
    ) -> BootstrapResult<()> {
        let name = bucket.name.as_str();
        info!("Ensuring S3 bucket: {}", name);

        let exists = match self.api.head_bucket(name).await {
            Lookup::Found(()) => true,
            Lookup::NotFound => false,
            Lookup::Failed(err) => {
                self.policy.lookup_failed(err, "check bucket", name, report)?;
                false
            }
        };

        if exists {
            info!("Bucket {} already exists", name);
            report.existing.push(name.to_string());
        } else {
            self.api
                .create_bucket(name, self.location_constraint())
                .await
                .map_err(|err| BootstrapError::provider("create bucket", name, err))?;
            info!("Created bucket: {}", name);
            report.created.push(name.to_string());
        }

        if bucket.versioning_enabled() {
            let result = self.api.enable_versioning(name).await;
            self.policy
                .settle(result, "enable versioning for bucket", name, report)?;
        }

        if let Some(algorithm) = bucket.encryption() {
            if !algorithm.eq_ignore_ascii_case(SUPPORTED_ALGORITHM) {
                warn!(
                    "Bucket {} requests encryption `{}`; only {} is supported and will be applied",
                    name, algorithm, SUPPORTED_ALGORITHM
                );
            }
            let result = self.api.enable_default_encryption(name).await;
            self.policy
                .settle(result, "configure encryption for bucket", name, report)?;
        }

        if let Some(cors) = &bucket.cors {
            let result = self.api.put_cors(name, &cors_rule(cors)).await;
            self.policy
                .settle(result, "configure CORS for bucket", name, report)?;
        }

        if let Some(policy) = bucket.policy() {
            tracing::debug!("Bucket {} policy digest {}", name, policy.digest());
            let result = self.api.put_policy(name, policy).await;
            self.policy
                .settle(result, "set policy for bucket", name, report)?;
        }

        Ok(())
    }
}

/// Build the single CORS rule for a bucket. Methods are upper-cased; every
/// other value passes through verbatim.
pub fn cors_rule(cors: &CorsSpec) -> CorsRule {
    CorsRule {
        allowed_origins: cors.allowed_origins.clone(),
        allowed_methods: cors
            .allowed_methods
            .iter()
            .map(|method| method.to_uppercase())
            .collect(),
        allowed_headers: cors.allowed_headers.clone(),
        expose_headers: cors.expose_headers.clone(),
        max_age_seconds: cors.max_age_seconds,
    }
}
