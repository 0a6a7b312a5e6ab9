//! Maps the parsed command line onto one of the three run modes.
//!
//! ## Modes
//! - **check credentials** (`--check-creds`): one STS call, then exit
//! - **dry run** (`--dry-run`): print the plan, no AWS calls at all
//! - **provision** (default): verify credentials, then reconcile every
//!   resource kind in order
//!
//! `--check-creds` wins when both flags are given.

use crate::{
    config::AppConfig,
    errors::{BootstrapError, BootstrapResult},
    handlers::{
        credential_handlers::{check_credentials, profile_info},
        plan_handlers::render_plan,
    },
    models::ResourceManifest,
    providers::{
        CloudClients, IdentityApi,
        aws::{self, AwsIdentity},
    },
    services::{
        FailurePolicy,
        provisioner::{Provisioner, RunSummary},
    },
};
use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    CheckCredentials,
    DryRun,
    Provision,
}

impl RunMode {
    pub fn select(cfg: &AppConfig) -> Self {
        if cfg.check_creds {
            Self::CheckCredentials
        } else if cfg.dry_run {
            Self::DryRun
        } else {
            Self::Provision
        }
    }
}

/// Run the mode selected by `cfg` end to end.
pub async fn dispatch(cfg: &AppConfig) -> Result<()> {
    let manifest =
        ResourceManifest::load(&cfg.config_path).context("Failed to load configuration")?;
    if cfg.validate_policies {
        manifest
            .validate_documents()
            .context("Policy document validation failed")?;
    }

    let mode = RunMode::select(cfg);
    if mode == RunMode::DryRun {
        info!("Running in dry-run mode. No changes will be made.");
        print!("{}", render_plan(&manifest));
        return Ok(());
    }

    let region = resolve_region(cfg.region_override.as_deref(), &manifest)?;
    info!("Checking AWS credentials...");
    info!("{}", profile_info());
    let sdk_config = aws::load_sdk_config(&region).await;
    let identity = AwsIdentity::new(&sdk_config);

    if mode == RunMode::CheckCredentials {
        verify_credentials(&identity).await?;
        println!("Credential check completed successfully.");
        return Ok(());
    }

    let clients = connect_verified(&identity, || aws::connect(&sdk_config)).await?;
    let summary = provision_with(&clients, &manifest, &region, cfg.failure_policy).await?;
    if summary.report.warnings.is_empty() {
        println!("All resources configured successfully.");
    } else {
        println!(
            "Resources configured with {} warning(s):",
            summary.report.warnings.len()
        );
        for warning in &summary.report.warnings {
            println!("  - {}", warning);
        }
    }
    Ok(())
}

/// One identity call; the error lists where credentials are looked for.
async fn verify_credentials(identity: &dyn IdentityApi) -> Result<String> {
    let arn = check_credentials(identity)
        .await
        .context("AWS credential check failed")?;
    info!("AWS credentials validated. Authenticated as: {}", arn);
    Ok(arn)
}

/// Verify credentials, then build the clients with `connect`. `connect` is
/// never called when the credential check fails.
pub async fn connect_verified<F, Fut>(
    identity: &dyn IdentityApi,
    connect: F,
) -> Result<CloudClients>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = BootstrapResult<CloudClients>>,
{
    verify_credentials(identity).await?;
    connect().await.context(
        "Please check your AWS credentials and region configuration. \
         Make sure you have valid credentials in ~/.aws/credentials or environment variables",
    )
}

/// Reconcile `manifest` with already verified `clients`.
pub async fn provision_with(
    clients: &CloudClients,
    manifest: &ResourceManifest,
    region: &str,
    policy: FailurePolicy,
) -> Result<RunSummary> {
    Provisioner::new(clients, region, policy)
        .provision(manifest)
        .await
        .context("Failed to provision resources")
}

/// The `--region` / `CLOUD_BOOTSTRAP_REGION` override wins over the file.
pub fn resolve_region(
    region_override: Option<&str>,
    manifest: &ResourceManifest,
) -> Result<String, BootstrapError> {
    region_override
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .or_else(|| Some(manifest.region.trim()).filter(|r| !r.is_empty()))
        .map(str::to_string)
        .ok_or(BootstrapError::MissingRegion)
}
