use crate::services::FailurePolicy;
use anyhow::{Result, anyhow};
use clap::Parser;
use std::env;

const DEFAULT_CONFIG_FILE: &str = "aws-resources.yaml";

/// Centralized run configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub config_path: String,
    pub region_override: Option<String>,
    pub failure_policy: FailurePolicy,
    pub dry_run: bool,
    pub check_creds: bool,
    pub validate_policies: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Declaratively provision AWS resources from a YAML file")]
pub struct Args {
    /// Path to the resource file (overrides CLOUD_BOOTSTRAP_CONFIG)
    #[arg(long)]
    pub config: Option<String>,

    /// Print the planned resources without making any AWS calls
    #[arg(long)]
    pub dry_run: bool,

    /// Only check AWS credentials and exit
    #[arg(long)]
    pub check_creds: bool,

    /// Abort on the first failed step instead of warning (overrides CLOUD_BOOTSTRAP_FAILURE_MODE)
    #[arg(long)]
    pub strict: bool,

    /// Region to provision in (overrides CLOUD_BOOTSTRAP_REGION and the file's `region`)
    #[arg(long)]
    pub region: Option<String>,

    /// Check that every policy document is valid JSON before starting
    #[arg(long)]
    pub validate_policies: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::from_parts(Args::parse(), |key| env::var(key).ok())
    }

    /// Merge parsed args over values from `lookup` (the environment).
    pub fn from_parts(args: Args, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // --- Environment fallback ---
        let env_config =
            lookup("CLOUD_BOOTSTRAP_CONFIG").unwrap_or_else(|| DEFAULT_CONFIG_FILE.into());
        let env_region = lookup("CLOUD_BOOTSTRAP_REGION").filter(|r| !r.is_empty());
        let env_policy = match lookup("CLOUD_BOOTSTRAP_FAILURE_MODE") {
            Some(value) => FailurePolicy::from_name(&value).ok_or_else(|| {
                anyhow!(
                    "parsing CLOUD_BOOTSTRAP_FAILURE_MODE value `{}` (expected `strict` or `tolerant`)",
                    value
                )
            })?,
            None => FailurePolicy::default(),
        };

        // --- Merge ---
        Ok(Self {
            config_path: args.config.unwrap_or(env_config),
            region_override: args.region.or(env_region),
            failure_policy: if args.strict {
                FailurePolicy::AbortOnFirstError
            } else {
                env_policy
            },
            dry_run: args.dry_run,
            check_creds: args.check_creds,
            validate_policies: args.validate_policies,
        })
    }
}
