//! Dry-run plan rendering. Reads the manifest only; no provider is called.

use crate::models::ResourceManifest;
use std::fmt;

const HEADER: &str = "The following resources would be provisioned:";

/// Render the human-readable plan for `manifest`.
///
/// One `  - <name>` line per bucket, repository and user, grouped by kind,
/// with indented sub-lines for the notable attributes of each.
pub fn render_plan(manifest: &ResourceManifest) -> String {
    Plan(manifest).to_string()
}

struct Plan<'a>(&'a ResourceManifest);

impl fmt::Display for Plan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let manifest = self.0;
        writeln!(f, "{}", HEADER)?;

        if !manifest.s3_buckets.is_empty() {
            writeln!(f, "\nS3 Buckets:")?;
            for bucket in &manifest.s3_buckets {
                writeln!(f, "  - {}", bucket.name)?;
                if bucket.versioning_enabled() {
                    writeln!(f, "    - Versioning: enabled")?;
                }
                if let Some(algorithm) = bucket.encryption() {
                    writeln!(f, "    - Encryption: {}", algorithm)?;
                }
                if bucket.cors.is_some() {
                    writeln!(f, "    - CORS configuration would be applied")?;
                }
                if bucket.policy().is_some() {
                    writeln!(f, "    - Bucket policy would be applied")?;
                }
            }
        }

        if !manifest.ecr_repositories.is_empty() {
            writeln!(f, "\nECR Repositories:")?;
            for repo in &manifest.ecr_repositories {
                writeln!(f, "  - {}", repo.name)?;
                if repo.lifecycle_policy().is_some() {
                    writeln!(f, "    - Lifecycle policy would be applied")?;
                }
            }
        }

        if !manifest.iam_users.is_empty() {
            writeln!(f, "\nIAM Users:")?;
            for user in &manifest.iam_users {
                writeln!(f, "  - {}", user.name)?;
                if !user.policies.is_empty() {
                    writeln!(f, "    Policies:")?;
                    for policy in &user.policies {
                        writeln!(f, "    - {}: {}", policy.name, policy.description)?;
                    }
                }
            }
        }

        Ok(())
    }
}
