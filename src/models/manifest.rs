//! The top-level YAML document describing one provisioning run.

use super::{BucketSpec, DatabaseInstanceSpec, PolicyDocument, PrincipalSpec, RepositorySpec};
use crate::errors::{BootstrapError, BootstrapResult};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Desired resource set. Every list keeps document order, which is also the
/// order resources are reconciled in. Omitted sections load as empty lists.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ResourceManifest {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub s3_buckets: Vec<BucketSpec>,
    #[serde(default)]
    pub ecr_repositories: Vec<RepositorySpec>,
    #[serde(default)]
    pub iam_users: Vec<PrincipalSpec>,
    #[serde(default)]
    pub rds_instances: Vec<DatabaseInstanceSpec>,
}

impl ResourceManifest {
    /// Read and parse a manifest file.
    pub fn load(path: impl AsRef<Path>) -> BootstrapResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| BootstrapError::ConfigRead {
            path: display.clone(),
            source,
        })?;
        Self::parse(&text, &display)
    }

    /// Parse manifest text. `origin` names the source in error messages.
    pub fn parse(text: &str, origin: &str) -> BootstrapResult<Self> {
        serde_yaml::from_str(text).map_err(|source| BootstrapError::ConfigParse {
            path: origin.to_string(),
            source,
        })
    }

    /// Every opaque JSON document in the manifest, labelled by owner.
    pub fn documents(&self) -> Vec<(String, &PolicyDocument)> {
        let mut docs = Vec::new();
        for bucket in &self.s3_buckets {
            if let Some(policy) = bucket.policy() {
                docs.push((format!("bucket {} policy", bucket.name), policy));
            }
        }
        for repo in &self.ecr_repositories {
            if let Some(policy) = repo.lifecycle_policy() {
                docs.push((format!("repository {} lifecycle policy", repo.name), policy));
            }
        }
        for user in &self.iam_users {
            for policy in &user.policies {
                docs.push((
                    format!("policy {}", policy.qualified_name(&user.name)),
                    &policy.policy_document,
                ));
            }
        }
        docs
    }

    /// Parse every document as JSON, failing on the first that does not.
    pub fn validate_documents(&self) -> BootstrapResult<()> {
        for (name, doc) in self.documents() {
            doc.validate()
                .map_err(|err| BootstrapError::InvalidPolicyDocument {
                    name,
                    reason: err.to_string(),
                })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"
region: us-west-2
s3_buckets:
  - name: test-bucket
    versioning: enabled
    encryption: AES256
    cors:
      allowed_origins: ["https://example.com"]
      allowed_methods: [get, put]
      allowed_headers: ["*"]
      expose_headers: [ETag]
      max_age_seconds: 3000
    policy: '{"Version":"2012-10-17","Statement":[]}'
  - name: plain-bucket
ecr_repositories:
  - name: test-repo
    lifecycle_policy: '{"rules":[]}'
iam_users:
  - name: test-user
    policies:
      - name: test-policy
        description: "Test policy"
        policy_document: >
          {
            "Version": "2012-10-17",
            "Statement": [
              {
                "Effect": "Allow",
                "Action": ["s3:GetObject"],
                "Resource": ["arn:aws:s3:::test-bucket/*"]
              }
            ]
          }
rds_instances:
  - identifier: app-db
    engine: postgres
    engine_version: "16.3"
    instance_class: db.t3.micro
    storage_type: gp3
    allocated_storage: 20
    db_name: app
    master_username: admin
    master_password: hunter22
    publicly_accessible: false
    backup_retention_period: 7
    multi_az: true
    skip_final_snapshot: true
"#;

    #[test]
    fn well_formed_manifest_loads_every_kind() {
        let manifest = ResourceManifest::parse(FULL, "inline").expect("manifest should parse");

        assert_eq!(manifest.region, "us-west-2");

        assert_eq!(manifest.s3_buckets.len(), 2);
        let bucket = &manifest.s3_buckets[0];
        assert_eq!(bucket.name, "test-bucket");
        assert!(bucket.versioning_enabled());
        assert_eq!(bucket.encryption(), Some("AES256"));
        let cors = bucket.cors.as_ref().expect("cors should be present");
        assert_eq!(cors.allowed_origins, vec!["https://example.com"]);
        assert_eq!(cors.allowed_methods, vec!["get", "put"]);
        assert_eq!(cors.expose_headers, vec!["ETag"]);
        assert_eq!(cors.max_age_seconds, 3000);
        assert_eq!(
            bucket.policy().map(PolicyDocument::as_str),
            Some(r#"{"Version":"2012-10-17","Statement":[]}"#)
        );

        let plain = &manifest.s3_buckets[1];
        assert!(!plain.versioning_enabled());
        assert_eq!(plain.encryption(), None);
        assert!(plain.cors.is_none());
        assert!(plain.policy().is_none());

        assert_eq!(manifest.ecr_repositories.len(), 1);
        assert_eq!(manifest.ecr_repositories[0].name, "test-repo");
        assert!(manifest.ecr_repositories[0].lifecycle_policy().is_some());

        assert_eq!(manifest.iam_users.len(), 1);
        let user = &manifest.iam_users[0];
        assert_eq!(user.name, "test-user");
        assert_eq!(user.policies.len(), 1);
        assert_eq!(user.policies[0].name, "test-policy");
        assert_eq!(user.policies[0].description, "Test policy");
        assert!(user.policies[0].policy_document.as_str().contains("s3:GetObject"));

        assert_eq!(manifest.rds_instances.len(), 1);
        let db = &manifest.rds_instances[0];
        assert_eq!(db.identifier, "app-db");
        assert_eq!(db.engine, "postgres");
        assert_eq!(db.engine_version, "16.3");
        assert_eq!(db.instance_class, "db.t3.micro");
        assert_eq!(db.storage_type, "gp3");
        assert_eq!(db.allocated_storage, 20);
        assert_eq!(db.db_name, "app");
        assert_eq!(db.master_username, "admin");
        assert_eq!(db.master_password, "hunter22");
        assert!(!db.publicly_accessible);
        assert_eq!(db.backup_retention_period, 7);
        assert!(db.multi_az);
        assert!(db.skip_final_snapshot);
    }

    #[test]
    fn omitted_sections_load_as_empty_lists() {
        let manifest = ResourceManifest::parse("region: eu-west-1\n", "inline")
            .expect("manifest should parse");
        assert_eq!(manifest.region, "eu-west-1");
        assert!(manifest.s3_buckets.is_empty());
        assert!(manifest.ecr_repositories.is_empty());
        assert!(manifest.iam_users.is_empty());
        assert!(manifest.rds_instances.is_empty());
    }

    #[test]
    fn omitted_fields_load_as_zero_values() {
        let manifest = ResourceManifest::parse(
            r#"
iam_users:
  - name: ci
    policies:
      - name: s3-read
rds_instances:
  - identifier: app-db
"#,
            "inline",
        )
        .expect("manifest should parse");

        let policy = &manifest.iam_users[0].policies[0];
        assert!(policy.policy_document.is_empty());
        assert_eq!(policy.description, "");

        let db = &manifest.rds_instances[0];
        assert_eq!(db.identifier, "app-db");
        assert_eq!(db.engine, "");
        assert_eq!(db.instance_class, "");
        assert_eq!(db.allocated_storage, 0);
        assert_eq!(db.db_name, "");
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = ResourceManifest::parse("region: [us-east-1\ns3_buckets: {", "broken.yaml")
            .expect_err("invalid YAML must not parse");
        assert!(matches!(
            err,
            BootstrapError::ConfigParse { ref path, .. } if path == "broken.yaml"
        ));
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(FULL.as_bytes()).expect("write manifest");

        let manifest = ResourceManifest::load(file.path()).expect("manifest should load");
        assert_eq!(manifest.s3_buckets[0].name, "test-bucket");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = ResourceManifest::load(dir.path().join("absent.yaml"))
            .expect_err("missing file must fail");
        assert!(matches!(err, BootstrapError::ConfigRead { .. }));
    }

    #[test]
    fn document_validation_names_the_offender() {
        let mut manifest = ResourceManifest::parse(FULL, "inline").expect("manifest should parse");
        assert!(manifest.validate_documents().is_ok());

        manifest.ecr_repositories[0].lifecycle_policy = Some(PolicyDocument::new("{not json"));
        let err = manifest
            .validate_documents()
            .expect_err("broken lifecycle policy must fail validation");
        assert!(err.to_string().contains("repository test-repo lifecycle policy"));
    }
}
