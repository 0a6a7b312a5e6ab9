//! Declarative resource models for a provisioning run.
//!
//! These records describe *desired* state only. They are parsed once from the
//! YAML manifest via `serde` and never mutated afterwards; the actual state
//! lives with the cloud provider and is queried at run time.

pub mod bucket;
pub mod database;
pub mod manifest;
pub mod policy_document;
pub mod principal;
pub mod repository;

pub use bucket::{BucketSpec, CorsSpec};
pub use database::DatabaseInstanceSpec;
pub use manifest::ResourceManifest;
pub use policy_document::PolicyDocument;
pub use principal::{PolicySpec, PrincipalSpec};
pub use repository::RepositorySpec;
