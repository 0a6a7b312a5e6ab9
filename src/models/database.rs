//! Desired configuration of an RDS database instance.

use serde::{Deserialize, Serialize};

/// An RDS instance to ensure.
///
/// Only `allocated_storage` is reconciled on existing instances. The master
/// password is carried in plain text, and since this type derives `Debug` it
/// shows up verbatim wherever the value is debug-printed.
///
/// Every field defaults when omitted; missing required values are left for
/// the provider to reject.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct DatabaseInstanceSpec {
    pub identifier: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub engine_version: String,
    #[serde(default)]
    pub instance_class: String,
    #[serde(default)]
    pub storage_type: String,
    /// Storage in GB.
    #[serde(default)]
    pub allocated_storage: i32,
    #[serde(default)]
    pub db_name: String,
    #[serde(default)]
    pub master_username: String,
    #[serde(default)]
    pub master_password: String,
    #[serde(default)]
    pub publicly_accessible: bool,
    /// Days; zero leaves the provider default.
    #[serde(default)]
    pub backup_retention_period: i32,
    #[serde(default)]
    pub multi_az: bool,
    /// Only meaningful on deletion, which this tool never performs.
    #[serde(default)]
    pub skip_final_snapshot: bool,
}
