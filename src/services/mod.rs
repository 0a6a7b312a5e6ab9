//! Reconcilers: one service per resource kind, plus the provisioner that runs
//! them in order.
//!
//! Every service walks its list sequentially and awaits each provider call
//! before issuing the next. Failures are routed through a shared
//! [`FailurePolicy`] so strict and tolerant runs use the same code path.

pub mod bucket_service;
pub mod database_service;
pub mod principal_service;
pub mod provisioner;
pub mod repository_service;

use crate::errors::{BootstrapError, BootstrapResult, ProviderError};
use tracing::{info, warn};

/// How configuration-step failures are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Any failed step aborts the run.
    AbortOnFirstError,
    /// Only resource creation aborts; configuration steps warn and continue.
    #[default]
    ContinueWithWarnings,
}

impl FailurePolicy {
    /// Parse `strict` / `tolerant` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "strict" | "abort" => Some(Self::AbortOnFirstError),
            "tolerant" | "continue" => Some(Self::ContinueWithWarnings),
            _ => None,
        }
    }

    /// Decide what a non-creation failure means for the run.
    pub fn absorb(self, err: BootstrapError, report: &mut ReconcileReport) -> BootstrapResult<()> {
        match self {
            Self::AbortOnFirstError => Err(err),
            Self::ContinueWithWarnings => {
                warn!("{}", err);
                report.warnings.push(err.to_string());
                Ok(())
            }
        }
    }

    /// Settle the result of a configuration call on `resource`.
    pub fn settle(
        self,
        result: Result<(), ProviderError>,
        operation: &'static str,
        resource: &str,
        report: &mut ReconcileReport,
    ) -> BootstrapResult<()> {
        match result {
            Ok(()) => {
                info!("Completed: {} {}", operation, resource);
                Ok(())
            }
            Err(err) => self.absorb(BootstrapError::provider(operation, resource, err), report),
        }
    }

    /// Handle an existence check that neither found nor ruled out the
    /// resource. In tolerant mode the resource is treated as absent and the
    /// create call is attempted.
    pub fn lookup_failed(
        self,
        err: ProviderError,
        operation: &'static str,
        resource: &str,
        report: &mut ReconcileReport,
    ) -> BootstrapResult<()> {
        self.absorb(BootstrapError::provider(operation, resource, err), report)?;
        info!("Treating {} as absent after failed lookup", resource);
        Ok(())
    }
}

/// What a reconciler did, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
    pub updated: Vec<String>,
    pub warnings: Vec<String>,
}

impl ReconcileReport {
    pub fn merge(&mut self, other: ReconcileReport) {
        self.created.extend(other.created);
        self.existing.extend(other.existing);
        self.updated.extend(other.updated);
        self.warnings.extend(other.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerant_policy_records_warning_and_continues() {
        let mut report = ReconcileReport::default();
        let result = FailurePolicy::ContinueWithWarnings.settle(
            Err(ProviderError::other("AccessDenied")),
            "enable versioning for bucket",
            "logs",
            &mut report,
        );
        assert!(result.is_ok());
        assert_eq!(
            report.warnings,
            vec!["failed to enable versioning for bucket logs: AccessDenied".to_string()]
        );
    }

    #[test]
    fn strict_policy_aborts() {
        let mut report = ReconcileReport::default();
        let result = FailurePolicy::AbortOnFirstError.settle(
            Err(ProviderError::other("AccessDenied")),
            "enable versioning for bucket",
            "logs",
            &mut report,
        );
        assert!(matches!(result, Err(BootstrapError::Provider { .. })));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn successful_steps_leave_no_trace_in_warnings() {
        let mut report = ReconcileReport::default();
        FailurePolicy::AbortOnFirstError
            .settle(Ok(()), "set policy for bucket", "logs", &mut report)
            .expect("success must not fail");
        assert_eq!(report, ReconcileReport::default());
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!(
            FailurePolicy::from_name("STRICT"),
            Some(FailurePolicy::AbortOnFirstError)
        );
        assert_eq!(
            FailurePolicy::from_name("tolerant"),
            Some(FailurePolicy::ContinueWithWarnings)
        );
        assert_eq!(FailurePolicy::from_name("sometimes"), None);
        assert_eq!(FailurePolicy::default(), FailurePolicy::ContinueWithWarnings);
    }
}
