// src/health/reporter.rs
use super::CheckResult;
use chrono::{DateTime, Local, SecondsFormat};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Sink for probe outcomes. The loop calls it exactly once per completed probe.
pub trait Reporter: Send + Sync {
    fn report(&self, result: &CheckResult, checked_at: DateTime<Local>);
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn report(&self, result: &CheckResult, checked_at: DateTime<Local>) {
        (**self).report(result, checked_at)
    }
}

/// Writes one log record per outcome through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, result: &CheckResult, checked_at: DateTime<Local>) {
        let checked_at = checked_at.to_rfc3339_opts(SecondsFormat::Millis, false);

        match result {
            CheckResult::Healthy { status } => {
                info!(status = status.as_u16(), %checked_at, "API is healthy");
            }
            CheckResult::Unhealthy { status } => {
                warn!(status = status.as_u16(), %checked_at, "API is unhealthy");
            }
            CheckResult::Error { detail } => {
                error!(error = %detail, %checked_at, "error checking API health");
            }
        }
    }
}
