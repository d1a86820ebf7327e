// src/health/status.rs
use reqwest::StatusCode;
use std::fmt;

/// Outcome of a single probe. Never stored; rendered and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    Healthy { status: StatusCode },
    Unhealthy { status: StatusCode },
    Error { detail: String },
}

impl CheckResult {
    /// Any 2xx or 3xx status counts as healthy.
    pub fn classify(status: StatusCode) -> Self {
        if status.is_success() || status.is_redirection() {
            CheckResult::Healthy { status }
        } else {
            CheckResult::Unhealthy { status }
        }
    }

    /// Build an `Error` result carrying the source chain. hyper already folds
    /// its cause into its own message, so a cause whose text the detail ends
    /// with is skipped.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut detail = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !detail.ends_with(&text) {
                detail.push_str(": ");
                detail.push_str(&text);
            }
            source = cause.source();
        }
        CheckResult::Error { detail }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, CheckResult::Healthy { .. })
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Healthy { status } => write!(f, "healthy ({})", status.as_u16()),
            CheckResult::Unhealthy { status } => write!(f, "unhealthy ({})", status.as_u16()),
            CheckResult::Error { detail } => write!(f, "error ({})", detail),
        }
    }
}
