//! Deadline helpers for collaborator calls.
//!
//! The core analyzers are pure and bounded; only the external ML scorer can
//! block. Callers that need a deadline wrap the call with [`with_timeout`].

use crate::error::{Result, TrustScanError};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default collaborator deadline in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Deadline configuration for one collaborator call
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Maximum duration for the operation
    pub duration: Duration,
    /// Whether to log expiry
    pub log_warnings: bool,
    /// Operation name for logging
    pub operation_name: String,
}

impl TimeoutConfig {
    pub fn new(seconds: u64, operation: impl Into<String>) -> Self {
        Self::from_duration(Duration::from_secs(seconds), operation)
    }

    /// Sub-second deadlines are mostly useful in tests.
    pub fn from_duration(duration: Duration, operation: impl Into<String>) -> Self {
        Self {
            duration,
            log_warnings: true,
            operation_name: operation.into(),
        }
    }

    pub fn default_timeout(operation: impl Into<String>) -> Self {
        Self::new(DEFAULT_TIMEOUT_SECONDS, operation)
    }

    pub fn quiet(mut self) -> Self {
        self.log_warnings = false;
        self
    }
}

/// Execute an async operation under a deadline.
///
/// Returns [`TrustScanError::Timeout`] when the deadline expires first; the
/// inner future's own result is passed through otherwise.
pub async fn with_timeout<T, F>(config: TimeoutConfig, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    debug!(
        operation = %config.operation_name,
        deadline_ms = config.duration.as_millis() as u64,
        "starting deadline-bound operation"
    );

    match timeout(config.duration, future).await {
        Ok(result) => result,
        Err(_) => {
            if config.log_warnings {
                warn!(
                    operation = %config.operation_name,
                    "operation exceeded deadline of {:?}",
                    config.duration
                );
            }
            Err(TrustScanError::Timeout {
                seconds: config.duration.as_secs(),
            })
        }
    }
}
