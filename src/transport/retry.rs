// Retry with exponential backoff for report submission
//
// Only idempotent transports are retried, and only on transient failures.
// Anything else gets exactly one attempt so a report is never filed twice.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use tracing::{debug, error, warn};

use crate::form::traits::SubmissionTransport;
use crate::form::types::{FormSnapshot, SubmissionReceipt};
use crate::transport::TransportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Waits between consecutive attempts: base, 2×base, 4×base… capped at max.
    pub fn delays(&self) -> Vec<Duration> {
        // The backoff yields 2×base, 4×base…, so it runs at double scale and is halved
        ExponentialBackoff::from_millis(2)
            .factor(self.base_delay_ms)
            .max_delay(Duration::from_millis(self.max_delay_ms.saturating_mul(2)))
            .take(self.max_attempts.saturating_sub(1) as usize)
            .map(|delay| delay / 2)
            .map(|delay| if self.jitter { jitter(delay) } else { delay })
            .collect()
    }
}

#[derive(Debug)]
pub struct RetryingTransport<T> {
    inner: T,
    config: RetryConfig,
}

impl<T: SubmissionTransport> RetryingTransport<T> {
    pub fn new(inner: T, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: SubmissionTransport> SubmissionTransport for RetryingTransport<T> {
    async fn submit(&self, payload: &FormSnapshot) -> Result<SubmissionReceipt, TransportError> {
        if !self.inner.is_idempotent() || self.config.max_attempts <= 1 {
            return self.inner.submit(payload).await;
        }

        let attempts = AtomicU32::new(0);
        let max_attempts = self.config.max_attempts;

        RetryIf::spawn(
            self.config.delays(),
            || {
                let attempt = attempts.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(attempt, max_attempts, "Submitting report");
                self.inner.submit(payload)
            },
            |err: &TransportError| {
                let attempt = attempts.load(Ordering::Relaxed);
                if err.is_transient() {
                    warn!(attempt, max_attempts, error = %err, "Report submission failed (retryable)");
                    true
                } else {
                    error!(attempt, error = %err, "Report submission failed (non-retryable)");
                    false
                }
            },
        )
        .await
    }

    fn is_idempotent(&self) -> bool {
        self.inner.is_idempotent()
    }
}
