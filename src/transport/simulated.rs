use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::form::traits::SubmissionTransport;
use crate::form::types::{FormSnapshot, SubmissionReceipt};
use crate::telemetry::generate_correlation_id;
use crate::transport::TransportError;

pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(2000);

/// Stand-in for the report endpoint: waits a fixed delay, then resolves.
///
/// Accepts by default. `failing` builds one that always resolves with the
/// given error, for exercising the failure path end to end.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    delay: Duration,
    failure: Option<TransportError>,
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_DELAY)
    }
}

impl SimulatedTransport {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
        }
    }

    pub fn failing(delay: Duration, error: TransportError) -> Self {
        Self {
            delay,
            failure: Some(error),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl SubmissionTransport for SimulatedTransport {
    async fn submit(&self, payload: &FormSnapshot) -> Result<SubmissionReceipt, TransportError> {
        debug!(
            fields = payload.len(),
            delay_ms = self.delay.as_millis() as u64,
            "Simulating report submission"
        );
        tokio::time::sleep(self.delay).await;

        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(SubmissionReceipt {
                submission_id: generate_correlation_id(),
                accepted_at: Utc::now(),
            }),
        }
    }

    // Nothing is stored, so replaying is harmless
    fn is_idempotent(&self) -> bool {
        true
    }
}
