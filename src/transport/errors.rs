use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification shown alongside a failure banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    Timeout,
    Network,
    Unavailable,
    Rejected,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Network => "network",
            TransportErrorKind::Unavailable => "unavailable",
            TransportErrorKind::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Submission timed out after {duration_ms} ms")]
    Timeout { duration_ms: u64 },
    #[error("Network error: {message}")]
    Network { message: String },
    #[error("Report service unavailable: {message}")]
    Unavailable { message: String },
    #[error("Report rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
}

impl TransportError {
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            TransportError::Timeout { .. } => TransportErrorKind::Timeout,
            TransportError::Network { .. } => TransportErrorKind::Network,
            TransportError::Unavailable { .. } => TransportErrorKind::Unavailable,
            TransportError::Rejected { .. } => TransportErrorKind::Rejected,
        }
    }

    /// Failures worth another attempt: timeouts, dropped connections, 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            TransportError::Timeout { .. }
            | TransportError::Network { .. }
            | TransportError::Unavailable { .. } => true,
            TransportError::Rejected { status, .. } => *status == 429 || *status >= 500,
        }
    }
}
