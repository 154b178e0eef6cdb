// Submission transports
//
// The page has no backend: [`SimulatedTransport`] stands in for the report
// endpoint, and [`RetryingTransport`] wraps any transport with backoff for
// transient failures.

pub mod errors;
pub mod retry;
pub mod simulated;

pub use errors::{TransportError, TransportErrorKind};
pub use retry::{RetryConfig, RetryingTransport};
pub use simulated::SimulatedTransport;
