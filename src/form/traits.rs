// Capabilities the form workflow consumes - injected so tests can substitute them

use async_trait::async_trait;

use crate::form::types::{FormSnapshot, SubmissionReceipt, SubmitControl};
use crate::transport::{TransportError, TransportErrorKind};

/// Where validation errors, busy state and overlays become visible.
///
/// Calls arrive on the single UI thread, so implementations may use interior
/// mutability without locking.
pub trait PresentationSurface {
    /// Show `message` under the field, replacing any annotation already there
    fn show_field_error(&self, field_name: &str, message: &str);

    /// Remove the field's annotation, if any
    fn clear_field_error(&self, field_name: &str);

    /// Disable the control and swap in its busy label
    fn show_busy(&self, control: &SubmitControl);

    /// Re-enable the control with its original label
    fn show_idle(&self, control: &SubmitControl);

    /// Confirmation overlay, removed after `auto_dismiss_ms` or on any click
    fn show_success_overlay(&self, auto_dismiss_ms: u64);

    /// Non-blocking banner for a failed submission
    fn show_submission_error(&self, kind: TransportErrorKind, message: &str);
}

/// Accepts a validated payload and resolves asynchronously.
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn submit(&self, payload: &FormSnapshot) -> Result<SubmissionReceipt, TransportError>;

    /// Whether repeating a submit cannot create a duplicate report
    fn is_idempotent(&self) -> bool {
        false
    }
}
