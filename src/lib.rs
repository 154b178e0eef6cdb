// Bounty Page Library - report form workflow and page behaviors
// Exposes the headless core of the bug bounty landing page for hosts and tests

pub mod app;
pub mod config;
pub mod form;
pub mod page;
pub mod surface;
pub mod telemetry;
pub mod theme;
pub mod transport;

// Re-export key types for easy access
pub use app::{transport_from_config, BountyPage};
pub use config::{config, init_config, BountyPageConfig};
pub use form::{
    AbortHandle, FieldDescriptor, FieldKind, FieldValidationOutcome, FormError, FormSchema,
    FormSnapshot, FormWorkflow, PresentationSurface, SubmissionOutcome, SubmissionReceipt,
    SubmissionState, SubmissionTransport, SubmitControl, ValidationIssue, ValidationResult,
};
pub use page::{CounterAnimation, MobileMenu, Navigation, RevealTracker, ScrollEffects, Section};
pub use surface::{ClickTarget, DocumentSurface, Overlay, OverlayKind};
pub use telemetry::{create_submission_span, generate_correlation_id, init_telemetry};
pub use theme::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Theme, ThemeController};
pub use transport::{RetryConfig, RetryingTransport, SimulatedTransport, TransportError, TransportErrorKind};
