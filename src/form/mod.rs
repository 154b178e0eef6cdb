// Report Form Module - validation and submission workflow
//
// The workflow talks to the page only through the capabilities in `traits`,
// so the state machine runs the same against a real surface or a test double.

pub mod errors;
pub mod state_machine;
pub mod traits;
pub mod types;
pub mod validation;
pub mod workflow;

#[cfg(test)]
pub mod mocks;


pub use errors::FormError;
pub use state_machine::{SubmissionEvent, SubmissionMachine};
pub use traits::{PresentationSurface, SubmissionTransport};
pub use types::{
    FieldDescriptor, FieldKind, FieldValidationOutcome, FormSchema, FormSnapshot,
    SubmissionReceipt, SubmissionState, SubmitControl, ValidationIssue, ValidationResult,
};
pub use validation::{check_field, check_required, is_valid_email};
pub use workflow::{AbortHandle, FormWorkflow, FormWorkflowBuilder, SubmissionOutcome};
