// Report form workflow - validation, submit orchestration and presentation
//
// Every call happens on the UI thread. `submit` holds `&mut self` across the
// transport await, so a second submit on the same instance cannot start until
// the first settles.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

use statig::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn, Instrument};

use crate::config::FormConfig;
use crate::form::errors::FormError;
use crate::form::state_machine::{SubmissionEvent, SubmissionMachine};
use crate::form::traits::{PresentationSurface, SubmissionTransport};
use crate::form::types::*;
use crate::form::validation::{check_field, check_required};
use crate::telemetry::{create_submission_span, generate_correlation_id};
use crate::transport::TransportError;

pub const DEFAULT_SUCCESS_OVERLAY_MS: u64 = 5000;

/// How one call to [`FormWorkflow::submit`] ended
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Required fields missing; the transport was never called
    Rejected(ValidationResult),
    Succeeded(SubmissionReceipt),
    /// Transport failed; field values were kept for a retry
    Failed(TransportError),
    Cancelled,
    /// A submission was already in flight
    Busy,
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Succeeded(_))
    }
}

/// Cancels the submission currently in flight on one form.
///
/// Obtain it before calling `submit`; aborting while idle does nothing.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    slot: Rc<RefCell<Option<CancellationToken>>>,
}

impl AbortHandle {
    /// Returns true if a submission was in flight
    pub fn abort(&self) -> bool {
        match self.slot.borrow().as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.slot.borrow().is_some()
    }

    fn arm(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.slot.borrow_mut() = Some(token.clone());
        token
    }

    fn disarm(&self) {
        self.slot.borrow_mut().take();
    }
}

pub struct FormWorkflowBuilder {
    form_id: String,
    schema: FormSchema,
    required: Vec<String>,
    control: SubmitControl,
    success_overlay_ms: u64,
    surface: Rc<dyn PresentationSurface>,
    transport: Arc<dyn SubmissionTransport>,
}

impl FormWorkflowBuilder {
    pub fn form_id(mut self, form_id: impl Into<String>) -> Self {
        self.form_id = form_id.into();
        self
    }

    pub fn schema(mut self, schema: FormSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn control(mut self, control: SubmitControl) -> Self {
        self.control = control;
        self
    }

    pub fn success_overlay_ms(mut self, millis: u64) -> Self {
        self.success_overlay_ms = millis;
        self
    }

    /// Checks the required set against the declared fields before any event runs.
    pub fn build(self) -> Result<FormWorkflow, FormError> {
        if let Some(field) = self.schema.duplicate_names().into_iter().next() {
            tracing::error!(form_id = %self.form_id, field = %field, "Duplicate form field");
            return Err(FormError::DuplicateField { field });
        }
        if self.required.is_empty() {
            return Err(FormError::NoRequiredFields);
        }
        if let Some(field) = self
            .required
            .iter()
            .find(|name| !self.schema.contains(name))
        {
            tracing::error!(
                form_id = %self.form_id,
                field = %field,
                "Required field missing from form markup"
            );
            return Err(FormError::UnknownRequiredField {
                field: field.clone(),
            });
        }

        info!(
            form_id = %self.form_id,
            fields = self.schema.fields().len(),
            required = ?self.required,
            "Form workflow ready"
        );

        Ok(FormWorkflow {
            machine: SubmissionMachine::new(self.form_id).state_machine(),
            schema: self.schema,
            required: self.required,
            control: self.control,
            success_overlay_ms: self.success_overlay_ms,
            surface: self.surface,
            transport: self.transport,
            annotated: HashSet::new(),
            abort: AbortHandle::default(),
        })
    }
}

/// Holds the in-flight submission open. Settling restores the control and
/// feeds the transport result to the machine; dropping it unsettled (the
/// `submit` future was dropped mid-flight) does the same with a cancel.
struct InFlightGuard<'a> {
    machine: &'a mut StateMachine<SubmissionMachine>,
    surface: &'a dyn PresentationSurface,
    control: &'a SubmitControl,
    abort: &'a AbortHandle,
    settled: bool,
}

impl InFlightGuard<'_> {
    fn settle(mut self, event: &SubmissionEvent) {
        self.release(event);
    }

    fn release(&mut self, event: &SubmissionEvent) {
        self.settled = true;
        self.abort.disarm();
        self.surface.show_idle(self.control);
        self.machine.handle(event);
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(
                form_id = %self.machine.inner().form_id(),
                "Submission dropped while in flight, restoring form"
            );
            self.release(&SubmissionEvent::Cancel);
        }
    }
}

pub struct FormWorkflow {
    schema: FormSchema,
    required: Vec<String>,
    control: SubmitControl,
    success_overlay_ms: u64,
    surface: Rc<dyn PresentationSurface>,
    transport: Arc<dyn SubmissionTransport>,
    machine: StateMachine<SubmissionMachine>,
    annotated: HashSet<String>,
    abort: AbortHandle,
}

impl FormWorkflow {
    /// Builder preloaded with the report form and its default required set
    pub fn builder(
        surface: Rc<dyn PresentationSurface>,
        transport: Arc<dyn SubmissionTransport>,
    ) -> FormWorkflowBuilder {
        FormWorkflowBuilder {
            form_id: "report-form".to_string(),
            schema: FormSchema::report_form(),
            required: DEFAULT_REQUIRED_FIELDS.iter().map(|s| s.to_string()).collect(),
            control: SubmitControl::default(),
            success_overlay_ms: DEFAULT_SUCCESS_OVERLAY_MS,
            surface,
            transport,
        }
    }

    pub fn from_config(
        config: &FormConfig,
        surface: Rc<dyn PresentationSurface>,
        transport: Arc<dyn SubmissionTransport>,
    ) -> Result<Self, FormError> {
        Self::builder(surface, transport)
            .form_id(config.form_id.clone())
            .required_fields(config.required_fields.iter().cloned())
            .control(SubmitControl {
                label: config.submit_label.clone(),
                busy_label: config.busy_label.clone(),
            })
            .success_overlay_ms(config.success_overlay_ms)
            .build()
    }

    pub fn state(&self) -> SubmissionState {
        SubmissionState::from(self.machine.state())
    }

    pub fn form_id(&self) -> &str {
        self.machine.inner().form_id()
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn required_fields(&self) -> &[String] {
        &self.required
    }

    pub fn control(&self) -> &SubmitControl {
        &self.control
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Whether the field currently carries an error annotation
    pub fn has_error(&self, field_name: &str) -> bool {
        self.annotated.contains(field_name)
    }

    /// Blur-time check: required and format rules, annotated on the surface.
    pub fn validate_field(&mut self, field: &FieldDescriptor) -> FieldValidationOutcome {
        let outcome = check_field(field);
        match &outcome {
            FieldValidationOutcome::Invalid(issue) => {
                self.annotate(&field.name, &issue.to_string());
            }
            FieldValidationOutcome::Valid => self.clear_annotation(&field.name),
        }
        debug!(field = %field.name, valid = outcome.is_valid(), "Field validated");
        outcome
    }

    pub fn on_blur(
        &mut self,
        field_name: &str,
        value: &str,
    ) -> Result<FieldValidationOutcome, FormError> {
        let field = self
            .schema
            .describe(field_name, value)
            .ok_or_else(|| FormError::UnknownField {
                field: field_name.to_string(),
            })?;
        Ok(self.validate_field(&field))
    }

    /// Typing into a flagged field drops its error immediately, without
    /// re-validating. Returns true if an annotation was removed.
    pub fn on_input(&mut self, field_name: &str) -> bool {
        if self.annotated.remove(field_name) {
            self.surface.clear_field_error(field_name);
            true
        } else {
            false
        }
    }

    /// Submit-time check: required coverage only. Email shape is left to blur.
    pub fn validate_form(&mut self, snapshot: &FormSnapshot) -> ValidationResult {
        let result = check_required(snapshot, &self.required);
        for (field, message) in result.errors_by_field() {
            self.annotate(field, message);
        }
        debug!(
            valid = result.is_valid(),
            failed_fields = result.errors_by_field().len(),
            "Form validated"
        );
        result
    }

    /// Validate, then hand the snapshot to the transport.
    ///
    /// On success the snapshot's values are emptied. On failure they are kept
    /// and a banner is shown. Errors never propagate past this call.
    pub async fn submit(&mut self, snapshot: &mut FormSnapshot) -> SubmissionOutcome {
        if self.state().is_in_flight() {
            warn!(form_id = %self.form_id(), state = %self.state(), "Submit ignored, already in flight");
            return SubmissionOutcome::Busy;
        }

        let submission_id = generate_correlation_id();
        let span = create_submission_span(self.form_id(), &submission_id);
        self.run_submission(snapshot, submission_id)
            .instrument(span)
            .await
    }

    async fn run_submission(
        &mut self,
        snapshot: &mut FormSnapshot,
        submission_id: String,
    ) -> SubmissionOutcome {
        self.machine
            .handle(&SubmissionEvent::Submit { submission_id });

        let validation = self.validate_form(snapshot);
        if !validation.is_valid() {
            self.machine.handle(&SubmissionEvent::ValidationFailed {
                failed_fields: validation.errors_by_field().len(),
            });
            return SubmissionOutcome::Rejected(validation);
        }

        self.machine.handle(&SubmissionEvent::ValidationPassed);
        self.surface.show_busy(&self.control);

        let token = self.abort.arm();
        let guard = InFlightGuard {
            machine: &mut self.machine,
            surface: self.surface.as_ref(),
            control: &self.control,
            abort: &self.abort,
            settled: false,
        };
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.transport.submit(snapshot) => Some(result),
        };

        match result {
            None => {
                guard.settle(&SubmissionEvent::Cancel);
                SubmissionOutcome::Cancelled
            }
            Some(Ok(receipt)) => {
                guard.settle(&SubmissionEvent::TransportSucceeded);
                self.surface.show_success_overlay(self.success_overlay_ms);
                snapshot.reset_values();
                info!(receipt = %receipt.submission_id, "Report accepted");
                SubmissionOutcome::Succeeded(receipt)
            }
            Some(Err(err)) => {
                guard.settle(&SubmissionEvent::TransportFailed { kind: err.kind() });
                self.surface
                    .show_submission_error(err.kind(), &err.to_string());
                SubmissionOutcome::Failed(err)
            }
        }
    }

    fn annotate(&mut self, field_name: &str, message: &str) {
        self.surface.show_field_error(field_name, message);
        self.annotated.insert(field_name.to_string());
    }

    fn clear_annotation(&mut self, field_name: &str) {
        self.surface.clear_field_error(field_name);
        self.annotated.remove(field_name);
    }
}
