use serde::{Deserialize, Serialize};
use statig::prelude::*;

use crate::form::types::SubmissionState;
use crate::transport::TransportErrorKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionEvent {
    Submit { submission_id: String },
    ValidationPassed,
    ValidationFailed { failed_fields: usize },
    TransportSucceeded,
    TransportFailed { kind: TransportErrorKind },
    Cancel,
}

/// Submission lifecycle for one form instance.
///
/// Idle and the settled states (succeeded, failed) accept a new submit;
/// validating and submitting ignore it.
#[derive(Debug, Default)]
pub struct SubmissionMachine {
    form_id: String,
    submission_id: Option<String>,
    attempts: u32,
    last_failure: Option<TransportErrorKind>,
}

impl SubmissionMachine {
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            ..Default::default()
        }
    }

    fn begin(&mut self, submission_id: &str) {
        self.submission_id = Some(submission_id.to_string());
        self.attempts += 1;
        self.last_failure = None;
        tracing::debug!(
            form_id = %self.form_id,
            submission_id = %submission_id,
            attempt = self.attempts,
            "Submission started"
        );
    }
}

#[state_machine(initial = "State::idle()", state(derive(Debug, Clone, PartialEq, Eq)))]
impl SubmissionMachine {
    #[state]
    fn idle(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Submit { submission_id } => {
                self.begin(submission_id);
                Transition(State::validating())
            }
            _ => Handled,
        }
    }

    #[state]
    fn validating(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::ValidationPassed => {
                tracing::info!(
                    form_id = %self.form_id,
                    submission_id = ?self.submission_id,
                    "Validation passed, submitting"
                );
                Transition(State::submitting())
            }
            SubmissionEvent::ValidationFailed { failed_fields } => {
                tracing::info!(
                    form_id = %self.form_id,
                    failed_fields = %failed_fields,
                    "Validation failed, submission not sent"
                );
                self.submission_id = None;
                Transition(State::idle())
            }
            _ => Handled,
        }
    }

    #[state]
    fn submitting(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::TransportSucceeded => {
                tracing::info!(
                    form_id = %self.form_id,
                    submission_id = ?self.submission_id,
                    "Report submitted"
                );
                Transition(State::succeeded())
            }
            SubmissionEvent::TransportFailed { kind } => {
                self.last_failure = Some(*kind);
                tracing::warn!(
                    form_id = %self.form_id,
                    submission_id = ?self.submission_id,
                    kind = %kind,
                    "Report submission failed"
                );
                Transition(State::failed())
            }
            SubmissionEvent::Cancel => {
                tracing::info!(
                    form_id = %self.form_id,
                    submission_id = ?self.submission_id,
                    "Submission cancelled"
                );
                self.submission_id = None;
                Transition(State::idle())
            }
            _ => Handled,
        }
    }

    #[state]
    fn succeeded(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Submit { submission_id } => {
                self.begin(submission_id);
                Transition(State::validating())
            }
            _ => Handled,
        }
    }

    #[state]
    fn failed(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Submit { submission_id } => {
                self.begin(submission_id);
                Transition(State::validating())
            }
            _ => Handled,
        }
    }
}

impl SubmissionMachine {
    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn submission_id(&self) -> Option<&str> {
        self.submission_id.as_deref()
    }

    /// Submissions started since the form was built
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn last_failure(&self) -> Option<TransportErrorKind> {
        self.last_failure
    }
}

impl From<&State> for SubmissionState {
    fn from(state: &State) -> Self {
        match state {
            State::Idle { .. } => SubmissionState::Idle,
            State::Validating { .. } => SubmissionState::Validating,
            State::Submitting { .. } => SubmissionState::Submitting,
            State::Succeeded { .. } => SubmissionState::Succeeded,
            State::Failed { .. } => SubmissionState::Failed,
        }
    }
}
