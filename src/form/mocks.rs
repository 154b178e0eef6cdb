// Recording doubles for the form workflow - no side effects

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::form::traits::*;
use crate::form::types::*;
use crate::transport::{TransportError, TransportErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    ShowFieldError { field: String, message: String },
    ClearFieldError { field: String },
    ShowBusy { label: String },
    ShowIdle { label: String },
    ShowSuccessOverlay { auto_dismiss_ms: u64 },
    ShowSubmissionError { kind: TransportErrorKind, message: String },
}

/// Presentation surface that records every call in order
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: RefCell<Vec<SurfaceCall>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_calls(&self) -> Vec<SurfaceCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn count(&self, predicate: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }
}

impl PresentationSurface for RecordingSurface {
    fn show_field_error(&self, field_name: &str, message: &str) {
        self.calls.borrow_mut().push(SurfaceCall::ShowFieldError {
            field: field_name.to_string(),
            message: message.to_string(),
        });
    }

    fn clear_field_error(&self, field_name: &str) {
        self.calls.borrow_mut().push(SurfaceCall::ClearFieldError {
            field: field_name.to_string(),
        });
    }

    fn show_busy(&self, control: &SubmitControl) {
        self.calls.borrow_mut().push(SurfaceCall::ShowBusy {
            label: control.busy_label.clone(),
        });
    }

    fn show_idle(&self, control: &SubmitControl) {
        self.calls.borrow_mut().push(SurfaceCall::ShowIdle {
            label: control.label.clone(),
        });
    }

    fn show_success_overlay(&self, auto_dismiss_ms: u64) {
        self.calls
            .borrow_mut()
            .push(SurfaceCall::ShowSuccessOverlay { auto_dismiss_ms });
    }

    fn show_submission_error(&self, kind: TransportErrorKind, message: &str) {
        self.calls.borrow_mut().push(SurfaceCall::ShowSubmissionError {
            kind,
            message: message.to_string(),
        });
    }
}

/// Transport that replays queued results after a fixed delay; accepts once
/// the queue is empty.
#[derive(Debug)]
pub struct ScriptedTransport {
    delay: Duration,
    responses: Mutex<VecDeque<Result<(), TransportError>>>,
    payloads: Mutex<Vec<FormSnapshot>>,
    calls: AtomicU32,
}

impl ScriptedTransport {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            responses: Mutex::new(VecDeque::new()),
            payloads: Mutex::new(Vec::new()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn push_failure(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn get_payloads(&self) -> Vec<FormSnapshot> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubmissionTransport for ScriptedTransport {
    async fn submit(&self, payload: &FormSnapshot) -> Result<SubmissionReceipt, TransportError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.payloads.lock().unwrap().push(payload.clone());
        tokio::time::sleep(self.delay).await;

        let response = self.responses.lock().unwrap().pop_front().unwrap_or(Ok(()));
        response.map(|()| SubmissionReceipt {
            submission_id: format!("scripted-{call}"),
            accepted_at: Utc::now(),
        })
    }
}
