/// Shared builders for the report form integration tests
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bounty_page::{
    DocumentSurface, FormSnapshot, FormWorkflow, SimulatedTransport, SubmissionReceipt,
    SubmissionTransport, SubmitControl, TransportError,
};

/// The XSS report from the walkthrough, every field filled in
pub fn xss_report() -> FormSnapshot {
    [
        ("program", "Acme Corp"),
        ("severity", "high"),
        ("title", "XSS in search"),
        ("description", "Reflected script via the q parameter"),
        ("impact", "Session theft"),
        ("email", "a@b.co"),
    ]
    .into_iter()
    .collect()
}

pub fn document_surface() -> Rc<DocumentSurface> {
    Rc::new(DocumentSurface::new(&SubmitControl::default()))
}

/// Report form against the simulated endpoint (2000 ms, always accepts)
pub fn simulated_form(surface: &Rc<DocumentSurface>) -> FormWorkflow {
    form_with_transport(surface, Arc::new(SimulatedTransport::default()))
}

pub fn form_with_transport(
    surface: &Rc<DocumentSurface>,
    transport: Arc<dyn SubmissionTransport>,
) -> FormWorkflow {
    FormWorkflow::builder(surface.clone(), transport)
        .build()
        .expect("default report form should build")
}

/// Counts calls and fails the first `failures` of them
pub struct CountingTransport {
    calls: AtomicU32,
    failures: Mutex<u32>,
    failure: TransportError,
    delay: Duration,
}

impl CountingTransport {
    pub fn accepting() -> Self {
        Self::failing_first(0)
    }

    pub fn failing_first(failures: u32) -> Self {
        Self {
            calls: AtomicU32::new(0),
            failures: Mutex::new(failures),
            failure: TransportError::Unavailable {
                message: "maintenance window".to_string(),
            },
            delay: Duration::from_millis(100),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionTransport for CountingTransport {
    async fn submit(&self, _payload: &FormSnapshot) -> Result<SubmissionReceipt, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;

        let mut failures = self.failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(self.failure.clone());
        }
        Ok(SubmissionReceipt {
            submission_id: format!("report-{}", self.calls()),
            accepted_at: chrono::Utc::now(),
        })
    }
}
