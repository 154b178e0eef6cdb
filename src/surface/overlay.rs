use std::time::Duration;

use tokio::time::Instant;

pub type OverlayId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayKind {
    /// Toast confirming a filed report
    SubmissionSuccess,
    /// Modal opened from a program card
    ProgramDetails { program: String },
}

/// Where on an overlay a click landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Content,
    Backdrop,
    CloseButton,
}

/// A transient element layered above the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub id: OverlayId,
    pub kind: OverlayKind,
    pub heading: String,
    pub body: Vec<String>,
    pub actions: Vec<String>,
    pub expires_at: Option<Instant>,
}

impl Overlay {
    pub fn submission_success(id: OverlayId, now: Instant, auto_dismiss: Duration) -> Self {
        Self {
            id,
            kind: OverlayKind::SubmissionSuccess,
            heading: "Report Submitted Successfully!".to_string(),
            body: vec![
                "Thank you for your submission. Our security team will review your report and get back to you soon."
                    .to_string(),
            ],
            actions: Vec::new(),
            expires_at: Some(now + auto_dismiss),
        }
    }

    pub fn program_details(id: OverlayId, program: &str) -> Self {
        Self {
            id,
            kind: OverlayKind::ProgramDetails {
                program: program.to_string(),
            },
            heading: program.to_string(),
            body: vec![
                format!("Detailed information about {program} would be displayed here."),
                "This would include scope, rules, reward details, and submission guidelines."
                    .to_string(),
            ],
            actions: vec!["Join Program".to_string(), "View Details".to_string()],
            expires_at: None,
        }
    }

    /// The toast goes away on any click. The modal only closes from its close
    /// button or the backdrop; clicks inside the content keep it open.
    pub fn dismisses_on(&self, target: ClickTarget) -> bool {
        match self.kind {
            OverlayKind::SubmissionSuccess => true,
            OverlayKind::ProgramDetails { .. } => {
                matches!(target, ClickTarget::Backdrop | ClickTarget::CloseButton)
            }
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}
