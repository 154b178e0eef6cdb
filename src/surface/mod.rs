// Headless document surface
//
// [`DocumentSurface`] keeps the visible state of the page (field
// annotations, the submit button, overlays and the failure banner) in
// memory. It implements [`PresentationSurface`] for the form workflow and is
// what a host renders from.

pub mod overlay;

use std::cell::RefCell;
use std::time::Duration;

use indexmap::IndexMap;
use tokio::time::Instant;
use tracing::debug;

use crate::form::traits::PresentationSurface;
use crate::form::types::SubmitControl;
use crate::transport::TransportErrorKind;

pub use overlay::{ClickTarget, Overlay, OverlayId, OverlayKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub label: String,
    pub enabled: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: TransportErrorKind,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DocumentState {
    pub field_errors: IndexMap<String, String>,
    pub submit_button: ButtonState,
    pub overlays: Vec<Overlay>,
    pub banner: Option<Banner>,
    next_overlay_id: OverlayId,
}

#[derive(Debug)]
pub struct DocumentSurface {
    state: RefCell<DocumentState>,
}

impl DocumentSurface {
    pub fn new(control: &SubmitControl) -> Self {
        Self {
            state: RefCell::new(DocumentState {
                field_errors: IndexMap::new(),
                submit_button: ButtonState {
                    label: control.label.clone(),
                    enabled: true,
                    busy: false,
                },
                overlays: Vec::new(),
                banner: None,
                next_overlay_id: 1,
            }),
        }
    }

    /// Copy of everything currently visible
    pub fn snapshot(&self) -> DocumentState {
        self.state.borrow().clone()
    }

    pub fn field_error(&self, field_name: &str) -> Option<String> {
        self.state.borrow().field_errors.get(field_name).cloned()
    }

    pub fn submit_button(&self) -> ButtonState {
        self.state.borrow().submit_button.clone()
    }

    pub fn overlays(&self) -> Vec<Overlay> {
        self.state.borrow().overlays.clone()
    }

    pub fn banner(&self) -> Option<Banner> {
        self.state.borrow().banner.clone()
    }

    pub fn dismiss_banner(&self) {
        self.state.borrow_mut().banner = None;
    }

    /// Open the details modal for a program card.
    pub fn show_program_details(&self, program: &str) -> OverlayId {
        let mut state = self.state.borrow_mut();
        let id = state.next_overlay_id;
        state.next_overlay_id += 1;
        state.overlays.push(Overlay::program_details(id, program));
        debug!(overlay = id, program, "Program details opened");
        id
    }

    /// Returns true if the click closed the overlay.
    pub fn click_overlay(&self, id: OverlayId, target: ClickTarget) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(index) = state.overlays.iter().position(|overlay| overlay.id == id) else {
            return false;
        };
        if !state.overlays[index].dismisses_on(target) {
            return false;
        }
        state.overlays.remove(index);
        debug!(overlay = id, ?target, "Overlay dismissed by click");
        true
    }

    /// Earliest pending auto-dismiss deadline, for the host's timer
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state
            .borrow()
            .overlays
            .iter()
            .filter_map(|overlay| overlay.expires_at)
            .min()
    }

    /// Drop every overlay whose deadline has passed. Returns how many closed.
    pub fn expire_overlays(&self) -> usize {
        self.expire_overlays_at(Instant::now())
    }

    pub fn expire_overlays_at(&self, now: Instant) -> usize {
        let mut state = self.state.borrow_mut();
        let before = state.overlays.len();
        state.overlays.retain(|overlay| !overlay.is_expired(now));
        let expired = before - state.overlays.len();
        if expired > 0 {
            debug!(expired, "Overlays auto-dismissed");
        }
        expired
    }
}

impl PresentationSurface for DocumentSurface {
    fn show_field_error(&self, field_name: &str, message: &str) {
        self.state
            .borrow_mut()
            .field_errors
            .insert(field_name.to_string(), message.to_string());
    }

    fn clear_field_error(&self, field_name: &str) {
        self.state.borrow_mut().field_errors.shift_remove(field_name);
    }

    fn show_busy(&self, control: &SubmitControl) {
        let mut state = self.state.borrow_mut();
        state.submit_button = ButtonState {
            label: control.busy_label.clone(),
            enabled: false,
            busy: true,
        };
        // A fresh attempt supersedes the last failure
        state.banner = None;
    }

    fn show_idle(&self, control: &SubmitControl) {
        self.state.borrow_mut().submit_button = ButtonState {
            label: control.label.clone(),
            enabled: true,
            busy: false,
        };
    }

    fn show_success_overlay(&self, auto_dismiss_ms: u64) {
        let mut state = self.state.borrow_mut();
        let id = state.next_overlay_id;
        state.next_overlay_id += 1;
        state.overlays.push(Overlay::submission_success(
            id,
            Instant::now(),
            Duration::from_millis(auto_dismiss_ms),
        ));
        debug!(overlay = id, auto_dismiss_ms, "Success overlay shown");
    }

    fn show_submission_error(&self, kind: TransportErrorKind, message: &str) {
        self.state.borrow_mut().banner = Some(Banner {
            kind,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> DocumentSurface {
        DocumentSurface::new(&SubmitControl::default())
    }

    #[test]
    fn test_one_annotation_per_field() {
        let surface = surface();

        surface.show_field_error("title", "This field is required");
        surface.show_field_error("title", "Please enter a valid value");

        let state = surface.snapshot();
        assert_eq!(state.field_errors.len(), 1);
        assert_eq!(
            surface.field_error("title").as_deref(),
            Some("Please enter a valid value")
        );

        surface.clear_field_error("title");
        surface.clear_field_error("title");
        assert_eq!(surface.field_error("title"), None);
    }

    #[test]
    fn test_busy_and_idle_swap_button_state() {
        let surface = surface();
        let control = SubmitControl::default();
        let baseline = surface.submit_button();

        surface.show_busy(&control);
        assert_eq!(
            surface.submit_button(),
            ButtonState {
                label: "Submitting...".to_string(),
                enabled: false,
                busy: true,
            }
        );

        surface.show_idle(&control);
        assert_eq!(surface.submit_button(), baseline);
    }

    #[test]
    fn test_busy_clears_stale_banner() {
        let surface = surface();
        surface.show_submission_error(TransportErrorKind::Network, "Network error: reset");
        assert!(surface.banner().is_some());

        surface.show_busy(&SubmitControl::default());
        assert_eq!(surface.banner(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_overlay_auto_dismisses() {
        let surface = surface();
        surface.show_success_overlay(5000);
        assert_eq!(surface.overlays().len(), 1);

        tokio::time::advance(Duration::from_millis(4999)).await;
        assert_eq!(surface.expire_overlays(), 0);

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(surface.expire_overlays(), 1);
        assert!(surface.overlays().is_empty());
        assert_eq!(surface.next_deadline(), None);
    }

    #[test]
    fn test_success_overlay_click_dismisses() {
        let surface = surface();
        surface.show_success_overlay(5000);
        let id = surface.overlays()[0].id;

        assert!(surface.click_overlay(id, ClickTarget::Content));
        assert!(surface.overlays().is_empty());
        assert!(!surface.click_overlay(id, ClickTarget::Content));
    }

    #[test]
    fn test_program_modal_lifecycle() {
        let surface = surface();
        let id = surface.show_program_details("Acme Corp");

        assert!(!surface.click_overlay(id, ClickTarget::Content));
        assert_eq!(surface.overlays().len(), 1);
        assert_eq!(surface.expire_overlays(), 0);

        assert!(surface.click_overlay(id, ClickTarget::Backdrop));
        assert!(surface.overlays().is_empty());
    }
}
