// Page bootstrap
//
// Wires configuration, logging, the document surface, the report form and
// the theme preference together the way the page does on load.

use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{config, BountyPageConfig, TransportConfig};
use crate::form::types::SubmitControl;
use crate::form::FormWorkflow;
use crate::page::{Navigation, RevealTracker, ScrollEffects, Section};
use crate::surface::DocumentSurface;
use crate::telemetry::init_telemetry;
use crate::theme::{FilePreferenceStore, PreferenceStore, ThemeController};
use crate::transport::{RetryingTransport, SimulatedTransport};

/// The simulated report endpoint, with retries as configured
pub fn transport_from_config(config: &TransportConfig) -> RetryingTransport<SimulatedTransport> {
    RetryingTransport::new(
        SimulatedTransport::new(Duration::from_millis(config.simulated_delay_ms)),
        config.retry.clone(),
    )
}

pub struct BountyPage<S: PreferenceStore = FilePreferenceStore> {
    pub surface: Rc<DocumentSurface>,
    pub form: FormWorkflow,
    pub theme: ThemeController<S>,
    pub navigation: Navigation,
    pub scroll: ScrollEffects,
    pub reveal: RevealTracker,
}

impl BountyPage<FilePreferenceStore> {
    /// Load `.env` and the layered config, install logging, then build the page.
    pub fn bootstrap(sections: Vec<Section>, links: Vec<String>) -> Result<Self> {
        BountyPageConfig::load_env_file()?;
        let config = config()?;
        init_telemetry(&config.observability)?;

        let store = FilePreferenceStore::new(PathBuf::from(&config.theme.storage_path));
        Self::with_store(config, store, sections, links)
    }
}

impl<S: PreferenceStore> BountyPage<S> {
    pub fn with_store(
        config: &BountyPageConfig,
        store: S,
        sections: Vec<Section>,
        links: Vec<String>,
    ) -> Result<Self> {
        let control = SubmitControl {
            label: config.form.submit_label.clone(),
            busy_label: config.form.busy_label.clone(),
        };
        let surface = Rc::new(DocumentSurface::new(&control));
        let transport = Arc::new(transport_from_config(&config.transport));

        let form = FormWorkflow::from_config(&config.form, surface.clone(), transport)
            .context("Report form configuration is invalid")?;
        let theme = ThemeController::load(store, config.theme.key.clone());

        info!(
            form_id = %form.form_id(),
            theme = %theme.current(),
            sections = sections.len(),
            "Bounty page ready"
        );

        Ok(Self {
            surface,
            form,
            theme,
            navigation: Navigation::new(sections, links),
            scroll: ScrollEffects::new(),
            reveal: RevealTracker::new(),
        })
    }
}
