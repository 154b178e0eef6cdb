use anyhow::Result;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::form::types::DEFAULT_REQUIRED_FIELDS;
use crate::transport::RetryConfig;

/// Main configuration structure for the bounty page
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BountyPageConfig {
    /// Report form settings
    pub form: FormConfig,
    /// Submission transport settings
    pub transport: TransportConfig,
    /// Theme preference storage
    pub theme: ThemeConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormConfig {
    /// Identifier used in logs and spans
    pub form_id: String,
    /// Fields that must be non-blank before a report is sent
    pub required_fields: Vec<String>,
    /// Resting label of the submit button
    pub submit_label: String,
    /// Label while a submission is in flight
    pub busy_label: String,
    /// How long the success overlay stays up
    pub success_overlay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Latency of the simulated report endpoint
    pub simulated_delay_ms: u64,
    /// Backoff for transient failures
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// File the preference is stored in
    pub storage_path: String,
    /// Key the preference is stored under
    pub key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_id: "report-form".to_string(),
            required_fields: DEFAULT_REQUIRED_FIELDS.iter().map(|s| s.to_string()).collect(),
            submit_label: "Submit Report".to_string(),
            busy_label: "Submitting...".to_string(),
            success_overlay_ms: 5000,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: 2000,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_path: ".bounty-page/preferences.toml".to_string(),
            key: "theme".to_string(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: true,
        }
    }
}

impl Default for BountyPageConfig {
    fn default() -> Self {
        Self {
            form: FormConfig::default(),
            transport: TransportConfig::default(),
            theme: ThemeConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl BountyPageConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (bounty-page.toml, .bounty-page-rc)
    /// 3. Environment variables (prefixed with BOUNTY_PAGE_, nesting on `__`,
    ///    e.g. BOUNTY_PAGE_FORM__SUCCESS_OVERLAY_MS)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Same as [`load`](Self::load), resolving the config files under `dir`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        let toml_path = dir.join("bounty-page.toml");
        if toml_path.exists() {
            builder = builder.add_source(File::from(toml_path));
        }

        let rc_path = dir.join(".bounty-page-rc");
        if rc_path.exists() {
            builder = builder.add_source(File::new(&rc_path.to_string_lossy(), FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("BOUNTY_PAGE")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("form.required_fields")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let bounty_page_config: BountyPageConfig = config.try_deserialize()?;
        Ok(bounty_page_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<BountyPageConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        let _ = BountyPageConfig::load_env_file();
        BountyPageConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static BountyPageConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_reference_page() {
        let config = BountyPageConfig::default();

        assert_eq!(config.form.required_fields, DEFAULT_REQUIRED_FIELDS);
        assert_eq!(config.form.success_overlay_ms, 5000);
        assert_eq!(config.transport.simulated_delay_ms, 2000);
        assert_eq!(config.theme.key, "theme");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("bounty-page.toml"),
            r#"
[form]
required_fields = ["program", "title"]
success_overlay_ms = 3000

[transport.retry]
max_attempts = 5
"#,
        )
        .unwrap();

        let config = BountyPageConfig::load_from(dir.path()).unwrap();

        assert_eq!(config.form.required_fields, vec!["program", "title"]);
        assert_eq!(config.form.success_overlay_ms, 3000);
        assert_eq!(config.form.submit_label, "Submit Report");
        assert_eq!(config.transport.retry.max_attempts, 5);
        assert_eq!(config.transport.retry.base_delay_ms, 500);
    }

    #[test]
    fn test_env_vars_nest_on_double_underscore() {
        let dir = TempDir::new().unwrap();
        std::env::set_var("BOUNTY_PAGE_FORM__BUSY_LABEL", "Sending report");
        std::env::set_var("BOUNTY_PAGE_TRANSPORT__RETRY__MAX_DELAY_MS", "45000");

        let config = BountyPageConfig::load_from(dir.path());

        std::env::remove_var("BOUNTY_PAGE_FORM__BUSY_LABEL");
        std::env::remove_var("BOUNTY_PAGE_TRANSPORT__RETRY__MAX_DELAY_MS");
        let config = config.unwrap();
        assert_eq!(config.form.busy_label, "Sending report");
        assert_eq!(config.transport.retry.max_delay_ms, 45_000);
        assert_eq!(config.form.submit_label, "Submit Report");
    }

    #[test]
    fn test_save_round_trips_through_loader() {
        let dir = TempDir::new().unwrap();
        let mut config = BountyPageConfig::default();
        config.theme.storage_path = "prefs.toml".to_string();
        config.save_to_file(dir.path().join("bounty-page.toml")).unwrap();

        let loaded = BountyPageConfig::load_from(dir.path()).unwrap();

        assert_eq!(loaded.theme.storage_path, "prefs.toml");
    }
}
