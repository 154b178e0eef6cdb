// Theme preference
//
// The only state the page persists: `"dark"` or `"light"` under one key.
// It is read once when the controller loads and written on every toggle.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than `"dark"` reads as light.
    pub fn from_stored(value: &str) -> Self {
        if value == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Preference storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Preference file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Key/value storage for user preferences
#[cfg_attr(test, automock)]
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Preferences kept as a flat TOML table in one file
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<toml::Table, PreferenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.parse::<toml::Table>()?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(toml::Table::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let table = self.read_table()?;
        Ok(table
            .get(key)
            .and_then(|value| value.as_str())
            .map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut table = self.read_table()?;
        table.insert(key.to_string(), toml::Value::String(value.to_string()));
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(&table)?)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Current theme, backed by a preference store.
///
/// Storage failures are logged and never surface to the page: a failed read
/// falls back to light, a failed write still switches the theme in memory.
pub struct ThemeController<S: PreferenceStore> {
    store: S,
    key: String,
    current: Theme,
}

impl<S: PreferenceStore> ThemeController<S> {
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let current = match store.get(&key) {
            Ok(Some(value)) => Theme::from_stored(&value),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(key = %key, error = %e, "Could not read theme preference, using light");
                Theme::default()
            }
        };
        info!(theme = %current, "Theme loaded");
        Self {
            store,
            key,
            current,
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn is_dark(&self) -> bool {
        self.current == Theme::Dark
    }

    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.toggled();
        if let Err(e) = self.store.set(&self.key, self.current.as_str()) {
            warn!(key = %self.key, error = %e, "Could not save theme preference");
        }
        self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_only_dark_reads_as_dark() {
        assert_eq!(Theme::from_stored("dark"), Theme::Dark);
        assert_eq!(Theme::from_stored("light"), Theme::Light);
        assert_eq!(Theme::from_stored("DARK"), Theme::Light);
        assert_eq!(Theme::from_stored(""), Theme::Light);
    }

    #[test]
    fn test_load_reads_once_and_toggle_writes_each_time() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_get()
            .withf(|key| key == "theme")
            .times(1)
            .returning(|_| Ok(Some("dark".to_string())));
        store
            .expect_set()
            .withf(|key, value| key == "theme" && value == "light")
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_set()
            .withf(|key, value| key == "theme" && value == "dark")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut controller = ThemeController::load(store, "theme");
        assert!(controller.is_dark());

        assert_eq!(controller.toggle(), Theme::Light);
        assert_eq!(controller.toggle(), Theme::Dark);
    }

    #[test]
    fn test_read_failure_falls_back_to_light() {
        let mut store = MockPreferenceStore::new();
        store.expect_get().returning(|_| {
            Err(PreferenceError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        });

        let controller = ThemeController::load(store, "theme");

        assert_eq!(controller.current(), Theme::Light);
    }

    #[test]
    fn test_write_failure_still_switches_theme() {
        let mut store = MockPreferenceStore::new();
        store.expect_get().returning(|_| Ok(None));
        store.expect_set().returning(|_, _| {
            Err(PreferenceError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        });

        let mut controller = ThemeController::load(store, "theme");

        assert_eq!(controller.toggle(), Theme::Dark);
        assert!(controller.is_dark());
    }

    #[test]
    fn test_file_store_persists_across_controllers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs").join("preferences.toml");

        let mut controller = ThemeController::load(FilePreferenceStore::new(&path), "theme");
        assert_eq!(controller.current(), Theme::Light);
        controller.toggle();

        let reloaded = ThemeController::load(FilePreferenceStore::new(&path), "theme");
        assert_eq!(reloaded.current(), Theme::Dark);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap().trim(),
            r#"theme = "dark""#
        );
    }

    #[test]
    fn test_file_store_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "locale = \"en\"\n").unwrap();
        let store = FilePreferenceStore::new(&path);

        store.set("theme", "dark").unwrap();

        assert_eq!(store.get("locale").unwrap().as_deref(), Some("en"));
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.get("theme").unwrap(), None);

        store.set("theme", "dark").unwrap();

        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    }
}
