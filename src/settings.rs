//! User preferences
//!
//! Persisted separately from the data collections, under its own key.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage::KeyValueStore;
use crate::views::{FeeFilter, MethodFilter, TREND_WINDOW};

/// Front-end preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How many recent fee records the earnings chart shows
    pub trend_window: usize,
    /// Method filter the fee list opens with (`"all"`, `"Cash"`, `"Online"`)
    pub fee_method: String,
    /// `log` level name (`"error"` .. `"trace"`)
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trend_window: TREND_WINDOW,
            fee_method: "all".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "class_manager_settings";

    /// Initial fee list filter; unknown method names fall back to all
    pub fn fee_filter(&self) -> FeeFilter {
        let method = MethodFilter::parse(&self.fee_method).unwrap_or_default();
        FeeFilter::new(method, "")
    }

    /// Parsed log level, `Info` when unrecognised
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Load settings, falling back to defaults when absent or malformed
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        if let Some(json) = store.get_item(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set_item(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaymentMethod;
    use crate::storage::MemoryStore;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.trend_window, 5);
        assert_eq!(settings.fee_filter(), FeeFilter::default());
        assert_eq!(settings.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        let settings = Settings {
            trend_window: 8,
            fee_method: "Online".to_string(),
            log_level: "debug".to_string(),
        };
        settings.save(&store).unwrap();

        let loaded = Settings::load(&store);
        assert_eq!(loaded, settings);
        assert_eq!(
            loaded.fee_filter().method,
            MethodFilter::Only(PaymentMethod::Online)
        );
        assert_eq!(loaded.level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_partial_and_malformed() {
        let store = MemoryStore::new();
        store
            .set_item(Settings::STORAGE_KEY, r#"{"trend_window":3}"#)
            .unwrap();
        let loaded = Settings::load(&store);
        assert_eq!(loaded.trend_window, 3);
        assert_eq!(loaded.fee_method, "all");

        store.set_item(Settings::STORAGE_KEY, "[1,2]").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_bad_values_fall_back() {
        let settings = Settings {
            fee_method: "cheque".to_string(),
            log_level: "loud".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.fee_filter().method, MethodFilter::All);
        assert_eq!(settings.level_filter(), log::LevelFilter::Info);
    }
}
