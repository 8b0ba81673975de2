//! Application settings loaded from a TOML file
//!
//! Every section is optional and falls back to defaults that work against
//! the bundled sample data.
//!
//! ```toml
//! [catalog]
//! path = "data/products.json"   # or: url = "https://example.com/products.json"
//!
//! [relay]
//! url = "https://relay.example.workers.dev/"
//!
//! [storage]
//! path = "data/storage.json"
//! key = "selectedProductIds"
//!
//! [ui]
//! locale = "ar"
//! categories = ["cleanser", "moisturizer"]
//!
//! [assistant]
//! persona_file = "configs/prompts/advisor.toml"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ConfigError;
use crate::selection::SELECTION_KEY;

/// Root settings document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub relay: RelaySettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub ui: UiSettings,

    #[serde(default)]
    pub assistant: AssistantSettings,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load settings from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.url.is_some() && self.catalog.path.is_some() {
            return Err(ConfigError::Validation(
                "catalog.url and catalog.path are mutually exclusive".to_string(),
            ));
        }
        if self.relay.url.trim().is_empty() {
            return Err(ConfigError::Validation("relay.url must not be empty".to_string()));
        }
        if self.storage.key.is_empty() {
            return Err(ConfigError::Validation("storage.key must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Catalog document location: a URL or a file path, not both
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Chat relay endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaySettings {
    #[serde(default = "default_relay_url")]
    pub url: String,
}

fn default_relay_url() -> String {
    "http://localhost:8787/".to_string()
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            url: default_relay_url(),
        }
    }
}

/// Durable storage for the selection mirror
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Storage file; defaults to `storage.json` in the data directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Key holding the selected id list
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    SELECTION_KEY.to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: None,
            key: default_storage_key(),
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSettings {
    /// Locale used to pick text direction; falls back to `LANG`
    #[serde(default)]
    pub locale: Option<String>,

    /// Categories offered by the category selector
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
}

fn default_categories() -> Vec<String> {
    [
        "cleanser",
        "moisturizer",
        "haircare",
        "makeup",
        "hair color",
        "hair styling",
        "men's grooming",
        "suncare",
        "fragrance",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            locale: None,
            categories: default_categories(),
        }
    }
}

/// Assistant primer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Persona TOML file overriding the built-in primer
    #[serde(default)]
    pub persona_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SETTINGS: &str = r#"
[catalog]
url = "https://cdn.example.com/products.json"

[relay]
url = "https://relay.example.workers.dev/"

[storage]
path = "/tmp/routine/storage.json"
key = "picks"

[ui]
locale = "he-IL"
categories = ["Hair", "Skin"]

[assistant]
persona_file = "configs/prompts/advisor.toml"
"#;

    #[test]
    fn test_parse_settings() {
        let settings = Settings::parse(SAMPLE_SETTINGS).unwrap();

        assert_eq!(
            settings.catalog.url.as_deref(),
            Some("https://cdn.example.com/products.json")
        );
        assert!(settings.catalog.path.is_none());
        assert_eq!(settings.relay.url, "https://relay.example.workers.dev/");
        assert_eq!(settings.storage.key, "picks");
        assert_eq!(settings.ui.locale.as_deref(), Some("he-IL"));
        assert_eq!(settings.ui.categories, vec!["Hair", "Skin"]);
        assert!(settings.assistant.persona_file.is_some());
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = Settings::parse("").unwrap();

        assert!(settings.catalog.url.is_none());
        assert_eq!(settings.relay.url, "http://localhost:8787/");
        assert_eq!(settings.storage.key, "selectedProductIds");
        assert_eq!(settings.ui.categories.len(), 9);
        assert!(settings.ui.categories.contains(&"men's grooming".to_string()));

        let defaults = Settings::default();
        assert_eq!(defaults.storage.key, settings.storage.key);
        assert_eq!(defaults.ui.categories, settings.ui.categories);
    }

    #[test]
    fn test_conflicting_catalog_sources() {
        let content = r#"
[catalog]
url = "https://cdn.example.com/products.json"
path = "data/products.json"
"#;
        assert!(matches!(Settings::parse(content), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(Settings::parse("[relay"), Err(ConfigError::Toml(_))));
    }
}
