//! Application configuration
//!
//! Process-level values come from the environment (optionally via `.env`);
//! everything else lives in the TOML settings file named by `ROUTINE_CONFIG`.

pub mod prompts;
pub mod settings;

use std::env;
use std::path::PathBuf;

pub use prompts::{builtin as prompts_builtin, load_primer, PromptError, PromptTemplate};
pub use settings::Settings;

use crate::catalog::CatalogSource;
use crate::views::Direction;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Locale reported by the environment (`LANG`)
    pub lang: Option<String>,
    pub settings: Settings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = match env::var("ROUTINE_CONFIG") {
            Ok(path) => Settings::from_file(&PathBuf::from(path))?,
            Err(_) => Settings::default(),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            data_dir: env::var("ROUTINE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            lang: env::var("LANG").ok(),
            settings,
        })
    }

    /// Catalog source: configured URL, configured path, or `products.json` in the data dir
    pub fn catalog_source(&self) -> CatalogSource {
        match (&self.settings.catalog.url, &self.settings.catalog.path) {
            (Some(url), _) => CatalogSource::http(url.clone()),
            (None, Some(path)) => CatalogSource::file(path.clone()),
            (None, None) => CatalogSource::file(self.data_dir.join("products.json")),
        }
    }

    pub fn storage_path(&self) -> PathBuf {
        self.settings
            .storage
            .path
            .clone()
            .unwrap_or_else(|| self.data_dir.join("storage.json"))
    }

    /// Text direction, decided once from the configured locale or `LANG`
    pub fn direction(&self) -> Direction {
        let locale = self
            .settings
            .ui
            .locale
            .as_deref()
            .or(self.lang.as_deref())
            .unwrap_or_default();
        Direction::from_locale(locale)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}
