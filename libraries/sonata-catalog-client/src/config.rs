//! Client configuration
//!
//! Loaded from an optional `sonata.toml`, then overridden by `SONATA_*`
//! environment variables (`SONATA_BASE_URL`, `SONATA_TIMEOUT_SECS`, ...).

use crate::error::{CatalogClientError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "sonata.toml";

/// Default environment prefix
pub const ENV_PREFIX: &str = "SONATA";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Page the player is served from
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Catalog location, resolved against `base_url`
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Whole-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_catalog_url() -> String {
    "tracks.json".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            catalog_url: default_catalog_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Config for a player page at `base_url` with every other field defaulted
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load `sonata.toml` (if present) and `SONATA_*` overrides
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE), ENV_PREFIX)
    }

    /// Load from a specific file and environment prefix
    ///
    /// A missing file is not an error; every field has a default.
    pub fn load_from(path: &Path, env_prefix: &str) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(CatalogClientError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.resolve_catalog_url().map(|_| ())
    }

    /// Absolute catalog URL
    pub fn resolve_catalog_url(&self) -> Result<Url> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(CatalogClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base = Url::parse(base).map_err(|e| CatalogClientError::InvalidUrl(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(CatalogClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        base.join(&self.catalog_url)
            .map_err(|e| CatalogClientError::InvalidUrl(e.to_string()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
