//! Configuration module
//!
//! This module resolves the secrets file and environment into the
//! settings the rest of the application reads.

pub mod storage;

use crate::error::Result;
use std::fmt;
use std::path::{Path, PathBuf};

pub use storage::{mask_key, Secrets};

/// Catalog file read when the secrets name none
pub const DEFAULT_CATALOG_PATH: &str = "schema_catalog.json";

/// Chat model used when none is configured
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Generation attempts per question when none are configured
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// HTTP timeout when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Where the schema catalog comes from
#[derive(Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// JSON text carried in the secrets themselves
    Inline(String),
    /// JSON file on disk
    File(PathBuf),
}

impl fmt::Debug for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Inline(text) => write!(f, "Inline(<{} bytes>)", text.len()),
            CatalogSource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Resolved application settings
#[derive(Clone)]
pub struct Settings {
    /// API key handed to the agent builder
    pub api_key: Option<String>,
    /// Catalog location
    pub catalog_source: CatalogSource,
    /// Chat model identifier
    pub model: String,
    /// Chat completions endpoint override
    pub base_url: Option<String>,
    /// Generation attempts per question (at least 1)
    pub max_attempts: u32,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Settings {
    /// Resolve settings from parsed secrets.
    ///
    /// An inline catalog takes precedence over a catalog path.
    pub fn from_secrets(secrets: Secrets) -> Self {
        let catalog_source = match secrets.schema_catalog {
            Some(inline) => CatalogSource::Inline(inline),
            None => CatalogSource::File(
                secrets
                    .schema_catalog_path
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
            ),
        };

        Self {
            api_key: secrets.api_key.filter(|k| !k.trim().is_empty()),
            catalog_source,
            model: secrets.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: secrets.base_url,
            max_attempts: secrets.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS).max(1),
            timeout_secs: secrets.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load secrets (file, then environment) and resolve them
    pub fn load(secrets_path: Option<&Path>) -> Result<Self> {
        let secrets = Secrets::load(secrets_path)?.with_env_defaults();
        let settings = Self::from_secrets(secrets);
        tracing::info!(
            catalog = ?settings.catalog_source,
            model = %settings.model,
            api_key = settings.api_key.is_some(),
            "settings resolved"
        );
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_secrets(Secrets::default())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &self.api_key.as_deref().map(mask_key))
            .field("catalog_source", &self.catalog_source)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_attempts", &self.max_attempts)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
