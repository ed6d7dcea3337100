//! Secrets Storage
//!
//! This module reads the secrets file that carries the API key and the
//! schema catalog location, and fills unset values from the environment.

use crate::error::{FaersSqlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Secrets file name
pub const SECRETS_FILE: &str = "secrets.toml";

/// Environment variable consulted when no API key is in the secrets file
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable overriding the model when unset in secrets
pub const MODEL_ENV: &str = "FAERS_SQL_MODEL";

/// Environment variable overriding the endpoint when unset in secrets
pub const BASE_URL_ENV: &str = "FAERS_SQL_BASE_URL";

/// Raw secrets as written in `secrets.toml`
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Secrets {
    /// API key for the LLM endpoint
    #[serde(default, alias = "openai_api_key")]
    pub api_key: Option<String>,
    /// Inline schema catalog (JSON text)
    #[serde(default)]
    pub schema_catalog: Option<String>,
    /// Path to a schema catalog JSON file
    #[serde(default)]
    pub schema_catalog_path: Option<PathBuf>,
    /// Chat model identifier
    #[serde(default)]
    pub model: Option<String>,
    /// Chat completions endpoint
    #[serde(default)]
    pub base_url: Option<String>,
    /// Generation attempts per question
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// HTTP timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("api_key", &self.api_key.as_deref().map(mask_key))
            .field(
                "schema_catalog",
                &self.schema_catalog.as_ref().map(|s| format!("<{} bytes>", s.len())),
            )
            .field("schema_catalog_path", &self.schema_catalog_path)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_attempts", &self.max_attempts)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Secrets {
    /// Parse secrets from TOML text.
    ///
    /// `openai_api_key` is accepted in place of `api_key`; setting both is
    /// an error.
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: toml::Table = content.parse()?;
        if table.contains_key("api_key") && table.contains_key("openai_api_key") {
            return Err(FaersSqlError::Config(
                "secrets file sets both api_key and openai_api_key; keep only one".to_string(),
            ));
        }
        Ok(toml::from_str(content)?)
    }

    /// Per-user configuration directory (`<config_dir>/faers-sql`)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("faers-sql"))
    }

    /// Find the secrets file to read.
    ///
    /// An explicit path always wins, even if it does not exist, so that a
    /// typo on the command line is reported instead of silently ignored.
    pub fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        let local = PathBuf::from(SECRETS_FILE);
        if local.exists() {
            return Some(local);
        }

        Self::config_dir()
            .map(|dir| dir.join(SECRETS_FILE))
            .filter(|path| path.exists())
    }

    /// Read a secrets file from disk
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            FaersSqlError::Config(format!(
                "Failed to read secrets file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Load secrets, returning empty secrets when no file is found
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match Self::locate(explicit) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading secrets");
                Self::load_from(&path)
            }
            None => {
                tracing::debug!("no secrets file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Fill unset values from the process environment
    pub fn with_env_defaults(self) -> Self {
        self.with_defaults_from(|name| std::env::var(name).ok())
    }

    /// Fill unset values using `lookup` for environment variables.
    ///
    /// Values already present in the secrets file are never replaced.
    pub fn with_defaults_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if self.api_key.is_none() {
            self.api_key = non_empty(API_KEY_ENV);
        }
        if self.model.is_none() {
            self.model = non_empty(MODEL_ENV);
        }
        if self.base_url.is_none() {
            self.base_url = non_empty(BASE_URL_ENV);
        }
        self
    }
}

/// Mask an API key for display, keeping the first and last four characters
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    }
}
