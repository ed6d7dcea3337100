//! Error types for faers-sql
//!
//! This module defines the error types used throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for faers-sql
pub type Result<T> = std::result::Result<T, FaersSqlError>;

/// Main error type for faers-sql
#[derive(Error, Debug)]
pub enum FaersSqlError {
    /// HTTP-related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Secrets file could not be parsed
    #[error("Secrets file error: {0}")]
    SecretsParse(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Inline `schema_catalog` secret is not valid JSON
    #[error("Could not parse schema_catalog in secrets: {source}")]
    CatalogParse {
        #[source]
        source: serde_json::Error,
    },

    /// Catalog file is missing, unreadable or not valid JSON
    #[error("Failed to read schema catalog at {}: {reason}", .path.display())]
    CatalogRead { path: PathBuf, reason: String },

    /// Submitted question was empty or whitespace
    #[error("Please enter a question.")]
    EmptyQuestion,

    /// LLM API returned an error
    #[error("{provider} API error (status {status}): {message}")]
    LLMApiError {
        provider: String,
        message: String,
        status: u16,
    },

    /// LLM provider has no API key configured
    #[error("No API key configured for {0}. Set api_key in secrets.toml or OPENAI_API_KEY.")]
    LLMApiKeyMissing(String),

    /// Agent failed while producing a result
    #[error("Agent error: {0}")]
    Agent(String),

    /// Command was recognised but its arguments were wrong
    #[error("Invalid syntax for {command}. Expected: {expected}")]
    InvalidCommandSyntax { command: String, expected: String },

    /// Command is not recognised
    #[error("Unknown command: {0}. Type /help for available commands.")]
    UnknownCommand(String),
}

impl FaersSqlError {
    /// Whether this error means the catalog could not be produced
    pub fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            FaersSqlError::CatalogParse { .. } | FaersSqlError::CatalogRead { .. }
        )
    }
}
