//! Schema catalog
//!
//! The catalog describes the FAERS tables and columns available to the
//! agent. Its shape belongs to the agent, so it is held here as an opaque
//! JSON value and never validated.

pub mod cache;
pub mod loader;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use cache::CatalogCache;
pub use loader::load_catalog;

/// Number of characters shown in the catalog preview
pub const PREVIEW_LIMIT: usize = 900;

/// Appended to a preview that was cut short
pub const PREVIEW_MARKER: &str = "...";

/// Opaque schema catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaCatalog(Value);

impl SchemaCatalog {
    /// Wrap an already parsed JSON value
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Parse catalog JSON text
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text).map(Self)
    }

    /// Borrow the underlying JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Number of top-level entries (object keys or array items)
    pub fn entry_count(&self) -> usize {
        match &self.0 {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            Value::Null => 0,
            _ => 1,
        }
    }

    /// Pretty-printed JSON with two-space indentation, keys in file order
    pub fn to_pretty_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    /// Catalog text handed to the model
    pub fn format_for_llm(&self) -> Result<String> {
        self.to_pretty_string()
    }

    /// Sidebar preview of the pretty-printed catalog
    pub fn preview(&self) -> Result<String> {
        Ok(preview_text(&self.to_pretty_string()?, PREVIEW_LIMIT))
    }
}

/// First `limit` characters of `text`, followed by `...` when cut short
pub fn preview_text(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], PREVIEW_MARKER),
        None => text.to_string(),
    }
}
