//! Catalog loading
//!
//! Reads the schema catalog from the inline secret or from a JSON file.
//! There are no retries: a missing or malformed catalog is reported
//! straight back to the caller.

use crate::catalog::SchemaCatalog;
use crate::config::CatalogSource;
use crate::error::{FaersSqlError, Result};

/// Load the schema catalog from its configured source
pub async fn load_catalog(source: &CatalogSource) -> Result<SchemaCatalog> {
    match source {
        CatalogSource::Inline(text) => {
            let catalog = SchemaCatalog::from_json_str(text).map_err(|source| {
                tracing::error!(error = %source, "could not parse inline schema_catalog");
                FaersSqlError::CatalogParse { source }
            })?;
            tracing::info!(entries = catalog.entry_count(), "loaded inline schema catalog");
            Ok(catalog)
        }
        CatalogSource::File(path) => {
            let read_error = |reason: String| {
                tracing::error!(path = %path.display(), %reason, "failed to read schema catalog");
                FaersSqlError::CatalogRead {
                    path: path.clone(),
                    reason,
                }
            };

            let content = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| read_error(e.to_string()))?;
            let catalog =
                SchemaCatalog::from_json_str(&content).map_err(|e| read_error(e.to_string()))?;

            tracing::info!(
                path = %path.display(),
                entries = catalog.entry_count(),
                "loaded schema catalog"
            );
            Ok(catalog)
        }
    }
}
