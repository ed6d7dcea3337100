//! Catalog Cache
//!
//! Holds the schema catalog for the lifetime of the process. The first
//! access loads it; every later access returns the same value without
//! reading configuration again.

use crate::catalog::{load_catalog, SchemaCatalog};
use crate::config::CatalogSource;
use crate::error::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Process-lifetime catalog singleton
pub struct CatalogCache {
    source: CatalogSource,
    catalog: OnceCell<Arc<SchemaCatalog>>,
    loads: AtomicUsize,
}

impl CatalogCache {
    /// Create an empty cache for the given source
    pub fn new(source: CatalogSource) -> Self {
        Self {
            source,
            catalog: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Get the catalog, loading it on first access.
    ///
    /// Concurrent first accesses wait on a single load. A failed load is
    /// not stored, so the next access tries again.
    pub async fn get(&self) -> Result<Arc<SchemaCatalog>> {
        self.catalog
            .get_or_try_init(|| async {
                self.loads.fetch_add(1, Ordering::SeqCst);
                load_catalog(&self.source).await.map(Arc::new)
            })
            .await
            .map(Arc::clone)
    }

    /// Whether the catalog has been loaded
    pub fn is_loaded(&self) -> bool {
        self.catalog.initialized()
    }

    /// Number of load attempts made so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}
