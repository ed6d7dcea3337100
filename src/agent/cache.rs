//! Agent Cache
//!
//! Holds the single agent built from the cached catalog. The agent is
//! constructed on first access and reused for every later question.

use crate::agent::{AgentBuilder, AgentContext, SqlAgent};
use crate::catalog::CatalogCache;
use crate::error::{FaersSqlError, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Process-lifetime agent singleton
pub struct AgentCache {
    catalogs: Arc<CatalogCache>,
    builder: Arc<dyn AgentBuilder>,
    context: AgentContext,
    agent: OnceCell<Arc<dyn SqlAgent>>,
}

impl AgentCache {
    pub fn new(
        catalogs: Arc<CatalogCache>,
        builder: Arc<dyn AgentBuilder>,
        context: AgentContext,
    ) -> Self {
        Self {
            catalogs,
            builder,
            context,
            agent: OnceCell::new(),
        }
    }

    /// Get the agent, building it on first access.
    ///
    /// A catalog failure propagates before the builder is called.
    pub async fn get(&self) -> Result<Arc<dyn SqlAgent>> {
        self.agent
            .get_or_try_init(|| async {
                let catalog = self.catalogs.get().await?;
                let agent = self.builder.build(catalog, &self.context).await?;
                tracing::info!(agent = agent.name(), "agent built");
                Ok::<_, FaersSqlError>(agent)
            })
            .await
            .map(Arc::clone)
    }

    /// Whether the agent has been built
    pub fn is_built(&self) -> bool {
        self.agent.initialized()
    }

    /// The catalog cache this agent is built from
    pub fn catalogs(&self) -> &Arc<CatalogCache> {
        &self.catalogs
    }
}
