//! Query page
//!
//! The request cycle behind the terminal: validate the question, invoke
//! the cached agent, and turn the result into panels. Nothing here
//! touches the terminal, so the cycle can be driven directly from tests.

use crate::agent::{AgentBuilder, AgentCache, AgentContext, Outcome, SessionState};
use crate::catalog::CatalogCache;
use crate::config::Settings;
use crate::error::{FaersSqlError, Result};
use std::sync::Arc;

/// Page title
pub const TITLE: &str = "💊 FAERS NLP → SQL";

/// Line under the title
pub const CAPTION: &str = "Type a FAERS question → get validated SQL. No database execution.";

/// Shown when the agent produced no SQL
pub const NO_SQL_MESSAGE: &str = "No SQL was generated. Check your model/key and catalog.";

/// Shown in place of the catalog preview when it cannot be loaded
pub const CATALOG_UNAVAILABLE: &str = "Catalog not loaded.";

/// One display element of a rendered response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    /// SQL code block
    Sql(String),
    /// Error banner
    Error(String),
}

/// Everything displayed for one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    panels: Vec<Panel>,
    agent_invoked: bool,
}

impl Rendered {
    /// Panels in display order
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// The SQL block, if one is shown
    pub fn sql(&self) -> Option<&str> {
        self.panels.iter().find_map(|panel| match panel {
            Panel::Sql(sql) => Some(sql.as_str()),
            Panel::Error(_) => None,
        })
    }

    /// Error banners, in display order
    pub fn errors(&self) -> Vec<&str> {
        self.panels
            .iter()
            .filter_map(|panel| match panel {
                Panel::Error(message) => Some(message.as_str()),
                Panel::Sql(_) => None,
            })
            .collect()
    }

    /// Whether the agent was called for this submission
    pub fn agent_invoked(&self) -> bool {
        self.agent_invoked
    }

    /// Rejected before reaching the agent
    fn rejected(error: FaersSqlError) -> Self {
        Self {
            panels: vec![Panel::Error(error.to_string())],
            agent_invoked: false,
        }
    }

    /// Panels for a classified agent outcome.
    ///
    /// The SQL-or-empty panel and the validator panel are independent and
    /// may both appear.
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let mut panels = Vec::with_capacity(2);

        match outcome {
            Outcome::Fault { message } => {
                panels.push(Panel::Error(format!("Agent failure: {}", message)));
            }
            Outcome::Generated { sql, .. } => panels.push(Panel::Sql(sql.clone())),
            Outcome::Empty { .. } => panels.push(Panel::Error(NO_SQL_MESSAGE.to_string())),
        }

        if let Some(error) = outcome.validator_error() {
            panels.push(Panel::Error(format!("Validator: {}", error)));
        }

        Self {
            panels,
            agent_invoked: true,
        }
    }
}

/// Sidebar content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sidebar {
    /// Catalog preview text
    Preview(String),
    /// Catalog could not be loaded; carries the diagnostic
    Unavailable(String),
}

/// The query page and its cached collaborators
pub struct QueryPage {
    agents: Arc<AgentCache>,
}

impl QueryPage {
    pub fn new(agents: Arc<AgentCache>) -> Self {
        Self { agents }
    }

    /// Wire caches for the given settings and agent builder
    pub fn from_settings(settings: &Settings, builder: Arc<dyn AgentBuilder>) -> Self {
        let catalogs = Arc::new(CatalogCache::new(settings.catalog_source.clone()));
        let agents = AgentCache::new(catalogs, builder, AgentContext::from_settings(settings));
        Self::new(Arc::new(agents))
    }

    /// The agent cache behind this page
    pub fn agents(&self) -> &Arc<AgentCache> {
        &self.agents
    }

    /// Catalog preview for the sidebar.
    ///
    /// A load failure is shown rather than returned; it surfaces again as
    /// a hard error on the first submission.
    pub async fn sidebar(&self) -> Sidebar {
        let preview = match self.agents.catalogs().get().await {
            Ok(catalog) => catalog.preview(),
            Err(e) => Err(e),
        };

        match preview {
            Ok(text) => Sidebar::Preview(text),
            Err(e) => Sidebar::Unavailable(e.to_string()),
        }
    }

    /// Handle one submission.
    ///
    /// Blank questions are rejected without calling the agent. Failing to
    /// load the catalog or build the agent is returned as an error; a
    /// failing invocation is rendered as a panel.
    pub async fn submit(&self, question: &str) -> Result<Rendered> {
        if question.trim().is_empty() {
            tracing::debug!("rejected blank question");
            return Ok(Rendered::rejected(FaersSqlError::EmptyQuestion));
        }

        let agent = self.agents.get().await?;

        tracing::info!(agent = agent.name(), "invoking agent");
        let result = agent.invoke(SessionState::new(question)).await;
        if let Ok(state) = &result {
            tracing::info!(
                attempts = state.attempts,
                summary = state.summary.as_deref().unwrap_or(""),
                has_sql = state.sql.is_some(),
                "agent finished"
            );
        }

        let outcome = Outcome::from_result(result);
        if let Outcome::Fault { message } = &outcome {
            tracing::error!(%message, "agent invocation failed");
        }

        Ok(Rendered::from_outcome(&outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_without_error() {
        let rendered = Rendered::from_outcome(&Outcome::Generated {
            sql: "SELECT 1".to_string(),
            validator_error: None,
        });
        assert_eq!(rendered.panels(), &[Panel::Sql("SELECT 1".to_string())]);
        assert!(rendered.errors().is_empty());
    }

    #[test]
    fn test_empty_with_validator_error_shows_both() {
        let rendered = Rendered::from_outcome(&Outcome::Empty {
            validator_error: Some("table not found".to_string()),
        });
        assert_eq!(
            rendered.errors(),
            vec![NO_SQL_MESSAGE, "Validator: table not found"]
        );
        assert_eq!(rendered.sql(), None);
    }

    #[test]
    fn test_sql_with_validator_error() {
        let rendered = Rendered::from_outcome(&Outcome::Generated {
            sql: "SELECT 1".to_string(),
            validator_error: Some("guessed column".to_string()),
        });
        assert_eq!(rendered.sql(), Some("SELECT 1"));
        assert_eq!(rendered.errors(), vec!["Validator: guessed column"]);
    }

    #[test]
    fn test_fault_panel() {
        let rendered = Rendered::from_outcome(&Outcome::Fault {
            message: "HTTP error: timed out".to_string(),
        });
        assert_eq!(rendered.errors(), vec!["Agent failure: HTTP error: timed out"]);
        assert!(rendered.agent_invoked());
    }

    #[test]
    fn test_rejected_is_not_invoked() {
        let rendered = Rendered::rejected(FaersSqlError::EmptyQuestion);
        assert!(!rendered.agent_invoked());
        assert_eq!(rendered.errors(), vec!["Please enter a question."]);
    }
}
