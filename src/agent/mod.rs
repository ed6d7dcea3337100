//! SQL agent boundary
//!
//! The presentation layer never looks inside the agent. It builds one from
//! the catalog, hands it a fresh [`SessionState`] per question and reads
//! back `sql` and `error`.

pub mod cache;
pub mod outcome;
pub mod sql_agent;

use crate::catalog::SchemaCatalog;
use crate::config::{mask_key, Settings};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use cache::AgentCache;
pub use outcome::Outcome;
pub use sql_agent::{LlmAgentBuilder, LlmSqlAgent};

/// Per-question record passed by value into the agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// The question as typed
    pub question: String,
    /// Generated SQL, if any
    pub sql: Option<String>,
    /// Problem reported by the agent, if any
    pub error: Option<String>,
    /// Generation attempts made by the agent
    pub attempts: u32,
    /// Agent's own note about the run
    pub summary: Option<String>,
}

impl SessionState {
    /// Fresh state for a new question
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Default::default()
        }
    }
}

/// Explicit construction context for agents.
///
/// Credentials travel here instead of through process environment.
#[derive(Clone)]
pub struct AgentContext {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
    pub max_attempts: u32,
    pub timeout_secs: u64,
}

impl AgentContext {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.clone(),
            max_attempts: settings.max_attempts,
            timeout_secs: settings.timeout_secs,
        }
    }
}

impl fmt::Debug for AgentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentContext")
            .field("api_key", &self.api_key.as_deref().map(mask_key))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_attempts", &self.max_attempts)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// An invocable question-to-SQL agent
#[async_trait]
pub trait SqlAgent: Send + Sync {
    /// Run the agent over one session state and return the final state
    async fn invoke(&self, state: SessionState) -> Result<SessionState>;

    /// Name shown in logs
    fn name(&self) -> &str;
}

/// Constructs agents from a catalog
#[async_trait]
pub trait AgentBuilder: Send + Sync {
    async fn build(
        &self,
        catalog: Arc<SchemaCatalog>,
        context: &AgentContext,
    ) -> Result<Arc<dyn SqlAgent>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_state() {
        let state = SessionState::new("How many reports mention nausea?");
        assert_eq!(state.question, "How many reports mention nausea?");
        assert_eq!(state.sql, None);
        assert_eq!(state.error, None);
        assert_eq!(state.attempts, 0);
        assert_eq!(state.summary, None);
    }

    #[test]
    fn test_session_state_serializes_nulls() {
        let json = serde_json::to_value(SessionState::new("q")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "question": "q",
                "sql": null,
                "error": null,
                "attempts": 0,
                "summary": null
            })
        );
    }

    #[test]
    fn test_context_debug_masks_key() {
        let settings = Settings {
            api_key: Some("sk-proj-1234567890abcd".to_string()),
            ..Settings::default()
        };
        let context = AgentContext::from_settings(&settings);
        let debug = format!("{:?}", context);
        assert!(!debug.contains("1234567890"));
        assert_eq!(context.model, settings.model);
    }
}
