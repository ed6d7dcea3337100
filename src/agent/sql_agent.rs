//! LLM-backed SQL agent
//!
//! The built-in agent asks a chat model for a single SQL statement that
//! answers the question against the schema catalog. It does not execute
//! or check the SQL.

use crate::agent::{AgentBuilder, AgentContext, SessionState, SqlAgent};
use crate::catalog::SchemaCatalog;
use crate::error::{FaersSqlError, Result};
use crate::llm::{GenerationParams, LLMProvider, Message, OpenAIProvider};
use async_trait::async_trait;
use std::sync::Arc;

/// Error recorded when every attempt came back empty
pub const EMPTY_GENERATION: &str = "model returned an empty response";

const SYSTEM_PROMPT: &str = "You are an expert on the FDA Adverse Event Reporting System (FAERS). \
Convert the user's question into a single SQL query over the schema catalog below.

Rules:
1. Return ONLY the SQL query, no explanations and no markdown
2. Use only tables and columns that appear in the catalog
3. Join FAERS tables on primaryid where needed
4. Apply filters for every constraint in the question (drug, sex, dates, reporter type)
5. Add ORDER BY and LIMIT when the question asks for a top-N list";

/// Chat-model agent over a fixed catalog
pub struct LlmSqlAgent {
    provider: Arc<dyn LLMProvider>,
    system_prompt: String,
    params: GenerationParams,
    max_attempts: u32,
}

impl LlmSqlAgent {
    /// Build an agent for `catalog` using `provider`
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        catalog: &SchemaCatalog,
        max_attempts: u32,
    ) -> Result<Self> {
        Ok(Self {
            provider,
            system_prompt: build_system_prompt(catalog)?,
            params: GenerationParams::new(),
            max_attempts: max_attempts.max(1),
        })
    }

    /// The system prompt sent with every question
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[async_trait]
impl SqlAgent for LlmSqlAgent {
    async fn invoke(&self, mut state: SessionState) -> Result<SessionState> {
        let messages = vec![
            Message::system(self.system_prompt.clone()),
            Message::user(state.question.trim()),
        ];

        while state.attempts < self.max_attempts {
            state.attempts += 1;
            let response = self.provider.generate(&messages, Some(&self.params)).await?;
            let sql = strip_code_fences(&response.content);

            if !sql.is_empty() {
                state.sql = Some(sql);
                state.error = None;
                break;
            }
            tracing::warn!(attempt = state.attempts, "model returned no SQL");
        }

        if state.sql.is_some() {
            state.summary = Some(format!("generated in {} attempt(s)", state.attempts));
        } else {
            state.error = Some(EMPTY_GENERATION.to_string());
            state.summary = Some(format!("no SQL after {} attempt(s)", state.attempts));
        }

        Ok(state)
    }

    fn name(&self) -> &str {
        self.provider.provider_name()
    }
}

/// System prompt with the pretty-printed catalog appended
fn build_system_prompt(catalog: &SchemaCatalog) -> Result<String> {
    Ok(format!(
        "{}\n\nSchema catalog (JSON):\n{}",
        SYSTEM_PROMPT,
        catalog.format_for_llm()?
    ))
}

/// Remove a surrounding Markdown code fence, if the model added one.
///
/// Anything after the closing fence is dropped.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };

    let body = match rest.split_once('\n') {
        Some((info, body)) if is_info_string(info) => body,
        Some(_) => rest,
        None => match rest.strip_prefix("sql") {
            Some(after) if after.starts_with(char::is_whitespace) => after,
            _ => rest,
        },
    };

    let body = match body.find("```") {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim().to_string()
}

/// Fence info strings are empty or `sql`
fn is_info_string(line: &str) -> bool {
    let tag = line.trim();
    tag.is_empty() || tag.eq_ignore_ascii_case("sql")
}

/// Builds [`LlmSqlAgent`]s backed by an OpenAI-compatible endpoint
#[derive(Debug, Default, Clone, Copy)]
pub struct LlmAgentBuilder;

#[async_trait]
impl AgentBuilder for LlmAgentBuilder {
    async fn build(
        &self,
        catalog: Arc<SchemaCatalog>,
        context: &AgentContext,
    ) -> Result<Arc<dyn SqlAgent>> {
        let api_key = context
            .api_key
            .clone()
            .ok_or_else(|| FaersSqlError::LLMApiKeyMissing("OpenAI".to_string()))?;

        let mut provider =
            OpenAIProvider::new(api_key, Some(context.model.clone()), context.timeout_secs)?;
        if let Some(base_url) = &context.base_url {
            provider = provider.with_base_url(base_url.clone());
        }
        provider.validate_config()?;

        tracing::debug!(model = %provider.model(), endpoint = %provider.base_url(), "building SQL agent");
        let agent = LlmSqlAgent::new(Arc::new(provider), &catalog, context.max_attempts)?;
        Ok(Arc::new(agent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::llm::LLMResponse;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned completions in order
    struct ScriptedProvider {
        replies: Mutex<VecDeque<Result<String>>>,
        calls: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn generate(
            &self,
            messages: &[Message],
            _params: Option<&GenerationParams>,
        ) -> Result<LLMResponse> {
            self.calls.lock().unwrap().push(messages.to_vec());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()));
            reply.map(LLMResponse::new)
        }

        fn provider_name(&self) -> &str {
            "scripted"
        }

        fn has_api_key(&self) -> bool {
            true
        }
    }

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::new(json!({
            "tables": {
                "demo": ["primaryid", "sex", "fda_dt"],
                "reac": ["primaryid", "pt"]
            }
        }))
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("SELECT 1;"), "SELECT 1;");
        assert_eq!(strip_code_fences("```sql\nSELECT 1;\n```"), "SELECT 1;");
        assert_eq!(strip_code_fences("```\nSELECT 1;\n```"), "SELECT 1;");
        assert_eq!(strip_code_fences("```sql SELECT 1```"), "SELECT 1");
        assert_eq!(strip_code_fences("  \n "), "");
        assert_eq!(strip_code_fences("```sql\n```"), "");
        assert_eq!(strip_code_fences("```SELECT 1```"), "SELECT 1");
        assert_eq!(strip_code_fences("```\nSELECT a\nFROM demo\n```"), "SELECT a\nFROM demo");
        assert_eq!(strip_code_fences("```SQL\nSELECT 1\n```"), "SELECT 1");
    }

    #[test]
    fn test_strip_code_fences_keeps_lowercase_keyword_on_fence_line() {
        assert_eq!(
            strip_code_fences("```select\n  pt, count(*)\nfrom reac\ngroup by pt\n```"),
            "select\n  pt, count(*)\nfrom reac\ngroup by pt"
        );
    }

    #[test]
    fn test_strip_code_fences_drops_text_after_closing_fence() {
        assert_eq!(
            strip_code_fences("```sql\nSELECT 1;\n```\nThis returns one row."),
            "SELECT 1;"
        );
    }

    #[test]
    fn test_system_prompt_contains_catalog() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let agent = LlmSqlAgent::new(provider, &catalog(), 1).unwrap();
        assert!(agent.system_prompt().contains("\"reac\""));
        assert!(agent.system_prompt().contains("FAERS"));
    }

    #[tokio::test]
    async fn test_first_attempt_succeeds() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(
            "```sql\nSELECT pt, COUNT(*) FROM reac GROUP BY pt;\n```".to_string(),
        )]));
        let agent = LlmSqlAgent::new(provider.clone(), &catalog(), 2).unwrap();

        let state = agent.invoke(SessionState::new("  top reactions ")).await.unwrap();

        assert_eq!(state.sql.as_deref(), Some("SELECT pt, COUNT(*) FROM reac GROUP BY pt;"));
        assert_eq!(state.error, None);
        assert_eq!(state.attempts, 1);
        assert_eq!(state.summary.as_deref(), Some("generated in 1 attempt(s)"));
        assert_eq!(state.question, "  top reactions ");

        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0][1].content, "top reactions");
    }

    #[tokio::test]
    async fn test_empty_generation_retried() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("   ".to_string()),
            Ok("SELECT 1".to_string()),
        ]));
        let agent = LlmSqlAgent::new(provider.clone(), &catalog(), 3).unwrap();

        let state = agent.invoke(SessionState::new("q")).await.unwrap();

        assert_eq!(state.sql.as_deref(), Some("SELECT 1"));
        assert_eq!(state.attempts, 2);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_all_attempts_empty() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let agent = LlmSqlAgent::new(provider.clone(), &catalog(), 2).unwrap();

        let state = agent.invoke(SessionState::new("q")).await.unwrap();

        assert_eq!(state.sql, None);
        assert_eq!(state.error.as_deref(), Some(EMPTY_GENERATION));
        assert_eq!(state.attempts, 2);
        assert_eq!(state.summary.as_deref(), Some("no SQL after 2 attempt(s)"));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(FaersSqlError::LLMApiError {
            provider: "scripted".to_string(),
            message: "invalid_api_key".to_string(),
            status: 401,
        })]));
        let agent = LlmSqlAgent::new(provider, &catalog(), 2).unwrap();

        let result = agent.invoke(SessionState::new("q")).await;
        assert!(matches!(result, Err(FaersSqlError::LLMApiError { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_builder_requires_api_key() {
        let context = AgentContext::from_settings(&Settings::default());
        let result = LlmAgentBuilder.build(Arc::new(catalog()), &context).await;
        assert!(matches!(result, Err(FaersSqlError::LLMApiKeyMissing(_))));
    }

    #[tokio::test]
    async fn test_builder_with_api_key() {
        let settings = Settings {
            api_key: Some("sk-test-key".to_string()),
            ..Settings::default()
        };
        let context = AgentContext::from_settings(&settings);
        let agent = LlmAgentBuilder.build(Arc::new(catalog()), &context).await.unwrap();
        assert_eq!(agent.name(), "OpenAI");
    }
}
