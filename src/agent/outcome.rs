//! Invocation outcomes
//!
//! Classifies what came back from the agent so callers can tell an
//! expected empty result apart from a failed invocation.

use crate::agent::SessionState;
use crate::error::Result;

/// Classified result of one agent invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Non-empty SQL, possibly with a validator note
    Generated {
        sql: String,
        validator_error: Option<String>,
    },
    /// No SQL came back
    Empty { validator_error: Option<String> },
    /// The invocation itself failed
    Fault { message: String },
}

impl Outcome {
    /// Classify a final session state
    pub fn from_state(state: SessionState) -> Self {
        let validator_error = state.error.filter(|e| !e.is_empty());
        let sql = state.sql.unwrap_or_default().trim().to_string();

        if sql.is_empty() {
            Outcome::Empty { validator_error }
        } else {
            Outcome::Generated {
                sql,
                validator_error,
            }
        }
    }

    /// Classify the raw result of `SqlAgent::invoke`
    pub fn from_result(result: Result<SessionState>) -> Self {
        match result {
            Ok(state) => Self::from_state(state),
            Err(e) => Outcome::Fault {
                message: e.to_string(),
            },
        }
    }

    /// Generated SQL, if any
    pub fn sql(&self) -> Option<&str> {
        match self {
            Outcome::Generated { sql, .. } => Some(sql),
            _ => None,
        }
    }

    /// Validator error reported alongside the result, if any
    pub fn validator_error(&self) -> Option<&str> {
        match self {
            Outcome::Generated {
                validator_error, ..
            }
            | Outcome::Empty { validator_error } => validator_error.as_deref(),
            Outcome::Fault { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaersSqlError;

    fn state(sql: Option<&str>, error: Option<&str>) -> SessionState {
        SessionState {
            sql: sql.map(str::to_string),
            error: error.map(str::to_string),
            ..SessionState::new("q")
        }
    }

    #[test]
    fn test_generated_sql_is_trimmed() {
        let outcome = Outcome::from_state(state(Some("\n  SELECT 1;  \n"), None));
        assert_eq!(outcome.sql(), Some("SELECT 1;"));
        assert_eq!(outcome.validator_error(), None);
    }

    #[test]
    fn test_whitespace_sql_is_empty() {
        let outcome = Outcome::from_state(state(Some("   \t"), None));
        assert_eq!(
            outcome,
            Outcome::Empty {
                validator_error: None
            }
        );
    }

    #[test]
    fn test_missing_sql_keeps_error() {
        let outcome = Outcome::from_state(state(None, Some("table not found")));
        assert_eq!(outcome.sql(), None);
        assert_eq!(outcome.validator_error(), Some("table not found"));
    }

    #[test]
    fn test_error_alongside_sql() {
        let outcome = Outcome::from_state(state(Some("SELECT 1"), Some("column guessed")));
        assert_eq!(outcome.sql(), Some("SELECT 1"));
        assert_eq!(outcome.validator_error(), Some("column guessed"));
    }

    #[test]
    fn test_empty_error_string_ignored() {
        let outcome = Outcome::from_state(state(Some("SELECT 1"), Some("")));
        assert_eq!(outcome.validator_error(), None);
    }

    #[test]
    fn test_failed_invocation_is_fault() {
        let outcome = Outcome::from_result(Err(FaersSqlError::Agent("boom".to_string())));
        assert_eq!(
            outcome,
            Outcome::Fault {
                message: "Agent error: boom".to_string()
            }
        );
    }
}
