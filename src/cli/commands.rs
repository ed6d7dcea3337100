//! Command parsing for the REPL
//!
//! Lines starting with `/` are commands; everything else is a question
//! for the agent.

use crate::error::{FaersSqlError, Result};

/// Command types
#[derive(Debug, Clone, PartialEq)]
pub enum CommandType {
    /// Show the schema catalog preview
    Catalog,
    /// Show help message
    Help,
    /// Exit the application
    Quit,
    /// Natural language question, kept exactly as typed
    Question { text: String },
}

/// Parsed command
#[derive(Debug, Clone)]
pub struct Command {
    /// The type of command
    pub command_type: CommandType,
}

impl Command {
    /// Parse a command from user input.
    ///
    /// Anything whose first non-blank character is `/` is a command.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        if !trimmed.starts_with('/') {
            return Ok(Command {
                command_type: CommandType::Question {
                    text: input.to_string(),
                },
            });
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or("/");
        let has_args = parts.next().is_some();

        let command_type = match cmd {
            "/catalog" => CommandType::Catalog,
            "/help" => CommandType::Help,
            "/quit" | "/exit" => CommandType::Quit,
            _ => return Err(FaersSqlError::UnknownCommand(cmd.to_string())),
        };

        if has_args {
            return Err(FaersSqlError::InvalidCommandSyntax {
                command: cmd.to_string(),
                expected: cmd.to_string(),
            });
        }

        Ok(Command { command_type })
    }
}

/// Help text shown by `/help`
pub const HELP_TEXT: &str = r#"
FAERS NLP → SQL

Type a question about FAERS adverse event reports and press Enter to
generate SQL. End a line with \ to continue the question on the next line.
Input starting with / is always read as a command, so begin questions
with a word. Nothing is executed against a database.

Commands:
  /catalog           Show the schema catalog preview
  /help              Show this help message
  /quit, /exit       Exit

Example:
  Top 10 adverse events in males for Keytruda since 2021 reported by health professionals
"#;

/// Format an error for display
pub fn format_error(error: &FaersSqlError) -> String {
    format!("Error: {}", error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_command() {
        let cmd = Command::parse("/catalog").unwrap();
        assert_eq!(cmd.command_type, CommandType::Catalog);
    }

    #[test]
    fn test_parse_help_command() {
        let cmd = Command::parse("  /help  ").unwrap();
        assert_eq!(cmd.command_type, CommandType::Help);
    }

    #[test]
    fn test_parse_quit_command() {
        assert_eq!(Command::parse("/quit").unwrap().command_type, CommandType::Quit);
        assert_eq!(Command::parse("/exit").unwrap().command_type, CommandType::Quit);
    }

    #[test]
    fn test_parse_question_kept_verbatim() {
        let cmd = Command::parse(" Deaths reported for Humira in 2023 ").unwrap();
        assert_eq!(
            cmd.command_type,
            CommandType::Question {
                text: " Deaths reported for Humira in 2023 ".to_string()
            }
        );
    }

    #[test]
    fn test_blank_input_is_question() {
        let cmd = Command::parse("   ").unwrap();
        assert_eq!(
            cmd.command_type,
            CommandType::Question {
                text: "   ".to_string()
            }
        );
    }

    #[test]
    fn test_help_says_slash_input_is_a_command() {
        assert!(HELP_TEXT.contains("starting with / is always read as a command"));
        assert!(Command::parse("/catalog of drugs").is_err());
    }

    #[test]
    fn test_parse_invalid_command() {
        let result = Command::parse("/connect postgres://localhost");
        assert!(matches!(result, Err(FaersSqlError::UnknownCommand(c)) if c == "/connect"));
    }

    #[test]
    fn test_parse_unexpected_args() {
        let result = Command::parse("/catalog full");
        assert!(matches!(
            result,
            Err(FaersSqlError::InvalidCommandSyntax { .. })
        ));
    }
}
