//! CLI module
//!
//! This module provides the terminal interface for faers-sql: argument
//! parsing, the interactive REPL, the query page behind it and rendering.

pub mod command_menu;
pub mod commands;
pub mod page;
pub mod render;
pub mod repl;

use clap::Parser;
use std::path::PathBuf;

// Re-exports
pub use page::QueryPage;
pub use repl::Repl;

/// Ask questions about FAERS adverse event reports and get SQL back.
///
/// Nothing is executed against a database; the output is a proposed
/// query plus any diagnostics from the agent.
#[derive(Parser, Debug)]
#[command(name = "faers-sql")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Secrets file (defaults to ./secrets.toml, then the user config dir)
    #[arg(short, long, value_name = "PATH")]
    pub secrets: Option<PathBuf>,

    /// Generate SQL for one question and exit
    #[arg(short, long, value_name = "TEXT")]
    pub question: Option<String>,

    /// Print the schema catalog preview and exit
    #[arg(long)]
    pub show_catalog: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["faers-sql"]);
        assert!(cli.secrets.is_none());
        assert!(cli.question.is_none());
        assert!(!cli.show_catalog);
    }

    #[test]
    fn test_cli_one_shot() {
        let cli = Cli::parse_from([
            "faers-sql",
            "--secrets",
            "conf/secrets.toml",
            "-q",
            "Deaths linked to Ozempic",
        ]);
        assert_eq!(cli.secrets, Some(PathBuf::from("conf/secrets.toml")));
        assert_eq!(cli.question.as_deref(), Some("Deaths linked to Ozempic"));
    }
}
