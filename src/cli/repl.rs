//! REPL implementation
//!
//! Interactive loop: read a question (or a `/` command), submit it to the
//! query page and print what comes back.

use crate::cli::command_menu::{self, MenuResult};
use crate::cli::commands::{format_error, Command, CommandType, HELP_TEXT};
use crate::cli::page::QueryPage;
use crate::cli::render;
use crate::error::{FaersSqlError, Result};
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::Context;
use rustyline::Helper;
use rustyline::{CompletionType, Config, Editor};
use std::path::PathBuf;
use std::sync::Arc;

const PROMPT: &str = "> ";
const CONTINUATION_PROMPT: &str = ". ";

/// Completes `/` commands
struct CommandCompleter;

impl Completer for CommandCompleter {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &Context<'_>,
    ) -> std::result::Result<(usize, Vec<String>), ReadlineError> {
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let matches = command_menu::get_commands()
            .into_iter()
            .map(|item| item.name)
            .chain(std::iter::once("/exit"))
            .filter(|cmd| cmd.starts_with(line))
            .map(str::to_string)
            .collect();
        Ok((0, matches))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}

/// Where line history is kept
fn history_path() -> PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".faers-sql").join("history"))
        .unwrap_or_else(|| ".faers-sql-history".into())
}

/// Join continuation lines; a trailing `\` means the question goes on
fn join_continued(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| line.strip_suffix('\\').unwrap_or(line.as_str()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// faers-sql REPL
pub struct Repl {
    editor: Editor<CommandCompleter, DefaultHistory>,
    running: bool,
    page: Arc<QueryPage>,
}

impl Repl {
    /// Create a new REPL instance
    pub fn new(page: Arc<QueryPage>) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();

        let mut editor = Editor::<CommandCompleter, DefaultHistory>::with_config(config)
            .map_err(|e| FaersSqlError::Config(format!("Failed to initialize editor: {}", e)))?;
        editor.set_helper(Some(CommandCompleter));

        if let Err(e) = editor.load_history(&history_path()) {
            tracing::debug!(error = %e, "no line history loaded");
        }

        Ok(Self {
            editor,
            running: true,
            page,
        })
    }

    /// Run the REPL loop.
    ///
    /// Returns an error only when the catalog or agent cannot be built.
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome().await;

        let result = self.run_loop().await;
        self.save_history();
        result
    }

    async fn run_loop(&mut self) -> Result<()> {
        while self.running {
            let Some(input) = self.read_input() else {
                continue;
            };

            if input.trim() == "/" {
                match command_menu::show_command_menu() {
                    Ok(MenuResult::Command(cmd)) => self.dispatch(&cmd).await?,
                    Ok(MenuResult::Cancelled) => {}
                    Err(e) => println!("Error showing menu: {}", e),
                }
                continue;
            }

            self.dispatch(&input).await?;
        }
        Ok(())
    }

    /// Read one (possibly multi-line) input, or `None` when nothing was read
    fn read_input(&mut self) -> Option<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut prompt = PROMPT;

        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    let more = line.ends_with('\\');
                    lines.push(line);
                    if !more {
                        break;
                    }
                    prompt = CONTINUATION_PROMPT;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    return None;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    self.running = false;
                    return None;
                }
                Err(err) => {
                    println!("Error: {:?}", err);
                    self.running = false;
                    return None;
                }
            }
        }

        let input = join_continued(&lines);
        if !input.trim().is_empty() {
            let _ = self.editor.add_history_entry(input.as_str());
        }
        Some(input)
    }

    /// Parse and handle one input
    async fn dispatch(&mut self, input: &str) -> Result<()> {
        match Command::parse(input) {
            Ok(command) => self.handle_command(command).await,
            Err(e) => {
                println!("{}", format_error(&e));
                Ok(())
            }
        }
    }

    async fn handle_command(&mut self, command: Command) -> Result<()> {
        match command.command_type {
            CommandType::Catalog => {
                println!("{}", render::sidebar(&self.page.sidebar().await));
            }
            CommandType::Help => println!("{}", HELP_TEXT),
            CommandType::Quit => {
                println!("Goodbye!");
                self.running = false;
            }
            CommandType::Question { text } => match self.page.submit(&text).await {
                Ok(rendered) => print!("{}", render::rendered(&rendered)),
                Err(e) => {
                    println!("{}", format_error(&e));
                    return Err(e);
                }
            },
        }
        Ok(())
    }

    fn save_history(&mut self) {
        let path = history_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = self.editor.save_history(&path) {
            tracing::debug!(error = %e, "could not save line history");
        }
    }

    /// Print title, caption and catalog preview
    async fn print_welcome(&self) {
        println!();
        println!("{}", render::header());
        println!("{}", render::sidebar(&self.page.sidebar().await));
        println!("Ask a FAERS question, or type / for commands.");
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_single_line() {
        assert_eq!(join_continued(&["deaths in 2022".to_string()]), "deaths in 2022");
    }

    #[test]
    fn test_join_continued_lines() {
        let lines = vec![
            "Top 10 adverse events \\".to_string(),
            "in males for Keytruda".to_string(),
        ];
        assert_eq!(
            join_continued(&lines),
            "Top 10 adverse events \nin males for Keytruda"
        );
    }

    #[test]
    fn test_completer_lists_commands() {
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (_, matches) = CommandCompleter.complete("/c", 2, &ctx).unwrap();
        assert_eq!(matches, vec!["/catalog".to_string()]);

        let (_, matches) = CommandCompleter.complete("/e", 2, &ctx).unwrap();
        assert_eq!(matches, vec!["/exit".to_string()]);
    }
}
