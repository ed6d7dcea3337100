// faers-sql: FAERS natural language to SQL, query only
//
// This is the main entry point for the faers-sql binary.

use anyhow::{Context, Result};
use clap::Parser;
use faers_sql::agent::LlmAgentBuilder;
use faers_sql::cli::{render, Cli, QueryPage, Repl};
use faers_sql::config::Settings;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = Settings::load(cli.secrets.as_deref()).context("Failed to load secrets")?;
    let page = Arc::new(QueryPage::from_settings(&settings, Arc::new(LlmAgentBuilder)));

    if cli.show_catalog {
        println!("{}", render::sidebar(&page.sidebar().await));
        return Ok(());
    }

    if let Some(question) = cli.question {
        let rendered = page.submit(&question).await?;
        print!("{}", render::rendered(&rendered));
        if rendered.sql().is_none() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut repl = Repl::new(page)?;
    repl.run().await?;

    Ok(())
}
