//! faers-sql library
//!
//! Natural-language questions about FAERS adverse event reports in,
//! proposed SQL out. The main binary is in src/main.rs.

pub mod agent;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
