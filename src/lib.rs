//! Klausul - Contract Clause Analysis for SEC Filings
//!
//! A CLI agent that pulls public filings from SEC EDGAR and has a language
//! model extract, simplify and risk-flag their legal clauses.
//!
//! # Overview
//!
//! Klausul allows you to:
//! - Resolve a ticker to its latest filing of a given form type
//! - Extract readable text from the filing's primary document
//! - Let a tool-calling agent summarize the contract clauses it finds
//! - Validate the answer against a fixed JSON schema
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `edgar` - EDGAR lookups and HTML text extraction
//! - `tools` - Tools the agent can call
//! - `llm` - Language model abstraction
//! - `agent` - The tool-calling loop
//! - `schema` - Contract summary schema and parsing
//! - `analyzer` - Wires everything into a single query pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use klausul::analyzer::Analyzer;
//! use klausul::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let analyzer = Analyzer::new(settings)?;
//!
//!     let report = analyzer.analyze("Summarize the latest 10-K from Tesla").await?;
//!     if let Some(summary) = report.summary() {
//!         println!("{}", summary.to_report());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod edgar;
pub mod error;
pub mod llm;
pub mod openai;
pub mod schema;
pub mod tools;

#[cfg(test)]
mod testing;

pub use error::{KlausulError, Result};
