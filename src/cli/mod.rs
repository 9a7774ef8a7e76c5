//! CLI module for Klausul.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{preview, Output};

use clap::{Parser, Subcommand};

/// Klausul - contract clause analysis for SEC filings
///
/// Fetches public filings from SEC EDGAR and has a language model extract,
/// simplify and risk-flag their legal clauses.
#[derive(Parser, Debug)]
#[command(name = "klausul")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask the agent to analyze a filing (e.g. "Summarize the latest 10-K from Tesla")
    Analyze {
        /// The request; read from the terminal if omitted
        query: Option<String>,

        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum number of model calls for this query
        #[arg(long)]
        max_turns: Option<usize>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch filing text from EDGAR without involving the model
    Fetch {
        /// Company ticker symbol
        ticker: String,

        /// SEC form type (defaults to the configured form type)
        #[arg(short, long)]
        form: Option<String>,

        /// Maximum characters to print (defaults to the configured preview size)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the output format instructions given to the model
    Schema,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
