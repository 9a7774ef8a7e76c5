//! Analyze command implementation.

use crate::analyzer::Analyzer;
use crate::cli::preflight::{self, Operation};
use crate::cli::{preview, Output};
use crate::config::Settings;
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

/// Exit code when the model's answer does not match the schema.
pub const EXIT_PARSE_FAILURE: u8 = 2;

/// Run the analyze command.
pub async fn run_analyze(
    query: Option<&str>,
    model: Option<String>,
    max_turns: Option<usize>,
    json: bool,
    mut settings: Settings,
) -> Result<ExitCode> {
    preflight::check(Operation::Analyze)?;

    if let Some(model) = model {
        settings.model.name = model;
    }
    if let Some(max_turns) = max_turns {
        settings.agent.max_turns = max_turns;
    }

    let query = match query {
        Some(q) => q.to_string(),
        None => read_query()?,
    };
    if query.trim().is_empty() {
        anyhow::bail!("No query given");
    }

    let analyzer = Analyzer::new(settings)?;

    let spinner = Output::spinner("Agent working...");
    let result = analyzer.analyze(&query).await;
    spinner.finish_and_clear();

    let report = result.context("Agent failed")?;

    if !report.tool_calls.is_empty() {
        Output::header(&format!("Tool calls ({})", report.tool_calls.len()));
        for call in &report.tool_calls {
            let status = if call.failed { " (failed)" } else { "" };
            Output::list_item(&format!(
                "{} {}{}",
                call.invocation.name,
                preview(&call.invocation.arguments, 60),
                status
            ));
        }
        println!();
    }

    match &report.outcome {
        Ok(summary) => {
            if json {
                println!("{}", serde_json::to_string_pretty(summary)?);
            } else {
                Output::header("Contract summary");
                println!("\n{}", summary.to_report());
            }
            Output::info(&format!("Completed in {} iteration(s)", report.iterations));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::header("Raw model output");
            Output::raw_block(&report.raw);
            Ok(ExitCode::from(EXIT_PARSE_FAILURE))
        }
    }
}

/// Prompt for a query on the terminal.
fn read_query() -> Result<String> {
    print!("What can I help you research? ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
