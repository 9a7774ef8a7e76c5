//! Fetch command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::edgar::{truncate, EdgarClient};
use anyhow::{Context, Result};

/// Run the fetch command.
pub async fn run_fetch(
    ticker: &str,
    form: Option<String>,
    limit: Option<usize>,
    settings: Settings,
) -> Result<()> {
    preflight::check(Operation::Fetch)?;

    let form = form.unwrap_or_else(|| settings.edgar.default_form_type.clone());
    let limit = limit.unwrap_or(settings.edgar.preview_chars);
    let client = EdgarClient::new(&settings.edgar)?;

    let spinner = Output::spinner(&format!("Fetching {} for {}...", form, ticker));
    let result = client.fetch_filing(ticker, &form).await;
    spinner.finish_and_clear();

    let filing = result.context("Fetch failed")?;

    Output::header(&format!("{} {}", ticker.to_uppercase(), form));
    Output::kv("CIK", filing.cik.as_str());
    Output::kv("Filing index", &filing.index_url);
    Output::kv("Document", &filing.document_url);
    Output::kv("Characters", &filing.text.chars().count().to_string());

    println!("\n{}\n", truncate(&filing.text, limit));

    Ok(())
}
