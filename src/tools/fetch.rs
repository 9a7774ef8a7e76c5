//! `fetch_sec_contract`: pull filing text from EDGAR.

use super::{optional_string_arg, string_arg, Tool};
use crate::edgar::{truncate, EdgarClient};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info};

/// Fetches the latest filing of a form type for a ticker and returns a
/// bounded prefix of its text.
pub struct FetchFilingTool {
    client: Arc<EdgarClient>,
}

impl FetchFilingTool {
    pub fn new(client: Arc<EdgarClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for FetchFilingTool {
    fn name(&self) -> &str {
        "fetch_sec_contract"
    }

    fn description(&self) -> &str {
        "Fetches the text of the latest SEC filing (e.g., 10-K, DEF 14A) for a given company ticker symbol."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker": {
                    "type": "string",
                    "description": "Company ticker symbol, e.g. TSLA"
                },
                "form_type": {
                    "type": "string",
                    "description": format!(
                        "SEC form type (default: {})",
                        self.client.settings().default_form_type
                    ),
                    "default": self.client.settings().default_form_type
                }
            },
            "required": ["ticker"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let settings = self.client.settings();
        let ticker = string_arg(&args, "ticker")?;
        let form_type =
            optional_string_arg(&args, "form_type").unwrap_or(settings.default_form_type.as_str());

        info!("Fetching {} filing for {}", form_type, ticker);
        let filing = self.client.fetch_filing(ticker, form_type).await?;

        debug!(
            "=== SEC Filing Text Preview ===\n{}",
            truncate(&filing.text, settings.log_preview_chars)
        );

        Ok(format!(
            "Source: {}\n\n{}",
            filing.document_url,
            truncate(&filing.text, settings.preview_chars)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgarSettings;
    use crate::error::KlausulError;
    use crate::testing::edgar_fixture;

    fn tool(preview_chars: usize) -> FetchFilingTool {
        let settings = EdgarSettings {
            preview_chars,
            ..EdgarSettings::default()
        };
        let client = EdgarClient::with_transport(Arc::new(edgar_fixture()), &settings);
        FetchFilingTool::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_returns_source_and_bounded_text() {
        let output = tool(40)
            .execute(json!({"ticker": "TSLA", "form_type": "10-K"}))
            .await
            .unwrap();

        let (header, body) = output.split_once("\n\n").unwrap();
        assert_eq!(
            header,
            "Source: https://www.sec.gov/Archives/edgar/data/1318605/000162828024002390/tsla-ex10_38.htm"
        );
        assert_eq!(body.chars().count(), 40);
        assert!(body.starts_with("SUPPLY AGREEMENT"));
    }

    #[tokio::test]
    async fn test_bare_ticker_uses_default_form() {
        let output = tool(5000).execute(json!("tsla")).await.unwrap();
        assert!(output.contains("Panasonic"));
    }

    #[tokio::test]
    async fn test_unknown_ticker_fails() {
        let err = tool(5000).execute(json!({"ticker": "ZZZZ999"})).await.unwrap_err();
        assert!(matches!(err, KlausulError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_form_type_fails() {
        let err = tool(5000)
            .execute(json!({"ticker": "TSLA", "form_type": "S-1"}))
            .await
            .unwrap_err();
        assert!(matches!(err, KlausulError::NotFound(_)));
    }
}
