//! Query pipeline for Klausul.
//!
//! Wires settings into a model, the EDGAR client and the tool set, runs the
//! agent on a query, and validates its final answer.

use crate::agent::{Agent, ScratchpadEntry};
use crate::config::{Prompts, Settings};
use crate::edgar::EdgarClient;
use crate::error::Result;
use crate::llm::{LanguageModel, OpenAIModel};
use crate::schema::{self, ContractSummary};
use crate::tools::{FetchFilingTool, SaveTool, ToolRegistry};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Runs clause-analysis queries.
pub struct Analyzer {
    agent: Agent,
}

impl Analyzer {
    /// Create an analyzer backed by OpenAI and the live EDGAR endpoints.
    pub fn new(settings: Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let model: Arc<dyn LanguageModel> = Arc::new(OpenAIModel::new(&settings.model)?);
        let edgar = Arc::new(EdgarClient::new(&settings.edgar)?);
        let tools = default_tools(edgar, &settings)?;

        info!(
            "Using model {} with tools: {}",
            model.model_name(),
            tools.names().join(", ")
        );

        Ok(Self::with_components(&settings, &prompts, model, tools))
    }

    /// Create an analyzer with custom components.
    pub fn with_components(
        settings: &Settings,
        prompts: &Prompts,
        model: Arc<dyn LanguageModel>,
        tools: ToolRegistry,
    ) -> Self {
        let system_prompt = prompts.agent_system(&schema::format_instructions());
        let agent = Agent::new(model, tools, &system_prompt)
            .with_max_turns(settings.agent.max_turns)
            .with_tool_timeout(settings.agent.tool_timeout());

        Self { agent }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Run one query and validate the answer.
    ///
    /// A final answer that does not match the schema is reported inside the
    /// [`AnalysisReport`]; only failures of the agent run itself are `Err`.
    #[instrument(skip(self))]
    pub async fn analyze(&self, query: &str) -> Result<AnalysisReport> {
        let response = self.agent.run(query).await?;

        let outcome = schema::parse(&response.content);
        if let Err(e) = &outcome {
            warn!("Final answer did not match the schema: {}", e);
        }

        Ok(AnalysisReport {
            raw: response.content,
            tool_calls: response.scratchpad.into_entries(),
            iterations: response.iterations,
            outcome,
        })
    }
}

/// The standard tool set: EDGAR fetch and the summary file.
pub fn default_tools(edgar: Arc<EdgarClient>, settings: &Settings) -> Result<ToolRegistry> {
    ToolRegistry::new()
        .with(Arc::new(FetchFilingTool::new(edgar)))?
        .with(Arc::new(SaveTool::new(
            settings.output_dir(),
            &settings.output.save_file,
        )))
}

/// Result of one query.
#[derive(Debug)]
pub struct AnalysisReport {
    /// The model's final answer, untouched.
    pub raw: String,
    /// Tool calls made while answering, in order.
    pub tool_calls: Vec<ScratchpadEntry>,
    /// Model calls used.
    pub iterations: usize,
    /// The validated summary, or the parse failure.
    pub outcome: Result<ContractSummary>,
}

impl AnalysisReport {
    pub fn summary(&self) -> Option<&ContractSummary> {
        self.outcome.as_ref().ok()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KlausulError;
    use crate::testing::{
        edgar_fixture, final_answer, tool_call, ScriptedModel, TESLA_DOCUMENT_URL,
    };

    fn analyzer(model: Arc<ScriptedModel>, output_dir: &std::path::Path) -> Analyzer {
        let mut settings = Settings::default();
        settings.output.dir = output_dir.to_string_lossy().to_string();

        let edgar = Arc::new(EdgarClient::with_transport(
            Arc::new(edgar_fixture()),
            &settings.edgar,
        ));
        let tools = default_tools(edgar, &settings).unwrap();
        Analyzer::with_components(&settings, &Prompts::default(), model, tools)
    }

    fn tesla_answer() -> String {
        format!(
            r#"```json
{{
  "company_name": "Tesla, Inc.",
  "parties": ["Tesla, Inc.", "Panasonic Energy Co., Ltd."],
  "effective_date": "January 1, 2024",
  "key_terms": ["Battery cell supply"],
  "high_risk_clauses": [
    {{
      "clause_type": "Exclusivity",
      "original_text": "This Supply Agreement is entered into as of January 1, 2024.",
      "simplified_text": "The deal starts on January 1, 2024.",
      "risk_flags": ["long commitment"]
    }}
  ],
  "simplified_summary": "Panasonic supplies battery cells to Tesla.",
  "sources": ["{}"]
}}
```"#,
            TESLA_DOCUMENT_URL
        )
    }

    #[tokio::test]
    async fn test_system_prompt_carries_format_instructions() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::new(vec![final_answer("{}")]));
        let analyzer = analyzer(model, dir.path());

        assert!(analyzer
            .agent()
            .system_prompt()
            .contains(&schema::format_instructions()));
        assert!(!analyzer.agent().system_prompt().contains("{{format_instructions}}"));
        assert_eq!(
            analyzer.agent().tools().names(),
            vec!["fetch_sec_contract", "save_text_to_file"]
        );
    }

    #[tokio::test]
    async fn test_tesla_10k_summary() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::new(vec![
            tool_call("fetch_sec_contract", r#"{"ticker": "TSLA", "form_type": "10-K"}"#),
            final_answer(&tesla_answer()),
        ]));
        let analyzer = analyzer(model.clone(), dir.path());

        let report = analyzer
            .analyze("Summarize the latest 10-K from Tesla")
            .await
            .unwrap();

        assert!(report.is_success());
        let summary = report.summary().unwrap();
        assert!(!summary.parties.is_empty());
        assert!(!summary.sources.is_empty());
        assert_eq!(summary.company_name.as_deref(), Some("Tesla, Inc."));

        assert_eq!(report.iterations, 2);
        assert_eq!(report.tool_calls.len(), 1);
        assert!(!report.tool_calls[0].failed);

        // The model saw the bounded filing text on its second turn.
        let requests = model.requests();
        assert_eq!(requests[1].query, "Summarize the latest 10-K from Tesla");
        let observation = &requests[1].observations[0];
        let (source, text) = observation.split_once("\n\n").unwrap();
        assert_eq!(source, format!("Source: {}", TESLA_DOCUMENT_URL));
        assert_eq!(text.chars().count(), Settings::default().edgar.preview_chars);
    }

    #[tokio::test]
    async fn test_unknown_ticker_then_unparsable_answer() {
        let dir = tempfile::tempdir().unwrap();
        let raw = "I could not find any filings for ZZZZ999.";
        let model = Arc::new(ScriptedModel::new(vec![
            tool_call("fetch_sec_contract", r#"{"ticker": "ZZZZ999"}"#),
            final_answer(raw),
        ]));
        let analyzer = analyzer(model.clone(), dir.path());

        let report = analyzer.analyze("Summarize ZZZZ999's 10-K").await.unwrap();

        let observation = &model.requests()[1].observations[0];
        assert!(observation.starts_with("Tool error: Not found:"));
        assert!(observation.contains("ZZZZ999"));
        assert!(report.tool_calls[0].failed);

        assert!(!report.is_success());
        assert_eq!(report.raw, raw);
        let err = report.outcome.as_ref().unwrap_err();
        assert!(matches!(err, KlausulError::Parse { .. }));
        assert_eq!(err.raw_output(), Some(raw));
    }

    #[tokio::test]
    async fn test_fetch_then_save() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::new(vec![
            tool_call("fetch_sec_contract", "TSLA"),
            tool_call("save_text_to_file", r#"{"data": "Tesla supply agreement notes"}"#),
            final_answer(&tesla_answer()),
        ]));
        let analyzer = analyzer(model.clone(), dir.path());

        let report = analyzer.analyze("Summarize Tesla and save it").await.unwrap();
        assert!(report.is_success());
        assert_eq!(report.tool_calls.len(), 2);

        let saved = std::fs::read_to_string(dir.path().join("contract_output.txt")).unwrap();
        assert!(saved.starts_with("--- Contract Summary ---\nTimestamp: "));
        assert!(saved.contains("\n\nTesla supply agreement notes\n\n"));
        assert!(model.requests()[2].observations[1].starts_with("Data successfully saved to "));
    }
}
