//! Test doubles shared by the module tests.

use crate::agent::{AgentTurn, ToolInvocation};
use crate::edgar::Transport;
use crate::error::{KlausulError, Result};
use crate::llm::{LanguageModel, TurnRequest};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// What a [`ScriptedModel`] was shown on one turn.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub system_prompt: String,
    pub query: String,
    pub observations: Vec<String>,
    pub tool_names: Vec<String>,
}

/// Model that replays a fixed list of turns.
pub struct ScriptedModel {
    script: Mutex<VecDeque<AgentTurn>>,
    repeat: Option<AgentTurn>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedModel {
    pub fn new(turns: Vec<AgentTurn>) -> Self {
        Self {
            script: Mutex::new(turns.into()),
            repeat: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// A model that gives the same turn forever.
    pub fn repeating(turn: AgentTurn) -> Self {
        Self {
            repeat: Some(turn),
            ..Self::new(Vec::new())
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn next_turn(&self, request: TurnRequest<'_>) -> Result<AgentTurn> {
        self.seen.lock().unwrap().push(SeenRequest {
            system_prompt: request.system_prompt.to_string(),
            query: request.query.to_string(),
            observations: request
                .scratchpad
                .entries()
                .iter()
                .map(|e| e.observation.clone())
                .collect(),
            tool_names: request.tools.iter().map(|t| t.name.clone()).collect(),
        });

        let next = self.script.lock().unwrap().pop_front();
        next.or_else(|| self.repeat.clone())
            .ok_or_else(|| KlausulError::Agent("Script exhausted".to_string()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn tool_call(name: &str, arguments: &str) -> AgentTurn {
    AgentTurn::ToolCall(ToolInvocation {
        id: format!("call_{}", name),
        name: name.to_string(),
        arguments: arguments.to_string(),
    })
}

pub fn final_answer(text: &str) -> AgentTurn {
    AgentTurn::FinalAnswer(text.to_string())
}

/// Transport serving canned pages; unknown URLs fail like a 404.
#[derive(Default)]
pub struct StaticTransport {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StaticTransport {
    async fn get(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| KlausulError::Edgar(format!("404 Not Found: {}", url)))
    }
}

pub const TESLA_INDEX_URL: &str =
    "https://www.sec.gov/Archives/edgar/data/1318605/000162828024002390/index.html";
pub const TESLA_DOCUMENT_URL: &str =
    "https://www.sec.gov/Archives/edgar/data/1318605/000162828024002390/tsla-ex10_38.htm";

/// EDGAR as seen for Tesla's latest 10-K, served from memory.
pub fn edgar_fixture() -> StaticTransport {
    let body = "This Supply Agreement is entered into as of January 1, 2024. ".repeat(200);

    StaticTransport::new()
        .with_page(
            "https://www.sec.gov/files/company_tickers.json",
            r#"{
                "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
                "1": {"cik_str": 1318605, "ticker": "TSLA", "title": "Tesla, Inc."}
            }"#,
        )
        .with_page(
            "https://data.sec.gov/submissions/CIK0001318605.json",
            r#"{
                "cik": "1318605",
                "filings": {"recent": {
                    "accessionNumber": ["0001628280-24-041816", "0001628280-24-002390", "0000950170-23-001409"],
                    "form": ["10-Q", "10-K", "10-K"]
                }}
            }"#,
        )
        .with_page(
            TESLA_INDEX_URL,
            r#"<html><body><table>
                <tr><td><a href="/index.htm">Home</a></td></tr>
                <tr><td><a href="/Archives/edgar/data/1318605/000162828024002390/tsla-20231231.htm">10-K</a></td></tr>
                <tr><td><a href="/Archives/edgar/data/1318605/000162828024002390/tsla-ex10_38.htm">EX-10.38</a></td></tr>
            </table></body></html>"#,
        )
        .with_page(
            TESLA_DOCUMENT_URL,
            &format!(
                "<html><head><style>p {{ margin: 0 }}</style></head><body>\
                 <p><b>SUPPLY AGREEMENT</b> between Tesla, Inc. and Panasonic Energy Co., Ltd.</p>\
                 <p>{}</p></body></html>",
                body
            ),
        )
}
