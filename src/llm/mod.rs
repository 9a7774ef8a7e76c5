//! Language model abstraction for the agent loop.

mod openai;

pub use openai::{build_messages, tool_definitions, OpenAIModel};

use crate::agent::{AgentTurn, Scratchpad};
use crate::error::Result;
use crate::tools::ToolDescriptor;
use async_trait::async_trait;

/// Everything the model sees at one reasoning step.
#[derive(Debug, Clone, Copy)]
pub struct TurnRequest<'a> {
    /// System instructions, including the output format instructions.
    pub system_prompt: &'a str,
    /// The user's original query.
    pub query: &'a str,
    /// Tool calls and observations so far.
    pub scratchpad: &'a Scratchpad,
    /// Tools the model may select from.
    pub tools: &'a [ToolDescriptor],
}

/// A model that decides the agent's next step.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Ask for exactly one next step: a tool call or a final answer.
    async fn next_turn(&self, request: TurnRequest<'_>) -> Result<AgentTurn>;

    /// Model identifier, for logs.
    fn model_name(&self) -> &str;
}
