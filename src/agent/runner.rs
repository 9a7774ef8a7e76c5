//! Agent runner with tool calling loop.

use super::scratchpad::{AgentTurn, Scratchpad, ScratchpadEntry, ToolInvocation};
use crate::error::{KlausulError, Result};
use crate::llm::{LanguageModel, TurnRequest};
use crate::tools::{decode_arguments, Tool, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Default ceiling on model calls per query.
pub const DEFAULT_MAX_TURNS: usize = 15;

/// Default timeout for a single tool call.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(60);

/// Where the agent is within one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// Waiting on the model to pick the next step.
    Thinking,
    /// Running a tool the model selected.
    ToolCall,
    /// Recording the tool result in the scratchpad.
    Observing,
    /// The model produced its final answer.
    Done,
}

impl AgentState {
    pub fn can_transition_to(self, next: AgentState) -> bool {
        matches!(
            (self, next),
            (AgentState::Thinking, AgentState::ToolCall)
                | (AgentState::Thinking, AgentState::Done)
                | (AgentState::ToolCall, AgentState::Observing)
                | (AgentState::Observing, AgentState::Thinking)
        )
    }

    fn advance(&mut self, next: AgentState) -> Result<()> {
        if !self.can_transition_to(next) {
            return Err(KlausulError::Agent(format!(
                "Invalid state transition {:?} -> {:?}",
                self, next
            )));
        }
        debug!("Agent state {:?} -> {:?}", self, next);
        *self = next;
        Ok(())
    }
}

/// Agent that answers one query using a closed set of tools.
pub struct Agent {
    model: Arc<dyn LanguageModel>,
    tools: ToolRegistry,
    system_prompt: String,
    max_turns: usize,
    tool_timeout: Duration,
}

impl Agent {
    /// Create a new agent with the given model, tools and system prompt.
    pub fn new(model: Arc<dyn LanguageModel>, tools: ToolRegistry, system_prompt: &str) -> Self {
        Self {
            model,
            tools,
            system_prompt: system_prompt.to_string(),
            max_turns: DEFAULT_MAX_TURNS,
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Set maximum model calls for the agent loop.
    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }

    /// Set the timeout applied to each tool call.
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Run the agent on a query until the model gives a final answer.
    ///
    /// Tool failures are fed back to the model as observations. A request
    /// for an undeclared tool, a model error, or running past the turn limit
    /// ends the run with an error.
    #[instrument(skip(self), fields(model = %self.model.model_name()))]
    pub async fn run(&self, query: &str) -> Result<AgentResponse> {
        let descriptors = self.tools.descriptors();
        let mut scratchpad = Scratchpad::new();
        let mut state = AgentState::Thinking;
        let mut turns = 0;

        loop {
            turns += 1;
            if turns > self.max_turns {
                return Err(KlausulError::TurnLimitExceeded {
                    limit: self.max_turns,
                });
            }

            debug!("Agent turn {}", turns);

            let turn = self
                .model
                .next_turn(TurnRequest {
                    system_prompt: &self.system_prompt,
                    query,
                    scratchpad: &scratchpad,
                    tools: &descriptors,
                })
                .await?;

            match turn {
                AgentTurn::FinalAnswer(content) => {
                    state.advance(AgentState::Done)?;
                    info!("Agent finished after {} turn(s)", turns);
                    return Ok(AgentResponse {
                        content,
                        scratchpad,
                        iterations: turns,
                    });
                }
                AgentTurn::ToolCall(invocation) => {
                    let Some(tool) = self.tools.get(&invocation.name) else {
                        return Err(KlausulError::ToolSelection(format!(
                            "'{}' (available: {})",
                            invocation.name,
                            self.tools.names().join(", ")
                        )));
                    };

                    state.advance(AgentState::ToolCall)?;
                    let entry = self.execute_tool_call(tool, invocation).await;

                    state.advance(AgentState::Observing)?;
                    scratchpad.push(entry);

                    state.advance(AgentState::Thinking)?;
                }
            }
        }
    }

    /// Execute a single tool call and record what it produced.
    async fn execute_tool_call(
        &self,
        tool: &Arc<dyn Tool>,
        invocation: ToolInvocation,
    ) -> ScratchpadEntry {
        info!(
            "Agent calling tool: {} with args: {}",
            invocation.name, invocation.arguments
        );

        let args = decode_arguments(&invocation.arguments);
        let outcome = match tokio::time::timeout(self.tool_timeout, tool.execute(args)).await {
            Ok(result) => result,
            Err(_) => Err(KlausulError::ToolFailed(format!(
                "{} timed out after {:?}",
                invocation.name, self.tool_timeout
            ))),
        };

        let (observation, failed) = match outcome {
            Ok(output) => (output, false),
            Err(e) => {
                warn!("Tool {} failed: {}", invocation.name, e);
                (format!("Tool error: {}", e), true)
            }
        };

        ScratchpadEntry {
            invocation,
            observation,
            failed,
        }
    }
}

/// Response from an agent run.
#[derive(Debug)]
pub struct AgentResponse {
    /// The final answer, exactly as the model produced it.
    pub content: String,
    /// Every tool call made during the run, in order.
    pub scratchpad: Scratchpad,
    /// Number of model calls used.
    pub iterations: usize,
}
