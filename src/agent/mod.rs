//! Agent loop with tool calling.
//!
//! The agent hands the model the system prompt, the query and everything it
//! has observed so far, runs the one tool the model asks for, records the
//! result, and repeats until the model answers or the turn limit is hit.

mod runner;
mod scratchpad;

pub use runner::{Agent, AgentResponse, AgentState, DEFAULT_MAX_TURNS, DEFAULT_TOOL_TIMEOUT};
pub use scratchpad::{AgentTurn, Scratchpad, ScratchpadEntry, ToolInvocation};
