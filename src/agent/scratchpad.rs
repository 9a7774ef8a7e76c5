//! Per-query record of the agent's actions and what it observed.

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    /// Identifier the model gave the call, echoed back with the result.
    pub id: String,
    /// Name of the requested tool.
    pub name: String,
    /// Raw argument text as produced by the model.
    pub arguments: String,
}

/// One reasoning step of the model.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentTurn {
    ToolCall(ToolInvocation),
    FinalAnswer(String),
}

/// A tool call and the text it produced.
#[derive(Debug, Clone)]
pub struct ScratchpadEntry {
    pub invocation: ToolInvocation,
    /// Tool output, or the failure message fed back to the model.
    pub observation: String,
    /// Whether the tool failed or timed out.
    pub failed: bool,
}

impl std::fmt::Display for ScratchpadEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.invocation.name, self.invocation.arguments)
    }
}

/// Append-only, ordered list of scratchpad entries for one query.
#[derive(Debug, Clone, Default)]
pub struct Scratchpad {
    entries: Vec<ScratchpadEntry>,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ScratchpadEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ScratchpadEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<ScratchpadEntry> {
        self.entries
    }
}
