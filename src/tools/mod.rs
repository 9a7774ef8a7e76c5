//! Tools the agent can call, and the registry it selects them from.
//!
//! A tool is looked up by its exact name. Arguments arrive as the model's
//! raw argument text: JSON when the model sends JSON, otherwise the text
//! itself as a JSON string, so single-argument tools accept both forms.

mod fetch;
mod save;

pub use fetch::FetchFilingTool;
pub use save::{format_record, SaveTool};

use crate::error::{KlausulError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A capability exposed to the agent.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the model uses to select the tool.
    fn name(&self) -> &str;

    /// What the tool does, shown to the model.
    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn parameters_schema(&self) -> Value;

    /// Run the tool. The returned text is handed to the model verbatim.
    async fn execute(&self, args: Value) -> Result<String>;
}

/// Name, description and argument schema of a registered tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Closed set of tools available to one agent.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. Names must be unique within the registry.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(KlausulError::Config(format!(
                "Tool '{}' is registered twice",
                name
            )));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, tool: Arc<dyn Tool>) -> Result<Self> {
        self.register(tool)?;
        Ok(self)
    }

    /// Look up a tool by exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Descriptors for every tool, ordered by name.
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .values()
            .map(|tool| ToolDescriptor {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect()
    }
}

/// Decode the model's raw argument text.
pub fn decode_arguments(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Read a string argument that may also be passed as the bare argument.
fn string_arg<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    let value = match args {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get(key).and_then(Value::as_str),
        _ => None,
    };

    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| KlausulError::InvalidInput(format!("Missing '{}' argument", key)))
}

/// Read a text payload exactly as given. Strings are taken verbatim and any
/// other JSON value is serialized.
fn text_arg<'a>(args: &'a Value, key: &str) -> Result<Cow<'a, str>> {
    let value = match args {
        Value::Object(map) => map.get(key),
        other => Some(other),
    };

    match value {
        Some(Value::String(s)) => Ok(Cow::Borrowed(s.as_str())),
        Some(Value::Null) | None => Err(KlausulError::InvalidInput(format!(
            "Missing '{}' argument",
            key
        ))),
        Some(other) => Ok(Cow::Owned(serde_json::to_string(other)?)),
    }
}

/// Read an optional string argument from an arguments object.
fn optional_string_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
