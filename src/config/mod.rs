//! Configuration module for Klausul.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AgentPrompts, Prompts};
pub use settings::{
    AgentSettings, EdgarSettings, GeneralSettings, ModelSettings, OutputSettings,
    PromptSettings, Settings,
};
