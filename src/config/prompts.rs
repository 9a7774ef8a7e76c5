//! Prompt templates for Klausul.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub agent: AgentPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompts for the clause-analysis agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPrompts {
    pub system: String,
}

impl Default for AgentPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a legal analyst who reads public company filings and explains their contracts in plain language.

You have tools:
- 'fetch_sec_contract' fetches the text of the latest SEC filing of a given form type (e.g. 10-K, DEF 14A) for a ticker symbol
- 'save_text_to_file' appends text to the user's summary file

Guidelines:
- Work out the company's ticker symbol from the request and fetch the filing before answering
- If a fetch fails, read the error; try a different ticker or form type, or explain that the filing is unavailable
- Identify the parties, the effective date and the key terms
- Pick out clauses that carry legal or financial risk, quote them, rewrite them in plain English and list the risks
- Only save to a file when the user asks for it
- List the URLs or filings you relied on as sources

Answer with the final result only, with no other text.
{{format_instructions}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let agent_path = custom_path.join("agent.toml");
            if agent_path.exists() {
                let content = std::fs::read_to_string(&agent_path)?;
                prompts.agent = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }

    /// The agent system prompt with the output format instructions filled in.
    pub fn agent_system(&self, format_instructions: &str) -> String {
        let mut vars = std::collections::HashMap::new();
        vars.insert(
            "format_instructions".to_string(),
            format_instructions.to_string(),
        );
        self.render_with_custom(&self.agent.system, &vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.agent.system.contains("fetch_sec_contract"));
        assert!(prompts.agent.system.contains("{{format_instructions}}"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_agent_system_embeds_instructions_and_custom_vars() {
        let mut prompts = Prompts::default();
        prompts.agent.system = "Firm: {{firm}}\n{{format_instructions}}".to_string();
        prompts
            .variables
            .insert("firm".to_string(), "Acme LLP".to_string());
        // Caller-provided variables win over config variables.
        prompts
            .variables
            .insert("format_instructions".to_string(), "ignored".to_string());

        let rendered = prompts.agent_system("RETURN JSON");
        assert_eq!(rendered, "Firm: Acme LLP\nRETURN JSON");
    }

    #[test]
    fn test_load_custom_agent_prompt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("agent.toml"),
            "system = \"Be brief.\\n{{format_instructions}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.agent.system, "Be brief.\n{{format_instructions}}");
    }
}
