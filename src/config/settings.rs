//! Configuration settings for Klausul.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub model: ModelSettings,
    pub agent: AgentSettings,
    pub edgar: EdgarSettings,
    pub output: OutputSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level used when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Chat model used by the agent.
    pub name: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Timeout for a single model request, in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ModelSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Agent loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Hard ceiling on model calls per query.
    pub max_turns: usize,
    /// Timeout for a single tool invocation, in seconds.
    pub tool_timeout_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_turns: 15,
            tool_timeout_secs: 60,
        }
    }
}

impl AgentSettings {
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

/// SEC EDGAR endpoints and fetch limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgarSettings {
    /// Identifying User-Agent header. EDGAR rejects anonymous clients.
    pub user_agent: String,
    /// Issuer directory mapping tickers to CIKs.
    pub tickers_url: String,
    /// Base URL of the per-issuer submissions JSON.
    pub submissions_base_url: String,
    /// Base URL of the filing archive (also used to resolve relative links).
    pub archives_base_url: String,
    /// Characters of document text returned to the agent.
    pub preview_chars: usize,
    /// Characters of document text written to the debug log.
    pub log_preview_chars: usize,
    /// Form type used when the agent does not name one.
    pub default_form_type: String,
    /// Timeout for a single EDGAR request, in seconds.
    pub timeout_secs: u64,
}

impl Default for EdgarSettings {
    fn default() -> Self {
        Self {
            user_agent: "Klausul contracts@example.com".to_string(),
            tickers_url: "https://www.sec.gov/files/company_tickers.json".to_string(),
            submissions_base_url: "https://data.sec.gov/submissions".to_string(),
            archives_base_url: "https://www.sec.gov".to_string(),
            preview_chars: 5000,
            log_preview_chars: 2000,
            default_form_type: "10-K".to_string(),
            timeout_secs: 30,
        }
    }
}

impl EdgarSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where saved summaries go.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory that relative sink names resolve against.
    pub dir: String,
    /// Default sink for the save tool.
    pub save_file: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            save_file: "contract_output.txt".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("klausul")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.output.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.agent.max_turns, 15);
        assert_eq!(settings.edgar.preview_chars, 5000);
        assert_eq!(settings.edgar.default_form_type, "10-K");
        assert_eq!(settings.output.save_file, "contract_output.txt");
        assert_eq!(settings.general.log_level, "warn");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [agent]
            max_turns = 4

            [edgar]
            user_agent = "Acme Research research@acme.test"
            "#,
        )
        .unwrap();

        assert_eq!(settings.agent.max_turns, 4);
        assert_eq!(settings.agent.tool_timeout_secs, 60);
        assert_eq!(settings.edgar.user_agent, "Acme Research research@acme.test");
        assert_eq!(
            settings.edgar.tickers_url,
            "https://www.sec.gov/files/company_tickers.json"
        );
        assert_eq!(settings.model.name, "gpt-4o-mini");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.agent.max_turns, 15);
    }

    #[test]
    fn test_output_dir_expands_tilde() {
        let mut settings = Settings::default();
        settings.output.dir = "/var/klausul".to_string();
        assert_eq!(settings.output_dir(), PathBuf::from("/var/klausul"));

        settings.output.dir = "~/contracts".to_string();
        assert!(!settings.output_dir().to_string_lossy().starts_with('~'));
    }
}
