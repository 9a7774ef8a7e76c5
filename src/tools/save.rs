//! `save_text_to_file`: append a timestamped record to a text file.

use super::{optional_string_arg, text_arg, Tool};
use crate::error::{KlausulError, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

const RECORD_HEADER: &str = "--- Contract Summary ---";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serializes appends across every save tool in the process.
static APPEND_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Format one record exactly as it is written to the sink.
pub fn format_record(data: &str, timestamp: &str) -> String {
    format!("{}\nTimestamp: {}\n\n{}\n\n", RECORD_HEADER, timestamp, data)
}

/// Appends records to a text sink. The sink only ever grows.
pub struct SaveTool {
    base_dir: PathBuf,
    default_file: String,
}

impl SaveTool {
    /// `default_file` is used when the model names no file. Names given by
    /// the model must be plain file names and always land in `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, default_file: &str) -> Self {
        Self {
            base_dir: base_dir.into(),
            default_file: default_file.to_string(),
        }
    }

    fn resolve(&self, filename: Option<&str>) -> Result<PathBuf> {
        let Some(name) = filename else {
            return Ok(self.base_dir.join(&self.default_file));
        };

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) => Ok(self.base_dir.join(file)),
            _ => Err(KlausulError::InvalidInput(format!(
                "Filename must be a plain file name, got '{}'",
                name
            ))),
        }
    }

    /// Append `data` with the given timestamp and return the sink path.
    pub async fn append(&self, data: &str, filename: Option<&str>, timestamp: &str) -> Result<PathBuf> {
        let path = self.resolve(filename)?;
        let record = format_record(data, timestamp);

        let _guard = APPEND_LOCK.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(record.as_bytes()).await?;
        file.flush().await?;

        Ok(path)
    }
}

#[async_trait]
impl Tool for SaveTool {
    fn name(&self) -> &str {
        "save_text_to_file"
    }

    fn description(&self) -> &str {
        "Saves structured contract summary to a text file."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "data": {
                    "type": "string",
                    "description": "The text to save"
                },
                "filename": {
                    "type": "string",
                    "description": format!(
                        "Plain file name in the output directory (default: {})",
                        self.default_file
                    )
                }
            },
            "required": ["data"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let data = text_arg(&args, "data")?;
        let filename = optional_string_arg(&args, "filename");
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();

        let path = self.append(&data, filename, &timestamp).await?;
        info!("Saved {} bytes to {}", data.len(), path.display());

        Ok(format!("Data successfully saved to {}", path.display()))
    }
}
