//! CLI command implementations.

mod analyze;
mod config;
mod fetch;

pub use analyze::{run_analyze, EXIT_PARSE_FAILURE};
pub use config::{run_config, run_schema};
pub use fetch::run_fetch;
