//! CLI configuration loaded from environment variables.
//!
//! Command-line flags take precedence; these are the fallbacks.

use std::path::PathBuf;

use anyhow::{bail, Result};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Parse `"text"` or `"json"` (case-insensitive).
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => bail!("unknown log format '{other}' (expected 'text' or 'json')"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Log level filter string (e.g. "warn", "debug", "qf_match=trace").
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Round description file used when `--file` is not given.
    pub round_file: PathBuf,
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let log_level = lookup("QF_LOG_LEVEL").unwrap_or_else(|| "warn".to_string());

        let log_format = match lookup("QF_LOG_FORMAT") {
            Some(s) => LogFormat::parse(&s)?,
            None => LogFormat::Text,
        };

        let round_file = lookup("QF_ROUND_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(default_round_file);

        Ok(CliConfig {
            log_level,
            log_format,
            round_file,
        })
    }
}

/// `~/.qf/round.json`, or `./round.json` without a home directory.
fn default_round_file() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".qf"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("round.json")
}
