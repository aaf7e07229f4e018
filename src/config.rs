use crate::cli::{ColorMode, OutputFormat};
use crate::symbols::Operator;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },
}

/// Settings of the command line front end, read from a JSON5 file
///
/// ```text
/// {
///   default_operator: "||",
///   format: "json",
///   strict: true,
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Operator joining the top-level fragments of a parsed expression
    pub default_operator: Operator,
    pub format: OutputFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Check expression shapes before parsing and refuse malformed operands
    pub strict: bool,
    pub color: ColorMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_operator: Operator::And,
            format: OutputFormat::Text,
            pretty: true,
            strict: false,
            color: ColorMode::Auto,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<EngineConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<EngineConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    json5::from_str::<EngineConfig>(&raw).map_err(|e| ConfigError::Parse {
        path: path_display,
        message: e.to_string(),
    })
}

pub fn default_config() -> &'static EngineConfig {
    static DEFAULT_CONFIG: LazyLock<EngineConfig> = LazyLock::new(EngineConfig::default);
    &DEFAULT_CONFIG
}
