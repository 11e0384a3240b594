use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InteropError, InteropResult};
use crate::logging::{parse_level, LogConfig};

/// Bridge configuration, usually read from `unreal_interop.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteropConfig {
    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub resolver: ResolverSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub file: Option<String>,

    #[serde(default = "default_false")]
    pub json: bool,

    #[serde(default = "default_false")]
    pub spans: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverSection {
    /// Shared library whose exports back the global resolver
    #[serde(default)]
    pub library: Option<PathBuf>,

    /// Prepended to every slot name when looking up library exports
    #[serde(default)]
    pub symbol_prefix: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            json: false,
            spans: false,
        }
    }
}

fn default_level() -> String { "info".to_string() }
fn default_false() -> bool { false }

impl LoggingSection {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            level: parse_level(&self.level),
            file_output: self.file.is_some(),
            log_path: self.file.clone(),
            json_format: self.json,
            show_spans: self.spans,
        }
    }
}

impl InteropConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> InteropResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| InteropError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> InteropResult<Self> {
        toml::from_str(content).map_err(|e| InteropError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Find `unreal_interop.toml` in `start` or any parent directory
    pub fn discover(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join("unreal_interop.toml"))
            .find(|candidate| candidate.is_file())
    }

    /// Apply `UNREAL_INTEROP_*` environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(library) = std::env::var("UNREAL_INTEROP_LIBRARY") {
            self.resolver.library = Some(PathBuf::from(library));
        }
        if let Ok(prefix) = std::env::var("UNREAL_INTEROP_SYMBOL_PREFIX") {
            self.resolver.symbol_prefix = prefix;
        }
        if let Ok(level) = std::env::var("UNREAL_INTEROP_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(file) = std::env::var("UNREAL_INTEROP_LOG_FILE") {
            self.logging.file = Some(file);
        }
        self
    }
}
