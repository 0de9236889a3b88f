//! `tyflow.toml` configuration.
//!
//! ```toml
//! [inference]
//! enabled = true
//! confidence_threshold = 0.5
//! max_passes = 10
//! ```

use std::path::Path;

use serde::Deserialize;
use tyflow_typeck::InferOptions;

/// File name looked up next to the input when `--config` is not given.
pub const CONFIG_FILE: &str = "tyflow.toml";

/// A parsed `tyflow.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inference: InferenceSection,
}

/// The `[inference]` table. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceSection {
    pub enabled: Option<bool>,
    pub confidence_threshold: Option<f32>,
    pub max_passes: Option<usize>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_str(&content).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn from_str(content: &str) -> Result<Config, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// `tyflow.toml` in the input file's directory, or the defaults.
    pub fn discover(input: &Path) -> Result<Config, String> {
        let dir = input.parent().unwrap_or_else(|| Path::new("."));
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            Self::from_file(&candidate)
        } else {
            Ok(Config::default())
        }
    }

    /// Engine options. Unlike the library default, the CLI runs the engine
    /// unless the file turns it off.
    pub fn options(&self) -> InferOptions {
        let defaults = InferOptions::default();
        InferOptions {
            enabled: self.inference.enabled.unwrap_or(true),
            confidence_threshold: self
                .inference
                .confidence_threshold
                .unwrap_or(defaults.confidence_threshold),
            max_passes: self.inference.max_passes.unwrap_or(defaults.max_passes),
        }
    }
}
