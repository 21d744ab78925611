//! # Config File Layer
//!
//! Optional TOML file supplying defaults for the few knobs the analysis
//! exposes. CLI flags always override a value present here; a value absent
//! from both falls back to the built-in default in
//! `concretize_core::limits`.

use std::path::Path;

use concretize_core::AnalysisError;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub top: Option<usize>,
    pub byte_cost: Option<u64>,
    pub json: Option<bool>,
}

pub fn load_config(path: &Path) -> Result<FileConfig, AnalysisError> {
    let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::Io(e.to_string()))?;
    toml::from_str(&text).map_err(|e| AnalysisError::Schema(e.to_string()))
}
