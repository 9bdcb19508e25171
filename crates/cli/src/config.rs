//! Settings file for the `catwatch` binary.
//!
//! ```toml
//! state_path = "/var/lib/catwatch/state.json"
//! confidence_threshold = 65.0
//! event_log = "/var/log/catwatch/events.ndjson"
//! ```
//!
//! Precedence: command-line flag > file > built-in default.

use catwatch_coordinator::config::DEFAULT_CONFIDENCE_THRESHOLD;
use catwatch_coordinator::CoordinatorConfig;
use catwatch_core::{CatwatchError, CatwatchResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_STATE_PATH: &str = "catwatch.json";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub state_path: Option<PathBuf>,
    pub confidence_threshold: Option<f32>,
    pub event_log: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> CatwatchResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CatwatchError::InvalidInput(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::parse(&text).map_err(|e| {
            CatwatchError::InvalidInput(format!("Invalid config {}: {e}", path.display()))
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Effective settings after merging flags over the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub state_path: PathBuf,
    pub event_log: Option<PathBuf>,
    pub coordinator: CoordinatorConfig,
}

impl Settings {
    pub fn resolve(
        file: FileConfig,
        state_flag: Option<PathBuf>,
        threshold_flag: Option<f32>,
        event_log_flag: Option<PathBuf>,
    ) -> CatwatchResult<Self> {
        let threshold = threshold_flag
            .or(file.confidence_threshold)
            .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD);
        if !(0.0..=100.0).contains(&threshold) {
            return Err(CatwatchError::InvalidInput(format!(
                "confidence threshold {threshold} is outside 0-100"
            )));
        }

        Ok(Self {
            state_path: state_flag
                .or(file.state_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH)),
            event_log: event_log_flag.or(file.event_log),
            coordinator: CoordinatorConfig::default().with_confidence_threshold(threshold),
        })
    }
}
