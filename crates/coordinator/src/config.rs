//! Coordinator tuning.

use serde::Deserialize;

/// Detector threshold used when none is configured.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 50.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Passed to every detector call, on the detector's 0-100 scale.
    pub confidence_threshold: f32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl CoordinatorConfig {
    pub fn with_confidence_threshold(mut self, threshold: f32) -> Self {
        self.confidence_threshold = threshold;
        self
    }
}
