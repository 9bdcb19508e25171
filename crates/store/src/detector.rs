//! Stand-in detectors for running without a recognition backend.

use crate::Detector;
use catwatch_core::{CatwatchError, CatwatchResult, Image};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

fn check_image(image: &Image) -> CatwatchResult<()> {
    if image.is_empty() {
        return Err(CatwatchError::InvalidInput("image has no data".into()));
    }
    Ok(())
}

/// Draws a score in `0..100` per image and reports a cat when it exceeds the
/// threshold.
#[derive(Debug)]
pub struct RandomDetector {
    rng: Mutex<StdRng>,
}

impl RandomDetector {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible sequence of scores.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for RandomDetector {
    fn score_image(&self, image: &Image, confidence_threshold: f32) -> CatwatchResult<bool> {
        check_image(image)?;

        let score: u32 = self
            .rng
            .lock()
            .map_err(|_| CatwatchError::Detector("rng lock poisoned".into()))?
            .gen_range(0..100);
        let detected = score as f32 > confidence_threshold;

        tracing::debug!(score, confidence_threshold, detected, bytes = image.len(), "scored image");
        Ok(detected)
    }
}

/// Always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedDetector(pub bool);

impl Detector for FixedDetector {
    fn score_image(&self, image: &Image, _confidence_threshold: f32) -> CatwatchResult<bool> {
        check_image(image)?;
        Ok(self.0)
    }
}
