//! Centralized error types for the Catwatch workspace.

use thiserror::Error;

/// Top-level error enum. Variants map to failure sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatwatchError {
    #[error("Status store error: {0}")]
    Store(String),

    #[error("Detector error: {0}")]
    Detector(String),

    #[error("Unknown sensor: {0}")]
    UnknownSensor(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type CatwatchResult<T> = Result<T, CatwatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_source() {
        let err = CatwatchError::UnknownSensor("front door (DOOR)".into());
        assert_eq!(err.to_string(), "Unknown sensor: front door (DOOR)");

        let err = CatwatchError::Store("disk full".into());
        assert_eq!(err.to_string(), "Status store error: disk full");
    }
}
