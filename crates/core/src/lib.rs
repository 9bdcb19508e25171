//! Domain models, shared types, and error definitions.
//!
//! Foundation crate -- no I/O dependencies.

pub mod error;
pub mod types;

pub use error::{CatwatchError, CatwatchResult};
pub use types::{AlarmStatus, ArmingStatus, Image, Sensor, SensorType};
