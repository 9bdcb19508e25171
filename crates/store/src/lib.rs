//! Collaborator abstractions for the alarm coordinator: the status store that
//! owns alarm/arming/sensor state, and the detector that scores camera images.

pub mod detector;
pub mod file;
pub mod memory;
pub mod state;

use catwatch_core::{AlarmStatus, ArmingStatus, CatwatchResult, Image, Sensor};

pub use detector::{FixedDetector, RandomDetector};
pub use file::JsonFileStore;
pub use memory::InMemoryStore;
pub use state::StoreState;

/// Owner of the durable alarm state.
///
/// All methods are fallible: a store backed by disk or network reports its
/// failures instead of returning a guessed value.
pub trait StatusStore: Send + Sync {
    fn alarm_status(&self) -> CatwatchResult<AlarmStatus>;
    fn set_alarm_status(&self, status: AlarmStatus) -> CatwatchResult<()>;

    fn arming_status(&self) -> CatwatchResult<ArmingStatus>;
    fn set_arming_status(&self, status: ArmingStatus) -> CatwatchResult<()>;

    /// All known sensors, sorted by identity.
    fn sensors(&self) -> CatwatchResult<Vec<Sensor>>;

    /// No-op if a sensor with the same identity is already present.
    fn add_sensor(&self, sensor: Sensor) -> CatwatchResult<()>;

    /// No-op if the sensor is absent.
    fn remove_sensor(&self, sensor: &Sensor) -> CatwatchResult<()>;

    /// Replaces the stored record with the same identity.
    /// Fails with `UnknownSensor` if there is none.
    fn update_sensor(&self, sensor: Sensor) -> CatwatchResult<()>;

    /// Clears every sensor's active flag in one write. Either all flags are
    /// cleared or none are. Returns how many sensors were active.
    fn deactivate_all_sensors(&self) -> CatwatchResult<usize>;
}

/// Image classifier reporting whether a cat is present.
pub trait Detector: Send + Sync {
    /// `true` when a cat is detected above `confidence_threshold` (0-100).
    fn score_image(&self, image: &Image, confidence_threshold: f32) -> CatwatchResult<bool>;
}

impl<T: StatusStore + ?Sized> StatusStore for std::sync::Arc<T> {
    fn alarm_status(&self) -> CatwatchResult<AlarmStatus> {
        (**self).alarm_status()
    }

    fn set_alarm_status(&self, status: AlarmStatus) -> CatwatchResult<()> {
        (**self).set_alarm_status(status)
    }

    fn arming_status(&self) -> CatwatchResult<ArmingStatus> {
        (**self).arming_status()
    }

    fn set_arming_status(&self, status: ArmingStatus) -> CatwatchResult<()> {
        (**self).set_arming_status(status)
    }

    fn sensors(&self) -> CatwatchResult<Vec<Sensor>> {
        (**self).sensors()
    }

    fn add_sensor(&self, sensor: Sensor) -> CatwatchResult<()> {
        (**self).add_sensor(sensor)
    }

    fn remove_sensor(&self, sensor: &Sensor) -> CatwatchResult<()> {
        (**self).remove_sensor(sensor)
    }

    fn update_sensor(&self, sensor: Sensor) -> CatwatchResult<()> {
        (**self).update_sensor(sensor)
    }

    fn deactivate_all_sensors(&self) -> CatwatchResult<usize> {
        (**self).deactivate_all_sensors()
    }
}

impl<T: Detector + ?Sized> Detector for std::sync::Arc<T> {
    fn score_image(&self, image: &Image, confidence_threshold: f32) -> CatwatchResult<bool> {
        (**self).score_image(image, confidence_threshold)
    }
}
