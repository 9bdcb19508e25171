//! Process-local store. State lives only as long as the value.

use crate::state::StoreState;
use crate::StatusStore;
use catwatch_core::{AlarmStatus, ArmingStatus, CatwatchError, CatwatchResult, Sensor};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing document, e.g. a fixture in tests.
    pub fn with_state(state: StoreState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> CatwatchResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| CatwatchError::Store("in-memory store lock poisoned".into()))
    }
}

impl StatusStore for InMemoryStore {
    fn alarm_status(&self) -> CatwatchResult<AlarmStatus> {
        Ok(self.lock()?.alarm_status)
    }

    fn set_alarm_status(&self, status: AlarmStatus) -> CatwatchResult<()> {
        self.lock()?.alarm_status = status;
        Ok(())
    }

    fn arming_status(&self) -> CatwatchResult<ArmingStatus> {
        Ok(self.lock()?.arming_status)
    }

    fn set_arming_status(&self, status: ArmingStatus) -> CatwatchResult<()> {
        self.lock()?.arming_status = status;
        Ok(())
    }

    fn sensors(&self) -> CatwatchResult<Vec<Sensor>> {
        Ok(self.lock()?.sorted_sensors())
    }

    fn add_sensor(&self, sensor: Sensor) -> CatwatchResult<()> {
        self.lock()?.add_sensor(sensor);
        Ok(())
    }

    fn remove_sensor(&self, sensor: &Sensor) -> CatwatchResult<()> {
        self.lock()?.remove_sensor(sensor);
        Ok(())
    }

    fn update_sensor(&self, sensor: Sensor) -> CatwatchResult<()> {
        self.lock()?.update_sensor(sensor)
    }

    fn deactivate_all_sensors(&self) -> CatwatchResult<usize> {
        Ok(self.lock()?.deactivate_all())
    }
}
