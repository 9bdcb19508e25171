//! The document every store adapter holds: alarm status, arming status,
//! the sensor set, and the last detector result.

use catwatch_core::{AlarmStatus, ArmingStatus, CatwatchError, CatwatchResult, Sensor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Store contents. Defaults to `NO_ALARM`, `DISARMED`, no sensors, no cat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreState {
    pub alarm_status: AlarmStatus,
    pub arming_status: ArmingStatus,
    #[serde(default)]
    pub sensors: BTreeSet<Sensor>,
    /// Result of the most recently processed image. Only carried here for
    /// processes that do not outlive a single operation.
    #[serde(default)]
    pub cat_detected: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            alarm_status: AlarmStatus::NoAlarm,
            arming_status: ArmingStatus::Disarmed,
            sensors: BTreeSet::new(),
            cat_detected: false,
        }
    }
}

impl StoreState {
    pub fn sorted_sensors(&self) -> Vec<Sensor> {
        self.sensors.iter().cloned().collect()
    }

    /// Returns `false` when the sensor was already present.
    pub fn add_sensor(&mut self, sensor: Sensor) -> bool {
        self.sensors.insert(sensor)
    }

    /// Returns `false` when the sensor was absent.
    pub fn remove_sensor(&mut self, sensor: &Sensor) -> bool {
        self.sensors.remove(sensor)
    }

    pub fn update_sensor(&mut self, sensor: Sensor) -> CatwatchResult<()> {
        if !self.sensors.contains(&sensor) {
            return Err(CatwatchError::UnknownSensor(sensor.to_string()));
        }
        // `replace` swaps in the new `active` flag; `insert` would keep the old one.
        self.sensors.replace(sensor);
        Ok(())
    }

    /// Clears every active flag. Returns how many sensors changed.
    pub fn deactivate_all(&mut self) -> usize {
        let active: Vec<Sensor> = self.sensors.iter().filter(|s| s.active).cloned().collect();
        for sensor in &active {
            self.sensors.replace(sensor.clone().with_active(false));
        }
        active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catwatch_core::SensorType;

    #[test]
    fn update_replaces_active_flag() {
        let mut state = StoreState::default();
        let door = Sensor::new("front", SensorType::Door);
        state.add_sensor(door.clone());

        state.update_sensor(door.clone().with_active(true)).unwrap();
        assert!(state.sensors.get(&door).unwrap().active);
    }

    #[test]
    fn duplicate_add_keeps_existing_record() {
        let mut state = StoreState::default();
        let door = Sensor::new("front", SensorType::Door);
        assert!(state.add_sensor(door.clone().with_active(true)));
        assert!(!state.add_sensor(door.clone()));
        assert!(state.sensors.get(&door).unwrap().active);
    }

    #[test]
    fn update_of_unknown_sensor_fails() {
        let mut state = StoreState::default();
        let err = state
            .update_sensor(Sensor::new("ghost", SensorType::Motion))
            .unwrap_err();
        assert!(matches!(err, CatwatchError::UnknownSensor(_)));
    }

    #[test]
    fn deactivate_all_counts_only_active_sensors() {
        let mut state = StoreState::default();
        state.add_sensor(Sensor::new("front", SensorType::Door).with_active(true));
        state.add_sensor(Sensor::new("hall", SensorType::Motion));
        state.add_sensor(Sensor::new("back", SensorType::Window).with_active(true));

        assert_eq!(state.deactivate_all(), 2);
        assert!(state.sensors.iter().all(|s| !s.active));
        assert_eq!(state.sensors.len(), 3);
        assert_eq!(state.deactivate_all(), 0);
    }

    #[test]
    fn documents_without_cat_field_default_to_no_cat() {
        let json = r#"{"alarm_status":"ALARM","arming_status":"ARMED_HOME"}"#;
        let state: StoreState = serde_json::from_str(json).unwrap();
        assert!(!state.cat_detected);
        assert!(state.sensors.is_empty());
    }
}
