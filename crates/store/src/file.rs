//! JSON-file store.
//!
//! The whole [`StoreState`] is rewritten on every mutation via a temp file
//! and rename, so a crash mid-write leaves the previous document intact.

use crate::state::StoreState;
use crate::StatusStore;
use catwatch_core::{AlarmStatus, ArmingStatus, CatwatchError, CatwatchResult, Sensor};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Persists store state as a pretty-printed JSON document.
///
/// ```ignore
/// let store = JsonFileStore::open("catwatch.json")?;
/// store.set_arming_status(ArmingStatus::ArmedAway)?;
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonFileStore {
    /// Loads `path`, or starts from defaults if it does not exist yet.
    /// The file is only created on the first mutation.
    pub fn open(path: impl AsRef<Path>) -> CatwatchResult<Self> {
        let path = path.as_ref().to_path_buf();

        let state = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                CatwatchError::Store(format!("Failed to parse {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no state file, starting from defaults");
                StoreState::default()
            }
            Err(e) => {
                return Err(CatwatchError::Store(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        tracing::debug!(
            path = %path.display(),
            alarm = %state.alarm_status,
            arming = %state.arming_status,
            sensors = state.sensors.len(),
            cat_detected = state.cat_detected,
            "opened state file"
        );

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detector result recorded by [`set_cat_detected`](Self::set_cat_detected).
    pub fn cat_detected(&self) -> CatwatchResult<bool> {
        Ok(self.lock()?.cat_detected)
    }

    /// Records the latest detector result so a later process can seed its
    /// coordinator with it.
    pub fn set_cat_detected(&self, cat_detected: bool) -> CatwatchResult<()> {
        self.mutate(|s| {
            s.cat_detected = cat_detected;
            Ok(())
        })
    }

    fn lock(&self) -> CatwatchResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|_| CatwatchError::Store("file store lock poisoned".into()))
    }

    /// Applies `f` to a copy and only commits it in memory once it is on disk.
    fn mutate<T>(&self, f: impl FnOnce(&mut StoreState) -> CatwatchResult<T>) -> CatwatchResult<T> {
        let mut guard = self.lock()?;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.write(&next)?;
        *guard = next;
        Ok(out)
    }

    fn write(&self, state: &StoreState) -> CatwatchResult<()> {
        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| CatwatchError::Store(format!("Failed to encode state: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                CatwatchError::Store(format!("Failed to write {}: {e}", self.path.display()))
            })
    }
}

impl StatusStore for JsonFileStore {
    fn alarm_status(&self) -> CatwatchResult<AlarmStatus> {
        Ok(self.lock()?.alarm_status)
    }

    fn set_alarm_status(&self, status: AlarmStatus) -> CatwatchResult<()> {
        self.mutate(|s| {
            s.alarm_status = status;
            Ok(())
        })
    }

    fn arming_status(&self) -> CatwatchResult<ArmingStatus> {
        Ok(self.lock()?.arming_status)
    }

    fn set_arming_status(&self, status: ArmingStatus) -> CatwatchResult<()> {
        self.mutate(|s| {
            s.arming_status = status;
            Ok(())
        })
    }

    fn sensors(&self) -> CatwatchResult<Vec<Sensor>> {
        Ok(self.lock()?.sorted_sensors())
    }

    fn add_sensor(&self, sensor: Sensor) -> CatwatchResult<()> {
        self.mutate(|s| {
            s.add_sensor(sensor);
            Ok(())
        })
    }

    fn remove_sensor(&self, sensor: &Sensor) -> CatwatchResult<()> {
        self.mutate(|s| {
            s.remove_sensor(sensor);
            Ok(())
        })
    }

    fn update_sensor(&self, sensor: Sensor) -> CatwatchResult<()> {
        self.mutate(|s| s.update_sensor(sensor))
    }

    fn deactivate_all_sensors(&self) -> CatwatchResult<usize> {
        self.mutate(|s| Ok(s.deactivate_all()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catwatch_core::SensorType;

    #[test]
    fn missing_file_opens_with_defaults_and_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.arming_status().unwrap(), ArmingStatus::Disarmed);
        assert!(!path.exists());
    }

    #[test]
    fn mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let door = Sensor::new("front", SensorType::Door);

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.set_arming_status(ArmingStatus::ArmedAway).unwrap();
            store.set_alarm_status(AlarmStatus::PendingAlarm).unwrap();
            store.add_sensor(door.clone()).unwrap();
            store.update_sensor(door.clone().with_active(true)).unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.arming_status().unwrap(), ArmingStatus::ArmedAway);
        assert_eq!(store.alarm_status().unwrap(), AlarmStatus::PendingAlarm);
        let sensors = store.sensors().unwrap();
        assert_eq!(sensors.len(), 1);
        assert!(sensors[0].active);
    }

    #[test]
    fn corrupt_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"{ not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, CatwatchError::Store(_)));
    }

    #[test]
    fn failed_update_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileStore::open(&path).unwrap();
        let err = store
            .update_sensor(Sensor::new("ghost", SensorType::Window))
            .unwrap_err();
        assert!(matches!(err, CatwatchError::UnknownSensor(_)));
        assert!(!path.exists());
    }

    #[test]
    fn bulk_deactivation_is_one_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            for (name, kind) in [("front", SensorType::Door), ("hall", SensorType::Motion)] {
                let sensor = Sensor::new(name, kind);
                store.add_sensor(sensor.clone()).unwrap();
                store.update_sensor(sensor.with_active(true)).unwrap();
            }
            assert_eq!(store.deactivate_all_sensors().unwrap(), 2);
        }

        let store = JsonFileStore::open(&path).unwrap();
        let sensors = store.sensors().unwrap();
        assert_eq!(sensors.len(), 2);
        assert!(sensors.iter().all(|s| !s.active));
        assert!(!dir.path().join("state.json.tmp").exists());
    }

    #[test]
    fn cat_detection_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileStore::open(&path).unwrap();
        assert!(!store.cat_detected().unwrap());
        store.set_cat_detected(true).unwrap();
        drop(store);

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.cat_detected().unwrap());
    }
}
