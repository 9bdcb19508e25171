//! The alarm coordinator.
//!
//! Every operation runs as one critical section: read the store, apply the
//! rules in [`crate::rules`], write the store. Events raised along the way
//! are collected and published to observers once the lock is released, in
//! the order the writes happened.

use crate::config::CoordinatorConfig;
use crate::observer::{AlarmEvent, ObserverRegistry, StatusObserver};
use crate::rules::{self, SensorEvent};
use catwatch_core::{AlarmStatus, ArmingStatus, CatwatchError, CatwatchResult, Image, Sensor};
use catwatch_store::{Detector, StatusStore};
use std::sync::{Arc, Mutex, PoisonError};

/// Decision inputs the store does not own.
#[derive(Debug, Default)]
struct DecisionState {
    /// Result of the most recently processed image.
    cat_detected: bool,
}

/// Decides the alarm status from sensor, arming, and image events.
///
/// ```ignore
/// let coordinator = AlarmCoordinator::new(InMemoryStore::new(), RandomDetector::new());
/// coordinator.add_sensor(Sensor::new("front", SensorType::Door))?;
/// coordinator.set_arming_status(ArmingStatus::ArmedAway)?;
/// ```
pub struct AlarmCoordinator<S, D> {
    store: S,
    detector: D,
    config: CoordinatorConfig,
    state: Mutex<DecisionState>,
    observers: ObserverRegistry,
}

impl<S: StatusStore, D: Detector> AlarmCoordinator<S, D> {
    pub fn new(store: S, detector: D) -> Self {
        Self::with_config(store, detector, CoordinatorConfig::default())
    }

    pub fn with_config(store: S, detector: D, config: CoordinatorConfig) -> Self {
        Self {
            store,
            detector,
            config,
            state: Mutex::new(DecisionState::default()),
            observers: ObserverRegistry::new(),
        }
    }

    /// Seeds the remembered detector result, for a coordinator rebuilt from
    /// saved state.
    pub fn with_cat_detected(self, cat_detected: bool) -> Self {
        self.lock().cat_detected = cat_detected;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Arming
    // -----------------------------------------------------------------------

    /// Disarming clears any alarm. Arming resets every sensor to inactive in
    /// bulk and raises the alarm if the last processed image had a cat.
    pub fn set_arming_status(&self, arming: ArmingStatus) -> CatwatchResult<()> {
        self.critical(|state, events| {
            if arming.is_armed() {
                let reset = self.reset_sensors()?;
                tracing::debug!(reset, "sensors reset for arming");
                events.push(AlarmEvent::SensorsChanged);
            }

            if let Some(target) = rules::arming_transition(arming, state.cat_detected) {
                self.write_alarm(target, events)?;
            }

            self.store.set_arming_status(arming)?;
            events.push(AlarmEvent::ArmingStatusChanged(arming));
            tracing::info!(arming = %arming, cat_detected = state.cat_detected, "arming status set");
            Ok(())
        })
    }

    fn reset_sensors(&self) -> CatwatchResult<usize> {
        self.store.deactivate_all_sensors()
    }

    // -----------------------------------------------------------------------
    // Sensors
    // -----------------------------------------------------------------------

    /// Records the sensor's new flag, then applies the sensor rules against
    /// the alarm and arming status read before the write.
    ///
    /// Returns the alarm status after the event.
    pub fn change_sensor_activation(
        &self,
        sensor: &Sensor,
        active: bool,
    ) -> CatwatchResult<AlarmStatus> {
        self.apply_sensor_change(sensor, |_| active)
    }

    /// Inverts the sensor's stored flag. For callers that only know "this
    /// sensor fired" and do not track its prior state.
    pub fn toggle_sensor(&self, sensor: &Sensor) -> CatwatchResult<AlarmStatus> {
        self.apply_sensor_change(sensor, |was_active| !was_active)
    }

    fn apply_sensor_change(
        &self,
        sensor: &Sensor,
        next: impl FnOnce(bool) -> bool,
    ) -> CatwatchResult<AlarmStatus> {
        self.critical(|_, events| {
            let stored = self.known_sensor(sensor)?;
            let alarm = self.store.alarm_status()?;
            let arming = self.store.arming_status()?;

            let event = SensorEvent::new(stored.active, next(stored.active));
            self.store
                .update_sensor(stored.clone().with_active(event.now_active))?;
            events.push(AlarmEvent::SensorsChanged);

            tracing::debug!(
                sensor = %stored,
                was_active = event.was_active,
                now_active = event.now_active,
                alarm = %alarm,
                arming = %arming,
                "sensor event"
            );

            match rules::sensor_transition(alarm, arming, event) {
                Some(target) => {
                    self.write_alarm(target, events)?;
                    Ok(target)
                }
                None => Ok(alarm),
            }
        })
    }

    fn known_sensor(&self, sensor: &Sensor) -> CatwatchResult<Sensor> {
        self.store
            .sensors()?
            .into_iter()
            .find(|s| s == sensor)
            .ok_or_else(|| {
                tracing::warn!(sensor = %sensor, "rejected event for unregistered sensor");
                CatwatchError::UnknownSensor(sensor.to_string())
            })
    }

    pub fn add_sensor(&self, sensor: Sensor) -> CatwatchResult<()> {
        self.critical(|_, events| {
            tracing::info!(sensor = %sensor, "adding sensor");
            self.store.add_sensor(sensor)?;
            events.push(AlarmEvent::SensorsChanged);
            Ok(())
        })
    }

    pub fn remove_sensor(&self, sensor: &Sensor) -> CatwatchResult<()> {
        self.critical(|_, events| {
            tracing::info!(sensor = %sensor, "removing sensor");
            self.store.remove_sensor(sensor)?;
            events.push(AlarmEvent::SensorsChanged);
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Images
    // -----------------------------------------------------------------------

    /// Scores `image` and remembers the result for later arming changes.
    ///
    /// A cat while armed-home raises the alarm. No cat with every sensor
    /// inactive clears it. Returns whether a cat was detected.
    pub fn process_image(&self, image: &Image) -> CatwatchResult<bool> {
        self.critical(|state, events| {
            let cat_detected = self
                .detector
                .score_image(image, self.config.confidence_threshold)?;
            state.cat_detected = cat_detected;
            events.push(AlarmEvent::CatDetected(cat_detected));

            let arming = self.store.arming_status()?;
            let any_active = self.store.sensors()?.iter().any(|s| s.active);
            tracing::info!(cat_detected, arming = %arming, any_active, "image processed");

            if let Some(target) = rules::image_transition(arming, cat_detected, any_active) {
                self.write_alarm(target, events)?;
            }
            Ok(cat_detected)
        })
    }

    // -----------------------------------------------------------------------
    // Observers & accessors
    // -----------------------------------------------------------------------

    /// Returns `false` if the observer was already registered.
    pub fn add_status_listener(&self, observer: Arc<dyn StatusObserver>) -> bool {
        self.observers.add(observer)
    }

    /// Returns `false` if the observer was not registered.
    pub fn remove_status_listener(&self, observer: &Arc<dyn StatusObserver>) -> bool {
        self.observers.remove(observer)
    }

    pub fn alarm_status(&self) -> CatwatchResult<AlarmStatus> {
        self.store.alarm_status()
    }

    pub fn arming_status(&self) -> CatwatchResult<ArmingStatus> {
        self.store.arming_status()
    }

    pub fn sensors(&self) -> CatwatchResult<Vec<Sensor>> {
        self.store.sensors()
    }

    pub fn is_cat_detected(&self) -> bool {
        self.lock().cat_detected
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn write_alarm(&self, target: AlarmStatus, events: &mut Vec<AlarmEvent>) -> CatwatchResult<()> {
        self.store.set_alarm_status(target)?;
        events.push(AlarmEvent::AlarmStatusChanged(target));
        tracing::info!(alarm = %target, "alarm status set");
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DecisionState> {
        // The guarded state is a single flag; a panicking holder cannot leave it torn.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` under the coordinator lock, then publishes whatever events it
    /// recorded. Events are published even when `f` fails partway, since
    /// the writes before the failure did happen.
    fn critical<T>(
        &self,
        f: impl FnOnce(&mut DecisionState, &mut Vec<AlarmEvent>) -> CatwatchResult<T>,
    ) -> CatwatchResult<T> {
        let mut events = Vec::new();
        let result = {
            let mut state = self.lock();
            f(&mut state, &mut events)
        };
        if let Err(e) = &result {
            tracing::warn!(error = %e, applied = events.len(), "coordinator operation failed");
        }
        self.observers.publish(&events);
        result
    }
}
