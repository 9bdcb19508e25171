//! Status observers and their registry.

use catwatch_core::{AlarmStatus, ArmingStatus};
use serde::Serialize;
use std::sync::{Arc, RwLock};

/// Something observable happened inside the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum AlarmEvent {
    AlarmStatusChanged(AlarmStatus),
    ArmingStatusChanged(ArmingStatus),
    /// The sensor set or a sensor's activation flag changed.
    SensorsChanged,
    /// Result of the most recent detector call.
    CatDetected(bool),
}

/// Receives coordinator events. Implementations must not block for long:
/// dispatch is synchronous on the caller's thread.
pub trait StatusObserver: Send + Sync {
    fn alarm_status_changed(&self, status: AlarmStatus);

    fn sensor_status_changed(&self);

    fn cat_detection_changed(&self, cat_detected: bool);

    fn arming_status_changed(&self, _status: ArmingStatus) {}

    /// Routes an event to the matching callback.
    fn notify(&self, event: &AlarmEvent) {
        match *event {
            AlarmEvent::AlarmStatusChanged(s) => self.alarm_status_changed(s),
            AlarmEvent::ArmingStatusChanged(s) => self.arming_status_changed(s),
            AlarmEvent::SensorsChanged => self.sensor_status_changed(),
            AlarmEvent::CatDetected(cat) => self.cat_detection_changed(cat),
        }
    }
}

/// Registered observers, unique by `Arc` identity.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: RwLock<Vec<Arc<dyn StatusObserver>>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if this observer was already registered.
    pub fn add(&self, observer: Arc<dyn StatusObserver>) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        if observers.iter().any(|o| Arc::ptr_eq(o, &observer)) {
            return false;
        }
        observers.push(observer);
        true
    }

    /// Returns `false` if this observer was not registered.
    pub fn remove(&self, observer: &Arc<dyn StatusObserver>) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(|e| e.into_inner());
        let before = observers.len();
        observers.retain(|o| !Arc::ptr_eq(o, observer));
        observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dispatches `events` in order to a snapshot of the registry, so an
    /// observer may add or remove observers from inside a callback.
    pub fn publish(&self, events: &[AlarmEvent]) {
        if events.is_empty() {
            return;
        }
        let snapshot: Vec<Arc<dyn StatusObserver>> = self
            .observers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        for event in events {
            for observer in &snapshot {
                observer.notify(event);
            }
        }
    }
}

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StatusObserver for TracingObserver {
    fn alarm_status_changed(&self, status: AlarmStatus) {
        tracing::info!(alarm = %status, description = status.description(), "alarm status");
    }

    fn sensor_status_changed(&self) {
        tracing::info!("sensors changed");
    }

    fn cat_detection_changed(&self, cat_detected: bool) {
        tracing::info!(cat_detected, "image processed");
    }

    fn arming_status_changed(&self, status: ArmingStatus) {
        tracing::info!(arming = %status, "arming status");
    }
}
