//! Alarm coordinator: transition rules, observer plumbing, and event sinks.

pub mod config;
pub mod coordinator;
pub mod observer;
pub mod rules;
pub mod sink;

pub use config::CoordinatorConfig;
pub use coordinator::AlarmCoordinator;
pub use observer::{AlarmEvent, ObserverRegistry, StatusObserver, TracingObserver};
pub use rules::SensorEvent;
pub use sink::EventLog;
