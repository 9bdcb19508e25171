//! Observers that persist coordinator events.
//!
//! One row schema, [`EventRow`], one per [`AlarmEvent`]. One backend:
//! the NDJSON [`EventLog`](json_stream::EventLog).

pub mod json_stream;

use crate::observer::AlarmEvent;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

pub use json_stream::EventLog;

/// One line of the event log -- the tagged event plus a timestamp.
///
/// ```text
/// {"event":"alarm_status_changed","value":"PENDING_ALARM","created_at":"2026-10-18T09:14:02.113Z"}
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct EventRow {
    #[serde(flatten)]
    pub event: AlarmEvent,
    pub created_at: String,
}

impl EventRow {
    pub fn now(event: AlarmEvent) -> Self {
        Self::at(event, Utc::now())
    }

    pub fn at(event: AlarmEvent, at: DateTime<Utc>) -> Self {
        Self {
            event,
            created_at: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
