//! NDJSON (newline-delimited JSON) event log.
//!
//! ```ignore
//! let log = Arc::new(EventLog::new(File::create("events.ndjson")?));
//! coordinator.add_status_listener(log.clone());
//! ```

use super::EventRow;
use crate::observer::{AlarmEvent, StatusObserver};
use catwatch_core::{AlarmStatus, ArmingStatus};
use std::io::{self, BufWriter, Write};
use std::sync::Mutex;

/// Appends one JSON row per coordinator event to any `Write`.
///
/// Each row is serialized straight into a `BufWriter` and flushed, so a
/// reader tailing the file sees events as they happen. Write failures are
/// logged and dropped: a broken log must not fail an alarm transition.
pub struct EventLog<W: Write> {
    inner: Mutex<Inner<W>>,
}

struct Inner<W: Write> {
    writer: BufWriter<W>,
    rows_written: usize,
}

impl EventLog<io::Stdout> {
    /// Write NDJSON to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> EventLog<W> {
    /// Create a log wrapping any writer (file, Vec<u8>, etc.).
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(Inner {
                writer: BufWriter::new(writer),
                rows_written: 0,
            }),
        }
    }

    /// Write one row.
    pub fn write_row(&self, row: &EventRow) -> io::Result<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "event log lock poisoned"))?;
        serde_json::to_writer(&mut inner.writer, row)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        inner.writer.write_all(b"\n")?;
        inner.writer.flush()?;
        inner.rows_written += 1;
        Ok(())
    }

    /// Number of rows written so far.
    pub fn rows_written(&self) -> usize {
        self.inner.lock().map(|i| i.rows_written).unwrap_or(0)
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        let inner = self
            .inner
            .into_inner()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "event log lock poisoned"))?;
        inner.writer.into_inner().map_err(|e| e.into_error())
    }

    fn record(&self, event: AlarmEvent) {
        if let Err(e) = self.write_row(&EventRow::now(event)) {
            tracing::warn!(error = %e, ?event, "event log write failed");
        }
    }
}

impl<W: Write + Send> StatusObserver for EventLog<W> {
    fn alarm_status_changed(&self, status: AlarmStatus) {
        self.record(AlarmEvent::AlarmStatusChanged(status));
    }

    fn sensor_status_changed(&self) {
        self.record(AlarmEvent::SensorsChanged);
    }

    fn cat_detection_changed(&self, cat_detected: bool) {
        self.record(AlarmEvent::CatDetected(cat_detected));
    }

    fn arming_status_changed(&self, status: ArmingStatus) {
        self.record(AlarmEvent::ArmingStatusChanged(status));
    }
}
