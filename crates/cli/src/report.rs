//! Status output for the `catwatch` binary.

use catwatch_core::{AlarmStatus, ArmingStatus, Sensor};
use serde::Serialize;

/// What every command prints once it has run.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub alarm_status: AlarmStatus,
    pub arming_status: ArmingStatus,
    pub sensors: Vec<Sensor>,
    /// Only set by `image`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat_detected: Option<bool>,
}

impl StatusReport {
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "Alarm:   {} ({})\n",
            self.alarm_status,
            self.alarm_status.description()
        ));
        out.push_str(&format!(
            "Arming:  {} ({})\n",
            self.arming_status,
            self.arming_status.description()
        ));
        if let Some(cat) = self.cat_detected {
            out.push_str(&format!(
                "Image:   {}\n",
                if cat { "cat detected" } else { "no cat" }
            ));
        }

        if self.sensors.is_empty() {
            out.push_str("Sensors: none\n");
            return out;
        }

        out.push_str("Sensors:\n");
        let width = self.sensors.iter().map(|s| s.name.len()).max().unwrap_or(0);
        for s in &self.sensors {
            out.push_str(&format!(
                "  {:<width$}  {:<6}  {}\n",
                s.name,
                s.sensor_type.as_str(),
                if s.active { "active" } else { "inactive" },
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catwatch_core::SensorType;

    #[test]
    fn render_lists_sensors_aligned() {
        let report = StatusReport {
            alarm_status: AlarmStatus::PendingAlarm,
            arming_status: ArmingStatus::ArmedAway,
            sensors: vec![
                Sensor::new("door", SensorType::Door).with_active(true),
                Sensor::new("kitchen", SensorType::Window),
            ],
            cat_detected: None,
        };

        assert_eq!(
            report.render(),
            "Alarm:   PENDING_ALARM (I'm in danger...)\n\
             Arming:  ARMED_AWAY (Arm - Away)\n\
             Sensors:\n  \
             door     DOOR    active\n  \
             kitchen  WINDOW  inactive\n"
        );
    }

    #[test]
    fn json_omits_unknown_detection() {
        let report = StatusReport {
            alarm_status: AlarmStatus::NoAlarm,
            arming_status: ArmingStatus::Disarmed,
            sensors: vec![],
            cat_detected: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["alarm_status"], "NO_ALARM");
        assert!(json.get("cat_detected").is_none());
    }
}
