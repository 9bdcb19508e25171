//! Domain types for the Catwatch alarm coordinator.

use crate::error::CatwatchError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Uppercases and maps `-` to `_` so `armed-home` parses as `ARMED_HOME`.
fn normalize(s: &str) -> String {
    s.trim().to_ascii_uppercase().replace('-', "_")
}

// ---------------------------------------------------------------------------
// Alarm / arming
// ---------------------------------------------------------------------------

/// Three-level threat state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlarmStatus {
    NoAlarm,
    PendingAlarm,
    Alarm,
}

impl AlarmStatus {
    pub const ALL: [AlarmStatus; 3] = [Self::NoAlarm, Self::PendingAlarm, Self::Alarm];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoAlarm => "NO_ALARM",
            Self::PendingAlarm => "PENDING_ALARM",
            Self::Alarm => "ALARM",
        }
    }

    /// Operator-facing description.
    pub fn description(self) -> &'static str {
        match self {
            Self::NoAlarm => "Cool and good",
            Self::PendingAlarm => "I'm in danger...",
            Self::Alarm => "Awooga!",
        }
    }
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlarmStatus {
    type Err = CatwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "NO_ALARM" => Ok(Self::NoAlarm),
            "PENDING_ALARM" => Ok(Self::PendingAlarm),
            "ALARM" => Ok(Self::Alarm),
            _ => Err(CatwatchError::InvalidInput(format!(
                "unknown alarm status '{s}'"
            ))),
        }
    }
}

/// Whether sensor events may raise alarms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArmingStatus {
    ArmedHome,
    ArmedAway,
    Disarmed,
}

impl ArmingStatus {
    pub const ALL: [ArmingStatus; 3] = [Self::ArmedHome, Self::ArmedAway, Self::Disarmed];

    #[inline]
    pub fn is_armed(self) -> bool {
        !matches!(self, Self::Disarmed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArmedHome => "ARMED_HOME",
            Self::ArmedAway => "ARMED_AWAY",
            Self::Disarmed => "DISARMED",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ArmedHome => "Arm - At Home",
            Self::ArmedAway => "Arm - Away",
            Self::Disarmed => "Disarmed",
        }
    }
}

impl fmt::Display for ArmingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArmingStatus {
    type Err = CatwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "ARMED_HOME" | "HOME" => Ok(Self::ArmedHome),
            "ARMED_AWAY" | "AWAY" => Ok(Self::ArmedAway),
            "DISARMED" => Ok(Self::Disarmed),
            _ => Err(CatwatchError::InvalidInput(format!(
                "unknown arming status '{s}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// Ordered `Door < Window < Motion` for stable listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorType {
    Door,
    Window,
    Motion,
}

impl SensorType {
    pub const ALL: [SensorType; 3] = [Self::Door, Self::Window, Self::Motion];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Door => "DOOR",
            Self::Window => "WINDOW",
            Self::Motion => "MOTION",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = CatwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "DOOR" => Ok(Self::Door),
            "WINDOW" => Ok(Self::Window),
            "MOTION" => Ok(Self::Motion),
            _ => Err(CatwatchError::InvalidInput(format!(
                "unknown sensor type '{s}'"
            ))),
        }
    }
}

/// A named, typed boolean input device.
///
/// Identity is `(name, sensor_type)`. `active` is excluded from equality,
/// hashing, and ordering, so a sensor looked up with a stale flag still
/// matches its stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    pub name: String,
    pub sensor_type: SensorType,
    #[serde(default)]
    pub active: bool,
}

impl Sensor {
    /// New sensors start inactive.
    pub fn new(name: impl Into<String>, sensor_type: SensorType) -> Self {
        Self {
            name: name.into(),
            sensor_type,
            active: false,
        }
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn same_identity(&self, other: &Sensor) -> bool {
        self.name == other.name && self.sensor_type == other.sensor_type
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.sensor_type)
    }
}

impl PartialEq for Sensor {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
    }
}

impl Eq for Sensor {}

impl Hash for Sensor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.sensor_type.hash(state);
    }
}

impl PartialOrd for Sensor {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sensor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then(self.sensor_type.cmp(&other.sensor_type))
    }
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Opaque camera frame handed to a detector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    bytes: Vec<u8>,
}

impl Image {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for Image {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sensor_identity_ignores_active_flag() {
        let a = Sensor::new("front", SensorType::Door);
        let b = a.clone().with_active(true);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn sensors_with_same_name_but_different_type_differ() {
        let door = Sensor::new("hall", SensorType::Door);
        let motion = Sensor::new("hall", SensorType::Motion);
        assert_ne!(door, motion);
        assert!(door < motion);
    }

    #[test]
    fn new_sensor_is_inactive() {
        assert!(!Sensor::new("x", SensorType::Window).active);
    }

    #[test]
    fn parse_is_case_and_dash_insensitive() {
        assert_eq!("armed-home".parse::<ArmingStatus>().unwrap(), ArmingStatus::ArmedHome);
        assert_eq!("away".parse::<ArmingStatus>().unwrap(), ArmingStatus::ArmedAway);
        assert_eq!("pending_alarm".parse::<AlarmStatus>().unwrap(), AlarmStatus::PendingAlarm);
        assert_eq!("Motion".parse::<SensorType>().unwrap(), SensorType::Motion);
    }

    #[test]
    fn parse_rejects_unknown_values() {
        let err = "armed_garage".parse::<ArmingStatus>().unwrap_err();
        assert!(matches!(err, CatwatchError::InvalidInput(_)));
        assert!("skylight".parse::<SensorType>().is_err());
    }

    #[test]
    fn display_matches_parse() {
        for s in AlarmStatus::ALL {
            assert_eq!(s.to_string().parse::<AlarmStatus>().unwrap(), s);
        }
        for s in ArmingStatus::ALL {
            assert_eq!(s.to_string().parse::<ArmingStatus>().unwrap(), s);
        }
    }

    #[test]
    fn only_disarmed_is_unarmed() {
        assert!(ArmingStatus::ArmedHome.is_armed());
        assert!(ArmingStatus::ArmedAway.is_armed());
        assert!(!ArmingStatus::Disarmed.is_armed());
    }

    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&ArmingStatus::ArmedHome).unwrap();
        assert_eq!(json, "\"ARMED_HOME\"");

        let sensor: Sensor =
            serde_json::from_str(r#"{"name":"back","sensor_type":"WINDOW"}"#).unwrap();
        assert_eq!(sensor.sensor_type, SensorType::Window);
        assert!(!sensor.active);
    }
}
