//! Alarm transition rules.
//!
//! Pure functions of `(current state, event) -> Option<new AlarmStatus>`.
//! `None` means "leave the alarm status alone". The coordinator owns reads,
//! writes, and notification; nothing here touches storage.

use catwatch_core::{AlarmStatus, ArmingStatus};

/// A change to one sensor's activation flag.
///
/// `was_active` is the flag on record before the change, so a repeated
/// deactivation can be told apart from a real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorEvent {
    pub was_active: bool,
    pub now_active: bool,
}

impl SensorEvent {
    pub fn new(was_active: bool, now_active: bool) -> Self {
        Self {
            was_active,
            now_active,
        }
    }
}

/// Sensor activation/deactivation.
///
/// | alarm   | arming   | event                 | result   |
/// |---------|----------|-----------------------|----------|
/// | ALARM   | any      | any                   | -        |
/// | any     | DISARMED | activate              | -        |
/// | NO      | armed    | activate              | PENDING  |
/// | PENDING | armed    | activate              | ALARM    |
/// | PENDING | any      | active -> inactive    | NO       |
/// | any     | any      | inactive -> inactive  | -        |
pub fn sensor_transition(
    alarm: AlarmStatus,
    arming: ArmingStatus,
    event: SensorEvent,
) -> Option<AlarmStatus> {
    match (alarm, event.now_active) {
        (AlarmStatus::Alarm, _) => None,
        (_, true) if !arming.is_armed() => None,
        (AlarmStatus::NoAlarm, true) => Some(AlarmStatus::PendingAlarm),
        (AlarmStatus::PendingAlarm, true) => Some(AlarmStatus::Alarm),
        (AlarmStatus::PendingAlarm, false) if event.was_active => Some(AlarmStatus::NoAlarm),
        (AlarmStatus::PendingAlarm, false) | (AlarmStatus::NoAlarm, false) => None,
    }
}

/// Arming mode change. `cat_detected` is the result of the most recent
/// image, even one processed while disarmed.
///
/// A remembered cat only alarms when arming home, the same condition
/// [`image_transition`] applies to a fresh detection.
pub fn arming_transition(new_arming: ArmingStatus, cat_detected: bool) -> Option<AlarmStatus> {
    match new_arming {
        ArmingStatus::Disarmed => Some(AlarmStatus::NoAlarm),
        ArmingStatus::ArmedHome if cat_detected => Some(AlarmStatus::Alarm),
        ArmingStatus::ArmedHome | ArmingStatus::ArmedAway => None,
    }
}

/// Detector result for a processed image.
pub fn image_transition(
    arming: ArmingStatus,
    cat_detected: bool,
    any_sensor_active: bool,
) -> Option<AlarmStatus> {
    match (cat_detected, arming) {
        (true, ArmingStatus::ArmedHome) => Some(AlarmStatus::Alarm),
        (true, _) => None,
        (false, _) if !any_sensor_active => Some(AlarmStatus::NoAlarm),
        (false, _) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARMED: [ArmingStatus; 2] = [ArmingStatus::ArmedHome, ArmingStatus::ArmedAway];

    #[test]
    fn activation_while_armed_raises_pending() {
        for arming in ARMED {
            let next = sensor_transition(AlarmStatus::NoAlarm, arming, SensorEvent::new(false, true));
            assert_eq!(next, Some(AlarmStatus::PendingAlarm));
        }
    }

    #[test]
    fn activation_while_pending_raises_alarm() {
        for arming in ARMED {
            for was_active in [false, true] {
                let next = sensor_transition(
                    AlarmStatus::PendingAlarm,
                    arming,
                    SensorEvent::new(was_active, true),
                );
                assert_eq!(next, Some(AlarmStatus::Alarm));
            }
        }
    }

    #[test]
    fn activation_while_disarmed_is_ignored() {
        for alarm in AlarmStatus::ALL {
            let next = sensor_transition(alarm, ArmingStatus::Disarmed, SensorEvent::new(false, true));
            assert_eq!(next, None);
        }
    }

    #[test]
    fn active_alarm_ignores_every_sensor_event() {
        for arming in ArmingStatus::ALL {
            for was_active in [false, true] {
                for now_active in [false, true] {
                    let ev = SensorEvent::new(was_active, now_active);
                    assert_eq!(sensor_transition(AlarmStatus::Alarm, arming, ev), None);
                }
            }
        }
    }

    #[test]
    fn deactivation_clears_pending_in_any_mode() {
        for arming in ArmingStatus::ALL {
            let next = sensor_transition(
                AlarmStatus::PendingAlarm,
                arming,
                SensorEvent::new(true, false),
            );
            assert_eq!(next, Some(AlarmStatus::NoAlarm));
        }
    }

    #[test]
    fn deactivating_inactive_sensor_never_changes_status() {
        for alarm in AlarmStatus::ALL {
            for arming in ArmingStatus::ALL {
                let next = sensor_transition(alarm, arming, SensorEvent::new(false, false));
                assert_eq!(next, None, "{alarm} / {arming}");
            }
        }
    }

    #[test]
    fn deactivation_without_pending_is_a_no_op() {
        let next = sensor_transition(
            AlarmStatus::NoAlarm,
            ArmingStatus::ArmedAway,
            SensorEvent::new(true, false),
        );
        assert_eq!(next, None);
    }

    #[test]
    fn disarming_always_clears() {
        for cat in [false, true] {
            assert_eq!(
                arming_transition(ArmingStatus::Disarmed, cat),
                Some(AlarmStatus::NoAlarm)
            );
        }
    }

    #[test]
    fn arming_home_with_remembered_cat_alarms() {
        assert_eq!(
            arming_transition(ArmingStatus::ArmedHome, true),
            Some(AlarmStatus::Alarm)
        );
        for arming in ARMED {
            assert_eq!(arming_transition(arming, false), None);
        }
    }

    #[test]
    fn arming_away_ignores_remembered_cat() {
        assert_eq!(arming_transition(ArmingStatus::ArmedAway, true), None);
        assert_eq!(
            arming_transition(ArmingStatus::ArmedAway, true),
            image_transition(ArmingStatus::ArmedAway, true, false)
        );
    }

    #[test]
    fn cat_only_alarms_when_armed_home() {
        assert_eq!(
            image_transition(ArmingStatus::ArmedHome, true, false),
            Some(AlarmStatus::Alarm)
        );
        assert_eq!(image_transition(ArmingStatus::ArmedAway, true, false), None);
        assert_eq!(image_transition(ArmingStatus::Disarmed, true, true), None);
    }

    #[test]
    fn no_cat_clears_only_when_all_sensors_inactive() {
        for arming in ArmingStatus::ALL {
            assert_eq!(
                image_transition(arming, false, false),
                Some(AlarmStatus::NoAlarm)
            );
            assert_eq!(image_transition(arming, false, true), None);
        }
    }
}
