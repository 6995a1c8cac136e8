use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::ApplianceState;

/// Read-only view of the appliance, as served by `GET /api/status`.
///
/// Field names on the wire follow the existing dashboard client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub power: bool,

    #[serde(rename = "current_temperature")]
    pub temperature: f64,

    #[serde(rename = "current_humidity")]
    pub humidity: f64,

    pub fan_speed: u8,

    pub water_level: f64,

    pub target_temperature: f64,

    pub target_humidity: f64,

    #[serde(rename = "timer_running")]
    pub timer_active: bool,

    /// Seconds until the shutoff timer fires, 0 when none is armed.
    #[serde(rename = "timer_remaining")]
    pub timer_remaining_secs: f64,
}

impl StatusSnapshot {
    pub fn capture(state: &ApplianceState, now: Instant) -> Self {
        Self {
            power: state.power,
            temperature: round1(state.temperature),
            humidity: round1(state.humidity),
            fan_speed: state.fan_speed.into(),
            water_level: round1(state.water_level),
            target_temperature: state.target_temperature,
            target_humidity: state.target_humidity,
            timer_active: state.timer_active(),
            timer_remaining_secs: state.timer_remaining(now).as_secs_f64(),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_capture_rounds_readings() {
        let state = ApplianceState {
            temperature: 27.349,
            humidity: 55.96,
            water_level: 99.9000001,
            ..Default::default()
        };

        let status = StatusSnapshot::capture(&state, Instant::now());

        assert_eq!(status.temperature, 27.3);
        assert_eq!(status.humidity, 56.0);
        assert_eq!(status.water_level, 99.9);
        assert!(!status.timer_active);
        assert_eq!(status.timer_remaining_secs, 0.0);
    }

    #[test]
    fn test_wire_format() {
        let now = Instant::now();
        let state = ApplianceState {
            timer_deadline: Some(now + Duration::from_secs(30)),
            ..Default::default()
        };

        let json = serde_json::to_value(StatusSnapshot::capture(&state, now)).unwrap();

        assert_eq!(json, json!({
            "power": false,
            "current_temperature": 30.0,
            "current_humidity": 50.0,
            "fan_speed": 0,
            "water_level": 100.0,
            "target_temperature": 25.0,
            "target_humidity": 60.0,
            "timer_running": true,
            "timer_remaining": 30.0,
        }));
    }
}
