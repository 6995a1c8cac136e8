use std::time::Duration;

use rand::Rng;
use strum_macros::Display;
use tokio::time::Instant;

use super::{limits::*, CommandError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FanSpeed {
    Off = 0,
    Low = 1,
    Medium = 2,
    High = 3
}

impl FanSpeed {
    /// Clamp an arbitrary requested level into `Off..=High`.
    pub fn clamped(level: i64) -> Self {
        match level {
            i64::MIN..=0 => Self::Off,
            1 => Self::Low,
            2 => Self::Medium,
            _ => Self::High,
        }
    }
}

impl From<FanSpeed> for u8 {
    fn from(value: FanSpeed) -> Self {
        value as u8
    }
}

/// Something the auto-adjust rule wants the operator to know about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Advisory {
    #[strum(to_string = "Water level low - please refill")]
    LowWater
}

#[derive(Clone, Debug)]
pub struct ApplianceState {
    pub power: bool,

    /// Room temperature, °C
    pub temperature: f64,

    /// Relative humidity, %
    pub humidity: f64,

    pub fan_speed: FanSpeed,

    /// Tank level, %
    pub water_level: f64,

    pub target_temperature: f64,

    pub target_humidity: f64,

    /// When the pending shutoff timer fires, if one is armed.
    pub timer_deadline: Option<Instant>,
}

impl Default for ApplianceState {
    fn default() -> Self {
        Self {
            power: false,
            temperature: DEFAULT_TEMPERATURE,
            humidity: DEFAULT_HUMIDITY,
            fan_speed: FanSpeed::Off,
            water_level: WATER_LEVEL_MAX,
            target_temperature: DEFAULT_TARGET_TEMPERATURE,
            target_humidity: DEFAULT_TARGET_HUMIDITY,
            timer_deadline: None,
        }
    }
}

impl ApplianceState {
    pub fn timer_active(&self) -> bool {
        self.timer_deadline.is_some()
    }

    /// Time left on the shutoff timer, zero when none is armed or it is overdue.
    pub fn timer_remaining(&self, now: Instant) -> Duration {
        match self.timer_deadline {
            Some(deadline) => deadline.saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Flip power, returning the new power state.
    ///
    /// Only the power/fan half of a toggle; the engine also cancels the
    /// shutoff timer when this turns the device off.
    pub(crate) fn flip_power(&mut self) -> bool {
        self.power = !self.power;

        if !self.power {
            self.fan_speed = FanSpeed::Off;
        }

        self.power
    }

    pub fn set_fan_speed(&mut self, requested: i64) -> Result<FanSpeed, CommandError> {
        if !self.power {
            return Err(CommandError::PowerOff);
        }

        self.fan_speed = FanSpeed::clamped(requested);

        Ok(self.fan_speed)
    }

    pub fn refill(&mut self) {
        self.water_level = WATER_LEVEL_MAX;
    }

    /// Advance the simulated sensors by one step.
    ///
    /// Both random walks and the water draw are applied before anything is
    /// clamped, so one tick moves each reading by at most its step.
    pub fn drift_tick<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.temperature += rng.gen_range(-TEMPERATURE_DRIFT_STEP..=TEMPERATURE_DRIFT_STEP);
        self.humidity += rng.gen_range(-HUMIDITY_DRIFT_STEP..=HUMIDITY_DRIFT_STEP);

        if self.power && self.fan_speed > FanSpeed::Off {
            self.water_level -= WATER_USE_PER_TICK;
        }

        self.temperature = self.temperature.clamp(TEMPERATURE_MIN, TEMPERATURE_MAX);
        self.humidity = self.humidity.clamp(HUMIDITY_MIN, HUMIDITY_MAX);
        self.water_level = self.water_level.clamp(WATER_LEVEL_MIN, WATER_LEVEL_MAX);
    }

    /// Recompute the fan speed from how far the room is above its targets.
    ///
    /// Does nothing while powered off. A low tank wins over everything else.
    pub fn auto_adjust(&mut self) -> Option<Advisory> {
        if !self.power {
            return None;
        }

        if self.water_level < WATER_LOW_THRESHOLD {
            self.fan_speed = FanSpeed::Off;
            return Some(Advisory::LowWater);
        }

        let temp_diff = self.temperature - self.target_temperature;
        let humidity_diff = self.humidity - self.target_humidity;

        let (high_temp, high_humidity) = HIGH_FAN_THRESHOLD;
        let (medium_temp, medium_humidity) = MEDIUM_FAN_THRESHOLD;

        self.fan_speed = if temp_diff > high_temp || humidity_diff > high_humidity {
            FanSpeed::High
        } else if temp_diff > medium_temp || humidity_diff > medium_humidity {
            FanSpeed::Medium
        } else if temp_diff > 0.0 || humidity_diff > 0.0 {
            FanSpeed::Low
        } else {
            FanSpeed::Off
        };

        None
    }
}


#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn powered_on() -> ApplianceState {
        ApplianceState {
            power: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let state = ApplianceState::default();

        assert!(!state.power);
        assert_eq!(state.temperature, 30.0);
        assert_eq!(state.humidity, 50.0);
        assert_eq!(state.fan_speed, FanSpeed::Off);
        assert_eq!(state.water_level, 100.0);
        assert_eq!(state.target_temperature, 25.0);
        assert_eq!(state.target_humidity, 60.0);
        assert!(!state.timer_active());
    }

    #[test]
    fn test_fan_speed_clamped() {
        assert_eq!(FanSpeed::clamped(-4), FanSpeed::Off);
        assert_eq!(FanSpeed::clamped(5), FanSpeed::High);
        assert_eq!(FanSpeed::clamped(i64::MAX), FanSpeed::High);

        for speed in [FanSpeed::Off, FanSpeed::Low, FanSpeed::Medium, FanSpeed::High] {
            assert_eq!(FanSpeed::clamped(u8::from(speed) as i64), speed);
        }
    }

    #[test]
    fn test_set_fan_speed_requires_power() {
        let mut state = ApplianceState::default();

        let err = state.set_fan_speed(2).unwrap_err();
        assert!(matches!(err, CommandError::PowerOff));
        assert_eq!(state.fan_speed, FanSpeed::Off);

        let mut state = powered_on();
        assert_eq!(state.set_fan_speed(5).unwrap(), FanSpeed::High);
        assert_eq!(state.fan_speed, FanSpeed::High);
    }

    #[test]
    fn test_flip_power_forces_fan_off() {
        let mut state = powered_on();
        state.fan_speed = FanSpeed::Medium;

        assert!(!state.flip_power());
        assert_eq!(state.fan_speed, FanSpeed::Off);

        assert!(state.flip_power());
    }

    #[test]
    fn test_drift_tick_draws_water_only_with_fan_running() {
        let mut rng = StdRng::seed_from_u64(7);

        let mut state = powered_on();
        state.drift_tick(&mut rng);
        assert_eq!(state.water_level, 100.0);

        state.fan_speed = FanSpeed::Low;
        state.drift_tick(&mut rng);
        assert!((state.water_level - 99.9).abs() < 1e-9);
    }

    #[test]
    fn test_drift_tick_clamps_at_bounds() {
        let mut rng = StdRng::seed_from_u64(1);

        let mut state = powered_on();
        state.temperature = TEMPERATURE_MAX;
        state.humidity = HUMIDITY_MIN;
        state.water_level = 0.05;
        state.fan_speed = FanSpeed::High;

        for _ in 0..100 {
            state.drift_tick(&mut rng);

            assert!((TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&state.temperature));
            assert!((HUMIDITY_MIN..=HUMIDITY_MAX).contains(&state.humidity));
            assert!((WATER_LEVEL_MIN..=WATER_LEVEL_MAX).contains(&state.water_level));
        }

        assert_eq!(state.water_level, 0.0);
    }

    #[test]
    fn test_drift_tick_step_is_bounded() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut state = ApplianceState::default();

        for _ in 0..200 {
            let (temperature, humidity) = (state.temperature, state.humidity);
            state.drift_tick(&mut rng);

            assert!((state.temperature - temperature).abs() <= TEMPERATURE_DRIFT_STEP + 1e-9);
            assert!((state.humidity - humidity).abs() <= HUMIDITY_DRIFT_STEP + 1e-9);
        }
    }

    #[test]
    fn test_auto_adjust_powered_off_is_noop() {
        let mut state = ApplianceState {
            temperature: 40.0,
            water_level: 5.0,
            ..Default::default()
        };

        assert_eq!(state.auto_adjust(), None);
        assert_eq!(state.fan_speed, FanSpeed::Off);
        assert_eq!(state.water_level, 5.0);
    }

    #[test]
    fn test_auto_adjust_bands() {
        // (temperature, humidity) with targets 25°C / 60%
        let cases = [
            ((32.0, 50.0), FanSpeed::High),   // temp +7
            ((25.0, 71.0), FanSpeed::High),   // humidity +11
            ((28.0, 50.0), FanSpeed::Medium), // temp +3
            ((25.0, 66.0), FanSpeed::Medium), // humidity +6
            ((25.5, 50.0), FanSpeed::Low),
            ((25.0, 60.5), FanSpeed::Low),
            ((25.0, 60.0), FanSpeed::Off),
            ((15.0, 30.0), FanSpeed::Off),    // below target never cools
            ((30.0, 70.0), FanSpeed::Medium), // exactly on a threshold is not above it
        ];

        for ((temperature, humidity), expected) in cases {
            let mut state = ApplianceState {
                temperature,
                humidity,
                fan_speed: FanSpeed::Low,
                ..powered_on()
            };

            assert_eq!(state.auto_adjust(), None);
            assert_eq!(state.fan_speed, expected, "temperature {temperature}, humidity {humidity}");
        }
    }

    #[test]
    fn test_auto_adjust_low_water_overrides() {
        let mut state = ApplianceState {
            temperature: 40.0,
            humidity: 90.0,
            water_level: 15.0,
            fan_speed: FanSpeed::High,
            ..powered_on()
        };

        let advisory = state.auto_adjust();

        assert_eq!(advisory, Some(Advisory::LowWater));
        assert_eq!(advisory.unwrap().to_string(), "Water level low - please refill");
        assert_eq!(state.fan_speed, FanSpeed::Off);
    }

    #[test]
    fn test_timer_remaining() {
        let now = Instant::now();

        let mut state = ApplianceState::default();
        assert_eq!(state.timer_remaining(now), Duration::ZERO);

        state.timer_deadline = Some(now + Duration::from_secs(90));
        assert!(state.timer_active());
        assert_eq!(state.timer_remaining(now), Duration::from_secs(90));
        assert_eq!(state.timer_remaining(now + Duration::from_secs(120)), Duration::ZERO);
    }
}
