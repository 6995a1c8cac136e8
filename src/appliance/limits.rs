pub const TEMPERATURE_MIN: f64 = 15.0; // °C, 15 - 40
pub const TEMPERATURE_MAX: f64 = 40.0;

pub const HUMIDITY_MIN: f64 = 30.0; // %, 30 - 90
pub const HUMIDITY_MAX: f64 = 90.0;

pub const WATER_LEVEL_MIN: f64 = 0.0; // %, 0 - 100
pub const WATER_LEVEL_MAX: f64 = 100.0;

/// Maximum change per drift tick, applied as a uniform sample in `-STEP..=STEP`.
pub const TEMPERATURE_DRIFT_STEP: f64 = 1.0;
pub const HUMIDITY_DRIFT_STEP: f64 = 2.0;

/// Water consumed per tick while the fan is running.
pub const WATER_USE_PER_TICK: f64 = 0.1;

/// Below this level the fan is stopped until the tank is refilled.
pub const WATER_LOW_THRESHOLD: f64 = 20.0;

// auto-adjust thresholds, (temperature °C, humidity %) above target
pub const HIGH_FAN_THRESHOLD: (f64, f64) = (5.0, 10.0);
pub const MEDIUM_FAN_THRESHOLD: (f64, f64) = (2.0, 5.0);

pub const DEFAULT_TEMPERATURE: f64 = 30.0;
pub const DEFAULT_HUMIDITY: f64 = 50.0;
pub const DEFAULT_TARGET_TEMPERATURE: f64 = 25.0;
pub const DEFAULT_TARGET_HUMIDITY: f64 = 60.0;

/// Longest shutoff timer accepted (one week).
pub const MAX_TIMER_MINUTES: f64 = 7.0 * 24.0 * 60.0;
