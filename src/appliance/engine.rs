use std::{sync::Arc, time::Duration};

use async_broadcast::Receiver;
use tokio::{sync::Mutex, time::{sleep_until, Instant}};
use tracing::{debug, info, warn};

use crate::bus::{ApplianceEvent, EventBus};

use super::{
    limits::MAX_TIMER_MINUTES,
    state::{Advisory, ApplianceState, FanSpeed},
    status::StatusSnapshot,
    timer::ShutoffTimer,
    CommandError,
};

const TIMER_CANCELLED: &str = "Timer cancelled";

/// Format an operator-supplied number for an acknowledgment.
///
/// Plain decimal for everyday magnitudes, exponent form for the extremes.
fn number(value: f64) -> String {
    let magnitude = value.abs();

    if magnitude != 0.0 && (magnitude < 1e-4 || magnitude >= 1e15) {
        format!("{value:e}")
    } else {
        format!("{value}")
    }
}


/// Owns the appliance and serialises every change to it.
///
/// Operator commands, the periodic tick and the shutoff timer all go through
/// one lock, so no two of them ever interleave. Cloning is cheap and every
/// clone drives the same appliance.
#[derive(Clone)]
pub struct ControlEngine {
    inner: Arc<Mutex<Inner>>,
    events: EventBus
}

struct Inner {
    state: ApplianceState,
    timer: ShutoffTimer,
    events: EventBus,

    // the low water advisory is only published once per episode
    water_low_reported: bool
}

impl Inner {
    /// The power toggle, shared by the operator command and the shutoff timer.
    fn toggle_power(&mut self) -> String {
        let fan_speed = self.state.fan_speed;
        let on = self.state.flip_power();

        if !on {
            self.cancel_timer();
        }

        info!(power = on, "power toggled");
        self.events.publish(ApplianceEvent::PowerChanged { on });
        self.publish_fan_change(fan_speed);

        format!("Power {}", if on { "ON" } else { "OFF" })
    }

    fn cancel_timer(&mut self) -> String {
        if self.timer.cancel() {
            info!("shutoff timer cancelled");
            self.events.publish(ApplianceEvent::TimerCancelled);
        }

        self.state.timer_deadline = None;

        TIMER_CANCELLED.to_string()
    }

    fn auto_adjust(&mut self) -> Option<Advisory> {
        let fan_speed = self.state.fan_speed;
        let advisory = self.state.auto_adjust();

        match advisory {
            Some(Advisory::LowWater) => {
                if !self.water_low_reported {
                    self.water_low_reported = true;
                    self.events.publish(ApplianceEvent::WaterLow { level: self.state.water_level });
                }
            },
            None => {
                if self.state.power {
                    self.water_low_reported = false;
                }
            }
        }

        self.publish_fan_change(fan_speed);

        advisory
    }

    fn publish_fan_change(&self, from: FanSpeed) {
        let to = self.state.fan_speed;

        if from != to {
            self.events.publish(ApplianceEvent::FanSpeedChanged { from, to });
        }
    }
}


impl ControlEngine {
    pub fn new(state: ApplianceState) -> Self {
        let events = EventBus::new();

        let inner = Inner {
            state,
            timer: ShutoffTimer::default(),
            events: events.clone(),
            water_low_reported: false
        };

        Self {
            inner: Arc::new(Mutex::new(inner)),
            events
        }
    }

    pub fn subscribe(&self) -> Receiver<ApplianceEvent> {
        self.events.subscribe()
    }

    pub async fn toggle_power(&self) -> String {
        self.inner.lock().await.toggle_power()
    }

    pub async fn set_target_temperature(&self, temperature: f64) -> String {
        let mut inner = self.inner.lock().await;

        inner.state.target_temperature = temperature;

        info!(temperature, "target temperature set");
        inner.events.publish(ApplianceEvent::TargetTemperatureChanged(temperature));

        format!("Target temperature set to {}°C", number(temperature))
    }

    pub async fn set_target_humidity(&self, humidity: f64) -> String {
        let mut inner = self.inner.lock().await;

        inner.state.target_humidity = humidity;

        info!(humidity, "target humidity set");
        inner.events.publish(ApplianceEvent::TargetHumidityChanged(humidity));

        format!("Target humidity set to {}%", number(humidity))
    }

    /// Set the fan speed, clamped to `0..=3`. Refused while powered off.
    pub async fn set_fan_speed(&self, speed: i64) -> String {
        let mut inner = self.inner.lock().await;

        let previous = inner.state.fan_speed;

        match inner.state.set_fan_speed(speed) {
            Ok(fan_speed) => {
                info!(requested = speed, %fan_speed, "fan speed set");
                inner.publish_fan_change(previous);

                format!("Fan speed set to {}", u8::from(fan_speed))
            },
            Err(err) => {
                warn!(requested = speed, "fan speed rejected: {err}");
                err.to_string()
            }
        }
    }

    pub async fn refill_water(&self) -> String {
        let mut inner = self.inner.lock().await;

        inner.state.refill();
        inner.water_low_reported = false;

        info!("water tank refilled");
        inner.events.publish(ApplianceEvent::Refilled);

        "Water tank refilled".to_string()
    }

    /// Arm the shutoff timer, replacing any pending one.
    ///
    /// `minutes <= 0` cancels instead. When the timer fires it toggles power
    /// through the same path as the power command.
    ///
    /// Non-finite durations and anything over `MAX_TIMER_MINUTES` (one week)
    /// are refused, since the deadline has to fit in an `Instant`.
    pub async fn arm_timer(&self, minutes: f64) -> String {
        let mut inner = self.inner.lock().await;

        if minutes <= 0.0 {
            return inner.cancel_timer();
        }

        if !minutes.is_finite() || minutes > MAX_TIMER_MINUTES {
            let err = CommandError::TimerOutOfRange { minutes };
            warn!("shutoff timer rejected: {err}");
            return err.to_string();
        }

        inner.cancel_timer();

        let duration = Duration::from_secs_f64(minutes * 60.0);
        let deadline = Instant::now() + duration;
        let generation = inner.timer.next_generation();

        let task = tokio::spawn({
            let engine = self.clone();

            async move {
                sleep_until(deadline).await;
                engine.fire_timer(generation).await;
            }
        });

        inner.timer.track(generation, task);
        inner.state.timer_deadline = Some(deadline);

        info!(minutes, generation, "shutoff timer armed");
        inner.events.publish(ApplianceEvent::TimerArmed { duration });

        format!("Timer set for {} minutes", number(minutes))
    }

    pub async fn cancel_timer(&self) -> String {
        self.inner.lock().await.cancel_timer()
    }

    async fn fire_timer(&self, generation: u64) {
        let mut inner = self.inner.lock().await;

        if !inner.timer.claim(generation) {
            debug!(generation, "stale shutoff timer ignored");
            return;
        }

        inner.events.publish(ApplianceEvent::TimerFired);

        inner.toggle_power();
        inner.state.timer_deadline = None;
    }

    /// Random-walk the sensors and draw water, see `ApplianceState::drift_tick`.
    pub async fn drift_tick(&self) {
        let mut inner = self.inner.lock().await;

        inner.state.drift_tick(&mut rand::thread_rng());
    }

    /// Recompute the fan speed from the setpoints. `None` while powered off.
    pub async fn auto_adjust(&self) -> Option<Advisory> {
        self.inner.lock().await.auto_adjust()
    }

    /// One driver step: drift then auto-adjust, under a single lock.
    pub async fn tick(&self) -> Option<Advisory> {
        let mut inner = self.inner.lock().await;

        inner.state.drift_tick(&mut rand::thread_rng());
        let advisory = inner.auto_adjust();

        debug!(
            temperature = inner.state.temperature,
            humidity = inner.state.humidity,
            water_level = inner.state.water_level,
            fan_speed = %inner.state.fan_speed,
            "tick"
        );

        advisory
    }

    pub async fn get_status(&self) -> StatusSnapshot {
        let inner = self.inner.lock().await;

        StatusSnapshot::capture(&inner.state, Instant::now())
    }
}

impl Default for ControlEngine {
    fn default() -> Self {
        Self::new(ApplianceState::default())
    }
}
