use std::future::Future;

use serde::Deserialize;

use crate::appliance::ControlEngine;

/// An operator command, posted as JSON to `PATH`.
///
/// Applying a command always yields an acknowledgment, including when the
/// appliance refuses it.
pub trait Command: Send + 'static {
    const PATH: &'static str;

    fn apply(self, engine: &ControlEngine) -> impl Future<Output = String> + Send;
}


/// Define a command that carries no body
macro_rules! empty_command {
    ($(#[$meta:meta])* $name:ident, $path:expr, $op:ident) => {
        $(#[$meta])*
        #[derive(Deserialize, Debug, Default)]
        pub struct $name;

        impl Command for $name {
            const PATH: &'static str = $path;

            async fn apply(self, engine: &ControlEngine) -> String {
                engine.$op().await
            }
        }
    }
}

empty_command!(
    /// `POST /api/power` -- flip the power switch.
    TogglePower, "/api/power", toggle_power
);

empty_command!(
    /// `POST /api/refill` -- top the tank back up to 100%.
    RefillWater, "/api/refill", refill_water
);


/// `POST /api/temperature`
#[derive(Deserialize, Debug)]
pub struct SetTargetTemperature {
    pub temperature: f64
}

impl Command for SetTargetTemperature {
    const PATH: &'static str = "/api/temperature";

    async fn apply(self, engine: &ControlEngine) -> String {
        engine.set_target_temperature(self.temperature).await
    }
}

/// `POST /api/humidity`
#[derive(Deserialize, Debug)]
pub struct SetTargetHumidity {
    pub humidity: f64
}

impl Command for SetTargetHumidity {
    const PATH: &'static str = "/api/humidity";

    async fn apply(self, engine: &ControlEngine) -> String {
        engine.set_target_humidity(self.humidity).await
    }
}

/// `POST /api/fan`
#[derive(Deserialize, Debug)]
pub struct SetFanSpeed {
    /// Clamped to 0 - 3
    pub speed: i64
}

impl Command for SetFanSpeed {
    const PATH: &'static str = "/api/fan";

    async fn apply(self, engine: &ControlEngine) -> String {
        engine.set_fan_speed(self.speed).await
    }
}

/// `POST /api/timer`
#[derive(Deserialize, Debug)]
pub struct SetTimer {
    /// 0 or less cancels the pending timer
    pub minutes: f64
}

impl Command for SetTimer {
    const PATH: &'static str = "/api/timer";

    async fn apply(self, engine: &ControlEngine) -> String {
        engine.arm_timer(self.minutes).await
    }
}
