use std::time::Duration;

use tokio::{task::JoinHandle, time::{interval, MissedTickBehavior}};
use tracing::{debug, info};

use crate::appliance::ControlEngine;

/// Default period between sensor ticks.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(2);


/// Start the periodic driver: every `period`, drift the sensors and let the
/// auto-adjust rule pick a fan speed. The first tick happens immediately.
///
/// Runs until the returned handle is aborted.
pub fn spawn(engine: ControlEngine, period: Duration) -> JoinHandle<()> {
    tokio::spawn(run(engine, period))
}

pub async fn run(engine: ControlEngine, period: Duration) {
    let mut ticks = interval(period);

    // a stalled tick is not made up for with a burst
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(period_ms = period.as_millis() as u64, "periodic driver started");

    loop {
        ticks.tick().await;

        if let Some(advisory) = engine.tick().await {
            debug!(%advisory, "auto-adjust advisory");
        }
    }
}
