use std::time::Duration;

use async_broadcast::{broadcast, InactiveReceiver, Receiver, Sender, TrySendError};
use futures::StreamExt;
use tracing::{info, trace, warn};

use crate::appliance::FanSpeed;

const EVENT_CAPACITY: usize = 64;

/// Something that happened to the appliance.
#[derive(Clone, Debug, PartialEq)]
pub enum ApplianceEvent {
    PowerChanged {
        on: bool
    },
    FanSpeedChanged {
        from: FanSpeed,
        to: FanSpeed
    },
    TargetTemperatureChanged(f64),
    TargetHumidityChanged(f64),
    WaterLow {
        level: f64
    },
    Refilled,
    TimerArmed {
        duration: Duration
    },
    TimerCancelled,
    TimerFired,
}


/// Broadcast of `ApplianceEvent`s to any number of subscribers.
///
/// Publishing never waits: when a subscriber falls behind its oldest events
/// are overwritten, and with nobody subscribed events are dropped.
#[derive(Clone)]
pub struct EventBus {
    events_send: Sender<ApplianceEvent>,

    // keeps the channel open while there are no subscribers
    _events_recv: InactiveReceiver<ApplianceEvent>
}

impl EventBus {
    pub fn new() -> Self {
        let (mut events_send, events_recv) = broadcast(EVENT_CAPACITY);
        events_send.set_overflow(true);

        Self {
            events_send,
            _events_recv: events_recv.deactivate()
        }
    }

    pub fn subscribe(&self) -> Receiver<ApplianceEvent> {
        self.events_send.new_receiver()
    }

    pub fn publish(&self, event: ApplianceEvent) {
        match self.events_send.try_broadcast(event) {
            Ok(_) => (),
            Err(TrySendError::Inactive(event)) => trace!(?event, "no subscribers, event dropped"),
            Err(err) => warn!("failed to publish event: {err}"),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Log every event from `events` until the bus goes away.
pub async fn log_events(mut events: Receiver<ApplianceEvent>) {
    while let Some(event) = events.next().await {
        match event {
            ApplianceEvent::WaterLow { level } => warn!(level, "water level low"),
            ApplianceEvent::TimerFired => info!("shutoff timer fired"),
            event => info!(?event, "appliance event"),
        }
    }
}
