//! The simulated evaporative cooler: its state record, the shutoff timer and
//! the engine that serialises every change to them.

use thiserror::Error;

pub mod engine;
pub mod limits;
pub mod state;
pub mod status;
pub mod timer;

pub use engine::ControlEngine;
pub use state::{Advisory, ApplianceState, FanSpeed};
pub use status::StatusSnapshot;

/// Why an operator command was refused.
///
/// The `Display` text is the acknowledgment handed back to the operator.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Cannot set fan speed - power is OFF")]
    PowerOff,

    #[error("Timer must be at most {} minutes (got {minutes})", limits::MAX_TIMER_MINUTES)]
    TimerOutOfRange {
        minutes: f64
    },
}
