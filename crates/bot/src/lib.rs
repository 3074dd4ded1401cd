//! Supervisor for the single external automation process.
//!
//! The process handle is owned by one actor task. Every caller talks to it
//! through a [`BotSupervisor`] handle, so start and stop requests are applied
//! one at a time and the handle is cleared as soon as the child's exit is
//! observed.

mod command;
mod error;
mod output;
mod status;
mod supervisor;

pub use command::BotCommand;
pub use error::{BotError, Result};
pub use status::{BotStatus, ExitSummary, StartOutcome, StopOutcome};
pub use supervisor::BotSupervisor;
