use chrono::{DateTime, Utc};
use serde::Serialize;

/// How the last tracked process ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExitSummary {
    pub pid: u32,
    /// Exit code, when the process exited on its own.
    pub code: Option<i32>,
    /// Terminating signal, when it was killed.
    pub signal: Option<i32>,
}

/// Snapshot of the supervisor's single slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BotStatus {
    Idle {
        last_exit: Option<ExitSummary>,
    },
    Running {
        pid: u32,
        username: String,
        started_at: DateTime<Utc>,
    },
    Stopping {
        pid: u32,
        username: String,
    },
}

impl BotStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle { .. })
    }
}

/// Result of a start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOutcome {
    pub pid: u32,
    /// True when a process was already running and no new one was spawned.
    pub already_running: bool,
}

/// Result of a stop request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// Termination was issued to this pid; exit is reported asynchronously.
    Stopping { pid: u32 },
    /// Nothing was running.
    NotRunning,
}
