//! The supervisor actor and its handle.
//!
//! One task owns the slot. Requests arrive over an mpsc mailbox and are
//! answered over oneshot channels, the same request/response shape the SSR
//! workers use. Each spawned child gets a watcher task that owns the `Child`,
//! reaps it, and reports the exit back into the mailbox.

use std::process::ExitStatus;

use chrono::{DateTime, Utc};
use tokio::process::Child;
use tokio::sync::{mpsc, oneshot};

use crate::command::BotCommand;
use crate::error::{BotError, Result};
use crate::output::{forward_lines, OutputStream};
use crate::status::{BotStatus, ExitSummary, StartOutcome, StopOutcome};

const MAILBOX_CAPACITY: usize = 32;

enum BotRequest {
    Start {
        username: String,
        respond_to: oneshot::Sender<Result<StartOutcome>>,
    },
    Stop {
        username: String,
        respond_to: oneshot::Sender<StopOutcome>,
    },
    Status {
        respond_to: oneshot::Sender<BotStatus>,
    },
    Shutdown {
        respond_to: oneshot::Sender<()>,
    },
    Exited {
        generation: u64,
        exit: ExitSummary,
    },
}

/// Cloneable handle to the supervisor actor.
#[derive(Debug, Clone)]
pub struct BotSupervisor {
    mailbox: mpsc::Sender<BotRequest>,
}

impl BotSupervisor {
    /// Spawn the actor on the current Tokio runtime.
    ///
    /// With no command every start fails with [`BotError::NotConfigured`];
    /// stop and status still work.
    pub fn spawn(command: Option<BotCommand>) -> Self {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);

        let actor = SupervisorActor {
            command,
            slot: Slot::Idle,
            generation: 0,
            last_exit: None,
            exit_waiters: Vec::new(),
            mailbox: tx.downgrade(),
        };
        tokio::spawn(actor.run(rx));

        Self { mailbox: tx }
    }

    /// Start the automation process on behalf of `username`.
    ///
    /// Resolves once the spawn has either succeeded or failed. If a process
    /// is already running it is left alone and its pid is returned.
    pub async fn start(&self, username: &str) -> Result<StartOutcome> {
        let (respond_to, rx) = oneshot::channel();
        self.send(BotRequest::Start {
            username: username.to_string(),
            respond_to,
        })
        .await?;
        rx.await.map_err(|_| BotError::ChannelClosed)?
    }

    /// Terminate the tracked process, if any.
    ///
    /// Does not wait for the exit; the slot returns to idle once the watcher
    /// reports it. Stopping when nothing runs is a no-op.
    pub async fn stop(&self, username: &str) -> Result<StopOutcome> {
        let (respond_to, rx) = oneshot::channel();
        self.send(BotRequest::Stop {
            username: username.to_string(),
            respond_to,
        })
        .await?;
        rx.await.map_err(|_| BotError::ChannelClosed)
    }

    pub async fn status(&self) -> Result<BotStatus> {
        let (respond_to, rx) = oneshot::channel();
        self.send(BotRequest::Status { respond_to }).await?;
        rx.await.map_err(|_| BotError::ChannelClosed)
    }

    /// Kill any live process and wait until its exit has been observed.
    pub async fn shutdown(&self) -> Result<()> {
        let (respond_to, rx) = oneshot::channel();
        self.send(BotRequest::Shutdown { respond_to }).await?;
        rx.await.map_err(|_| BotError::ChannelClosed)
    }

    async fn send(&self, request: BotRequest) -> Result<()> {
        self.mailbox
            .send(request)
            .await
            .map_err(|_| BotError::ChannelClosed)
    }
}

struct Tracked {
    pid: u32,
    username: String,
    started_at: DateTime<Utc>,
    generation: u64,
    kill_tx: Option<oneshot::Sender<()>>,
}

enum Slot {
    Idle,
    Running(Tracked),
    Stopping(Tracked),
}

struct SupervisorActor {
    command: Option<BotCommand>,
    slot: Slot,
    generation: u64,
    last_exit: Option<ExitSummary>,
    exit_waiters: Vec<oneshot::Sender<()>>,
    // Weak so that dropping every handle lets the actor finish once no
    // watcher is left either.
    mailbox: mpsc::WeakSender<BotRequest>,
}

impl SupervisorActor {
    async fn run(mut self, mut rx: mpsc::Receiver<BotRequest>) {
        tracing::debug!("Bot supervisor started");

        while let Some(request) = rx.recv().await {
            match request {
                BotRequest::Start {
                    username,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.start(username));
                }
                BotRequest::Stop {
                    username,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.stop(&username));
                }
                BotRequest::Status { respond_to } => {
                    let _ = respond_to.send(self.status());
                }
                BotRequest::Shutdown { respond_to } => self.shutdown(respond_to),
                BotRequest::Exited { generation, exit } => self.exited(generation, exit),
            }
        }

        tracing::debug!("Bot supervisor shutting down");
    }

    fn start(&mut self, username: String) -> Result<StartOutcome> {
        match &self.slot {
            Slot::Running(tracked) => {
                tracing::warn!(
                    pid = tracked.pid,
                    requested_by = %username,
                    started_by = %tracked.username,
                    "Bot already running, not starting another"
                );
                return Ok(StartOutcome {
                    pid: tracked.pid,
                    already_running: true,
                });
            }
            Slot::Stopping(tracked) => {
                return Err(BotError::StopInProgress { pid: tracked.pid });
            }
            Slot::Idle => {}
        }

        let command = self.command.as_ref().ok_or(BotError::NotConfigured)?;
        let mailbox = self.mailbox.upgrade().ok_or(BotError::ChannelClosed)?;

        let (mut child, pid) = command.spawn().inspect_err(|e| {
            tracing::error!(command = %command, error = %e, "Failed to spawn bot");
        })?;

        if let Some(stdout) = child.stdout.take() {
            forward_lines(stdout, pid, OutputStream::Stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(stderr, pid, OutputStream::Stderr);
        }

        self.generation += 1;
        let generation = self.generation;
        let (kill_tx, kill_rx) = oneshot::channel();
        tokio::spawn(watch(child, pid, generation, kill_rx, mailbox));

        tracing::info!(pid, %username, command = %command, "Bot started");

        self.slot = Slot::Running(Tracked {
            pid,
            username,
            started_at: Utc::now(),
            generation,
            kill_tx: Some(kill_tx),
        });

        Ok(StartOutcome {
            pid,
            already_running: false,
        })
    }

    fn stop(&mut self, username: &str) -> StopOutcome {
        match std::mem::replace(&mut self.slot, Slot::Idle) {
            Slot::Running(mut tracked) => {
                tracing::info!(pid = tracked.pid, %username, "Stopping bot");
                terminate(&mut tracked);
                let pid = tracked.pid;
                self.slot = Slot::Stopping(tracked);
                StopOutcome::Stopping { pid }
            }
            Slot::Stopping(tracked) => {
                tracing::info!(pid = tracked.pid, %username, "Bot already stopping");
                self.slot = Slot::Stopping(tracked);
                StopOutcome::NotRunning
            }
            Slot::Idle => {
                tracing::info!(%username, "Stop requested but no bot is running");
                StopOutcome::NotRunning
            }
        }
    }

    fn status(&self) -> BotStatus {
        match &self.slot {
            Slot::Idle => BotStatus::Idle {
                last_exit: self.last_exit.clone(),
            },
            Slot::Running(tracked) => BotStatus::Running {
                pid: tracked.pid,
                username: tracked.username.clone(),
                started_at: tracked.started_at,
            },
            Slot::Stopping(tracked) => BotStatus::Stopping {
                pid: tracked.pid,
                username: tracked.username.clone(),
            },
        }
    }

    fn shutdown(&mut self, respond_to: oneshot::Sender<()>) {
        if let Slot::Running(_) = self.slot {
            self.stop("shutdown");
        }

        match self.slot {
            Slot::Idle => {
                let _ = respond_to.send(());
            }
            _ => self.exit_waiters.push(respond_to),
        }
    }

    fn exited(&mut self, generation: u64, exit: ExitSummary) {
        let current = match &self.slot {
            Slot::Running(tracked) | Slot::Stopping(tracked) => tracked.generation == generation,
            Slot::Idle => false,
        };

        if !current {
            tracing::debug!(generation, pid = exit.pid, "Ignoring exit of untracked bot");
            return;
        }

        tracing::info!(
            pid = exit.pid,
            code = ?exit.code,
            signal = ?exit.signal,
            "Bot exited"
        );

        self.slot = Slot::Idle;
        self.last_exit = Some(exit);

        for waiter in self.exit_waiters.drain(..) {
            let _ = waiter.send(());
        }
    }
}

/// Ask the watcher to stop the child it owns.
fn terminate(tracked: &mut Tracked) {
    if let Some(kill_tx) = tracked.kill_tx.take() {
        let _ = kill_tx.send(());
    }
}

/// Polite signal first, then the forced kill through the child handle.
///
/// The pid comes from the `Child` itself, which reports none once the process
/// has been reaped, so a recycled pid is never signalled.
fn signal_and_kill(child: &mut Child) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        if let Some(pid) = child.id() {
            #[allow(clippy::cast_possible_wrap)]
            let target = Pid::from_raw(pid as i32);
            if let Err(e) = kill(target, Signal::SIGTERM) {
                tracing::warn!(pid, error = %e, "Failed to send SIGTERM to bot");
            }
        }
    }

    if let Err(e) = child.start_kill() {
        tracing::warn!(error = %e, "Failed to kill bot");
    }
}

async fn watch(
    mut child: Child,
    pid: u32,
    generation: u64,
    kill_rx: oneshot::Receiver<()>,
    mailbox: mpsc::Sender<BotRequest>,
) {
    let status = tokio::select! {
        status = child.wait() => status,
        _ = kill_rx => {
            signal_and_kill(&mut child);
            child.wait().await
        }
    };

    let exit = match status {
        Ok(status) => summarize(pid, status),
        Err(e) => {
            tracing::error!(pid, error = %e, "Failed to wait for bot");
            ExitSummary {
                pid,
                code: None,
                signal: None,
            }
        }
    };

    let _ = mailbox.send(BotRequest::Exited { generation, exit }).await;
}

fn summarize(pid: u32, status: ExitStatus) -> ExitSummary {
    #[cfg(unix)]
    let signal = {
        use std::os::unix::process::ExitStatusExt;
        status.signal()
    };

    #[cfg(not(unix))]
    let signal = None;

    ExitSummary {
        pid,
        code: status.code(),
        signal,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use super::*;

    async fn wait_for_idle(supervisor: &BotSupervisor) -> BotStatus {
        for _ in 0..100 {
            let status = supervisor.status().await.unwrap();
            if status.is_idle() {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("bot did not return to idle");
    }

    fn sleeper() -> BotCommand {
        BotCommand::new("sleep").args(["30"])
    }

    #[tokio::test]
    async fn start_without_command_is_not_configured() {
        let supervisor = BotSupervisor::spawn(None);
        let err = supervisor.start("tracy").await.unwrap_err();
        assert!(matches!(err, BotError::NotConfigured));
    }

    #[tokio::test]
    async fn spawn_failure_reaches_the_caller() {
        let supervisor =
            BotSupervisor::spawn(Some(BotCommand::new("/nonexistent/authmock-bot-12345")));
        let err = supervisor.start("tracy").await.unwrap_err();
        assert!(matches!(err, BotError::Spawn { .. }));
        assert!(supervisor.status().await.unwrap().is_idle());
    }

    #[tokio::test]
    async fn stop_when_idle_is_a_noop() {
        let supervisor = BotSupervisor::spawn(Some(sleeper()));
        let outcome = supervisor.stop("tracy").await.unwrap();
        assert_eq!(outcome, StopOutcome::NotRunning);

        let outcome = supervisor.stop("tracy").await.unwrap();
        assert_eq!(outcome, StopOutcome::NotRunning);
    }

    #[tokio::test]
    async fn start_then_stop_signals_tracked_pid() {
        let supervisor = BotSupervisor::spawn(Some(sleeper()));

        let started = supervisor.start("tracy").await.unwrap();
        assert!(!started.already_running);

        let outcome = supervisor.stop("tracy").await.unwrap();
        assert_eq!(outcome, StopOutcome::Stopping { pid: started.pid });

        let BotStatus::Idle { last_exit } = wait_for_idle(&supervisor).await else {
            unreachable!()
        };
        let exit = last_exit.unwrap();
        assert_eq!(exit.pid, started.pid);
        assert!(exit.signal.is_some());
        assert_eq!(exit.code, None);
    }

    #[tokio::test]
    async fn second_start_returns_existing_process() {
        let supervisor = BotSupervisor::spawn(Some(sleeper()));

        let first = supervisor.start("tracy").await.unwrap();
        let second = supervisor.start("meilin").await.unwrap();

        assert_eq!(second.pid, first.pid);
        assert!(second.already_running);

        match supervisor.status().await.unwrap() {
            BotStatus::Running { pid, username, .. } => {
                assert_eq!(pid, first.pid);
                assert_eq!(username, "tracy");
            }
            other => panic!("unexpected status: {other:?}"),
        }

        supervisor.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_starts_spawn_one_process() {
        let supervisor = BotSupervisor::spawn(Some(sleeper()));

        let (first, second) = tokio::join!(supervisor.start("tracy"), supervisor.start("meilin"));
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_eq!(first.pid, second.pid);
        let reused = [first.already_running, second.already_running]
            .iter()
            .filter(|reused| **reused)
            .count();
        assert_eq!(reused, 1);

        supervisor.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn invalid_utf8_output_does_not_kill_the_bot() {
        let script = "printf '\\377\\n'; sleep 0.3; i=0; \
            while [ $i -lt 200 ]; do echo line $i; i=$((i+1)); done; exit 0";
        let supervisor = BotSupervisor::spawn(Some(BotCommand::new("sh").args(["-c", script])));

        let started = supervisor.start("tracy").await.unwrap();

        let BotStatus::Idle { last_exit } = wait_for_idle(&supervisor).await else {
            unreachable!()
        };
        assert_eq!(
            last_exit,
            Some(ExitSummary {
                pid: started.pid,
                code: Some(0),
                signal: None,
            })
        );
    }

    #[tokio::test]
    async fn reaped_child_is_not_signalled() {
        let (mut child, _) = BotCommand::new("true").spawn().unwrap();
        child.wait().await.unwrap();

        assert!(child.id().is_none());
        signal_and_kill(&mut child);
    }

    #[tokio::test]
    async fn natural_exit_clears_the_handle() {
        let supervisor =
            BotSupervisor::spawn(Some(BotCommand::new("sh").args(["-c", "echo hello; exit 3"])));

        let started = supervisor.start("tracy").await.unwrap();

        let BotStatus::Idle { last_exit } = wait_for_idle(&supervisor).await else {
            unreachable!()
        };
        assert_eq!(
            last_exit,
            Some(ExitSummary {
                pid: started.pid,
                code: Some(3),
                signal: None,
            })
        );
    }

    #[tokio::test]
    async fn start_after_exit_spawns_a_new_process() {
        let supervisor = BotSupervisor::spawn(Some(sleeper()));

        let first = supervisor.start("tracy").await.unwrap();
        supervisor.stop("tracy").await.unwrap();
        wait_for_idle(&supervisor).await;

        let second = supervisor.start("tracy").await.unwrap();
        assert!(!second.already_running);
        assert_ne!(second.pid, first.pid);

        supervisor.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_waits_for_exit() {
        let supervisor = BotSupervisor::spawn(Some(sleeper()));
        supervisor.start("tracy").await.unwrap();

        supervisor.shutdown().await.unwrap();

        assert!(supervisor.status().await.unwrap().is_idle());
    }

    #[tokio::test]
    async fn shutdown_when_idle_returns_immediately() {
        let supervisor = BotSupervisor::spawn(None);
        supervisor.shutdown().await.unwrap();
    }
}
