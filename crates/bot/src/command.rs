//! The external command the supervisor runs.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::error::BotError;

/// Program, arguments and working directory of the automation process.
///
/// Fixed at construction; requests never influence what gets executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl BotCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Spawn the command with piped output and no stdin.
    ///
    /// Returns the child together with its pid.
    pub(crate) fn spawn(&self) -> Result<(Child, u32), BotError> {
        let mut cmd = Command::new(&self.program);

        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false);

        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        let child = cmd.spawn().map_err(|e| BotError::Spawn {
            program: self.program.display().to_string(),
            reason: e.to_string(),
        })?;

        let pid = child.id().ok_or_else(|| BotError::Spawn {
            program: self.program.display().to_string(),
            reason: "failed to get process ID".to_string(),
        })?;

        Ok((child, pid))
    }
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let cmd = BotCommand::new("/usr/bin/python3").args(["run.py", "--config", "config.yml"]);
        assert_eq!(cmd.to_string(), "/usr/bin/python3 run.py --config config.yml");
    }

    #[tokio::test]
    async fn spawn_reports_pid() {
        let cmd = BotCommand::new("sh").args(["-c", "exit 0"]);
        let (mut child, pid) = cmd.spawn().unwrap();
        assert!(pid > 0);
        assert!(child.wait().await.unwrap().success());
    }

    #[tokio::test]
    async fn spawn_missing_program_is_typed() {
        let cmd = BotCommand::new("/nonexistent/authmock-bot-12345");
        let err = cmd.spawn().unwrap_err();
        assert!(matches!(err, BotError::Spawn { .. }));
    }

    #[tokio::test]
    async fn spawn_honours_working_directory() {
        let cmd = BotCommand::new("sh")
            .args(["-c", "test \"$(pwd)\" = /"])
            .cwd("/");
        let (mut child, _) = cmd.spawn().unwrap();
        assert!(child.wait().await.unwrap().success());
    }
}
