use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("no bot command configured")]
    NotConfigured,

    #[error("failed to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("bot process {pid} is still stopping")]
    StopInProgress { pid: u32 },

    #[error("bot supervisor is not running")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, BotError>;
