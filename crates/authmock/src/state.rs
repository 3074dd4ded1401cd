//! Shared application state.

use std::sync::Arc;

use authmock_bot::BotSupervisor;
use authmock_core::contact::ContactDirectory;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use crate::{config::ServerConfig, directory::StaticDirectory};

/// State handed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Signs the session cookie.
    pub cookie_key: Key,
    pub bot: BotSupervisor,
    pub directory: Arc<dyn ContactDirectory>,
}

impl AppState {
    /// Build state from configuration, spawning the bot supervisor.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_config(config: ServerConfig) -> Self {
        let directory = Arc::new(StaticDirectory::new(config.contact.clone()));
        Self::with_directory(config, directory)
    }

    /// Build state with a custom contact directory.
    pub fn with_directory(config: ServerConfig, directory: Arc<dyn ContactDirectory>) -> Self {
        let bot = BotSupervisor::spawn(config.bot_command.clone());
        Self {
            cookie_key: cookie_key(&config.secret),
            config: Arc::new(config),
            bot,
            directory,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Derive the 64-byte cookie signing key from the shared secret.
pub fn cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}
