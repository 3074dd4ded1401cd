mod app;
mod config;
mod directory;
mod error;
mod handlers;
mod middleware;
mod state;
mod templates;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    app::create_app,
    config::{ServerConfig, DEFAULT_SECRET},
    state::AppState,
};

/// authmock - Mock identity provider for development
#[derive(Parser, Debug)]
#[command(name = "authmock")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "7120", env = "PORT")]
    port: u16,

    /// Shared secret used to sign tokens and session cookies
    #[arg(
        long,
        default_value = DEFAULT_SECRET,
        env = "AUTHMOCK_SECRET",
        hide_env_values = true
    )]
    pub secret: String,

    /// Relying application URL that receives the token as `?jwt=`
    #[arg(long, default_value = "http://localhost:7100/", env = "APP_URL")]
    pub app_url: String,

    /// Name of the session cookie
    #[arg(long, default_value = "ssid", env = "SESSION_COOKIE_NAME")]
    pub ssid: String,

    /// Set the Secure flag on cookies
    #[arg(long, env = "COOKIE_SECURE")]
    pub cookie_secure: bool,

    /// Lifetime of issued tokens, in seconds
    #[arg(long, default_value = "86400", env = "TOKEN_TTL_SECS")]
    pub token_ttl_secs: u64,

    /// Require HTTP Basic credentials on every route
    #[arg(long, env = "USE_BASIC_AUTH")]
    pub use_basic_auth: bool,

    /// Basic auth username (required with --use-basic-auth)
    #[arg(long, env = "BASIC_AUTH_USERNAME")]
    pub basic_auth_username: Option<String>,

    /// Basic auth password (required with --use-basic-auth)
    #[arg(long, env = "BASIC_AUTH_PASSWORD", hide_env_values = true)]
    pub basic_auth_password: Option<String>,

    /// Executable started by POST /bot
    #[arg(long, env = "BOT_PROGRAM")]
    pub bot_program: Option<PathBuf>,

    /// Argument passed to the bot executable (repeatable)
    #[arg(
        long = "bot-arg",
        env = "BOT_ARGS",
        value_delimiter = ' ',
        allow_hyphen_values = true
    )]
    pub bot_args: Vec<String>,

    /// Working directory for the bot executable
    #[arg(long, env = "BOT_CWD")]
    pub bot_cwd: Option<PathBuf>,

    /// Name of the administrative contact
    #[arg(long, env = "CONTACT_NAME")]
    pub contact_name: Option<String>,

    /// Email of the administrative contact
    #[arg(long, env = "CONTACT_EMAIL")]
    pub contact_email: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "authmock=debug,authmock_bot=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_cli(&cli)?;

    if config.secret == DEFAULT_SECRET {
        tracing::warn!("Using the default signing secret, set AUTHMOCK_SECRET for shared setups");
    }
    if config.bot_command.is_none() {
        tracing::warn!("No BOT_PROGRAM configured; POST /bot will fail");
    }

    let state = AppState::from_config(config);
    let app = create_app(state.clone());

    // Auto-reload support via listenfd
    let mut listenfd = ListenFd::from_env();
    let listener = match listenfd.take_tcp_listener(0)? {
        // If we are given a tcp listener on listen fd 0, use that one
        Some(listener) => {
            listener.set_nonblocking(true)?;
            TcpListener::from_std(listener)?
        }
        // Otherwise fall back to CLI-specified host:port
        None => {
            let addr = format!("{}:{}", cli.host, cli.port);
            TcpListener::bind(&addr).await?
        }
    };

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Don't leave the automation process behind.
    if let Err(e) = state.bot.shutdown().await {
        tracing::warn!(error = %e, "Failed to stop bot during shutdown");
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signals (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}
