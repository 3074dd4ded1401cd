use authmock_bot::BotCommand;
use authmock_core::{basic_auth::BasicAuthConfig, contact::Contact};
use thiserror::Error;
use url::Url;

use crate::Cli;

/// Signing secret used when none is configured. Only fit for local development.
pub const DEFAULT_SECRET: &str = "kute kittens";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("APP_URL must be a valid absolute URL: {0}")]
    InvalidAppUrl(#[from] url::ParseError),

    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("token TTL must be greater than zero")]
    InvalidTokenTtl,

    #[error("basic auth is enabled but BASIC_AUTH_USERNAME or BASIC_AUTH_PASSWORD is missing")]
    MissingBasicAuthCredentials,

    #[error("CONTACT_NAME and CONTACT_EMAIL must be set together")]
    IncompleteContact,
}

/// Typed server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Signs tokens and derives the session cookie key.
    pub secret: String,
    /// Relying application that receives `?jwt=<token>`.
    pub app_url: Url,
    pub session_cookie_name: String,
    pub cookie_secure: bool,
    pub token_ttl: chrono::Duration,
    /// `None` disables the credential gate.
    pub basic_auth: Option<BasicAuthConfig>,
    pub bot_command: Option<BotCommand>,
    pub contact: Option<Contact>,
}

impl ServerConfig {
    /// Build configuration from parsed command-line flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the app URL is invalid, the secret is empty, the
    /// TTL is zero, the contact is half configured, or basic auth is enabled
    /// without both credentials.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }

        let app_url = Url::parse(&cli.app_url)?;

        let token_ttl = i64::try_from(cli.token_ttl_secs)
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(chrono::Duration::try_seconds)
            .ok_or(ConfigError::InvalidTokenTtl)?;

        let basic_auth = if cli.use_basic_auth {
            match (&cli.basic_auth_username, &cli.basic_auth_password) {
                (Some(username), Some(password))
                    if !username.is_empty() && !password.is_empty() =>
                {
                    Some(BasicAuthConfig::new(username, password))
                }
                _ => return Err(ConfigError::MissingBasicAuthCredentials),
            }
        } else {
            None
        };

        let bot_command = cli.bot_program.as_ref().map(|program| {
            // BOT_ARGS splits on single spaces, so repeated spaces leave empty entries.
            let args = cli.bot_args.iter().filter(|arg| !arg.is_empty());
            let command = BotCommand::new(program).args(args);
            match &cli.bot_cwd {
                Some(cwd) => command.cwd(cwd),
                None => command,
            }
        });

        let contact = match (&cli.contact_name, &cli.contact_email) {
            (Some(name), Some(email)) => Some(Contact {
                name: name.clone(),
                email: email.clone(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteContact),
        };

        Ok(Self {
            secret: cli.secret.clone(),
            app_url,
            session_cookie_name: cli.ssid.clone(),
            cookie_secure: cli.cookie_secure,
            token_ttl,
            basic_auth,
            bot_command,
            contact,
        })
    }
}

#[cfg(test)]
impl ServerConfig {
    /// Configuration used by router tests.
    pub fn for_tests() -> Self {
        Self {
            secret: "test secret".to_string(),
            app_url: Url::parse("http://localhost:7100/").unwrap(),
            session_cookie_name: "ssid".to_string(),
            cookie_secure: false,
            token_ttl: chrono::Duration::hours(24),
            basic_auth: None,
            bot_command: None,
            contact: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["authmock"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_produce_a_valid_config() {
        let config = ServerConfig::from_cli(&parse(&[])).unwrap();

        assert_eq!(config.secret, DEFAULT_SECRET);
        assert_eq!(config.app_url.as_str(), "http://localhost:7100/");
        assert_eq!(config.session_cookie_name, "ssid");
        assert_eq!(config.token_ttl, chrono::Duration::hours(24));
        assert!(config.basic_auth.is_none());
        assert!(config.bot_command.is_none());
        assert!(config.contact.is_none());
    }

    #[test]
    fn rejects_invalid_app_url() {
        let result = ServerConfig::from_cli(&parse(&["--app-url", "not a url"]));
        assert!(matches!(result, Err(ConfigError::InvalidAppUrl(_))));
    }

    #[test]
    fn rejects_zero_ttl() {
        let result = ServerConfig::from_cli(&parse(&["--token-ttl-secs", "0"]));
        assert!(matches!(result, Err(ConfigError::InvalidTokenTtl)));
    }

    #[test]
    fn basic_auth_requires_credentials() {
        let result = ServerConfig::from_cli(&parse(&[
            "--use-basic-auth",
            "--basic-auth-username",
            "admin",
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingBasicAuthCredentials)
        ));
    }

    #[test]
    fn basic_auth_with_credentials() {
        let config = ServerConfig::from_cli(&parse(&[
            "--use-basic-auth",
            "--basic-auth-username",
            "admin",
            "--basic-auth-password",
            "hunter2",
        ]))
        .unwrap();

        let gate = config.basic_auth.unwrap();
        assert_eq!(gate.username, "admin");
        assert_eq!(gate.password, "hunter2");
    }

    #[test]
    fn bot_command_collects_args_and_cwd() {
        let config = ServerConfig::from_cli(&parse(&[
            "--bot-program",
            "/usr/bin/env",
            "--bot-arg",
            "node",
            "--bot-arg",
            "--inspect",
            "--bot-cwd",
            "/tmp",
        ]))
        .unwrap();

        let command = config.bot_command.unwrap();
        assert_eq!(command.program.to_str(), Some("/usr/bin/env"));
        assert_eq!(command.args, vec!["node", "--inspect"]);
        assert_eq!(command.cwd.as_deref().and_then(|p| p.to_str()), Some("/tmp"));
    }

    #[test]
    fn contact_must_be_complete() {
        let result = ServerConfig::from_cli(&parse(&["--contact-name", "Ops"]));
        assert!(matches!(result, Err(ConfigError::IncompleteContact)));

        let config = ServerConfig::from_cli(&parse(&[
            "--contact-name",
            "Ops",
            "--contact-email",
            "ops@example.com",
        ]))
        .unwrap();
        assert_eq!(config.contact.unwrap().email, "ops@example.com");
    }
}
