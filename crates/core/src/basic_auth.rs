//! HTTP Basic credential parsing and matching.

use base64::{engine::general_purpose::STANDARD, Engine};

/// Challenge sent along with a 401.
pub const BASIC_CHALLENGE: &str = "Basic realm=\"Authorization Required\"";

/// A decoded `user:pass` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Credentials the gate lets through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuthConfig {
    pub username: String,
    pub password: String,
}

impl BasicAuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Exact match on both fields.
    pub fn authorize(&self, credentials: &BasicCredentials) -> bool {
        credentials.username == self.username && credentials.password == self.password
    }
}

/// Parse an `Authorization` header value of the form `Basic <base64>`.
///
/// Returns `None` for any other scheme, undecodable payloads, and pairs where
/// either the username or the password is empty.
pub fn parse_basic_authorization(header: &str) -> Option<BasicCredentials> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    if username.is_empty() || password.is_empty() {
        return None;
    }

    Some(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}
