//! CSRF secrets and tokens.
//!
//! A per-session secret lives in the signed session cookie. Tokens handed to
//! the browser are `<salt>-<mac>` where `mac` is an HMAC-SHA256 of the salt
//! keyed by the session secret, so any number of tokens can be minted and
//! checked without server-side storage.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use rand::{distr::Alphanumeric, Rng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Cookie through which the current token is exposed to scripts.
pub const XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Request headers a token is accepted from, in lookup order.
pub const TOKEN_HEADERS: [&str; 3] = ["x-xsrf-token", "x-csrf-token", "csrf-token"];

const SECRET_LEN: usize = 24;
const SALT_LEN: usize = 8;

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a fresh per-session CSRF secret.
pub fn generate_secret() -> String {
    random_alphanumeric(SECRET_LEN)
}

/// Mint a new token for `secret` with a random salt.
pub fn generate_token(secret: &str) -> String {
    token_for_salt(secret, &random_alphanumeric(SALT_LEN))
}

/// Deterministic token for a given salt.
pub fn token_for_salt(secret: &str, salt: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(salt.as_bytes());
    let tag = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{salt}-{tag}")
}

/// Check that `token` was minted for `secret`. Comparison is constant-time.
pub fn verify_token(secret: &str, token: &str) -> bool {
    // Salts are alphanumeric, so the first '-' always ends the salt even
    // though the URL-safe tag may itself contain '-'.
    let Some((salt, tag)) = token.split_once('-') else {
        return false;
    };

    if salt.is_empty() || !salt.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    let Ok(tag_bytes) = URL_SAFE_NO_PAD.decode(tag) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(salt.as_bytes());
    mac.verify_slice(&tag_bytes).is_ok()
}
