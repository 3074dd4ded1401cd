use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::{IdentityClaim, TokenClaims, TokenError};

/// Sign `identity` into an HS256 token that expires `ttl` after `issued_at`.
///
/// Identical inputs always produce identical tokens; two calls only differ
/// when their `issued_at` differs.
pub fn encode_token(
    identity: &IdentityClaim,
    secret: &str,
    issued_at: DateTime<Utc>,
    ttl: Duration,
) -> Result<String, TokenError> {
    let claims = TokenClaims::new(identity.clone(), issued_at, issued_at + ttl);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify `token` with `secret` and return the identity it carries.
///
/// The signature is checked before anything in the payload is looked at, so
/// a tampered token fails with `InvalidSignature` even if its expiry is fine.
/// Expiry is evaluated against the supplied `now`.
pub fn decode_token(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<IdentityClaim, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below against the caller's clock.
    validation.validate_exp = false;
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed(e.to_string()),
    })?;

    if data.claims.is_expired(now) {
        return Err(TokenError::Expired);
    }

    Ok(data.claims.identity())
}
