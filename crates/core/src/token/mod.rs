//! Signed, time-bound identity tokens.
//!
//! Tokens are HS256 JWTs whose payload carries the identity claim plus
//! `iat`/`exp` in Unix seconds. The issuer keeps no record of them.

mod codec;
mod error;
mod types;

pub use codec::{decode_token, encode_token};
pub use error::TokenError;
pub use types::{IdentityClaim, TokenClaims};
