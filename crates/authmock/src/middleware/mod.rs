//! Request pipeline stages that run before any handler.

mod basic_auth;
mod session;

pub use basic_auth::require_basic_auth;
pub use session::{session_csrf, CsrfToken};
