//! Functional core for authmock.
//!
//! Everything in this crate is pure: no sockets, no processes, no clocks.
//! Callers pass timestamps and secrets in explicitly.

pub mod basic_auth;
pub mod contact;
pub mod csrf;
pub mod negotiation;
pub mod token;
pub mod validation;
