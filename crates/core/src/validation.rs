//! Request body validation.
//!
//! Validators collect every failing field instead of stopping at the first,
//! so a client can fix all of its input in one round trip.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending body field.
    pub param: String,
    pub msg: String,
    /// The rejected value, echoed back as received.
    pub value: String,
}

impl FieldError {
    pub fn new(param: &str, msg: &str, value: &str) -> Self {
        Self {
            param: param.to_string(),
            msg: msg.to_string(),
            value: value.to_string(),
        }
    }
}

/// Accumulates field errors across several checks.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn not_empty(mut self, param: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.errors
                .push(FieldError::new(param, "must not be empty", value));
        }
        self
    }

    pub fn email(mut self, param: &str, value: &str) -> Self {
        if !is_email(value) {
            self.errors
                .push(FieldError::new(param, "must be a valid email address", value));
        }
        self
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Syntactic email check. Does not resolve the domain.
pub fn is_email(value: &str) -> bool {
    value.len() <= 254 && EMAIL_RE.is_match(value)
}

/// Rules for `POST /login`.
pub fn validate_login(name: &str, email: &str) -> Result<(), Vec<FieldError>> {
    Validator::new()
        .not_empty("name", name)
        .email("email", email)
        .finish()
}

/// Rules for the bot control endpoints.
pub fn validate_username(username: &str) -> Result<(), Vec<FieldError>> {
    Validator::new().not_empty("username", username).finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_email("a@b.com"));
        assert!(is_email("john.doe+tag@example.co.uk"));
        assert!(is_email("dev@sub-domain.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_email("not-an-email"));
        assert!(!is_email(""));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.com"));
        assert!(!is_email("a@.com"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email("a@b.c"));
    }

    #[test]
    fn login_with_empty_name_reports_name() {
        let errors = validate_login("", "a@b.com").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].param, "name");
    }

    #[test]
    fn login_with_bad_email_reports_email() {
        let errors = validate_login("A", "not-an-email").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].param, "email");
        assert_eq!(errors[0].value, "not-an-email");
    }

    #[test]
    fn login_reports_every_failing_field() {
        let errors = validate_login("", "nope").unwrap_err();
        let params: Vec<&str> = errors.iter().map(|e| e.param.as_str()).collect();
        assert_eq!(params, vec!["name", "email"]);
    }

    #[test]
    fn valid_login_passes() {
        assert!(validate_login("A", "a@b.com").is_ok());
    }

    #[test]
    fn whitespace_username_is_empty() {
        let errors = validate_username("   ").unwrap_err();
        assert_eq!(errors[0].param, "username");
        assert!(validate_username("tracy").is_ok());
    }
}
