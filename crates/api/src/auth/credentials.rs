//! Admin credential validation against configured reference values.

use std::fmt;

use evendiona_core::error::CoreError;
use sha2::{Digest, Sha256};

use crate::config::ConfigError;

/// The configured admin username/password pair.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ConfigError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(ConfigError::Missing("ADMIN_USERNAME"));
        }
        if password.is_empty() {
            return Err(ConfigError::Missing("ADMIN_PASSWORD"));
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Decide whether the submitted pair matches the configured one.
    ///
    /// Returns `Err(CoreError::Validation)` if either field is empty; no
    /// comparison is attempted in that case. Both fields are always compared,
    /// in constant time, so a wrong username costs the same as a wrong
    /// password.
    pub fn validate(&self, username: &str, password: &str) -> Result<bool, CoreError> {
        if username.is_empty() || password.is_empty() {
            return Err(CoreError::Validation(
                "Username and password are required".into(),
            ));
        }

        let username_ok = constant_time_eq(username, &self.username);
        let password_ok = constant_time_eq(password, &self.password);
        Ok(username_ok & password_ok)
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Compare two strings without an early exit on the first differing byte.
///
/// Hashing first gives both sides the same length, so the comparison time
/// does not depend on where (or whether) the inputs diverge.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let da = Sha256::digest(a.as_bytes());
    let db = Sha256::digest(b.as_bytes());
    da.iter().zip(db.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn creds() -> AdminCredentials {
        AdminCredentials::new("admin", "correct-pw").unwrap()
    }

    #[test]
    fn matching_pair_is_accepted() {
        assert!(creds().validate("admin", "correct-pw").unwrap());
    }

    #[test]
    fn wrong_password_is_refused() {
        assert!(!creds().validate("admin", "wrong").unwrap());
    }

    #[test]
    fn wrong_username_is_refused() {
        assert!(!creds().validate("root", "correct-pw").unwrap());
    }

    #[test]
    fn comparison_is_exact() {
        let creds = creds();
        assert!(!creds.validate("Admin", "correct-pw").unwrap());
        assert!(!creds.validate("admin ", "correct-pw").unwrap());
        assert!(!creds.validate("admin", "correct-pw\n").unwrap());
    }

    #[test]
    fn empty_fields_fail_validation() {
        let creds = creds();
        for (u, p) in [("", "correct-pw"), ("admin", ""), ("", "")] {
            assert_matches!(creds.validate(u, p), Err(CoreError::Validation(_)));
        }
    }

    #[test]
    fn empty_reference_values_are_rejected() {
        assert_matches!(
            AdminCredentials::new("", "pw"),
            Err(ConfigError::Missing("ADMIN_USERNAME"))
        );
        assert_matches!(
            AdminCredentials::new("admin", ""),
            Err(ConfigError::Missing("ADMIN_PASSWORD"))
        );
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", creds());
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("correct-pw"));
    }
}
