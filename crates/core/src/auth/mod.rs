//! Account credentials.
//!
//! Password hashing with Argon2id and email normalization for lookups.

mod password;

pub use password::{PasswordError, hash_password, verify_password};

/// Normalizes an email address for storage and lookup.
///
/// Gateways and sign-up forms send the same address with different casing
/// and stray whitespace; every lookup goes through this function.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Owner@Shop.TEST "), "owner@shop.test");
        assert_eq!(normalize_email("owner@shop.test"), "owner@shop.test");
    }
}
