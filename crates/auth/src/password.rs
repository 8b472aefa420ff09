//! Password hashing.
//!
//! Stored hashes are bcrypt strings (`$2b$<cost>$<salt+digest>`), so rows
//! written by other bcrypt tooling verify unchanged.

use thiserror::Error;

/// Work factor for newly stored hashes.
pub const HASH_COST: u32 = 10;

#[derive(Debug, Error)]
#[error("failed to hash password: {0}")]
pub struct PasswordError(#[from] bcrypt::BcryptError);

/// Hash `password` with a fresh salt at [`HASH_COST`].
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with_cost(password, HASH_COST)
}

/// Hash with an explicit work factor (4 to 31). Fixtures use the minimum.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check `password` against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    bcrypt::verify(password, stored).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: u32 = 4;

    #[test]
    fn hash_round_trips() {
        let stored = hash_password_with_cost("123456", FAST).unwrap();
        assert!(stored.starts_with("$2b$04$"));
        assert!(verify_password("123456", &stored));
        assert!(!verify_password("1234567", &stored));
    }

    #[test]
    fn default_cost_is_encoded_in_the_hash() {
        let stored = hash_password("123456").unwrap();
        assert!(stored.starts_with("$2b$10$"));
        assert!(verify_password("123456", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(
            hash_password_with_cost("secret1", FAST).unwrap(),
            hash_password_with_cost("secret1", FAST).unwrap()
        );
    }

    #[test]
    fn out_of_range_cost_is_an_error() {
        assert!(hash_password_with_cost("secret1", 3).is_err());
        assert!(hash_password_with_cost("secret1", 32).is_err());
    }

    #[test]
    fn malformed_hashes_never_verify() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "$2b$04$short"));
        let legacy = "sha256$salt$2bb80d537b1da3e38bd30361aa855686bde0eacd7162fef6a25fe97bf527a25b";
        assert!(!verify_password("x", legacy));
    }
}
