//! One-way password hashing.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Crypto(String),
}

/// Hash/verify capability. Plaintext never leaves the call.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// bcrypt with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub const DEFAULT_COST: u32 = 10;

    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| PasswordError::Crypto(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(plaintext, hash).map_err(|e| PasswordError::Crypto(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> BcryptHasher {
        BcryptHasher::new(4)
    }

    #[test]
    fn correct_password_matches() {
        let hash = hasher().hash("willy-wolverine").unwrap();
        assert_ne!(hash, "willy-wolverine");
        assert!(hasher().verify("willy-wolverine", &hash).unwrap());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hasher().hash("willy-wolverine").unwrap();
        assert!(!hasher().verify("swoopy", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(hasher().verify("anything", "not-a-bcrypt-hash").is_err());
    }

    #[test]
    fn invalid_cost_is_an_error() {
        assert!(BcryptHasher::new(99).hash("password").is_err());
    }
}
