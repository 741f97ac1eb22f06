//! Port for credential hashing.

/// Failures raised by password hashing adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// Hashing the plaintext failed.
    #[error("password hashing failed: {message}")]
    Hash { message: String },
    /// The stored hash could not be parsed for verification.
    #[error("password verification failed: {message}")]
    Verify { message: String },
}

impl PasswordHashError {
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }

    pub fn verify(message: impl Into<String>) -> Self {
        Self::Verify {
            message: message.into(),
        }
    }
}

/// Credential hashing and verification.
///
/// Pure computation, so the port is synchronous; adapters must never store
/// or log the plaintext.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing hash string.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check a plaintext password against a stored hash. A mismatched
    /// password is `Ok(false)`; only an unreadable hash is an error.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}
