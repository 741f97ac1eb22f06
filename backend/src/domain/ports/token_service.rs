//! Port for bearer token issuance and verification.

use crate::domain::{AccessToken, UserId};

/// Failures raised by token service adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenServiceError {
    /// The token could not be produced.
    #[error("token issuance failed: {message}")]
    Issue { message: String },
    /// The presented token is malformed, tampered with, or expired.
    #[error("token verification failed: {message}")]
    Verification { message: String },
}

impl TokenServiceError {
    pub fn issue(message: impl Into<String>) -> Self {
        Self::Issue {
            message: message.into(),
        }
    }

    pub fn verification(message: impl Into<String>) -> Self {
        Self::Verification {
            message: message.into(),
        }
    }
}

/// Issues opaque bearer tokens encoding a user identifier and verifies them
/// on inbound requests. Pure computation, so the port is synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token whose subject is the given user.
    fn issue(&self, user_id: &UserId) -> Result<AccessToken, TokenServiceError>;

    /// Verify a presented token and extract the user identifier.
    fn verify(&self, token: &str) -> Result<UserId, TokenServiceError>;
}
