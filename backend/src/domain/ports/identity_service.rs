//! Driving port for registration and login use-cases.
//!
//! Inbound adapters call this port to manage identities without knowing the
//! backing persistence, hashing, or token machinery, which keeps handler
//! tests deterministic.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials, RegistrationRequest, User};

/// Domain use-case port for identity management.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Register a new user, enforcing login/email uniqueness.
    async fn register(&self, request: RegistrationRequest) -> Result<User, Error>;

    /// Validate credentials and issue a bearer token for the user.
    async fn login(&self, credentials: LoginCredentials) -> Result<AccessToken, Error>;
}
