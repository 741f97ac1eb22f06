//! Port for user persistence adapters.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{User, UserId};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// A unique constraint (login or email) rejected the write.
    #[error("user already exists: {message}")]
    DuplicateKey { message: String },
}

impl UserPersistenceError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::DuplicateKey {
            message: message.into(),
        }
    }
}

/// Persistence boundary for registered users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, returning the stored row. Unique-violation races
    /// surface as [`UserPersistenceError::DuplicateKey`].
    async fn insert(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by unique login.
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by unique email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError>;
}

/// In-memory repository for tests, enforcing the same uniqueness rules as
/// the database adapter.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<User>> {
        self.users.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut users = self.lock();
        if users
            .iter()
            .any(|stored| stored.login == user.login || stored.email == user.email)
        {
            return Err(UserPersistenceError::duplicate_key(
                "login or email already registered",
            ));
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().iter().find(|user| user.id == *id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().iter().find(|user| user.login == login).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().iter().find(|user| user.email == email).cloned())
    }
}
