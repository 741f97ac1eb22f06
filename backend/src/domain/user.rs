//! User identity model and credential value types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID (e.g. read back from persistence).
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an identifier from its canonical string form.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Registered application user.
///
/// `password_hash` holds a PHC-format Argon2id hash, never a plaintext
/// credential. The struct is not serialized directly; inbound adapters build
/// dedicated response DTOs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub login: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a freshly registered user with a random id and current
    /// timestamps.
    pub fn register(
        name: impl Into<String>,
        login: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::random(),
            name: name.into(),
            login: login.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validation errors raised by [`RegistrationRequest::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    EmptyName,
    EmptyLogin,
    InvalidEmail,
    EmptyPassword,
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyLogin => write!(f, "login must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Validated payload for registering a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    name: String,
    login: String,
    email: String,
    password: String,
}

impl RegistrationRequest {
    /// Validate and construct a registration request.
    pub fn try_from_parts(
        name: &str,
        login: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistrationValidationError::EmptyName);
        }
        let login = login.trim();
        if login.is_empty() {
            return Err(RegistrationValidationError::EmptyLogin);
        }
        let email = email.trim();
        // Full RFC 5322 parsing is the mail server's problem; reject only
        // values that cannot possibly route.
        if email.is_empty() || !email.contains('@') {
            return Err(RegistrationValidationError::InvalidEmail);
        }
        if password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        Ok(Self {
            name: name.to_owned(),
            login: login.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Validation errors raised by [`LoginCredentials::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    EmptyLogin,
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLogin => write!(f, "login must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Login/password pair presented for authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    login: String,
    password: String,
}

impl LoginCredentials {
    /// Validate and construct credentials.
    pub fn try_from_parts(login: &str, password: &str) -> Result<Self, LoginValidationError> {
        let login = login.trim();
        if login.is_empty() {
            return Err(LoginValidationError::EmptyLogin);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            login: login.to_owned(),
            password: password.to_owned(),
        })
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Opaque bearer token issued on successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "bulba", "a@b.c", "pw", RegistrationValidationError::EmptyName)]
    #[case("Ash", " ", "a@b.c", "pw", RegistrationValidationError::EmptyLogin)]
    #[case("Ash", "ash", "not-an-email", "pw", RegistrationValidationError::InvalidEmail)]
    #[case("Ash", "ash", "a@b.c", "", RegistrationValidationError::EmptyPassword)]
    fn registration_rejects_invalid_parts(
        #[case] name: &str,
        #[case] login: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: RegistrationValidationError,
    ) {
        let err = RegistrationRequest::try_from_parts(name, login, email, password)
            .expect_err("validation should fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn registration_trims_identity_fields() {
        let request = RegistrationRequest::try_from_parts(
            " Teste User ",
            " testuser ",
            " test@pokedex.com ",
            "password123",
        )
        .expect("valid request");
        assert_eq!(request.login(), "testuser");
        assert_eq!(request.email(), "test@pokedex.com");
        assert_eq!(request.password(), "password123");
    }

    #[test]
    fn user_id_parse_round_trip() {
        let id = UserId::random();
        let parsed = UserId::parse(&id.to_string()).expect("canonical form parses");
        assert_eq!(parsed, id);
    }

    #[test]
    fn login_credentials_require_both_parts() {
        assert_eq!(
            LoginCredentials::try_from_parts("", "pw"),
            Err(LoginValidationError::EmptyLogin)
        );
        assert_eq!(
            LoginCredentials::try_from_parts("ash", ""),
            Err(LoginValidationError::EmptyPassword)
        );
    }
}
