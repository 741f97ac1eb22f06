//! Identity domain service: registration and login.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    IdentityService, PasswordHashError, PasswordHasher, TokenService, UserPersistenceError,
    UserRepository,
};
use crate::domain::{AccessToken, Error, LoginCredentials, RegistrationRequest, User};

/// Identity service implementing [`IdentityService`] over a user repository,
/// a password hasher, and a token issuer.
pub struct IdentityServiceImpl<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<U, H, T> IdentityServiceImpl<U, H, T> {
    /// Create a new service from its collaborators.
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        // Insert race with another registration: same outcome as the
        // pre-insert uniqueness checks.
        UserPersistenceError::DuplicateKey { .. } => {
            Error::conflict("login or email already in use")
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("credential hashing failed: {error}"))
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid login or password")
}

#[async_trait]
impl<U, H, T> IdentityService for IdentityServiceImpl<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    async fn register(&self, request: RegistrationRequest) -> Result<User, Error> {
        if self
            .users
            .find_by_login(request.login())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::conflict("login already in use"));
        }
        if self
            .users
            .find_by_email(request.email())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::conflict("email already in use"));
        }

        let password_hash = self.hasher.hash(request.password()).map_err(map_hash_error)?;
        let user = User::register(request.name(), request.login(), request.email(), password_hash);
        self.users.insert(&user).await.map_err(map_user_error)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AccessToken, Error> {
        let Some(user) = self
            .users
            .find_by_login(credentials.login())
            .await
            .map_err(map_user_error)?
        else {
            // Unknown login and bad password are indistinguishable on purpose.
            return Err(invalid_credentials());
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            debug!(login = %user.login, "password verification failed");
            return Err(invalid_credentials());
        }

        self.tokens
            .issue(&user.id)
            .map_err(|error| Error::internal(format!("failed to issue access token: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPasswordHasher, MockTokenService, MockUserRepository};
    use crate::domain::{ErrorCode, UserId};

    fn request() -> RegistrationRequest {
        RegistrationRequest::try_from_parts(
            "Teste User",
            "testuser",
            "test@pokedex.com",
            "password123",
        )
        .expect("valid request")
    }

    fn credentials(password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts("testuser", password).expect("valid credentials")
    }

    fn stored_user() -> User {
        User::register("Teste User", "testuser", "test@pokedex.com", "phc-hash")
    }

    fn service(
        users: MockUserRepository,
        hasher: MockPasswordHasher,
        tokens: MockTokenService,
    ) -> IdentityServiceImpl<MockUserRepository, MockPasswordHasher, MockTokenService> {
        IdentityServiceImpl::new(Arc::new(users), Arc::new(hasher), Arc::new(tokens))
    }

    #[tokio::test]
    async fn register_hashes_the_password_and_stores_the_user() {
        let mut users = MockUserRepository::new();
        let mut hasher = MockPasswordHasher::new();

        users.expect_find_by_login().times(1).returning(|_| Ok(None));
        users.expect_find_by_email().times(1).returning(|_| Ok(None));
        hasher
            .expect_hash()
            .withf(|password| password == "password123")
            .times(1)
            .returning(|_| Ok("phc-hash".to_owned()));
        users
            .expect_insert()
            .withf(|user| user.login == "testuser" && user.password_hash == "phc-hash")
            .times(1)
            .returning(|user| Ok(user.clone()));

        let user = service(users, hasher, MockTokenService::new())
            .register(request())
            .await
            .expect("registration succeeds");
        assert_eq!(user.email, "test@pokedex.com");
    }

    #[tokio::test]
    async fn register_rejects_a_taken_login_before_hashing() {
        let mut users = MockUserRepository::new();
        let mut hasher = MockPasswordHasher::new();

        users
            .expect_find_by_login()
            .times(1)
            .returning(|_| Ok(Some(stored_user())));
        hasher.expect_hash().times(0);

        let error = service(users, hasher, MockTokenService::new())
            .register(request())
            .await
            .expect_err("registration fails");
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert!(error.message().contains("login"));
    }

    #[tokio::test]
    async fn register_rejects_a_taken_email() {
        let mut users = MockUserRepository::new();

        users.expect_find_by_login().times(1).returning(|_| Ok(None));
        users
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(stored_user())));

        let error = service(users, MockPasswordHasher::new(), MockTokenService::new())
            .register(request())
            .await
            .expect_err("registration fails");
        assert_eq!(error.code(), ErrorCode::Conflict);
        assert!(error.message().contains("email"));
    }

    #[tokio::test]
    async fn register_maps_an_insert_race_to_the_same_conflict() {
        let mut users = MockUserRepository::new();
        let mut hasher = MockPasswordHasher::new();

        users.expect_find_by_login().times(1).returning(|_| Ok(None));
        users.expect_find_by_email().times(1).returning(|_| Ok(None));
        hasher.expect_hash().times(1).returning(|_| Ok("phc-hash".to_owned()));
        users
            .expect_insert()
            .times(1)
            .returning(|_| Err(UserPersistenceError::duplicate_key("users_login_key")));

        let error = service(users, hasher, MockTokenService::new())
            .register(request())
            .await
            .expect_err("registration fails");
        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn login_issues_a_token_for_the_authenticated_user() {
        let user = stored_user();
        let user_id = user.id;
        let mut users = MockUserRepository::new();
        let mut hasher = MockPasswordHasher::new();
        let mut tokens = MockTokenService::new();

        users
            .expect_find_by_login()
            .times(1)
            .return_once(move |_| Ok(Some(user)));
        hasher
            .expect_verify()
            .withf(|password, hash| password == "password123" && hash == "phc-hash")
            .times(1)
            .returning(|_, _| Ok(true));
        tokens
            .expect_issue()
            .withf(move |id: &UserId| *id == user_id)
            .times(1)
            .returning(|_| Ok(AccessToken::new("signed-token")));

        let token = service(users, hasher, tokens)
            .login(credentials("password123"))
            .await
            .expect("login succeeds");
        assert_eq!(token.as_str(), "signed-token");
    }

    #[tokio::test]
    async fn login_rejects_an_unknown_login() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_login().times(1).returning(|_| Ok(None));

        let error = service(users, MockPasswordHasher::new(), MockTokenService::new())
            .login(credentials("password123"))
            .await
            .expect_err("login fails");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn login_rejects_a_wrong_password_with_the_same_error() {
        let mut users = MockUserRepository::new();
        let mut hasher = MockPasswordHasher::new();
        let mut tokens = MockTokenService::new();

        users
            .expect_find_by_login()
            .times(1)
            .return_once(|_| Ok(Some(stored_user())));
        hasher.expect_verify().times(1).returning(|_, _| Ok(false));
        tokens.expect_issue().times(0);

        let error = service(users, hasher, tokens)
            .login(credentials("wrong"))
            .await
            .expect_err("login fails");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), "invalid login or password");
    }
}
