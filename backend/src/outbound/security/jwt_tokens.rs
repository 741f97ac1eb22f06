//! HS256 JWT implementation of the `TokenService` port.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenService, TokenServiceError};
use crate::domain::{AccessToken, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User identifier, as a UUID string.
    sub: String,
    iat: i64,
    exp: i64,
}

/// Symmetric-key token service. The secret comes from configuration; every
/// instance sharing the secret can verify tokens issued by any other.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtTokenService {
    /// Create a token service from a shared secret and token lifetime.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: &UserId) -> Result<AccessToken, TokenServiceError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs())
            .map_err(|_| TokenServiceError::issue("token lifetime overflows"))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + ttl,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|error| TokenServiceError::issue(error.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenServiceError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|error| TokenServiceError::verification(error.to_string()))?;
        UserId::parse(&data.claims.sub)
            .map_err(|error| TokenServiceError::verification(format!("invalid subject: {error}")))
    }
}
