//! Bearer authentication extractor.
//!
//! Handlers take an [`AuthenticatedUser`] argument to require a valid token;
//! extraction reads the `Authorization` header and verifies it through the
//! [`TokenService`](crate::domain::ports::TokenService) port, so handler
//! tests can substitute any token implementation.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use tracing::debug;

use crate::domain::{Error, UserId};
use crate::inbound::http::state::HttpState;

/// The authenticated caller, extracted from a `Bearer` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    /// The verified user identifier.
    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

fn extract(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))?;

    state.tokens.verify(token.trim()).map(AuthenticatedUser).map_err(|error| {
        debug!(%error, "token verification failed");
        Error::unauthorized("invalid or expired token")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}
