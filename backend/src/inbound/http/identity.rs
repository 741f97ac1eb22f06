//! Identity API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"name":"...","login":"...","email":"...","password":"..."}
//! POST /api/v1/auth/login {"login":"...","password":"..."}
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Error, LoginCredentials, LoginValidationError, RegistrationRequest,
    RegistrationValidationError,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Registration request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub login: String,
    pub email: String,
    pub password: String,
}

/// Registration success body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Identifier of the newly created user.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: Uuid,
    pub login: String,
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Login success body carrying the bearer token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

fn map_registration_validation_error(err: RegistrationValidationError) -> Error {
    let field = match err {
        RegistrationValidationError::EmptyName => "name",
        RegistrationValidationError::EmptyLogin => "login",
        RegistrationValidationError::InvalidEmail => "email",
        RegistrationValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyLogin => "login",
        LoginValidationError::EmptyPassword => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Login or email already in use", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request =
        RegistrationRequest::try_from_parts(&body.name, &body.login, &body.email, &body.password)
            .map_err(map_registration_validation_error)?;
    let user = state.identity.register(request).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        id: *user.id.as_uuid(),
        login: user.login,
    }))
}

/// Authenticate and obtain a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.login, &body.password)
        .map_err(map_login_validation_error)?;
    let token = state.identity.login(credentials).await?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        access_token: token.as_str().to_owned(),
    }))
}
