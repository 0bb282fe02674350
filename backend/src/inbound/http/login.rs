//! Login, logout and session introspection.
//!
//! ```text
//! POST /api/v1/auth/login {"username":"spice","password":"s3cret!","role":"business"}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{Error, LoginCredentials, LoginValidationError, Principal, Role};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::field_error;

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Panel the user is signing in to.
    pub role: Role,
}

impl TryFrom<&LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: &LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password, value.role)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => {
            field_error("username", "empty_username", err.to_string())
        }
        LoginValidationError::EmptyPassword => {
            field_error("password", "empty_password", err.to_string())
        }
    }
}

/// Authenticate and establish a cookie session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = Principal,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account is inactive", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<Principal>> {
    let credentials =
        LoginCredentials::try_from(&payload.into_inner()).map_err(map_login_validation_error)?;
    let principal = state.login.authenticate(&credentials).await?;
    session.persist_principal(&principal)?;
    info!(account_id = %principal.account_id, role = %principal.role, "signed in");
    Ok(web::Json(principal))
}

/// Drop the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// The principal behind the current session.
///
/// The account is re-read, so a deleted account ends the session here too.
#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    responses(
        (status = 200, description = "Signed-in principal", body = Principal),
        (status = 401, description = "No session", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/auth/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Principal>> {
    let identity = session.require_identity()?;
    match state.login.resolve(&identity.account_id).await? {
        Some(principal) if principal.role == identity.role => Ok(web::Json(principal)),
        _ => {
            session.purge();
            Err(Error::unauthorized("session expired"))
        }
    }
}
