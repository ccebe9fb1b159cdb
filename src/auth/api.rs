//! Authentication API Endpoints
//! Mission: Provide registration and login endpoints

use crate::auth::models::{
    LoginRequest, LoginResponse, RegisterRequest, UserResponse, UserRole,
};
use crate::auth::user_store::UserStoreError;
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, info, warn};

/// Register endpoint - POST /api/auth/register
///
/// Self-service registration always yields a `USER` role account.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AuthApiError> {
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Err(AuthApiError::MissingCredentials);
    };

    if username.is_empty() || password.is_empty() {
        return Err(AuthApiError::MissingCredentials);
    }

    state
        .users
        .create_user(&username, &password, UserRole::User)
        .map_err(|e| match e {
            UserStoreError::DuplicateUsername => AuthApiError::UsernameTaken,
            other => {
                error!("Failed to create user: {}", other);
                AuthApiError::InternalError
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthApiError> {
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Err(AuthApiError::MissingCredentials);
    };

    info!("🔐 Login attempt: {}", username);

    let valid = state
        .users
        .verify_password(&username, &password)
        .map_err(|e| {
            error!("Password verification failed: {}", e);
            AuthApiError::InternalError
        })?;

    if !valid {
        warn!("❌ Failed login attempt: {}", username);
        return Err(AuthApiError::InvalidCredentials);
    }

    let user = state
        .users
        .find_by_username(&username)
        .map_err(|e| {
            error!("User lookup failed: {}", e);
            AuthApiError::InternalError
        })?
        .ok_or(AuthApiError::InvalidCredentials)?;

    let token = state.jwt.issue(&user).map_err(|e| {
        error!("Token issuance failed: {}", e);
        AuthApiError::InternalError
    })?;

    info!(
        "✅ Login successful: {} ({})",
        user.username,
        user.role.as_str()
    );

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        access_token: token,
        user: UserResponse::from_user(&user),
    }))
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    MissingCredentials,
    UsernameTaken,
    InvalidCredentials,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::MissingCredentials => {
                (StatusCode::BAD_REQUEST, "Username and password are required")
            }
            AuthApiError::UsernameTaken => (StatusCode::BAD_REQUEST, "Username already taken"),
            AuthApiError::InvalidCredentials => (StatusCode::BAD_REQUEST, "Invalid credentials"),
            AuthApiError::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "Server error"),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_api_error_responses() {
        let missing = AuthApiError::MissingCredentials.into_response();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let taken = AuthApiError::UsernameTaken.into_response();
        assert_eq!(taken.status(), StatusCode::BAD_REQUEST);

        let invalid = AuthApiError::InvalidCredentials.into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let internal = AuthApiError::InternalError.into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
