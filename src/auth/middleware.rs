//! Authentication Middleware
//! Mission: Protect API routes with bearer-token validation and role gating

use crate::auth::{
    jwt::{JwtHandler, TokenError},
    models::{Claims, UserRole},
};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Auth middleware that validates the `Authorization: Bearer` header.
///
/// A missing or malformed header is an authentication failure (401); a
/// token that fails verification, whether bad signature or expired, is a
/// forbidden request (403). On success the decoded claims are attached to
/// the request extensions for downstream gates and handlers.
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string())
        .ok_or(AuthError::MissingToken)?;

    let claims = jwt_handler.verify(&token).map_err(|e| match e {
        TokenError::Expired => AuthError::ExpiredToken,
        TokenError::Invalid => AuthError::InvalidToken,
    })?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Role gate for admin-only routes, layered inside `auth_middleware`.
///
/// Reads the claims the auth middleware attached; it never authenticates
/// by itself.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AuthError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(AuthError::MissingToken)?;

    if claims.role != UserRole::Admin {
        return Err(AuthError::AdminRequired);
    }

    Ok(next.run(req).await)
}

/// Auth error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
    AdminRequired,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            AuthError::InvalidToken => (StatusCode::FORBIDDEN, "Invalid token"),
            AuthError::ExpiredToken => (StatusCode::FORBIDDEN, "Token expired"),
            AuthError::AdminRequired => (StatusCode::FORBIDDEN, "Admin role required"),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;

    #[test]
    fn test_auth_error_responses() {
        let missing = AuthError::MissingToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let invalid = AuthError::InvalidToken.into_response();
        assert_eq!(invalid.status(), StatusCode::FORBIDDEN);

        let expired = AuthError::ExpiredToken.into_response();
        assert_eq!(expired.status(), StatusCode::FORBIDDEN);

        let admin = AuthError::AdminRequired.into_response();
        assert_eq!(admin.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_claims_attach_to_request_extensions() {
        let mut req = HttpRequest::new(Body::empty());
        assert!(req.extensions().get::<Claims>().is_none());

        let claims = Claims {
            sub: 1,
            username: "alice".to_string(),
            role: UserRole::User,
            exp: 1234567890,
        };
        req.extensions_mut().insert(claims.clone());

        let extracted = req.extensions().get::<Claims>().unwrap();
        assert_eq!(extracted.username, "alice");
        assert_eq!(extracted.role, UserRole::User);
    }
}
