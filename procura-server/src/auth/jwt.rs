//! JWT session tokens and the authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ApiResponse, ErrorCode};

use crate::state::AppState;

/// JWT claims for an authenticated user session
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (stringified i64)
    pub sub: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated user identity extracted from the JWT
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

const JWT_EXPIRY_DAYS: i64 = 7;

/// Create a session JWT for a user
pub fn create_token(user_id: i64, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + chrono::Duration::days(JWT_EXPIRY_DAYS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and validate a session JWT, returning the user id.
pub fn verify_token(token: &str, secret: &str) -> Result<i64, AppError> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        AppError::new(ErrorCode::TokenInvalid)
    })?;

    token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::new(ErrorCode::TokenInvalid))
}

/// Middleware that extracts and verifies the user JWT from the Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized(ErrorCode::NotAuthenticated))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized(ErrorCode::NotAuthenticated))?;

    let user_id = verify_token(token, &state.jwt_secret)
        .map_err(|_| unauthorized(ErrorCode::TokenInvalid))?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

fn unauthorized(code: ErrorCode) -> Response {
    let err = AppError::new(code);
    let body: ApiResponse<()> = ApiResponse::error(&err);
    (http::StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let token = create_token(42, "test-secret").unwrap();
        assert_eq!(verify_token(&token, "test-secret").unwrap(), 42);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(42, "test-secret").unwrap();
        let err = verify_token(&token, "other-secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: "7".into(),
            exp: (now - chrono::Duration::hours(1)).timestamp() as usize,
            iat: (now - chrono::Duration::hours(2)).timestamp() as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(verify_token(&token, "test-secret").is_err());
    }

    #[test]
    fn test_non_numeric_sub_rejected() {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: "not-a-number".into(),
            exp: (now + chrono::Duration::hours(1)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        let err = verify_token(&token, "test-secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }
}
