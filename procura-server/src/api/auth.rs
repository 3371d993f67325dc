//! Registration, login, session info and linked-account management

use axum::{
    Extension,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{Provider, Role};
use shared::util::now_millis;

use crate::auth::{AuthUser, create_token};
use crate::db::{social_accounts, supplier_profiles, users};
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

use super::{ApiResult, CreatedResult, created, internal, ok};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    /// Required when registering as a supplier
    pub company_name: Option<String>,
}

#[derive(Serialize)]
pub struct SessionPayload {
    pub token: String,
    pub user: users::User,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<RegisterRequest>,
) -> CreatedResult<SessionPayload> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("invalid email address"));
    }
    if req.password.len() < 8 {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if req.role == Role::Admin {
        // Admin accounts are provisioned out of band
        return Err(AppError::validation("role must be BUYER or SUPPLIER"));
    }
    let company_name = if req.role == Role::Supplier {
        let name = req
            .company_name
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if name.is_empty() {
            return Err(AppError::validation("company_name is required for suppliers"));
        }
        Some(name.to_string())
    } else {
        None
    };

    if users::find_by_email(&state.pool, &email)
        .await
        .map_err(internal)?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::EmailTaken));
    }

    let hashed = hash_password(&req.password).map_err(internal)?;
    let now = now_millis();
    let user_id = users::create(
        &state.pool,
        &email,
        Some(&hashed),
        req.first_name.trim(),
        req.last_name.trim(),
        req.role.as_str(),
        now,
    )
    .await
    .map_err(internal)?;

    if let Some(company_name) = company_name {
        supplier_profiles::create(&state.pool, user_id, &company_name, now)
            .await
            .map_err(internal)?;
    }

    let user = users::find_by_id(&state.pool, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::InternalError))?;
    let token = create_token(user_id, &state.jwt_secret).map_err(internal)?;

    created(SessionPayload { token, user })
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<LoginRequest>,
) -> ApiResult<SessionPayload> {
    let email = req.email.trim().to_lowercase();
    let user = users::find_by_email(&state.pool, &email)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    let Some(hash) = user.hashed_password.as_deref() else {
        // Social-only account, no password login
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    };
    if !verify_password(&req.password, hash) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }
    if user.status != "ACTIVE" {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let token = create_token(user.id, &state.jwt_secret).map_err(internal)?;
    ok(SessionPayload { token, user })
}

#[derive(Serialize)]
pub struct MePayload {
    pub user: users::User,
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<MePayload> {
    let user = users::find_by_id(&state.pool, auth.user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated))?;
    ok(MePayload { user })
}

#[derive(Serialize)]
pub struct LinkedAccountsPayload {
    pub google: bool,
    pub facebook: bool,
    pub wechat: bool,
}

pub(crate) async fn load_linked(
    state: &AppState,
    user_id: i64,
) -> Result<LinkedAccountsPayload, AppError> {
    let accounts = social_accounts::list_for_user(&state.pool, user_id)
        .await
        .map_err(internal)?;
    let has = |p: Provider| accounts.iter().any(|a| a.provider == p.as_str());
    Ok(LinkedAccountsPayload {
        google: has(Provider::Google),
        facebook: has(Provider::Facebook),
        wechat: has(Provider::Wechat),
    })
}

/// GET /api/auth/linked-accounts
pub async fn linked_accounts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<LinkedAccountsPayload> {
    let linked = load_linked(&state, auth.user_id).await?;
    ok(linked)
}

/// POST /api/auth/{provider}/unlink
pub async fn unlink(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(provider): Path<String>,
) -> ApiResult<LinkedAccountsPayload> {
    let provider: Provider = provider
        .parse()
        .map_err(|_| AppError::new(ErrorCode::ProviderNotSupported))?;

    let removed = social_accounts::delete_for_user_provider(&state.pool, auth.user_id, provider.as_str())
        .await
        .map_err(internal)?;
    if !removed {
        return Err(AppError::new(ErrorCode::SocialAccountNotFound));
    }

    let linked = load_linked(&state, auth.user_id).await?;
    ok(linked)
}
