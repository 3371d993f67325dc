//! OAuth broker endpoints: login, account linking, WeChat demo round-trip
//!
//! Browser-facing endpoints answer with redirects, never JSON: success lands
//! on the frontend with `?token=` (login) or `?linked=1` (link), failures
//! with a short `?error=` token.

use axum::{
    Extension,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{OAuthFlow, Provider, Role};
use shared::util::now_millis;

use crate::auth::oauth::{SocialIdentity, providers, wechat_demo_identity};
use crate::auth::{AuthUser, create_token};
use crate::db::{social_accounts, users};
use crate::error::ServiceError;
use crate::state::AppState;

use super::{ApiResult, ok};

/// GET /api/auth/{provider}
///
/// Start a login flow: mint a state token and send the browser to the
/// provider's authorization page.
pub async fn start_login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Response, AppError> {
    let provider: Provider = provider
        .parse()
        .map_err(|_| AppError::new(ErrorCode::ProviderNotSupported))?;
    check_configured(&state, provider)?;

    let token = state
        .oauth_states
        .issue(provider, OAuthFlow::Login, None)
        .await;

    match provider {
        Provider::Google => {
            let url = providers::google_auth_url(
                &state.google_client_id,
                &state.google_redirect_uri,
                &token,
            )
            .map_err(url_error)?;
            Ok(Redirect::to(&url).into_response())
        }
        Provider::Facebook => {
            let url = providers::facebook_auth_url(
                &state.facebook_app_id,
                &state.facebook_redirect_uri,
                &token,
            )
            .map_err(url_error)?;
            Ok(Redirect::to(&url).into_response())
        }
        Provider::Wechat => Ok(Html(demo_page(&token)).into_response()),
    }
}

#[derive(Serialize)]
pub struct LinkStartPayload {
    pub url: String,
}

/// GET /api/auth/{provider}/link
///
/// Start a link flow for the authenticated user. Returns the authorization
/// URL for the frontend to navigate to.
pub async fn start_link(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(provider): Path<String>,
) -> ApiResult<LinkStartPayload> {
    let provider: Provider = provider
        .parse()
        .map_err(|_| AppError::new(ErrorCode::ProviderNotSupported))?;
    check_configured(&state, provider)?;

    let token = state
        .oauth_states
        .issue(provider, OAuthFlow::Link, Some(auth.user_id))
        .await;

    let url = match provider {
        Provider::Google => {
            providers::google_auth_url(&state.google_client_id, &state.google_redirect_uri, &token)
                .map_err(url_error)?
        }
        Provider::Facebook => providers::facebook_auth_url(
            &state.facebook_app_id,
            &state.facebook_redirect_uri,
            &token,
        )
        .map_err(url_error)?,
        Provider::Wechat => format!("/api/auth/wechat/demo/callback?state={token}"),
    };

    ok(LinkStartPayload { url })
}

/// POST /api/auth/wechat/link
///
/// Demo shortcut: links the caller's simulated WeChat identity without a
/// browser round-trip. Only available in demo mode.
pub async fn wechat_demo_link(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<super::auth::LinkedAccountsPayload> {
    if !state.wechat_demo_mode {
        return Err(AppError::new(ErrorCode::ProviderUnavailable));
    }

    social_accounts::replace_link(
        &state.pool,
        auth.user_id,
        Provider::Wechat.as_str(),
        &format!("demo-{}", auth.user_id),
        None,
        now_millis(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Link write failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let linked = super::auth::load_linked(&state, auth.user_id).await?;
    ok(linked)
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /api/auth/{provider}/callback
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let Ok(provider) = provider.parse::<Provider>() else {
        return error_redirect(&state, None, "oauth_callback_failed");
    };

    // Burn the state token first so a replayed callback always fails.
    let record = match query.state.as_deref() {
        Some(token) => state.oauth_states.consume(provider, token).await,
        None => None,
    };
    let flow = record.as_ref().map(|r| r.flow);

    if let Some(provider_error) = query.error.as_deref() {
        return error_redirect(&state, flow, provider_error);
    }
    if query.code.is_none() || query.state.is_none() {
        return error_redirect(&state, flow, "missing_code_or_state");
    }
    let Some(record) = record else {
        return error_redirect(&state, flow, "invalid_state");
    };
    let code = query.code.as_deref().unwrap_or_default();

    let identity = match exchange(&state, provider, code).await {
        Ok(identity) => identity,
        Err(e) => {
            let token = known_error_token(e.as_ref()).unwrap_or_else(|| {
                tracing::error!(provider = %provider, error = %e, "OAuth code exchange failed");
                match record.flow {
                    OAuthFlow::Login => "oauth_callback_failed",
                    OAuthFlow::Link => "oauth_link_failed",
                }
            });
            return error_redirect(&state, Some(record.flow), token);
        }
    };

    match record.flow {
        OAuthFlow::Login => finish_login(&state, identity).await,
        OAuthFlow::Link => finish_link(&state, record.user_id, identity).await,
    }
}

/// GET /api/auth/wechat/demo/callback
///
/// Completes the simulated WeChat round-trip started by the demo page.
pub async fn wechat_demo_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let record = match query.state.as_deref() {
        Some(token) => state.oauth_states.consume(Provider::Wechat, token).await,
        None => None,
    };
    let Some(record) = record else {
        return error_redirect(&state, None, "invalid_state");
    };

    match record.flow {
        OAuthFlow::Login => finish_login(&state, wechat_demo_identity()).await,
        OAuthFlow::Link => {
            // Each user gets a distinct simulated WeChat identity.
            let Some(user_id) = record.user_id else {
                return error_redirect(&state, Some(OAuthFlow::Link), "missing_user");
            };
            let identity = SocialIdentity {
                provider: Provider::Wechat,
                provider_user_id: format!("demo-{user_id}"),
                email: None,
            };
            finish_link(&state, Some(user_id), identity).await
        }
    }
}

// ── Flow completion ──

async fn finish_login(state: &AppState, identity: SocialIdentity) -> Redirect {
    let user_id = match find_or_create_user(state, &identity).await {
        Ok(user_id) => user_id,
        Err(e) => {
            let app: AppError = e.into();
            tracing::error!(code = %app.code, "OAuth login failed");
            return error_redirect(state, Some(OAuthFlow::Login), "oauth_callback_failed");
        }
    };
    let token = match create_token(user_id, &state.jwt_secret) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Token creation failed: {e}");
            return error_redirect(state, Some(OAuthFlow::Login), "oauth_callback_failed");
        }
    };
    Redirect::to(&format!("{}?token={token}", state.frontend_oauth_redirect))
}

async fn finish_link(
    state: &AppState,
    user_id: Option<i64>,
    identity: SocialIdentity,
) -> Redirect {
    let Some(user_id) = user_id else {
        return error_redirect(state, Some(OAuthFlow::Link), "missing_user");
    };

    // The provider identity may already belong to someone else.
    match social_accounts::find_by_provider_pair(
        &state.pool,
        identity.provider.as_str(),
        &identity.provider_user_id,
    )
    .await
    {
        Ok(Some(existing)) if existing.user_id != user_id => {
            return error_redirect(state, Some(OAuthFlow::Link), "already_linked");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!("Link lookup failed: {e}");
            return error_redirect(state, Some(OAuthFlow::Link), "oauth_link_failed");
        }
    }

    if let Err(e) = social_accounts::replace_link(
        &state.pool,
        user_id,
        identity.provider.as_str(),
        &identity.provider_user_id,
        identity.email.as_deref(),
        now_millis(),
    )
    .await
    {
        tracing::error!("Link write failed: {e}");
        return error_redirect(state, Some(OAuthFlow::Link), "oauth_link_failed");
    }

    Redirect::to(&format!(
        "{}?linked=1",
        state.frontend_linked_accounts_redirect
    ))
}

/// Resolve a verified identity to a local user id, creating accounts on
/// first login: existing link wins, then an email match attaches the link,
/// otherwise a fresh BUYER account is created.
async fn find_or_create_user(
    state: &AppState,
    identity: &SocialIdentity,
) -> Result<i64, ServiceError> {
    if let Some(account) = social_accounts::find_by_provider_pair(
        &state.pool,
        identity.provider.as_str(),
        &identity.provider_user_id,
    )
    .await?
    {
        return Ok(account.user_id);
    }

    let now = now_millis();

    if let Some(email) = identity.email.as_deref()
        && let Some(user) = users::find_by_email(&state.pool, email).await?
    {
        social_accounts::create(
            &state.pool,
            user.id,
            identity.provider.as_str(),
            &identity.provider_user_id,
            identity.email.as_deref(),
            now,
        )
        .await?;
        return Ok(user.id);
    }

    let email = identity.email.clone().unwrap_or_else(|| {
        format!(
            "{}-{}@no-email.example",
            identity.provider.as_str(),
            identity.provider_user_id
        )
    });
    let (first_name, last_name) = match identity.provider {
        Provider::Wechat => ("Demo", "WeChat"),
        provider => ("OAuth", provider.as_str()),
    };

    let user_id = users::create(
        &state.pool,
        &email,
        None,
        first_name,
        last_name,
        Role::Buyer.as_str(),
        now,
    )
    .await?;
    social_accounts::create(
        &state.pool,
        user_id,
        identity.provider.as_str(),
        &identity.provider_user_id,
        identity.email.as_deref(),
        now,
    )
    .await?;

    Ok(user_id)
}

// ── Helpers ──

async fn exchange(
    state: &AppState,
    provider: Provider,
    code: &str,
) -> Result<SocialIdentity, Box<dyn std::error::Error + Send + Sync>> {
    match provider {
        Provider::Google => {
            providers::google_exchange(
                &state.http,
                &state.google_client_id,
                &state.google_client_secret,
                &state.google_redirect_uri,
                code,
            )
            .await
        }
        Provider::Facebook => {
            providers::facebook_exchange(
                &state.http,
                &state.facebook_app_id,
                &state.facebook_app_secret,
                &state.facebook_redirect_uri,
                code,
            )
            .await
        }
        Provider::Wechat => Err("oauth_callback_failed".into()),
    }
}

/// A provider with no configured credentials (or WeChat outside demo mode)
/// is offline: 503, not a broken redirect to the provider.
fn check_configured(state: &AppState, provider: Provider) -> Result<(), AppError> {
    match provider {
        Provider::Google => check_credential(&state.google_client_id),
        Provider::Facebook => check_credential(&state.facebook_app_id),
        Provider::Wechat if state.wechat_demo_mode => Ok(()),
        Provider::Wechat => Err(AppError::new(ErrorCode::ProviderUnavailable)),
    }
}

fn check_credential(credential: &str) -> Result<(), AppError> {
    if credential.trim().is_empty() {
        return Err(AppError::new(ErrorCode::ProviderUnavailable));
    }
    Ok(())
}

fn url_error(e: Box<dyn std::error::Error + Send + Sync>) -> AppError {
    tracing::error!("Authorization URL build failed: {e}");
    AppError::new(ErrorCode::InternalError)
}

/// Exchange failures that carry a stable error token for the frontend.
fn known_error_token(e: &(dyn std::error::Error + Send + Sync)) -> Option<&'static str> {
    match e.to_string().as_str() {
        "missing_id_token" => Some("missing_id_token"),
        "invalid_google_token" => Some("invalid_google_token"),
        "missing_facebook_access_token" => Some("missing_facebook_access_token"),
        "invalid_facebook_profile" => Some("invalid_facebook_profile"),
        "oauth_callback_failed" => Some("oauth_callback_failed"),
        _ => None,
    }
}

/// Redirect a failed flow back to the frontend. Link failures land on the
/// linked-accounts page, everything else on the login callback page.
fn error_redirect(state: &AppState, flow: Option<OAuthFlow>, token: &str) -> Redirect {
    let base = match flow {
        Some(OAuthFlow::Link) => &state.frontend_linked_accounts_redirect,
        _ => &state.frontend_oauth_redirect,
    };
    Redirect::to(&format!("{base}?error={token}"))
}

fn demo_page(token: &str) -> String {
    format!(
        "<!doctype html>\n\
         <html>\n\
         <head><meta charset=\"utf-8\"><title>WeChat Demo Login</title></head>\n\
         <body>\n\
         <p>Simulating WeChat authorization...</p>\n\
         <script>window.location.replace(\"/api/auth/wechat/demo/callback?state={token}\");</script>\n\
         </body>\n\
         </html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_missing_credential_is_service_unavailable() {
        let err = check_credential("").unwrap_err();
        assert_eq!(err.code, ErrorCode::ProviderUnavailable);
        assert_eq!(err.http_status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(check_credential("  ").unwrap_err().code, ErrorCode::ProviderUnavailable);
        assert!(check_credential("cid-1").is_ok());
    }

    #[test]
    fn test_known_error_tokens_pass_through() {
        let e: Box<dyn std::error::Error + Send + Sync> = "invalid_google_token".into();
        assert_eq!(known_error_token(e.as_ref()), Some("invalid_google_token"));
        let e: Box<dyn std::error::Error + Send + Sync> = "connection reset".into();
        assert_eq!(known_error_token(e.as_ref()), None);
    }
}
