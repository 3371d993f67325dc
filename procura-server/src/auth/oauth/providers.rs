//! Provider integrations via REST API (no SDK dependency)
//!
//! Each provider exposes two halves: building the authorization URL the
//! browser is sent to, and exchanging the callback `code` for a verified
//! identity.

use shared::models::Provider;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Verified identity returned by a provider after code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialIdentity {
    pub provider: Provider,
    pub provider_user_id: String,
    pub email: Option<String>,
}

/// Google authorization URL (OpenID Connect, online access)
pub fn google_auth_url(
    client_id: &str,
    redirect_uri: &str,
    state: &str,
) -> Result<String, BoxError> {
    let url = reqwest::Url::parse_with_params(
        "https://accounts.google.com/o/oauth2/v2/auth",
        [
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", "openid email profile"),
            ("access_type", "online"),
            ("include_granted_scopes", "true"),
            ("state", state),
        ],
    )?;
    Ok(url.into())
}

/// Facebook authorization URL (Graph API v19.0)
pub fn facebook_auth_url(
    app_id: &str,
    redirect_uri: &str,
    state: &str,
) -> Result<String, BoxError> {
    let url = reqwest::Url::parse_with_params(
        "https://www.facebook.com/v19.0/dialog/oauth",
        [
            ("client_id", app_id),
            ("redirect_uri", redirect_uri),
            ("scope", "email"),
            ("response_type", "code"),
            ("state", state),
        ],
    )?;
    Ok(url.into())
}

/// Exchange a Google authorization code for a verified identity.
///
/// The token endpoint returns an `id_token`; its claims are validated via
/// Google's tokeninfo endpoint and the `aud` must match our client id.
pub async fn google_exchange(
    http: &reqwest::Client,
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
    code: &str,
) -> Result<SocialIdentity, BoxError> {
    let token_resp: serde_json::Value = http
        .post("https://oauth2.googleapis.com/token")
        .form(&[
            ("code", code),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?
        .json()
        .await?;

    let id_token = token_resp["id_token"]
        .as_str()
        .ok_or("missing_id_token")?;

    let info: serde_json::Value = http
        .get("https://oauth2.googleapis.com/tokeninfo")
        .query(&[("id_token", id_token)])
        .send()
        .await?
        .json()
        .await?;

    let sub = info["sub"].as_str().ok_or("invalid_google_token")?;
    if info["aud"].as_str() != Some(client_id) {
        return Err("invalid_google_token".into());
    }

    Ok(SocialIdentity {
        provider: Provider::Google,
        provider_user_id: sub.to_string(),
        email: info["email"].as_str().map(String::from),
    })
}

/// Exchange a Facebook authorization code for a verified identity.
pub async fn facebook_exchange(
    http: &reqwest::Client,
    app_id: &str,
    app_secret: &str,
    redirect_uri: &str,
    code: &str,
) -> Result<SocialIdentity, BoxError> {
    let token_resp: serde_json::Value = http
        .get("https://graph.facebook.com/v19.0/oauth/access_token")
        .query(&[
            ("client_id", app_id),
            ("client_secret", app_secret),
            ("redirect_uri", redirect_uri),
            ("code", code),
        ])
        .send()
        .await?
        .json()
        .await?;

    let access_token = token_resp["access_token"]
        .as_str()
        .ok_or("missing_facebook_access_token")?;

    let profile: serde_json::Value = http
        .get("https://graph.facebook.com/me")
        .query(&[("fields", "id,email"), ("access_token", access_token)])
        .send()
        .await?
        .json()
        .await?;

    let id = profile["id"].as_str().ok_or("invalid_facebook_profile")?;

    Ok(SocialIdentity {
        provider: Provider::Facebook,
        provider_user_id: id.to_string(),
        email: profile["email"].as_str().map(String::from),
    })
}

/// Fixed identity used by the WeChat demo round-trip.
pub fn wechat_demo_identity() -> SocialIdentity {
    SocialIdentity {
        provider: Provider::Wechat,
        provider_user_id: "demo-user".to_string(),
        email: Some("wechat-demo@no-email.example".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_auth_url_contains_required_params() {
        let url = google_auth_url("cid-1", "http://localhost:5000/cb", "abc123").unwrap();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=cid-1"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid+email+profile"));
        assert!(url.contains("access_type=online"));
        assert!(url.contains("include_granted_scopes=true"));
        assert!(url.contains("state=abc123"));
    }

    #[test]
    fn test_facebook_auth_url_contains_required_params() {
        let url = facebook_auth_url("app-9", "http://localhost:5000/cb", "xyz").unwrap();
        assert!(url.starts_with("https://www.facebook.com/v19.0/dialog/oauth?"));
        assert!(url.contains("client_id=app-9"));
        assert!(url.contains("scope=email"));
        assert!(url.contains("state=xyz"));
    }

    #[test]
    fn test_auth_url_encodes_reserved_characters() {
        // Reserved characters in the redirect must not splice extra params
        // into the authorization request.
        let url = google_auth_url("cid-1", "https://app.example/cb?next=/home&x=1", "s").unwrap();
        assert!(url.contains("redirect_uri=https%3A%2F%2Fapp.example%2Fcb%3Fnext%3D%2Fhome%26x%3D1"));
        assert!(!url.contains("cb?next"));

        let url = facebook_auth_url("app-9", "https://app.example/cb?a=1&b=2", "s").unwrap();
        assert!(url.contains("redirect_uri=https%3A%2F%2Fapp.example%2Fcb%3Fa%3D1%26b%3D2"));
    }

    #[test]
    fn test_wechat_demo_identity() {
        let id = wechat_demo_identity();
        assert_eq!(id.provider, Provider::Wechat);
        assert_eq!(id.provider_user_id, "demo-user");
        assert_eq!(id.email.as_deref(), Some("wechat-demo@no-email.example"));
    }
}
