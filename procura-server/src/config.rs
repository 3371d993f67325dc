//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Frontend page that receives login/OAuth redirects (`?token=` / `?error=`)
    pub frontend_oauth_redirect: String,
    /// Frontend page that receives account-link redirects (`?linked=1` / `?error=`)
    pub frontend_linked_accounts_redirect: String,
    /// Google OAuth application credentials
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    /// Facebook OAuth application credentials
    pub facebook_app_id: String,
    pub facebook_app_secret: String,
    pub facebook_redirect_uri: String,
    /// When true, the WeChat provider runs a simulated local round-trip
    pub wechat_demo_mode: bool,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            frontend_oauth_redirect: std::env::var("FRONTEND_OAUTH_REDIRECT")
                .unwrap_or_else(|_| "http://localhost:5173/oauth/callback".into()),
            frontend_linked_accounts_redirect: std::env::var("FRONTEND_LINKED_ACCOUNTS_REDIRECT")
                .unwrap_or_else(|_| "http://localhost:5173/settings/linked-accounts".into()),
            google_client_id: std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            google_client_secret: std::env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            google_redirect_uri: std::env::var("GOOGLE_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:5000/api/auth/google/callback".into()),
            facebook_app_id: std::env::var("FACEBOOK_APP_ID").unwrap_or_default(),
            facebook_app_secret: std::env::var("FACEBOOK_APP_SECRET").unwrap_or_default(),
            facebook_redirect_uri: std::env::var("FACEBOOK_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:5000/api/auth/facebook/callback".into()),
            wechat_demo_mode: std::env::var("WECHAT_DEMO_MODE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            environment,
        })
    }
}
