//! Application state for procura-server

use sqlx::PgPool;

use crate::auth::oauth::StateStore;
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// JWT signing secret
    pub jwt_secret: String,
    /// In-memory OAuth state tokens (single-use, 10 minute TTL)
    pub oauth_states: StateStore,
    /// HTTP client for provider code exchange
    pub http: reqwest::Client,
    /// Frontend redirect targets
    pub frontend_oauth_redirect: String,
    pub frontend_linked_accounts_redirect: String,
    /// Google OAuth application credentials
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_uri: String,
    /// Facebook OAuth application credentials
    pub facebook_app_id: String,
    pub facebook_app_secret: String,
    pub facebook_redirect_uri: String,
    /// WeChat demo round-trip enabled
    pub wechat_demo_mode: bool,
}

impl AppState {
    /// Create a new AppState: connect the pool and run migrations.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            oauth_states: StateStore::new(),
            http: reqwest::Client::new(),
            frontend_oauth_redirect: config.frontend_oauth_redirect.clone(),
            frontend_linked_accounts_redirect: config.frontend_linked_accounts_redirect.clone(),
            google_client_id: config.google_client_id.clone(),
            google_client_secret: config.google_client_secret.clone(),
            google_redirect_uri: config.google_redirect_uri.clone(),
            facebook_app_id: config.facebook_app_id.clone(),
            facebook_app_secret: config.facebook_app_secret.clone(),
            facebook_redirect_uri: config.facebook_redirect_uri.clone(),
            wechat_demo_mode: config.wechat_demo_mode,
        })
    }
}
