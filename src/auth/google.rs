use moka::future::Cache;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::config::GoogleConfig;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// How long a started login may take before its `state` is forgotten.
const PENDING_TTL: Duration = Duration::from_secs(600);

/// Whether the OAuth round trip may create an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthIntent {
    #[default]
    Login,
    Signup,
}

/// What the callback needs to remember about the request that started the flow.
#[derive(Debug, Clone)]
pub struct PendingAuth {
    pub intent: AuthIntent,
    pub redirect_uri: Option<String>,
}

/// Subset of Google's userinfo response.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub email: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Clone)]
pub struct GoogleOAuth {
    config: GoogleConfig,
    client: reqwest::Client,
    pending: Arc<Cache<String, PendingAuth>>,
}

impl GoogleOAuth {
    pub fn new(config: GoogleConfig) -> Self {
        let pending = Arc::new(
            Cache::builder()
                .time_to_live(PENDING_TTL)
                .max_capacity(10_000)
                .build(),
        );

        Self {
            config,
            client: reqwest::Client::new(),
            pending,
        }
    }

    /// Remember the intent under a fresh `state` and return Google's consent URL.
    pub async fn begin(&self, pending: PendingAuth) -> Result<String, String> {
        let state = Uuid::new_v4().simple().to_string();
        let url = authorization_url(&self.config, &state)?;
        self.pending.insert(state, pending).await;
        Ok(url)
    }

    /// Consume a `state`; each one is valid for a single callback.
    pub async fn take_pending(&self, state: &str) -> Option<PendingAuth> {
        self.pending.remove(state).await
    }

    /// Exchange an authorization code and fetch the user's Google profile.
    pub async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile, String> {
        debug!("Exchanging Google authorization code");

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| format!("Failed to reach Google token endpoint: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Google token exchange failed: HTTP {status}"));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Google token response: {e}"))?;

        let response = self
            .client
            .get(USERINFO_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| format!("Failed to reach Google userinfo endpoint: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Failed to get user info from Google: HTTP {status}"));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Google user info: {e}"))
    }
}

/// Google consent-screen URL for the given `state`.
pub fn authorization_url(config: &GoogleConfig, state: &str) -> Result<String, String> {
    Url::parse_with_params(
        AUTHORIZE_URL,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "openid email profile"),
            ("access_type", "online"),
            ("state", state),
        ],
    )
    .map(String::from)
    .map_err(|e| format!("Invalid Google authorization URL: {e}"))
}

/// Whether `candidate` shares scheme, host and port with `expected`.
pub fn same_origin(expected: &str, candidate: &str) -> bool {
    match (Url::parse(expected), Url::parse(candidate)) {
        (Ok(expected), Ok(candidate)) => {
            candidate.origin().is_tuple() && expected.origin() == candidate.origin()
        }
        _ => false,
    }
}

/// Frontend URL carrying the issued tokens as query parameters.
pub fn frontend_redirect(
    frontend_url: &str,
    access_token: &str,
    refresh_token: &str,
) -> Result<String, String> {
    Url::parse_with_params(
        frontend_url,
        &[("access_token", access_token), ("refresh_token", refresh_token)],
    )
    .map(String::from)
    .map_err(|e| format!("Invalid frontend URL {frontend_url}: {e}"))
}
