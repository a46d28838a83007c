//! OAuth2 access tokens for Earth Engine requests.
//!
//! The client asks its [`TokenProvider`] for a token before every request.
//! Access tokens expire after about an hour, so long runs should use
//! [`RefreshToken`], which exchanges a stored refresh token for new access
//! tokens as they run out. [`StaticToken`] sends a fixed token (or none).

use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{EarthEngineError, Result};

/// Google OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed before use.
pub const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Source of bearer tokens.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Token for the next request; `None` sends the request unauthenticated.
    async fn access_token(&self) -> Result<Option<String>>;
}

/// A fixed token, or no authentication at all.
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<Option<String>> {
        Ok(self.0.clone())
    }
}

/// Stored user credentials, as written by `earthengine authenticate`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now + REFRESH_MARGIN < self.expires_at
    }
}

/// Access tokens minted from a refresh token and cached until near expiry.
pub struct RefreshToken {
    client: Client,
    credentials: RefreshCredentials,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl RefreshToken {
    pub fn new(credentials: RefreshCredentials) -> Result<Self> {
        Self::with_token_url(credentials, DEFAULT_TOKEN_URL)
    }

    /// Use a token endpoint other than Google's.
    pub fn with_token_url(credentials: RefreshCredentials, token_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            credentials,
            token_url: token_url.to_string(),
            cached: Mutex::new(None),
        })
    }

    /// Load credentials from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let credentials: RefreshCredentials = serde_json::from_str(&content).map_err(|e| {
            EarthEngineError::Auth(format!("invalid credentials file {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "Loaded Earth Engine credentials");
        Self::new(credentials)
    }

    fn cached(&self, now: Instant) -> Option<String> {
        let guard = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|token| token.is_fresh(now))
            .map(|token| token.value.clone())
    }

    async fn refresh(&self) -> Result<CachedToken> {
        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("refresh_token", self.credentials.refresh_token.as_str()),
        ];
        let response = self.client.post(&self.token_url).form(&form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(EarthEngineError::Auth(format!(
                "token refresh returned {}: {}",
                status.as_u16(),
                text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| EarthEngineError::Auth(format!("malformed token response: {}", e)))?;

        debug!(expires_in = token.expires_in, "Refreshed access token");
        Ok(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}

#[async_trait]
impl TokenProvider for RefreshToken {
    async fn access_token(&self) -> Result<Option<String>> {
        if let Some(token) = self.cached(Instant::now()) {
            return Ok(Some(token));
        }

        let fresh = self.refresh().await?;
        let value = fresh.value.clone();
        *self.cached.lock().unwrap_or_else(|e| e.into_inner()) = Some(fresh);
        Ok(Some(value))
    }
}
