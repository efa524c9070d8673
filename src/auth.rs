//! OAuth2 client-credentials authentication for the directory service.
//!
//! [`ClientSecretCredential`] exchanges the application secret for short-lived
//! access tokens; [`CredentialManager`] caches the current token and refreshes
//! it under a single-writer discipline. The credential itself is exclusively
//! owned here: it is never logged and never appears in any response.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::AdapterConfig;
use crate::error::{AdapterError, AdapterResult};

/// Identity provider endpoint for the public Azure cloud.
pub const DEFAULT_LOGIN_ENDPOINT: &str = "https://login.microsoftonline.com";

const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// A bearer token with its expiry time.
#[derive(Clone)]
pub struct AccessToken {
    /// The bearer token value.
    pub token: String,
    /// Instant after which the token is no longer valid.
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// True if the token is expired or expires within the grace period.
    fn is_expired(&self, grace: Duration) -> bool {
        Utc::now() + grace >= self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Source of fresh access tokens.
///
/// Implemented by [`ClientSecretCredential`] for the real identity provider
/// and by test doubles, so the dispatcher never holds a hidden singleton.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Acquire a new token from the identity provider.
    async fn fetch_token(&self) -> AdapterResult<AccessToken>;
}

/// OAuth2 token response from the identity provider.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Client-credentials flow against the Microsoft identity platform.
pub struct ClientSecretCredential {
    http: reqwest::Client,
    tenant_id: String,
    client_id: String,
    client_secret: SecretString,
    login_endpoint: String,
}

impl ClientSecretCredential {
    /// Build a credential from adapter configuration.
    pub fn new(config: &AdapterConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            login_endpoint: DEFAULT_LOGIN_ENDPOINT.to_string(),
        }
    }

    /// Override the identity provider endpoint (tests).
    pub fn with_login_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.login_endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl TokenSource for ClientSecretCredential {
    async fn fetch_token(&self) -> AdapterResult<AccessToken> {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.login_endpoint, self.tenant_id
        );

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("scope", GRAPH_SCOPE),
        ];

        let response = self
            .http
            .post(&token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| AdapterError::authentication(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::authentication(format!(
                "identity provider rejected the credential ({status}): {body}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AdapterError::authentication(format!("malformed token response: {e}"))
        })?;

        let expires_at = Utc::now() + Duration::seconds(token.expires_in);
        debug!("acquired access token, expires at {expires_at}");

        Ok(AccessToken {
            token: token.access_token,
            expires_at,
        })
    }
}

/// Token cache shared by all concurrent invocations.
///
/// The cache lock is held across the refresh itself, so when several
/// invocations race during an expired-token window the source is called
/// exactly once and every caller observes the refreshed token.
pub struct CredentialManager {
    source: Arc<dyn TokenSource>,
    cached: Mutex<Option<AccessToken>>,
    grace: Duration,
}

impl CredentialManager {
    /// Wrap a token source with caching.
    pub fn new(source: Arc<dyn TokenSource>) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
            // Refresh slightly before expiry so an in-flight directory call
            // never rides a token that lapses mid-request.
            grace: Duration::minutes(5),
        }
    }

    /// Return a currently-valid bearer token, refreshing if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Authentication`] if the identity provider
    /// rejects the credential. The failure is per-call; the next invocation
    /// retries acquisition.
    pub async fn get_token(&self) -> AdapterResult<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.is_expired(self.grace) {
                return Ok(token.token.clone());
            }
        }

        debug!("refreshing access token");
        let fresh = self.source.fetch_token().await?;
        let bearer = fresh.token.clone();
        *cached = Some(fresh);
        Ok(bearer)
    }

    /// Drop the cached token, forcing re-acquisition on next use. Called
    /// when the directory rejects a token the cache still considers valid.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}
