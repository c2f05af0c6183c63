//! Access-token exchange with a time-bounded, single-flight cache.

use daybreak_core::fetch::{LookupClient, DEFAULT_MAX_RETRIES};
use tokio::sync::Mutex;

use crate::error::AuthError;

const API_BASE: &str = "https://api.weixin.qq.com";

/// Refresh this long before the provider-reported expiry, covering clock
/// skew and tokens already in flight.
const EXPIRY_MARGIN_SECS: i64 = 300;

const DEFAULT_EXPIRES_IN_SECS: i64 = 7200;

#[derive(Debug, Clone)]
struct AccessCredential {
    token: String,
    expires_at: i64,
}

impl AccessCredential {
    fn is_valid(&self, now: i64) -> bool {
        now < self.expires_at
    }
}

/// Obtains and caches the provider access token.
///
/// The cache is guarded by an async mutex held across the refresh, so
/// concurrent callers coalesce into a single upstream exchange.
pub struct TokenAuthority {
    client: LookupClient,
    app_id: String,
    app_secret: String,
    base_url: String,
    cached: Mutex<Option<AccessCredential>>,
}

impl TokenAuthority {
    pub fn new(
        client: LookupClient,
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Self {
        Self::with_base_url(client, app_id, app_secret, API_BASE)
    }

    pub fn with_base_url(
        client: LookupClient,
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            base_url: base_url.into(),
            cached: Mutex::new(None),
        }
    }

    /// A valid access token, fetched only when the cached credential is
    /// missing or past its early-refresh deadline.
    pub async fn token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;

        let now = chrono::Utc::now().timestamp();
        if let Some(credential) = cached.as_ref() {
            if credential.is_valid(now) {
                return Ok(credential.token.clone());
            }
        }

        let credential = self.exchange(now).await?;
        let token = credential.token.clone();
        *cached = Some(credential);
        Ok(token)
    }

    async fn exchange(&self, now: i64) -> Result<AccessCredential, AuthError> {
        let url = format!(
            "{}/cgi-bin/token?grant_type=client_credential&appid={}&secret={}",
            self.base_url, self.app_id, self.app_secret,
        );

        let body = self
            .client
            .fetch_json(&url, DEFAULT_MAX_RETRIES)
            .await
            .ok_or(AuthError::Unreachable)?;

        let token = match body.get("access_token").and_then(|v| v.as_str()) {
            Some(token) => token.to_string(),
            None => {
                tracing::error!(response = %body, "credential exchange rejected");
                return Err(AuthError::Rejected(body.to_string()));
            }
        };

        let expires_in = body
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        Ok(AccessCredential {
            token,
            expires_at: now + expires_in - EXPIRY_MARGIN_SECS,
        })
    }
}
