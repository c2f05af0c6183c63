//! Retrying JSON fetch shared by the weather chain and the token exchange.
//!
//! Failures here are transport or decode failures only; body-level status
//! fields are each caller's contract. Retries are immediate with no
//! backoff, and the budget is consumed one unit per failed attempt.

use std::time::Duration;

use serde_json::Value;

/// Default retry budget for a lookup.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct LookupClient {
    client: reqwest::Client,
}

impl LookupClient {
    /// Build a client with the fixed per-request timeout.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and decode the body as JSON, retrying up to `max_retries`
    /// attempts in total.
    ///
    /// Returns `None` once the budget is exhausted so callers decide how
    /// severe that is.
    pub async fn fetch_json(&self, url: &str, max_retries: u32) -> Option<Value> {
        for attempt in 1..=max_retries {
            match self.try_fetch(url).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(attempt, "lookup succeeded after retrying");
                    }
                    return Some(value);
                }
                Err(err) => {
                    tracing::warn!(attempt, max_retries, %err, "lookup failed, retrying");
                }
            }
        }
        None
    }

    async fn try_fetch(&self, url: &str) -> Result<Value, reqwest::Error> {
        self.client.get(url).send().await?.json::<Value>().await
    }
}
