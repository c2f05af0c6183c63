//! Template-message sending and concurrent fan-out dispatch.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::error::{AuthError, DeliveryError};
use crate::token::TokenAuthority;
use crate::types::{MessagePayload, SendResponse, TemplateMessage};

const API_BASE: &str = "https://api.weixin.qq.com";

/// Upper bound on in-flight sends.
const SEND_CONCURRENCY: usize = 5;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends a single template message through the provider.
pub struct MessageSender {
    client: reqwest::Client,
    base_url: String,
    authority: Arc<TokenAuthority>,
}

impl MessageSender {
    pub fn new(authority: Arc<TokenAuthority>) -> Result<Self, reqwest::Error> {
        Self::with_base_url(authority, API_BASE)
    }

    pub fn with_base_url(
        authority: Arc<TokenAuthority>,
        base_url: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            authority,
        })
    }

    pub fn authority(&self) -> &TokenAuthority {
        &self.authority
    }

    /// Send one message. Success means the provider answered with the
    /// literal errcode 0; anything else is a failure carrying the raw
    /// response body.
    pub async fn send(&self, message: &TemplateMessage) -> Result<(), DeliveryError> {
        let token = self
            .authority
            .token()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let url = format!(
            "{}/cgi-bin/message/template/send?access_token={}",
            self.base_url, token,
        );

        let response = self
            .client
            .post(&url)
            .json(message)
            .send()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let parsed: SendResponse =
            serde_json::from_str(&body).map_err(|_| DeliveryError::Rejected(body.clone()))?;
        if parsed.errcode == Some(0) {
            Ok(())
        } else {
            Err(DeliveryError::Rejected(body))
        }
    }
}

/// Aggregate outcome of one dispatch call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

struct DeliveryOutcome {
    recipient: String,
    succeeded: bool,
}

/// Fans a composed payload out to every recipient with bounded
/// parallelism and joins all workers before aggregating.
pub struct DeliveryDispatcher {
    sender: Arc<MessageSender>,
    concurrency: usize,
}

impl DeliveryDispatcher {
    pub fn new(sender: Arc<MessageSender>) -> Self {
        Self {
            sender,
            concurrency: SEND_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Deliver `payload` to every recipient.
    ///
    /// A failed credential exchange aborts the whole dispatch with zero
    /// sends attempted. Individual send failures are logged and counted;
    /// there is no retry of failed sends. Always `sent + failed ==
    /// recipients.len()` on the success path.
    pub async fn dispatch(
        &self,
        recipients: &[String],
        payload: &MessagePayload,
    ) -> Result<DeliveryReport, AuthError> {
        // Warm the token cache first: without a credential no send can
        // succeed, and the workers below must only ever hit the cache.
        self.sender.authority().token().await?;

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(recipients.len());

        for recipient in recipients {
            let sender = Arc::clone(&self.sender);
            let semaphore = Arc::clone(&semaphore);
            let message = payload.for_recipient(recipient);
            let recipient = recipient.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                match sender.send(&message).await {
                    Ok(()) => DeliveryOutcome {
                        recipient,
                        succeeded: true,
                    },
                    Err(err) => {
                        tracing::error!(%recipient, %err, "message delivery failed");
                        DeliveryOutcome {
                            recipient,
                            succeeded: false,
                        }
                    }
                }
            }));
        }

        let mut report = DeliveryReport::default();
        for handle in handles {
            match handle.await {
                Ok(outcome) => {
                    tracing::debug!(
                        recipient = %outcome.recipient,
                        succeeded = outcome.succeeded,
                        "send finished"
                    );
                    if outcome.succeeded {
                        report.sent += 1;
                    } else {
                        report.failed += 1;
                    }
                }
                Err(err) => {
                    tracing::error!(%err, "send worker aborted");
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }
}
