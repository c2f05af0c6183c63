use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use daybreak_core::{Config, LookupClient};
use daybreak_weather::WeatherResolver;
use daybreak_wechat::{
    DeliveryDispatcher, DeliveryReport, MessagePayload, MessageSender, TokenAuthority,
};

use crate::compose;

/// Accent color applied to the provider-rendered message header.
const TOP_COLOR: &str = "#FF0000";

/// The end-to-end pipeline: weather -> compose -> dispatch.
pub struct Notifier {
    config: Config,
    weather: WeatherResolver,
    dispatcher: DeliveryDispatcher,
}

impl Notifier {
    pub fn new(config: Config) -> Result<Self> {
        let client = LookupClient::new().context("failed to build lookup client")?;

        let weather = WeatherResolver::new(client.clone(), &config.weather_key);
        let authority = Arc::new(TokenAuthority::new(
            client,
            &config.app_id,
            &config.app_secret,
        ));
        let sender =
            Arc::new(MessageSender::new(authority).context("failed to build message sender")?);
        let dispatcher = DeliveryDispatcher::new(sender);

        Ok(Self {
            config,
            weather,
            dispatcher,
        })
    }

    /// Compose and deliver the notification for `today`.
    ///
    /// Weather failures degrade to placeholder fields; a failed credential
    /// exchange is fatal and nothing is sent.
    pub async fn run(&self, today: NaiveDate) -> Result<DeliveryReport> {
        let weather = match self.weather.resolve(&self.config.region).await {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(region = %self.config.region, %err, "weather unavailable, using placeholders");
                None
            }
        };

        let data = compose::compose(&self.config, weather.as_ref(), today);
        let payload = MessagePayload {
            template_id: self.config.template_id.clone(),
            url: self.config.redirect_url_or_default().to_string(),
            topcolor: TOP_COLOR.to_string(),
            data,
        };

        let report = self
            .dispatcher
            .dispatch(&self.config.user, &payload)
            .await
            .context("credential exchange failed, nothing sent")?;

        tracing::info!(sent = report.sent, failed = report.failed, "dispatch complete");
        Ok(report)
    }
}
