use crate::config::Config;
use crate::types::{Entry, WebhookMessage};
use crate::utils::pause;

use reqwest::{Client, StatusCode};
use std::fmt::Display;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Webhook answered {status}: {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("No webhook URL configured")]
    MissingWebhookUrl,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStats {
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Display for DeliveryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nDelivery:")?;
        writeln!(f, "  Sent:    {}", self.sent)?;
        writeln!(f, "  Failed:  {}", self.failed)?;
        writeln!(f, "  Skipped: {}", self.skipped)
    }
}

/// Posts each entry's image as a single embed.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    webhook_url: String,
    color: u32,
    delay: Duration,
}

impl WebhookNotifier {
    pub fn new(config: &Config) -> Result<Self, NotifyError> {
        let webhook_url = config
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(NotifyError::MissingWebhookUrl)?;

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            webhook_url: webhook_url.to_string(),
            color: config.embed_color,
            delay: config.delays.delivery,
        })
    }

    pub async fn run(&self, entries: &[Entry]) -> DeliveryStats {
        let mut stats = DeliveryStats::default();

        log::info!("Attempting to send {} items to the webhook...", entries.len());
        if entries.is_empty() {
            log::info!("No entries to send.");
            return stats;
        }

        for entry in entries {
            if !entry.is_complete() {
                log::warn!(
                    "Skipping incomplete entry {:?}: missing code or image URL",
                    entry
                );
                stats.skipped += 1;
                continue;
            }

            match self.deliver(entry).await {
                Ok(()) => {
                    log::info!("Successfully sent webhook for {}", entry.code);
                    stats.sent += 1;
                }
                Err(e) => {
                    log::error!("Failed to send webhook for {}: {}", entry.code, e);
                    stats.failed += 1;
                }
            }

            pause(self.delay).await;
        }

        log::info!(
            "Finished delivering {} entries ({} failed, {} skipped)",
            stats.sent,
            stats.failed,
            stats.skipped
        );
        stats
    }

    /// One POST; anything but `204 No Content` is a rejection.
    pub async fn deliver(&self, entry: &Entry) -> Result<(), NotifyError> {
        let message = WebhookMessage::image(&entry.image_url, self.color);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&message)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(NotifyError::Rejected { status, body })
    }
}
