use std::time::Duration;

use url::Url;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Accent color of every embed sent to the webhook (`#03b2f8`).
pub const EMBED_COLOR: u32 = 0x03b2f8;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Webhook URL must not be empty")]
    EmptyWebhookUrl,
    #[error("Invalid {field} '{value}': {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
    #[error("Marker must not be empty")]
    EmptyMarker,
}

/// Fixed pauses between outbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    /// After each container element on a listing page.
    pub entry: Duration,
    /// Before fetching the next listing page.
    pub page: Duration,
    /// After each webhook delivery attempt.
    pub delivery: Duration,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            entry: Duration::from_millis(500),
            page: Duration::from_secs(1),
            delivery: Duration::from_secs(1),
        }
    }
}

impl Delays {
    pub fn none() -> Self {
        Self {
            entry: Duration::ZERO,
            page: Duration::ZERO,
            delivery: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Destination for notifications. Only optional so extraction can run on
    /// its own; the notifier refuses to start without it.
    pub webhook_url: Option<String>,
    pub base_url: String,
    pub user_agent: String,
    pub marker: String,
    pub lookback_days: u32,
    pub embed_color: u32,
    pub timeout: Duration,
    pub delays: Delays,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: None,
            base_url: crate::BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            marker: "VR".to_string(),
            lookback_days: 7,
            embed_color: EMBED_COLOR,
            timeout: Duration::from_secs(30),
            delays: Delays::default(),
        }
    }
}

impl Config {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if let Some(webhook_url) = &self.webhook_url {
            if webhook_url.trim().is_empty() {
                return Err(ConfigError::EmptyWebhookUrl);
            }
            check_url("webhook URL", webhook_url)?;
        }
        check_url("base URL", &self.base_url)?;
        if self.marker.trim().is_empty() {
            return Err(ConfigError::EmptyMarker);
        }
        Ok(self)
    }
}

fn check_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })
}
