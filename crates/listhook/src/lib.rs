pub mod config;
pub mod notifier;
mod parser;
pub mod scraper;
pub mod types;
pub mod utils;

pub use config::{Config, ConfigError, Delays};
pub use crate::scraper::{ListingScraper, ScraperError};
pub use notifier::{NotifyError, WebhookNotifier};

pub const BASE_URL: &str = "https://javjunkies.org/main";
