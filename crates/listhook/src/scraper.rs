use crate::config::Config;
use crate::parser::parse_listing_page;
use crate::types::{Entry, ListingBlock, ListingPage};
use crate::utils::{listing_path, page_url, pause, target_date};

use chrono::{Local, NaiveDate};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Page not found: {0}")]
    NotFound(String),
    #[error("Invalid page URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, Clone)]
pub struct ListingScraper {
    client: Client,
    base_url: String,
    marker: String,
    lookback_days: u32,
    entry_delay: Duration,
    page_delay: Duration,
}

impl ListingScraper {
    pub fn new(config: &Config) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            marker: config.marker.clone(),
            lookback_days: config.lookback_days,
            entry_delay: config.delays.entry,
            page_delay: config.delays.page,
        })
    }

    /// Collects every entry for the day `lookback_days` before today.
    pub async fn run(&self) -> Vec<Entry> {
        self.run_for(Local::now().date_naive()).await
    }

    /// Same as [`run`](Self::run) with an explicit "today". Never fails: any
    /// fetch error ends pagination and whatever was collected is returned.
    pub async fn run_for(&self, today: NaiveDate) -> Vec<Entry> {
        let path = listing_path(target_date(today, self.lookback_days));
        let mut entries = Vec::new();
        let mut page_number = 1;

        loop {
            let page = match self.fetch_numbered_page(&path, page_number).await {
                Ok(page) => page,
                Err(ScraperError::NotFound(url)) => {
                    log::info!("Page {} not found (404). Assuming end of valid pages.", url);
                    break;
                }
                Err(e) => {
                    log::error!("Error scraping page {}: {}. Stopping.", page_number, e);
                    break;
                }
            };

            if page.blocks.is_empty() && page_number > 1 {
                log::info!(
                    "No entries found on page {}. Assuming end of content.",
                    page_number
                );
                break;
            }

            for block in page.blocks {
                match block {
                    ListingBlock::Entry(entry) => entries.push(entry),
                    ListingBlock::Incomplete { id } => {
                        log::warn!("Skipping entry due to missing code or image for id: {}", id)
                    }
                    ListingBlock::Unmarked => {}
                }
                pause(self.entry_delay).await;
            }

            match page.last_page {
                Some(last) if page_number < last => {
                    page_number += 1;
                    pause(self.page_delay).await;
                }
                Some(_) => {
                    log::info!(
                        "Reached last advertised page ({}). Stopping pagination.",
                        page_number
                    );
                    break;
                }
                None => {
                    log::info!("No pagination links found. Assuming single page.");
                    break;
                }
            }
        }

        log::info!("Collected {} entries", entries.len());
        entries
    }

    async fn fetch_numbered_page(
        &self,
        listing_path: &str,
        page_number: u32,
    ) -> Result<ListingPage, ScraperError> {
        let url = page_url(&self.base_url, listing_path, page_number)?;
        log::info!("Scraping URL: {}", url);
        self.fetch_page(&url).await
    }

    pub async fn fetch_page(&self, url: &Url) -> Result<ListingPage, ScraperError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound(url.to_string()));
        }

        let html = response
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?;

        Ok(parse_listing_page(&html, &self.marker, url))
    }
}
