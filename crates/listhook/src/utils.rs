use chrono::{Days, NaiveDate};
use std::time::Duration;
use url::Url;

pub fn target_date(today: NaiveDate, lookback_days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(lookback_days.into()))
        .unwrap_or(NaiveDate::MIN)
}

/// The day segment used by the listing site, e.g. `05-21-16`. The trailing
/// `16` is part of the site's URL scheme.
pub fn date_segment(date: NaiveDate) -> String {
    date.format("%m-%d-16").to_string()
}

/// `<YYYY>/<MM>-<DD>-16`
pub fn listing_path(date: NaiveDate) -> String {
    format!("{}/{}", date.format("%Y"), date_segment(date))
}

/// First page has no page suffix; later pages append `<page>/`.
pub fn page_url(base_url: &str, listing_path: &str, page: u32) -> Result<Url, url::ParseError> {
    let mut url = format!("{}/{}/", base_url.trim_end_matches('/'), listing_path);
    if page > 1 {
        url.push_str(&format!("{page}/"));
    }
    Url::parse(&url)
}

/// Politeness delay; a zero duration returns immediately.
pub async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
