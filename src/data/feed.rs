//! Raw feed retrieval (local file or the dashboard's feed endpoint).

use std::time::Duration;

use reqwest::blocking::Client;

use crate::domain::FeedSource;
use crate::error::{AppError, EXIT_INPUT, EXIT_RUNTIME};

/// Path of the feed endpoint relative to the dashboard base URL.
pub const FEED_PATH: &str = "/data/search_volume";

/// Read the raw payload from `source`.
pub fn read_feed(source: &FeedSource, timeout_secs: u64) -> Result<String, AppError> {
    match source {
        FeedSource::File(path) => {
            tracing::debug!(path = %path.display(), "reading feed file");
            std::fs::read_to_string(path)
                .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read feed '{}': {e}", path.display())))
        }
        FeedSource::Url(url) => fetch_feed(url, timeout_secs),
    }
}

fn fetch_feed(url: &str, timeout_secs: u64) -> Result<String, AppError> {
    tracing::info!(%url, "fetching feed");
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to build HTTP client: {e}")))?;

    let resp = client
        .get(url)
        .send()
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Feed request failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(AppError::new(
            EXIT_RUNTIME,
            format!("Feed request failed with status {}.", resp.status()),
        ));
    }

    resp.text()
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to read feed body: {e}")))
}

/// Feed URL under a dashboard base URL.
pub fn feed_url(base_url: &str) -> String {
    format!("{}{FEED_PATH}", base_url.trim_end_matches('/'))
}
