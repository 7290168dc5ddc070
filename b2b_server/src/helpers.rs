use std::time::Duration;

use b2b_engine::feed::PriceFeed;
use log::*;
use reqwest::Url;

use crate::errors::ServerError;

/// Checks that a supplier-provided price-list location is an absolute http(s) URL.
pub fn validate_feed_url(url: &str) -> Result<Url, ServerError> {
    let parsed = Url::parse(url.trim()).map_err(|e| {
        debug!("💻️ Rejected price-list URL {url}. {e}");
        ServerError::InvalidArguments
    })?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        scheme => {
            debug!("💻️ Rejected price-list URL {url}. Unsupported scheme: {scheme}");
            Err(ServerError::InvalidArguments)
        },
    }
}

/// Downloads and parses a price list.
pub async fn fetch_price_list(url: &Url, timeout: Duration) -> Result<PriceFeed, ServerError> {
    info!("📦️ Downloading price list from {url}");
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ServerError::InitializeError(format!("Could not create HTTP client. {e}")))?;
    let response = client
        .get(url.clone())
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| {
            warn!("📦️ Could not download the price list from {url}. {e}");
            ServerError::PriceListError(e.to_string())
        })?;
    let body = response.text().await.map_err(|e| ServerError::PriceListError(e.to_string()))?;
    trace!("📦️ Downloaded {} bytes of price list", body.len());
    PriceFeed::from_yaml(&body).map_err(|e| {
        warn!("📦️ The price list at {url} could not be parsed. {e}");
        ServerError::PriceListError(e.to_string())
    })
}
