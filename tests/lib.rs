//! Shared fixtures for the integration tests: offline clients and canned search bodies.

use std::sync::Arc;
use std::time::Duration;

use tsefeed_core::{ClientConfig, HttpClient, TseClient};

/// Client settings for offline runs: no pacing and no retries.
pub fn offline_config() -> ClientConfig {
    ClientConfig::default()
        .with_rate_limit_delay(Duration::ZERO)
        .with_max_retries(0)
}

pub fn offline_client(http: Arc<dyn HttpClient>) -> TseClient {
    TseClient::with_http_client(http, &offline_config())
}

/// Instrument search body with a single hit.
pub fn search_hit(code: &str, ticker: &str) -> String {
    format!(r#"{{"instrumentSearch":[{{"insCode":"{code}","lVal18AFC":"{ticker}"}}]}}"#)
}
