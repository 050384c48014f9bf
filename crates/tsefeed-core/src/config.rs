//! Client settings. A [`ClientConfig`] is built once and handed to the client; to change
//! a setting, build a new client.

use std::time::Duration;

use crate::retry::RetryConfig;
use crate::ValidationError;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// URL templates of the upstream endpoints. Each `{}` is filled in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub search: String,
    pub price_history: String,
    pub index_history: String,
    pub industry_history: String,
    pub client_type: String,
    pub trades: String,
    pub closing_price_history: String,
    pub share_change: String,
    pub currency: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            search: String::from("http://cdn.tsetmc.com/api/Instrument/GetInstrumentSearch/{}"),
            price_history: String::from(
                "http://old.tsetmc.com/tsev2/data/Export-txt.aspx?t=i&a=1&b=0&i={}",
            ),
            index_history: String::from(
                "http://old.tsetmc.com/tsev2/chart/data/IndexFinancial.aspx?i={}&t=ph",
            ),
            industry_history: String::from("http://cdn.tsetmc.com/api/Index/GetIndexB2History/{}"),
            client_type: String::from("http://old.tsetmc.com/tsev2/data/clienttype.aspx?i={}"),
            trades: String::from("http://cdn.tsetmc.com/api/Trade/GetTrade/{}"),
            closing_price_history: String::from(
                "http://cdn.tsetmc.com/api/ClosingPrice/GetClosingPriceHistory/{}/{}",
            ),
            share_change: String::from(
                "http://cdn.tsetmc.com/api/Instrument/GetInstrumentShareChange/{}",
            ),
            currency: String::from(
                "https://api.tgju.org/v1/market/indicator/summary-table-data/{}",
            ),
        }
    }
}

/// Substitutes `args` for successive `{}` placeholders.
pub fn fill(template: &str, args: &[&str]) -> String {
    let mut url = String::with_capacity(template.len() + 32);
    let mut rest = template;
    for arg in args {
        match rest.find("{}") {
            Some(position) => {
                url.push_str(&rest[..position]);
                url.push_str(arg);
                rest = &rest[position + 2..];
            }
            None => break,
        }
    }
    url.push_str(rest);
    url
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    pub retry: RetryConfig,
    /// Minimum gap between consecutive requests; zero disables pacing.
    pub rate_limit_delay: Duration,
    pub ssl_verify: bool,
    pub user_agent: String,
    pub endpoints: Endpoints,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            retry: RetryConfig::default(),
            rate_limit_delay: Duration::from_millis(300),
            ssl_verify: true,
            user_agent: String::from(DEFAULT_USER_AGENT),
            endpoints: Endpoints::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    pub fn with_ssl_verify(mut self, ssl_verify: bool) -> Self {
        self.ssl_verify = ssl_verify;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Defaults overridden by `TSEFEED_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for `TSEFEED_TIMEOUT_MS`,
    /// `TSEFEED_MAX_RETRIES`, `TSEFEED_RATE_LIMIT_MS`, `TSEFEED_SSL_VERIFY` and
    /// `TSEFEED_USER_AGENT`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let mut config = Self::default();
        if let Some(value) = lookup("TSEFEED_TIMEOUT_MS") {
            config.timeout = Duration::from_millis(parse_setting("TSEFEED_TIMEOUT_MS", &value)?);
        }
        if let Some(value) = lookup("TSEFEED_MAX_RETRIES") {
            config.retry.max_retries = parse_setting("TSEFEED_MAX_RETRIES", &value)?;
        }
        if let Some(value) = lookup("TSEFEED_RATE_LIMIT_MS") {
            config.rate_limit_delay =
                Duration::from_millis(parse_setting("TSEFEED_RATE_LIMIT_MS", &value)?);
        }
        if let Some(value) = lookup("TSEFEED_SSL_VERIFY") {
            config.ssl_verify = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ValidationError::InvalidSetting {
                        key: "TSEFEED_SSL_VERIFY",
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup("TSEFEED_USER_AGENT").filter(|v| !v.trim().is_empty()) {
            config.user_agent = value;
        }
        Ok(config)
    }
}

fn parse_setting<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidSetting {
            key,
            value: value.to_owned(),
        })
}
