use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::http_client::{HttpClient, HttpRequest};
use crate::retry::RetryConfig;
use crate::throttling::RequestPacer;
use crate::TseError;

/// Paced, retrying GET transport shared by the provider adapters.
///
/// Requests go out one at a time; the pacer spaces them and retryable failures are
/// retried with backoff up to the configured bound.
#[derive(Clone)]
pub struct Transport {
    client: Arc<dyn HttpClient>,
    pacer: RequestPacer,
    retry: RetryConfig,
    timeout_ms: u64,
    user_agent: String,
}

impl Transport {
    pub fn new(client: Arc<dyn HttpClient>, config: &ClientConfig) -> Self {
        Self {
            client,
            pacer: RequestPacer::new(config.rate_limit_delay),
            retry: config.retry.clone(),
            timeout_ms: u64::try_from(config.timeout.as_millis()).unwrap_or(u64::MAX),
            user_agent: config.user_agent.clone(),
        }
    }

    pub async fn get_text(&self, url: &str) -> Result<String, TseError> {
        let mut attempt = 0;
        loop {
            self.pacer.wait().await;
            debug!(url, attempt, "sending request");
            let request = HttpRequest::get(url)
                .with_header("user-agent", self.user_agent.as_str())
                .with_timeout_ms(self.timeout_ms);

            let failure = match self.client.execute(request).await {
                Ok(response) if response.is_success() => return Ok(response.body),
                Ok(response) => {
                    if attempt >= self.retry.max_retries
                        || !self.retry.should_retry_status(response.status)
                    {
                        return Err(TseError::http_status(response.status, url));
                    }
                    format!("HTTP {}", response.status)
                }
                Err(error) => {
                    if attempt >= self.retry.max_retries || !self.retry.should_retry_error(&error) {
                        return Err(TseError::connection(format!("{url}: {error}")));
                    }
                    error.message().to_owned()
                }
            };

            let delay = self.retry.delay_for_attempt(attempt);
            warn!(
                url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                reason = failure.as_str(),
                "request failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("pacer", &self.pacer)
            .field("retry", &self.retry)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}
