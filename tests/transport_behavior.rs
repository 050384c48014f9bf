//! Behavior tests for the paced, retrying transport and how its failures surface.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tsefeed_core::http_client::HttpFuture;
use tsefeed_core::{
    ClientConfig, CurrencyRequest, HistoryRequest, HttpClient, HttpError, HttpRequest,
    HttpResponse, RetryConfig, StaticHttpClient, TseClient, TseError, Transport,
};
use tsefeed_tests::{offline_config, search_hit};

/// Replays a fixed sequence of outcomes, then answers 200 with an empty body.
struct ScriptedHttpClient {
    outcomes: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    fn new(outcomes: Vec<Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.seen.lock().expect("not poisoned").len()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(&'a self, request: HttpRequest) -> HttpFuture<'a> {
        self.seen.lock().expect("not poisoned").push(request);
        let outcome = self
            .outcomes
            .lock()
            .expect("not poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::ok("")));
        Box::pin(async move { outcome })
    }
}

fn config(max_retries: u32) -> ClientConfig {
    offline_config().with_retry(RetryConfig::fixed(Duration::from_millis(1), max_retries))
}

// =============================================================================
// Retries
// =============================================================================

#[tokio::test]
async fn when_the_server_keeps_throttling_system_stops_at_the_retry_bound() {
    // Given: a provider that always answers 503
    let http = Arc::new(
        StaticHttpClient::new().route_response("x.test", HttpResponse::with_status(503, "busy")),
    );
    let transport = Transport::new(http.clone(), &config(2));

    // When
    let err = transport.get_text("http://x.test/data").await.expect_err("must fail");

    // Then: one attempt plus two retries, reported with the last status
    assert!(matches!(err, TseError::Connection { status: Some(503), .. }));
    assert_eq!(http.requests().len(), 3);
}

#[tokio::test]
async fn when_a_transient_failure_clears_system_returns_the_body() {
    let http = ScriptedHttpClient::new(vec![
        Ok(HttpResponse::with_status(429, "")),
        Err(HttpError::new("connection reset")),
        Ok(HttpResponse::ok("payload")),
    ]);
    let transport = Transport::new(http.clone(), &config(3));

    let body = transport.get_text("http://x.test").await.expect("third attempt succeeds");

    assert_eq!(body, "payload");
    assert_eq!(http.calls(), 3);
}

#[tokio::test]
async fn when_the_failure_is_not_retryable_system_fails_at_once() {
    let http = ScriptedHttpClient::new(vec![Err(HttpError::non_retryable("bad url"))]);
    let transport = Transport::new(http.clone(), &config(3));

    let err = transport.get_text("http://x.test").await.expect_err("must fail");

    assert_eq!(err.code(), "tse.connection");
    assert_eq!(http.calls(), 1);
}

#[tokio::test]
async fn when_pacing_is_enabled_system_spaces_consecutive_requests() {
    let http = Arc::new(StaticHttpClient::new().route("x.test", "ok"));
    let transport = Transport::new(
        http,
        &config(0).with_rate_limit_delay(Duration::from_millis(50)),
    );

    let started = Instant::now();
    for _ in 0..3 {
        transport.get_text("http://x.test").await.expect("served");
    }

    assert!(started.elapsed() >= Duration::from_millis(90));
}

// =============================================================================
// Requests issued by the client
// =============================================================================

#[tokio::test]
async fn when_a_symbol_is_searched_system_encodes_it_and_sends_the_user_agent() {
    // Given: a provider that knows no symbols
    let http = Arc::new(
        StaticHttpClient::new().route("GetInstrumentSearch/", r#"{"instrumentSearch":[]}"#),
    );
    let config = config(0)
        .with_user_agent("tsefeed-test")
        .with_timeout(Duration::from_secs(7));
    let client = TseClient::with_http_client(http.clone(), &config);

    // When
    let err = client
        .try_history(&HistoryRequest::new(["فولاد"]).expect("one symbol"))
        .await
        .expect_err("unknown symbol");

    // Then
    assert_eq!(err.code(), "tse.symbol_not_found");
    let requests = http.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0]
        .url
        .ends_with("GetInstrumentSearch/%D9%81%D9%88%D9%84%D8%A7%D8%AF"));
    assert_eq!(
        requests[0].headers.get("user-agent").map(String::as_str),
        Some("tsefeed-test")
    );
    assert_eq!(requests[0].timeout_ms, 7_000);
}

#[tokio::test]
async fn when_the_history_endpoint_is_missing_system_reports_a_connection_failure() {
    // Given: the symbol resolves but its export answers 404
    let http = Arc::new(
        StaticHttpClient::new().route("GetInstrumentSearch/FOOLAD", search_hit("111", "FOOLAD")),
    );
    let client = TseClient::with_http_client(http.clone(), &config(3));
    let request = HistoryRequest::new(["FOOLAD"]).expect("one symbol");

    // When
    let err = client.try_history(&request).await.expect_err("must fail");

    // Then: the 404 is not retried
    assert_eq!(err.code(), "tse.connection");
    assert_eq!(http.requests().len(), 2);
    assert!(client.history(&request).await.is_none());
}

#[tokio::test]
async fn when_the_currency_provider_fails_system_reports_a_connection_failure() {
    let http = Arc::new(
        StaticHttpClient::new()
            .route_response("summary-table-data/", HttpResponse::with_status(500, "")),
    );
    let client = TseClient::with_http_client(http.clone(), &config(1));

    let err = client
        .try_currency(&CurrencyRequest::new(["euro"]))
        .await
        .expect_err("must fail");

    assert_eq!(err.code(), "tse.connection");
    assert_eq!(http.requests().len(), 2);
}

#[tokio::test]
async fn when_the_provider_sends_html_instead_of_json_system_reports_a_parse_failure() {
    let http = Arc::new(
        StaticHttpClient::new().route("GetInstrumentSearch/", "<html>maintenance</html>"),
    );
    let client = TseClient::with_http_client(http, &config(0));

    let err = client
        .try_capital_increase("FOOLAD")
        .await
        .expect_err("must fail");

    assert_eq!(err.code(), "tse.parse");
}
