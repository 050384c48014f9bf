//! Behavior tests for live and historical intraday data.

use std::sync::Arc;

use time::macros::{date, datetime};
use tsefeed_core::{
    Cell, HttpResponse, IntradayInterval, IntradayRequest, RowKey, StaticHttpClient, TseClient,
};
use tsefeed_tests::{offline_client, search_hit};

const TRADES: &str = r#"{"trade":[
    {"nTran":3,"hEven":90110,"qTitTran":300,"pTran":5020.0,"canceled":0},
    {"nTran":1,"hEven":90005,"qTitTran":100,"pTran":5000.0,"canceled":0},
    {"nTran":2,"hEven":90040,"qTitTran":200,"pTran":5100.0,"canceled":1},
    {"nTran":4,"hEven":90150,"qTitTran":50,"pTran":0.0,"canceled":0}
]}"#;

const SATURDAY: &str = r#"{"closingPriceHistory":[
    {"hEven":90110,"pDrCotVal":5050.0,"qTotTran5J":400.0,"zTotTran":4.0},
    {"hEven":90005,"pDrCotVal":5000.0,"qTotTran5J":100.0,"zTotTran":1.0},
    {"hEven":90040,"pDrCotVal":5100.0,"qTotTran5J":250.0,"zTotTran":3.0},
    {"hEven":90050,"pDrCotVal":0.0,"qTotTran5J":250.0,"zTotTran":3.0}
]}"#;

fn routes() -> StaticHttpClient {
    StaticHttpClient::new()
        .route("GetInstrumentSearch/FOOLAD", search_hit("111", "FOOLAD"))
        .route("GetTrade/111", TRADES)
        .route("GetClosingPriceHistory/111/20240106", SATURDAY)
        .route(
            "GetClosingPriceHistory/111/",
            r#"{"closingPriceHistory":[]}"#,
        )
}

fn client(http: StaticHttpClient) -> TseClient {
    offline_client(Arc::new(http))
}

#[tokio::test]
async fn when_live_ticks_are_requested_system_drops_canceled_and_zero_price_trades() {
    // Given: four trades, one canceled and one at price zero
    let request = IntradayRequest::new("FOOLAD")
        .with_interval(IntradayInterval::Tick)
        .with_as_of(date!(2024 - 01 - 06));

    // When
    let table = client(routes()).try_intraday(&request).await.expect("ticks");

    // Then: the two valid trades remain, ordered by trade number
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.values("TradeNo").expect("trade numbers"),
        &[Cell::Int(1), Cell::Int(3)]
    );
    assert_eq!(
        table.index()[0],
        RowKey::DateTime(datetime!(2024 - 01 - 06 09:00:05))
    );
    assert_eq!(table.values("J-Date").expect("jalali")[0], Cell::text("1402-10-16"));
}

#[tokio::test]
async fn when_live_candles_are_requested_system_buckets_by_minute() {
    let request = IntradayRequest::new("FOOLAD").with_as_of(date!(2024 - 01 - 06));

    let table = client(routes()).try_intraday(&request).await.expect("candles");

    assert_eq!(table.len(), 2);
    assert_eq!(table.values("Volume").expect("volume"), &[Cell::Int(100), Cell::Int(300)]);
}

#[tokio::test]
async fn when_a_past_day_is_requested_system_rebuilds_incremental_volume() {
    // Given: cumulative snapshots 100, 250, 400 at 09:00:05, 09:00:40, 09:01:10
    let request = IntradayRequest::new("FOOLAD")
        .with_interval(IntradayInterval::OneMinute)
        .with_range(Some("2024-01-06"), None);

    // When
    let table = client(routes()).try_intraday(&request).await.expect("candles");

    // Then: two one-minute candles
    assert_eq!(table.index_name(), "DateTime");
    assert_eq!(
        table.index(),
        &[
            RowKey::DateTime(datetime!(2024 - 01 - 06 09:00:00)),
            RowKey::DateTime(datetime!(2024 - 01 - 06 09:01:00)),
        ]
    );
    assert_eq!(table.values("Open").expect("open"), &[Cell::Int(5000), Cell::Int(5050)]);
    assert_eq!(table.values("High").expect("high"), &[Cell::Int(5100), Cell::Int(5050)]);
    assert_eq!(table.values("Close").expect("close"), &[Cell::Int(5100), Cell::Int(5050)]);
    assert_eq!(table.values("Volume").expect("volume"), &[Cell::Int(250), Cell::Int(150)]);
    assert_eq!(table.values("TradeCount").expect("count"), &[Cell::Int(2), Cell::Int(1)]);
}

#[tokio::test]
async fn when_a_range_spans_the_weekend_system_skips_thursday_and_friday() {
    // Given: Thursday 2024-01-04 through Sunday 2024-01-07, with data only on Saturday
    let http = Arc::new(routes());
    let client = offline_client(http.clone());
    let request = IntradayRequest::new("FOOLAD")
        .with_interval(IntradayInterval::Tick)
        .with_range(Some("1402-10-14"), Some("1402-10-17"));

    // When
    let table = client.try_intraday(&request).await.expect("ticks");

    // Then: only Saturday and Sunday were fetched and the empty Sunday adds nothing
    let fetched: Vec<String> = http
        .requests()
        .into_iter()
        .map(|request| request.url)
        .filter(|url| url.contains("GetClosingPriceHistory"))
        .collect();
    assert_eq!(fetched.len(), 2);
    assert!(fetched[0].ends_with("20240106"));
    assert!(fetched[1].ends_with("20240107"));
    assert_eq!(table.len(), 3);
    assert_eq!(
        table.values("Volume").expect("volume"),
        &[Cell::Int(100), Cell::Int(150), Cell::Int(150)]
    );
}

#[tokio::test]
async fn when_one_day_fails_system_keeps_the_other_days() {
    // Given: Saturday answers 500 and Sunday is served
    let http = StaticHttpClient::new()
        .route("GetInstrumentSearch/FOOLAD", search_hit("111", "FOOLAD"))
        .route_response(
            "GetClosingPriceHistory/111/20240106",
            HttpResponse::with_status(500, ""),
        )
        .route(
            "GetClosingPriceHistory/111/20240107",
            r#"{"closingPriceHistory":[{"hEven":93000,"pDrCotVal":5200.0,"qTotTran5J":70.0,"zTotTran":1.0}]}"#,
        );
    let request = IntradayRequest::new("FOOLAD")
        .with_interval(IntradayInterval::Tick)
        .with_range(Some("2024-01-06"), Some("2024-01-07"));

    // When
    let table = client(http).try_intraday(&request).await.expect("sunday survives");

    // Then
    assert_eq!(table.len(), 1);
    assert_eq!(
        table.index()[0],
        RowKey::DateTime(datetime!(2024 - 01 - 07 09:30:00))
    );
    assert_eq!(table.values("Volume").expect("volume"), &[Cell::Int(70)]);
}

#[tokio::test]
async fn when_every_day_fails_system_reports_no_data() {
    let http = StaticHttpClient::new()
        .route("GetInstrumentSearch/FOOLAD", search_hit("111", "FOOLAD"))
        .route("GetClosingPriceHistory/111/", "<html>maintenance</html>");
    let request = IntradayRequest::new("FOOLAD").with_range(Some("2024-01-06"), None);

    let err = client(http).try_intraday(&request).await.expect_err("must fail");

    assert_eq!(err.code(), "tse.no_data");
}

#[tokio::test]
async fn when_no_day_has_data_system_reports_no_data() {
    let request = IntradayRequest::new("FOOLAD").with_range(Some("2024-01-07"), None);

    let err = client(routes()).try_intraday(&request).await.expect_err("must fail");

    assert_eq!(err.code(), "tse.no_data");
}

#[tokio::test]
async fn when_the_range_holds_only_a_weekend_system_reports_no_data() {
    let request =
        IntradayRequest::new("FOOLAD").with_range(Some("2024-01-04"), Some("2024-01-05"));

    let err = client(routes()).try_intraday(&request).await.expect_err("must fail");

    assert_eq!(err.code(), "tse.no_data");
}

#[tokio::test]
async fn when_intraday_is_requested_for_an_industry_system_rejects_it() {
    let err = client(routes())
        .try_intraday(&IntradayRequest::new("Cement"))
        .await
        .expect_err("must fail");

    assert_eq!(err.code(), "tse.instrument_kind");
}

#[tokio::test]
async fn when_the_start_date_is_malformed_system_reports_invalid_parameter() {
    let request = IntradayRequest::new("FOOLAD").with_range(Some("yesterday"), None);

    let err = client(routes()).try_intraday(&request).await.expect_err("must fail");

    assert_eq!(err.code(), "tse.invalid_parameter");
}
