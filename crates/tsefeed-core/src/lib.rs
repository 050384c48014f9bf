//! # tsefeed core
//!
//! Retrieval and normalization of Tehran Stock Exchange (TSETMC) and currency market
//! (TGJU) data.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | TSETMC and TGJU adapters plus the static instrument catalog |
//! | [`calendar`] | Jalali/Gregorian conversion and flexible date parsing |
//! | [`client`] | The [`TseClient`] facade |
//! | [`config`] | Client settings and endpoint templates |
//! | [`data_source`] | Adapter traits and provider identifiers |
//! | [`domain`] | Raw feed rows, instruments and the output [`Table`] |
//! | [`envelope`] | Response envelope used by machine-readable output |
//! | [`error`] | Error taxonomy |
//! | [`export`] | CSV export |
//! | [`http_client`] | HTTP client abstraction |
//! | [`pipeline`] | Filtering, adjustment, intraday aggregation, formatting, returns, combining |
//! | [`retry`] | Retry policy and backoff |
//! | [`throttling`] | Request pacing |
//! | [`transport`] | Paced, retrying GET transport |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tsefeed_core::{ClientConfig, HistoryRequest, TseClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TseClient::new(ClientConfig::from_env()?)?;
//!     let request = HistoryRequest::new(["فولاد"])?;
//!     let table = client.try_history(&request).await?;
//!     println!("{} rows", table.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! raw feed ─▶ chronological sort ─▶ SeriesFilter ─▶ AdjustmentEngine / IntradayAggregator
//!          ─▶ ColumnFormatter ─▶ ReturnCalculator ─▶ MultiSeriesCombiner ─▶ Table
//! ```

pub mod adapters;
pub mod calendar;
pub mod client;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod export;
pub mod http_client;
pub mod pipeline;
pub mod retry;
pub mod throttling;
pub mod transport;

pub use adapters::{Currency, TgjuAdapter, TsetmcAdapter};

pub use calendar::JalaliDate;

pub use client::{
    ClientTypeRequest, CurrencyRequest, HistoryRequest, IntradayRequest, SeriesOptions, TseClient,
};

pub use config::{ClientConfig, Endpoints};

pub use data_source::{CurrencySource, ProviderId, SourceFuture, TseDataSource};

pub use domain::{
    Cell, Column, ColumnKey, Instrument, InstrumentKind, IntradayInterval, RowKey, Table,
};

pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

pub use error::{ErrorKind, TseError, ValidationError};

pub use export::{save_csv, write_csv};

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StaticHttpClient,
};

pub use pipeline::{DateFormat, OutputType, ReturnMode, ReturnSpec};

pub use retry::{Backoff, RetryConfig};

pub use throttling::RequestPacer;

pub use transport::Transport;
