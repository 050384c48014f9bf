//! The library facade.
//!
//! Every operation comes in two forms: `try_*` returns the [`TseError`], the plain form
//! logs it and returns `None`. Requests run strictly one after another, symbol by symbol
//! and day by day.
//!
//! | Operation | Series |
//! |-----------|--------|
//! | [`TseClient::try_history`] | stock, index or industry daily prices |
//! | [`TseClient::try_client_type`] | retail/institutional daily totals |
//! | [`TseClient::try_intraday`] | live or historical intraday ticks and candles |
//! | [`TseClient::try_currency`] | TGJU currency and coin quotes |
//! | [`TseClient::try_capital_increase`] | share-count changes |

use std::future::Future;
use std::sync::Arc;

use time::Date;
use tracing::{debug, info, warn};

use crate::adapters::catalog::{self, Currency};
use crate::adapters::{TgjuAdapter, TsetmcAdapter};
use crate::calendar;
use crate::config::ClientConfig;
use crate::data_source::{CurrencySource, TseDataSource};
use crate::domain::{
    chronological, normalize_symbol, Instrument, InstrumentKind, IntradayInterval, Snapshot,
    Table,
};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::pipeline::intraday;
use crate::pipeline::series;
use crate::pipeline::{
    add_returns, adjust, combine, format, DateFormat, Frame, OutputType, ReturnSpec, SeriesWindow,
};
use crate::transport::Transport;
use crate::{TseError, ValidationError};

/// Window, layout and row-order options shared by the daily series operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesOptions {
    /// Inclusive start, Jalali or Gregorian.
    pub start: Option<String>,
    pub end: Option<String>,
    /// Trailing row count; 0 keeps every row. Ignored when a date bound is given.
    pub limit: usize,
    pub date_format: DateFormat,
    pub output_type: OutputType,
    /// Drop rows where any symbol of a multi-symbol table is missing.
    pub drop_incomplete: bool,
    pub ascending: bool,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            limit: 0,
            date_format: DateFormat::Jalali,
            output_type: OutputType::Standard,
            drop_incomplete: true,
            ascending: true,
        }
    }
}

impl SeriesOptions {
    pub fn with_range(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start = start.map(str::to_owned);
        self.end = end.map(str::to_owned);
        self
    }

    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub const fn with_date_format(mut self, date_format: DateFormat) -> Self {
        self.date_format = date_format;
        self
    }

    pub const fn with_output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }

    pub const fn with_drop_incomplete(mut self, drop_incomplete: bool) -> Self {
        self.drop_incomplete = drop_incomplete;
        self
    }

    pub const fn with_ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    fn window(&self) -> Result<SeriesWindow, ValidationError> {
        let window =
            SeriesWindow::from_request(self.limit, self.start.as_deref(), self.end.as_deref())?;
        if let (Some(start), Some(end)) = (window.start, window.end) {
            if start > end {
                return Err(ValidationError::InvertedRange {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }
        Ok(window)
    }
}

fn symbol_list(symbols: impl IntoIterator<Item = impl Into<String>>) -> Result<Vec<String>, ValidationError> {
    let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
    if symbols.is_empty() {
        return Err(ValidationError::NoSymbols);
    }
    Ok(symbols)
}

/// Daily price history for stocks, indices and industry indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbols: Vec<String>,
    pub options: SeriesOptions,
    /// Return the export's own `<TAG>` columns, skipping adjustment and formatting.
    pub raw: bool,
    /// Replace raw prices with adjusted ones instead of adding `Adj Close`.
    pub auto_adjust: bool,
    pub adjust_volume: bool,
    pub returns: Option<ReturnSpec>,
}

impl HistoryRequest {
    pub fn new(symbols: impl IntoIterator<Item = impl Into<String>>) -> Result<Self, ValidationError> {
        Ok(Self {
            symbols: symbol_list(symbols)?,
            options: SeriesOptions::default(),
            raw: false,
            auto_adjust: true,
            adjust_volume: false,
            returns: None,
        })
    }

    pub fn with_options(mut self, options: SeriesOptions) -> Self {
        self.options = options;
        self
    }

    pub const fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub const fn with_auto_adjust(mut self, auto_adjust: bool) -> Self {
        self.auto_adjust = auto_adjust;
        self
    }

    pub const fn with_adjust_volume(mut self, adjust_volume: bool) -> Self {
        self.adjust_volume = adjust_volume;
        self
    }

    pub fn with_returns(mut self, returns: ReturnSpec) -> Self {
        self.returns = Some(returns);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientTypeRequest {
    pub symbols: Vec<String>,
    pub options: SeriesOptions,
}

impl ClientTypeRequest {
    pub fn new(symbols: impl IntoIterator<Item = impl Into<String>>) -> Result<Self, ValidationError> {
        Ok(Self {
            symbols: symbol_list(symbols)?,
            options: SeriesOptions::default(),
        })
    }

    pub fn with_options(mut self, options: SeriesOptions) -> Self {
        self.options = options;
        self
    }
}

/// Currency or coin quotes. An empty name list asks for the dollar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CurrencyRequest {
    pub names: Vec<String>,
    pub options: SeriesOptions,
    pub returns: Option<ReturnSpec>,
}

impl CurrencyRequest {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: SeriesOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_returns(mut self, returns: ReturnSpec) -> Self {
        self.returns = Some(returns);
        self
    }
}

/// Intraday data for one stock. Without `start` today's live trades are used; with it,
/// the cumulative snapshots of every trading day from `start` to `end` (default `start`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntradayRequest {
    pub symbol: String,
    pub interval: IntradayInterval,
    pub start: Option<String>,
    pub end: Option<String>,
    /// Date stamped on live trades; today in Tehran when unset.
    pub as_of: Option<Date>,
}

impl IntradayRequest {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: IntradayInterval::OneMinute,
            start: None,
            end: None,
            as_of: None,
        }
    }

    pub const fn with_interval(mut self, interval: IntradayInterval) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_range(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start = start.map(str::to_owned);
        self.end = end.map(str::to_owned);
        self
    }

    pub const fn with_as_of(mut self, as_of: Date) -> Self {
        self.as_of = Some(as_of);
        self
    }
}

/// Entry point for every data operation.
#[derive(Clone)]
pub struct TseClient {
    tse: Arc<dyn TseDataSource>,
    currencies: Arc<dyn CurrencySource>,
}

impl std::fmt::Debug for TseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TseClient")
            .field("tse", &self.tse.id())
            .field("currencies", &self.currencies.id())
            .finish()
    }
}

impl TseClient {
    /// Production client over reqwest.
    pub fn new(config: ClientConfig) -> Result<Self, TseError> {
        let http = ReqwestHttpClient::from_config(&config)
            .map_err(|e| TseError::connection(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_http_client(Arc::new(http), &config))
    }

    /// Client over any [`HttpClient`], sharing one transport (and so one pacer) between
    /// both providers.
    pub fn with_http_client(http: Arc<dyn HttpClient>, config: &ClientConfig) -> Self {
        let transport = Transport::new(http, config);
        Self::with_sources(
            Arc::new(TsetmcAdapter::new(transport.clone(), config.endpoints.clone())),
            Arc::new(TgjuAdapter::new(transport, config.endpoints.clone())),
        )
    }

    pub fn with_sources(tse: Arc<dyn TseDataSource>, currencies: Arc<dyn CurrencySource>) -> Self {
        Self { tse, currencies }
    }

    async fn resolve(&self, symbol: &str) -> Result<Instrument, TseError> {
        let symbol = normalize_symbol(symbol)?;
        self.tse
            .resolve(&symbol)
            .await?
            .ok_or_else(|| TseError::symbol_not_found(symbol))
    }

    /// Runs `fetch` for each symbol in turn. With several symbols a failure is logged
    /// and the symbol skipped; a lone symbol's failure is returned.
    async fn collect<F, Fut>(
        &self,
        what: &'static str,
        symbols: &[String],
        mut fetch: F,
    ) -> Result<Vec<(String, Table)>, TseError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<Table, TseError>>,
    {
        let total = symbols.len();
        let mut tables = Vec::with_capacity(total);
        for (position, symbol) in symbols.iter().enumerate() {
            info!(what, symbol = symbol.as_str(), position = position + 1, total, "fetching");
            match fetch(symbol.clone()).await {
                Ok(table) => {
                    let key = normalize_symbol(symbol).unwrap_or_else(|_| symbol.trim().to_owned());
                    tables.push((key, table));
                }
                Err(error) if total > 1 => {
                    warn!(
                        what,
                        symbol = symbol.as_str(),
                        code = error.code(),
                        %error,
                        "skipping symbol"
                    );
                }
                Err(error) => return Err(error),
            }
        }
        info!(what, fetched = tables.len(), requested = total, "completed");
        Ok(tables)
    }

    fn finish(tables: Vec<(String, Table)>, options: &SeriesOptions) -> Result<Table, TseError> {
        let table = combine(tables, options.drop_incomplete)?;
        Ok(if options.ascending { table } else { table.reversed() })
    }

    pub async fn try_history(&self, request: &HistoryRequest) -> Result<Table, TseError> {
        let tables = self
            .collect("history", &request.symbols, |symbol| self.history_one(symbol, request))
            .await?;
        Self::finish(tables, &request.options)
    }

    pub async fn history(&self, request: &HistoryRequest) -> Option<Table> {
        lenient("history", self.try_history(request).await)
    }

    async fn history_one(&self, symbol: String, request: &HistoryRequest) -> Result<Table, TseError> {
        let ticker = normalize_symbol(&symbol)?;
        let instrument = self.resolve(&ticker).await?;
        let window = request.options.window()?;
        let label = ticker.as_str();

        let frame = match instrument.kind {
            InstrumentKind::Stock => {
                let rows = window.apply(chronological(self.tse.price_history(&instrument).await?));
                ensure_rows(&rows, label)?;
                if request.raw {
                    return Ok(series::raw_stock_table(label, &rows)?);
                }
                series::stock_frame(label, &adjust(rows), request.auto_adjust, request.adjust_volume)?
            }
            InstrumentKind::Index => {
                let rows = window.apply(chronological(self.tse.index_history(&instrument).await?));
                ensure_rows(&rows, label)?;
                if request.raw {
                    return Ok(series::raw_index_table(&rows)?);
                }
                series::index_frame(label, &rows, request.auto_adjust)?
            }
            InstrumentKind::Industry => {
                let rows =
                    window.apply(chronological(self.tse.industry_history(&instrument).await?));
                ensure_rows(&rows, label)?;
                series::industry_frame(label, &rows)?
            }
        };

        let default_column = match instrument.kind {
            InstrumentKind::Industry => "Close",
            _ => series::default_return_column(request.auto_adjust),
        };
        layout(frame, &request.options, request.returns.as_ref(), default_column)
    }

    pub async fn try_client_type(&self, request: &ClientTypeRequest) -> Result<Table, TseError> {
        let tables = self
            .collect("client type", &request.symbols, |symbol| {
                self.client_type_one(symbol, &request.options)
            })
            .await?;
        Self::finish(tables, &request.options)
    }

    pub async fn client_type(&self, request: &ClientTypeRequest) -> Option<Table> {
        lenient("client type", self.try_client_type(request).await)
    }

    async fn client_type_one(&self, symbol: String, options: &SeriesOptions) -> Result<Table, TseError> {
        let ticker = normalize_symbol(&symbol)?;
        let instrument = self.resolve(&ticker).await?;
        require_stock(&instrument, "retail/institutional history")?;
        let window = options.window()?;
        let rows = window.apply(chronological(self.tse.client_type_history(&instrument).await?));
        ensure_rows(&rows, &ticker)?;
        layout(series::client_type_frame(&ticker, &rows)?, options, None, "")
    }

    pub async fn try_currency(&self, request: &CurrencyRequest) -> Result<Table, TseError> {
        let names = if request.names.is_empty() {
            vec![String::from("dollar")]
        } else {
            request.names.clone()
        };
        let tables = self
            .collect("currency", &names, |name| self.currency_one(name, request))
            .await?;
        Self::finish(tables, &request.options)
    }

    pub async fn currency(&self, request: &CurrencyRequest) -> Option<Table> {
        lenient("currency", self.try_currency(request).await)
    }

    async fn currency_one(&self, name: String, request: &CurrencyRequest) -> Result<Table, TseError> {
        let currency: Currency = catalog::find_currency(&name)?;
        let window = request.options.window()?;
        let rows = window.apply(chronological(self.currencies.currency_history(&currency).await?));
        ensure_rows(&rows, currency.key)?;
        layout(
            series::currency_frame(currency.persian, &rows)?,
            &request.options,
            request.returns.as_ref(),
            "Close",
        )
    }

    /// Share-count changes, oldest first. A stock that never changed its share count
    /// yields an empty table.
    pub async fn try_capital_increase(&self, symbol: &str) -> Result<Table, TseError> {
        let instrument = self.resolve(symbol).await?;
        require_stock(&instrument, "capital increase history")?;
        info!(symbol, "fetching capital increases");
        let rows = chronological(self.tse.share_changes(&instrument).await?);
        Ok(series::share_change_table(&rows)?)
    }

    pub async fn capital_increase(&self, symbol: &str) -> Option<Table> {
        lenient("capital increase", self.try_capital_increase(symbol).await)
    }

    pub async fn try_intraday(&self, request: &IntradayRequest) -> Result<Table, TseError> {
        let instrument = self.resolve(&request.symbol).await?;
        require_stock(&instrument, "intraday data")?;

        let live = request.start.is_none();
        let snapshots = match request.start.as_deref() {
            None => self.live_snapshots(&instrument, request.as_of).await?,
            Some(start) => {
                let start = calendar::parse_date(start)?;
                let end = request
                    .end
                    .as_deref()
                    .map(calendar::parse_date)
                    .transpose()?
                    .unwrap_or(start);
                self.historical_snapshots(&instrument, start, end).await?
            }
        };

        let table = match request.interval.seconds() {
            None => intraday::ticks_table(&snapshots, live)?,
            Some(width) => intraday::candles_table(&intraday::resample(&snapshots, width))?,
        };
        info!(
            symbol = request.symbol.as_str(),
            interval = request.interval.as_str(),
            rows = table.len(),
            "intraday data ready"
        );
        Ok(table)
    }

    pub async fn intraday(&self, request: &IntradayRequest) -> Option<Table> {
        lenient("intraday", self.try_intraday(request).await)
    }

    async fn live_snapshots(
        &self,
        instrument: &Instrument,
        as_of: Option<Date>,
    ) -> Result<Vec<Snapshot>, TseError> {
        let day = as_of.unwrap_or_else(calendar::tehran_today);
        let trades = self.tse.today_trades(instrument).await?;
        let snapshots = intraday::live_snapshots(day, trades);
        if snapshots.is_empty() {
            return Err(TseError::no_data(format!(
                "no trades today for '{}'",
                instrument.label
            )));
        }
        Ok(snapshots)
    }

    async fn historical_snapshots(
        &self,
        instrument: &Instrument,
        start: Date,
        end: Date,
    ) -> Result<Vec<Snapshot>, TseError> {
        if start > end {
            return Err(ValidationError::InvertedRange {
                start: start.to_string(),
                end: end.to_string(),
            }
            .into());
        }
        let days = intraday::trading_days(start, end);
        if days.is_empty() {
            return Err(TseError::no_data(format!(
                "no trading days between {start} and {end}"
            )));
        }
        info!(symbol = instrument.label.as_str(), days = days.len(), "fetching intraday history");

        let mut snapshots = Vec::new();
        for day in days {
            let history = match self.tse.closing_price_history(instrument, day).await {
                Ok(history) => history,
                Err(
                    error @ (TseError::Connection { .. } | TseError::DataParsing { .. }),
                ) => {
                    warn!(
                        symbol = instrument.label.as_str(),
                        %day,
                        code = error.code(),
                        %error,
                        "skipping intraday day"
                    );
                    continue;
                }
                Err(error) => return Err(error),
            };
            let rows = intraday::historical_snapshots(day, history);
            if rows.is_empty() {
                warn!(symbol = instrument.label.as_str(), %day, "no intraday data for day");
                continue;
            }
            debug!(%day, snapshots = rows.len(), "day fetched");
            snapshots.extend(rows);
        }
        if snapshots.is_empty() {
            return Err(TseError::no_data(format!(
                "no intraday data for '{}' between {start} and {end}",
                instrument.label
            )));
        }
        snapshots.sort_by_key(|snapshot| snapshot.timestamp);
        Ok(snapshots)
    }
}

fn require_stock(instrument: &Instrument, operation: &'static str) -> Result<(), TseError> {
    if instrument.kind == InstrumentKind::Stock {
        return Ok(());
    }
    Err(TseError::InstrumentKindMismatch {
        symbol: instrument.label.clone(),
        kind: instrument.kind,
        operation,
    })
}

fn ensure_rows<T>(rows: &[T], label: &str) -> Result<(), TseError> {
    if rows.is_empty() {
        return Err(TseError::no_data(format!(
            "no rows for '{label}' in the requested window"
        )));
    }
    Ok(())
}

/// Formats a frame and appends the requested returns.
fn layout(
    frame: Frame,
    options: &SeriesOptions,
    returns: Option<&ReturnSpec>,
    default_column: &str,
) -> Result<Table, TseError> {
    let table = format(frame, options.date_format, options.output_type)?;
    let Some(spec) = returns else {
        return Ok(table);
    };
    let column = spec.column.as_deref().unwrap_or(default_column);
    Ok(add_returns(table, spec.mode, column, spec.period)?)
}

fn lenient(what: &'static str, result: Result<Table, TseError>) -> Option<Table> {
    match result {
        Ok(table) => Some(table),
        Err(error) => {
            warn!(what, code = error.code(), %error, "request failed");
            None
        }
    }
}
