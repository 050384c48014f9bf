//! TSETMC adapter: instrument search, daily exports, index and sector feeds, client
//! type totals and intraday trade data.

use serde::Deserialize;
use time::{Date, Month, Time};
use tracing::debug;

use crate::adapters::catalog;
use crate::config::{fill, Endpoints};
use crate::data_source::{ProviderId, SourceFuture, TseDataSource};
use crate::domain::{
    ClientTypeRow, CumulativeSnapshot, IndexRow, IndustryRow, Instrument, InstrumentKind,
    PriceRow, ShareChange, TradeTick,
};
use crate::transport::Transport;
use crate::TseError;

#[derive(Debug, Clone)]
pub struct TsetmcAdapter {
    transport: Transport,
    endpoints: Endpoints,
}

impl TsetmcAdapter {
    pub fn new(transport: Transport, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    async fn search(&self, symbol: &str) -> Result<Option<Instrument>, TseError> {
        let encoded = urlencoding::encode(symbol);
        let url = fill(&self.endpoints.search, &[encoded.as_ref()]);
        let body = self.transport.get_text(&url).await?;
        parse_search(&body, symbol)
    }
}

impl TseDataSource for TsetmcAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Tsetmc
    }

    fn resolve<'a>(&'a self, symbol: &'a str) -> SourceFuture<'a, Option<Instrument>> {
        Box::pin(async move {
            if let Some(index) = catalog::find_index(symbol) {
                return Ok(Some(index));
            }
            if let Some(industry) = catalog::find_industry(symbol) {
                return Ok(Some(industry));
            }
            let found = self.search(symbol).await?;
            debug!(symbol, code = ?found.as_ref().map(|i| i.code.as_str()), "resolved symbol");
            Ok(found)
        })
    }

    fn price_history<'a>(&'a self, instrument: &'a Instrument) -> SourceFuture<'a, Vec<PriceRow>> {
        Box::pin(async move {
            let url = fill(&self.endpoints.price_history, &[instrument.code.as_str()]);
            parse_price_history(&self.transport.get_text(&url).await?)
        })
    }

    fn index_history<'a>(&'a self, instrument: &'a Instrument) -> SourceFuture<'a, Vec<IndexRow>> {
        Box::pin(async move {
            let url = fill(&self.endpoints.index_history, &[instrument.code.as_str()]);
            parse_index_history(&self.transport.get_text(&url).await?)
        })
    }

    fn industry_history<'a>(
        &'a self,
        instrument: &'a Instrument,
    ) -> SourceFuture<'a, Vec<IndustryRow>> {
        Box::pin(async move {
            let url = fill(&self.endpoints.industry_history, &[instrument.code.as_str()]);
            parse_industry_history(&self.transport.get_text(&url).await?)
        })
    }

    fn client_type_history<'a>(
        &'a self,
        instrument: &'a Instrument,
    ) -> SourceFuture<'a, Vec<ClientTypeRow>> {
        Box::pin(async move {
            let url = fill(&self.endpoints.client_type, &[instrument.code.as_str()]);
            parse_client_type(&self.transport.get_text(&url).await?)
        })
    }

    fn share_changes<'a>(
        &'a self,
        instrument: &'a Instrument,
    ) -> SourceFuture<'a, Vec<ShareChange>> {
        Box::pin(async move {
            let url = fill(&self.endpoints.share_change, &[instrument.code.as_str()]);
            parse_share_changes(&self.transport.get_text(&url).await?)
        })
    }

    fn today_trades<'a>(&'a self, instrument: &'a Instrument) -> SourceFuture<'a, Vec<TradeTick>> {
        Box::pin(async move {
            let url = fill(&self.endpoints.trades, &[instrument.code.as_str()]);
            parse_trades(&self.transport.get_text(&url).await?)
        })
    }

    fn closing_price_history<'a>(
        &'a self,
        instrument: &'a Instrument,
        day: Date,
    ) -> SourceFuture<'a, Vec<CumulativeSnapshot>> {
        Box::pin(async move {
            let compact = compact_date(day);
            let url = fill(
                &self.endpoints.closing_price_history,
                &[instrument.code.as_str(), compact.as_str()],
            );
            parse_closing_history(&self.transport.get_text(&url).await?)
        })
    }
}

/// `YYYYMMDD`, the date layout of every TSETMC feed.
pub fn compact_date(day: Date) -> String {
    format!("{:04}{:02}{:02}", day.year(), u8::from(day.month()), day.day())
}

pub fn parse_compact_date(value: &str) -> Result<Date, TseError> {
    let value = value.trim();
    let invalid = || TseError::parsing("date", format!("'{value}' is not YYYYMMDD"));
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let year: i32 = value[..4].parse().map_err(|_| invalid())?;
    let month: u8 = value[4..6].parse().map_err(|_| invalid())?;
    let day: u8 = value[6..].parse().map_err(|_| invalid())?;
    let month = Month::try_from(month).map_err(|_| invalid())?;
    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}

/// `hEven` packs the time as an integer `HHMMSS` without leading zeros.
pub fn parse_h_even(value: u32) -> Result<Time, TseError> {
    let hour = (value / 10_000) as u8;
    let minute = (value / 100 % 100) as u8;
    let second = (value % 100) as u8;
    Time::from_hms(hour, minute, second)
        .map_err(|_| TseError::parsing("time", format!("'{value:06}' is not HHMMSS")))
}

fn number(field: &'static str, value: &str) -> Result<f64, TseError> {
    value
        .trim()
        .replace(',', "")
        .parse()
        .map_err(|_| TseError::parsing(field, format!("'{value}' is not a number")))
}

fn count(field: &'static str, value: &str) -> Result<u64, TseError> {
    number(field, value).map(|v| v.max(0.0) as u64)
}

/// First search hit, or `None` when the search came back empty.
pub fn parse_search(body: &str, symbol: &str) -> Result<Option<Instrument>, TseError> {
    #[derive(Deserialize)]
    struct Hit {
        #[serde(rename = "insCode")]
        ins_code: String,
        #[serde(rename = "lVal18AFC", default)]
        ticker: Option<String>,
    }
    #[derive(Deserialize)]
    struct SearchResponse {
        #[serde(rename = "instrumentSearch", default)]
        instrument_search: Vec<Hit>,
    }

    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| TseError::parsing("instrument search", e.to_string()))?;
    Ok(response.instrument_search.into_iter().next().map(|hit| {
        let label = hit.ticker.unwrap_or_else(|| symbol.to_owned());
        Instrument::new(hit.ins_code, InstrumentKind::Stock, label)
    }))
}

/// One line of the daily export, matched to the `<TAG>` header by name.
#[derive(Debug, Deserialize)]
struct ExportRecord {
    #[serde(rename = "<DTYYYYMMDD>")]
    date: String,
    #[serde(rename = "<FIRST>")]
    first: f64,
    #[serde(rename = "<HIGH>")]
    high: f64,
    #[serde(rename = "<LOW>")]
    low: f64,
    #[serde(rename = "<CLOSE>")]
    close: f64,
    #[serde(rename = "<VALUE>")]
    value: f64,
    #[serde(rename = "<VOL>")]
    volume: f64,
    #[serde(rename = "<OPENINT>")]
    trades: f64,
    #[serde(rename = "<OPEN>")]
    open: f64,
    #[serde(rename = "<LAST>")]
    last: f64,
}

/// Parses the daily export, a CSV whose header names the `<TAG>` columns.
pub fn parse_price_history(body: &str) -> Result<Vec<PriceRow>, TseError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    reader
        .deserialize::<ExportRecord>()
        .map(|record| {
            let record = record.map_err(|e| TseError::parsing("price history", e.to_string()))?;
            Ok(PriceRow {
                date: parse_compact_date(&record.date)?,
                open: record.first,
                high: record.high,
                low: record.low,
                close: record.last,
                final_close: record.close,
                yesterday_reference: record.open,
                volume: record.volume.max(0.0) as u64,
                value: record.value,
                trade_count: record.trades.max(0.0) as u64,
            })
        })
        .collect()
}

fn records(body: &str) -> impl Iterator<Item = Vec<&str>> {
    body.split(';')
        .map(str::trim)
        .filter(|record| !record.is_empty())
        .map(|record| record.split(',').map(str::trim).collect())
}

/// Index chart feed: `date,high,low,open,close,volume,adj_close` records split by `;`.
pub fn parse_index_history(body: &str) -> Result<Vec<IndexRow>, TseError> {
    records(body)
        .map(|fields| {
            if fields.len() < 7 {
                return Err(TseError::parsing(
                    "index history",
                    format!("expected 7 fields, got {}", fields.len()),
                ));
            }
            Ok(IndexRow {
                date: parse_compact_date(fields[0])?,
                high: number("index high", fields[1])?,
                low: number("index low", fields[2])?,
                open: number("index open", fields[3])?,
                close: number("index close", fields[4])?,
                volume: count("index volume", fields[5])?,
                adj_close: number("index adjusted close", fields[6])?,
            })
        })
        .collect()
}

/// Retail/institutional totals: a date followed by 12 counters per `;` record.
pub fn parse_client_type(body: &str) -> Result<Vec<ClientTypeRow>, TseError> {
    records(body)
        .map(|fields| {
            if fields.len() < 13 {
                return Err(TseError::parsing(
                    "client type history",
                    format!("expected 13 fields, got {}", fields.len()),
                ));
            }
            let n = |position: usize| count("client type counter", fields[position]);
            Ok(ClientTypeRow {
                date: parse_compact_date(fields[0])?,
                n_buy_retail: n(1)?,
                n_buy_institutional: n(2)?,
                n_sell_retail: n(3)?,
                n_sell_institutional: n(4)?,
                vol_buy_retail: n(5)?,
                vol_buy_institutional: n(6)?,
                vol_sell_retail: n(7)?,
                vol_sell_institutional: n(8)?,
                val_buy_retail: n(9)?,
                val_buy_institutional: n(10)?,
                val_sell_retail: n(11)?,
                val_sell_institutional: n(12)?,
            })
        })
        .collect()
}

pub fn parse_industry_history(body: &str) -> Result<Vec<IndustryRow>, TseError> {
    #[derive(Deserialize)]
    struct Entry {
        #[serde(rename = "dEven")]
        d_even: u32,
        #[serde(rename = "xNivInuClMresIbs")]
        close: f64,
        #[serde(rename = "xNivInuPhMresIbs")]
        high: f64,
        #[serde(rename = "xNivInuPbMresIbs")]
        low: f64,
    }
    #[derive(Deserialize)]
    struct Response {
        #[serde(rename = "indexB2", default)]
        index_b2: Vec<Entry>,
    }

    let response: Response = serde_json::from_str(body)
        .map_err(|e| TseError::parsing("industry history", e.to_string()))?;
    response
        .index_b2
        .into_iter()
        .map(|entry| {
            Ok(IndustryRow {
                date: parse_compact_date(&entry.d_even.to_string())?,
                high: entry.high,
                low: entry.low,
                close: entry.close,
            })
        })
        .collect()
}

pub fn parse_share_changes(body: &str) -> Result<Vec<ShareChange>, TseError> {
    #[derive(Deserialize)]
    struct Entry {
        #[serde(rename = "dEven")]
        d_even: u32,
        #[serde(rename = "numberOfShareOld")]
        old: f64,
        #[serde(rename = "numberOfShareNew")]
        new: f64,
    }
    #[derive(Deserialize)]
    struct Response {
        #[serde(rename = "instrumentShareChange", default)]
        changes: Vec<Entry>,
    }

    let response: Response = serde_json::from_str(body)
        .map_err(|e| TseError::parsing("share changes", e.to_string()))?;
    response
        .changes
        .into_iter()
        .map(|entry| {
            Ok(ShareChange {
                date: parse_compact_date(&entry.d_even.to_string())?,
                old_shares: entry.old.max(0.0) as u64,
                new_shares: entry.new.max(0.0) as u64,
            })
        })
        .collect()
}

pub fn parse_trades(body: &str) -> Result<Vec<TradeTick>, TseError> {
    #[derive(Deserialize)]
    struct Entry {
        #[serde(rename = "nTran")]
        n_tran: u64,
        #[serde(rename = "hEven")]
        h_even: u32,
        #[serde(rename = "qTitTran")]
        volume: f64,
        #[serde(rename = "pTran")]
        price: f64,
        #[serde(default)]
        canceled: u8,
    }
    #[derive(Deserialize)]
    struct Response {
        #[serde(default)]
        trade: Vec<Entry>,
    }

    let response: Response =
        serde_json::from_str(body).map_err(|e| TseError::parsing("trades", e.to_string()))?;
    response
        .trade
        .into_iter()
        .map(|entry| {
            Ok(TradeTick {
                trade_no: entry.n_tran,
                time: parse_h_even(entry.h_even)?,
                volume: entry.volume.max(0.0) as u64,
                price: entry.price,
                canceled: entry.canceled == 1,
            })
        })
        .collect()
}

pub fn parse_closing_history(body: &str) -> Result<Vec<CumulativeSnapshot>, TseError> {
    #[derive(Deserialize)]
    struct Entry {
        #[serde(rename = "hEven")]
        h_even: u32,
        #[serde(rename = "pDrCotVal")]
        price: f64,
        #[serde(rename = "qTotTran5J")]
        cumulative_volume: f64,
        #[serde(rename = "zTotTran")]
        cumulative_trades: f64,
    }
    #[derive(Deserialize)]
    struct Response {
        #[serde(rename = "closingPriceHistory", default)]
        history: Vec<Entry>,
    }

    let response: Response = serde_json::from_str(body)
        .map_err(|e| TseError::parsing("closing price history", e.to_string()))?;
    response
        .history
        .into_iter()
        .map(|entry| {
            Ok(CumulativeSnapshot {
                time: parse_h_even(entry.h_even)?,
                price: entry.price,
                cumulative_volume: entry.cumulative_volume.max(0.0) as u64,
                cumulative_trades: entry.cumulative_trades.max(0.0) as u64,
            })
        })
        .collect()
}
