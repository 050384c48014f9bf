use serde::Serialize;
use time::{Date, PrimitiveDateTime, Time};

/// Rows that carry a trading date.
pub trait Dated {
    fn date(&self) -> Date;
}

/// One day of a stock's raw price history, as published by the TSETMC export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRow {
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    /// Last traded price of the day.
    pub close: f64,
    /// Official closing price (volume-weighted).
    pub final_close: f64,
    /// Previous session's reference price after any capital action.
    pub yesterday_reference: f64,
    pub volume: u64,
    pub value: f64,
    pub trade_count: u64,
}

/// One day of an index series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexRow {
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

/// One day of an industry (sector) index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndustryRow {
    pub date: Date,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Retail ("individual") versus institutional trading totals for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientTypeRow {
    pub date: Date,
    pub n_buy_retail: u64,
    pub n_buy_institutional: u64,
    pub n_sell_retail: u64,
    pub n_sell_institutional: u64,
    pub vol_buy_retail: u64,
    pub vol_buy_institutional: u64,
    pub vol_sell_retail: u64,
    pub vol_sell_institutional: u64,
    pub val_buy_retail: u64,
    pub val_buy_institutional: u64,
    pub val_sell_retail: u64,
    pub val_sell_institutional: u64,
}

/// One day of a currency or coin quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyRow {
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A change in a company's number of outstanding shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareChange {
    pub date: Date,
    pub old_shares: u64,
    pub new_shares: u64,
}

/// A single trade from today's live trade list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeTick {
    pub trade_no: u64,
    pub time: Time,
    pub volume: u64,
    pub price: f64,
    pub canceled: bool,
}

/// A cumulative intraday snapshot from the closing-price history of a past day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeSnapshot {
    pub time: Time,
    pub price: f64,
    pub cumulative_volume: u64,
    pub cumulative_trades: u64,
}

/// An intraday observation with incremental volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub timestamp: PrimitiveDateTime,
    pub price: f64,
    pub volume: u64,
    pub trade_count: Option<u64>,
    pub trade_no: Option<u64>,
}

/// A fixed-width OHLCV bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candle {
    pub start: PrimitiveDateTime,
    pub open: i64,
    pub high: i64,
    pub low: i64,
    pub close: i64,
    pub volume: u64,
    pub trade_count: u64,
}

macro_rules! impl_dated {
    ($($ty:ty),*) => {
        $(impl Dated for $ty {
            fn date(&self) -> Date {
                self.date
            }
        })*
    };
}

impl_dated!(PriceRow, IndexRow, IndustryRow, ClientTypeRow, CurrencyRow, ShareChange);

/// Sorts rows oldest first and drops repeated dates, keeping the first seen.
pub fn chronological<T: Dated>(mut rows: Vec<T>) -> Vec<T> {
    rows.sort_by_key(Dated::date);
    rows.dedup_by_key(|row| row.date());
    rows
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn row(date: Date, close: f64) -> CurrencyRow {
        CurrencyRow {
            date,
            open: close,
            high: close,
            low: close,
            close,
        }
    }

    #[test]
    fn chronological_sorts_and_dedups() {
        let rows = chronological(vec![
            row(date!(2024 - 01 - 03), 3.0),
            row(date!(2024 - 01 - 01), 1.0),
            row(date!(2024 - 01 - 03), 9.0),
            row(date!(2024 - 01 - 02), 2.0),
        ]);
        let closes: Vec<f64> = rows.iter().map(|r| r.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }
}
