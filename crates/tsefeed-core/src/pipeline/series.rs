//! Per-domain column tables: how each kind of daily series becomes a [`Frame`].

use crate::domain::{
    Cell, ClientTypeRow, CurrencyRow, IndexRow, IndustryRow, PriceRow, RowKey, ShareChange, Table,
};
use crate::pipeline::adjustment::AdjustedRow;
use crate::pipeline::format::{Frame, GREGORIAN_INDEX};
use crate::ValidationError;

pub const STOCK_STANDARD_ADJUSTED: &[&str] = &["Open", "High", "Low", "Close", "Volume"];
pub const STOCK_STANDARD_RAW: &[&str] = &["Open", "High", "Low", "Close", "Adj Close", "Volume"];
pub const INDUSTRY_STANDARD: &[&str] = &["High", "Low", "Close"];
pub const CURRENCY_STANDARD: &[&str] = &["Open", "High", "Low", "Close"];
pub const CLIENT_TYPE_STANDARD: &[&str] = &[
    "N_buy_retail",
    "N_buy_institutional",
    "N_sell_retail",
    "N_sell_institutional",
    "Vol_buy_retail",
    "Vol_buy_institutional",
    "Vol_sell_retail",
    "Vol_sell_institutional",
    "Val_buy_retail",
    "Val_buy_institutional",
    "Val_sell_retail",
    "Val_sell_institutional",
];

/// Column a return calculation uses when the caller names none.
pub const fn default_return_column(auto_adjust: bool) -> &'static str {
    if auto_adjust {
        "Close"
    } else {
        "Adj Close"
    }
}

fn cells<T>(rows: &[T], f: impl Fn(&T) -> Cell) -> Vec<Cell> {
    rows.iter().map(f).collect()
}

/// Stock frame. With `auto_adjust` the adjusted prices replace the raw ones; otherwise the
/// raw prices stay and the adjusted close is added as `Adj Close`.
pub fn stock_frame(
    ticker: &str,
    rows: &[AdjustedRow],
    auto_adjust: bool,
    adjust_volume: bool,
) -> Result<Frame, ValidationError> {
    let standard = if auto_adjust {
        STOCK_STANDARD_ADJUSTED
    } else {
        STOCK_STANDARD_RAW
    };
    let mut frame = Frame::new(ticker, rows.iter().map(|r| r.raw.date).collect(), standard);

    if auto_adjust {
        frame.push("Open", cells(rows, |r| Cell::Int(r.open)))?;
        frame.push("High", cells(rows, |r| Cell::Int(r.high)))?;
        frame.push("Low", cells(rows, |r| Cell::Int(r.low)))?;
        frame.push("Close", cells(rows, |r| Cell::Int(r.close)))?;
        frame.push("Final", cells(rows, |r| Cell::Int(r.final_close)))?;
    } else {
        frame.push("Open", cells(rows, |r| Cell::float(r.raw.open)))?;
        frame.push("High", cells(rows, |r| Cell::float(r.raw.high)))?;
        frame.push("Low", cells(rows, |r| Cell::float(r.raw.low)))?;
        frame.push("Close", cells(rows, |r| Cell::float(r.raw.close)))?;
        frame.push("Final", cells(rows, |r| Cell::float(r.raw.final_close)))?;
        frame.push("Adj Close", cells(rows, |r| Cell::Int(r.close)))?;
    }
    frame.push("Volume", cells(rows, |r| Cell::from(r.raw.volume)))?;
    if adjust_volume {
        frame.push("Adj Volume", cells(rows, |r| Cell::from(r.volume)))?;
    }
    frame.push("No.", cells(rows, |r| Cell::from(r.raw.trade_count)))?;
    frame.push("Value", cells(rows, |r| Cell::float(r.raw.value)))?;
    Ok(frame)
}

/// Index frame. The feed's own adjusted close is dropped under `auto_adjust`.
pub fn index_frame(
    ticker: &str,
    rows: &[IndexRow],
    auto_adjust: bool,
) -> Result<Frame, ValidationError> {
    let standard = if auto_adjust {
        STOCK_STANDARD_ADJUSTED
    } else {
        STOCK_STANDARD_RAW
    };
    let mut frame = Frame::new(ticker, rows.iter().map(|r| r.date).collect(), standard);
    frame.push("Open", cells(rows, |r| Cell::float(r.open)))?;
    frame.push("High", cells(rows, |r| Cell::float(r.high)))?;
    frame.push("Low", cells(rows, |r| Cell::float(r.low)))?;
    frame.push("Close", cells(rows, |r| Cell::float(r.close)))?;
    if !auto_adjust {
        frame.push("Adj Close", cells(rows, |r| Cell::float(r.adj_close)))?;
    }
    frame.push("Volume", cells(rows, |r| Cell::from(r.volume)))?;
    Ok(frame)
}

pub fn industry_frame(ticker: &str, rows: &[IndustryRow]) -> Result<Frame, ValidationError> {
    let mut frame = Frame::new(ticker, rows.iter().map(|r| r.date).collect(), INDUSTRY_STANDARD);
    frame.push("High", cells(rows, |r| Cell::float(r.high)))?;
    frame.push("Low", cells(rows, |r| Cell::float(r.low)))?;
    frame.push("Close", cells(rows, |r| Cell::float(r.close)))?;
    Ok(frame)
}

pub fn currency_frame(ticker: &str, rows: &[CurrencyRow]) -> Result<Frame, ValidationError> {
    let mut frame = Frame::new(ticker, rows.iter().map(|r| r.date).collect(), CURRENCY_STANDARD);
    frame.push("Open", cells(rows, |r| Cell::float(r.open)))?;
    frame.push("High", cells(rows, |r| Cell::float(r.high)))?;
    frame.push("Low", cells(rows, |r| Cell::float(r.low)))?;
    frame.push("Close", cells(rows, |r| Cell::float(r.close)))?;
    Ok(frame)
}

/// `round(value / count)`, 0 when nobody traded.
fn per_capita(value: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        (value as f64 / count as f64).round()
    }
}

/// Buying power to three decimals, 0 when undefined.
fn power(per_capita_buy: f64, per_capita_sell: f64) -> f64 {
    let ratio = per_capita_buy / per_capita_sell;
    if ratio.is_finite() {
        (ratio * 1_000.0).round() / 1_000.0
    } else {
        0.0
    }
}

/// Retail/institutional frame. Full output adds per-capita trade values and buying power.
pub fn client_type_frame(
    ticker: &str,
    rows: &[ClientTypeRow],
) -> Result<Frame, ValidationError> {
    let dates = rows.iter().map(|r| r.date).collect();
    let mut frame = Frame::new(ticker, dates, CLIENT_TYPE_STANDARD);
    let int = |f: fn(&ClientTypeRow) -> u64| cells(rows, move |r| Cell::from(f(r)));

    frame.push("N_buy_retail", int(|r| r.n_buy_retail))?;
    frame.push("N_buy_institutional", int(|r| r.n_buy_institutional))?;
    frame.push("N_sell_retail", int(|r| r.n_sell_retail))?;
    frame.push("N_sell_institutional", int(|r| r.n_sell_institutional))?;
    frame.push("Vol_buy_retail", int(|r| r.vol_buy_retail))?;
    frame.push("Vol_buy_institutional", int(|r| r.vol_buy_institutional))?;
    frame.push("Vol_sell_retail", int(|r| r.vol_sell_retail))?;
    frame.push("Vol_sell_institutional", int(|r| r.vol_sell_institutional))?;
    frame.push("Val_buy_retail", int(|r| r.val_buy_retail))?;
    frame.push("Val_buy_institutional", int(|r| r.val_buy_institutional))?;
    frame.push("Val_sell_retail", int(|r| r.val_sell_retail))?;
    frame.push("Val_sell_institutional", int(|r| r.val_sell_institutional))?;

    let buy_retail: Vec<f64> = rows
        .iter()
        .map(|r| per_capita(r.val_buy_retail, r.n_buy_retail))
        .collect();
    let buy_institutional: Vec<f64> = rows
        .iter()
        .map(|r| per_capita(r.val_buy_institutional, r.n_buy_institutional))
        .collect();
    let sell_retail: Vec<f64> = rows
        .iter()
        .map(|r| per_capita(r.val_sell_retail, r.n_sell_retail))
        .collect();
    let sell_institutional: Vec<f64> = rows
        .iter()
        .map(|r| per_capita(r.val_sell_institutional, r.n_sell_institutional))
        .collect();
    let as_cells = |values: &[f64]| -> Vec<Cell> {
        values.iter().map(|v| Cell::Int(*v as i64)).collect()
    };
    let powers = |buy: &[f64], sell: &[f64]| -> Vec<Cell> {
        buy.iter()
            .zip(sell)
            .map(|(b, s)| Cell::Float(power(*b, *s)))
            .collect()
    };

    frame.push("Per_capita_buy_retail", as_cells(&buy_retail))?;
    frame.push("Per_capita_buy_institutional", as_cells(&buy_institutional))?;
    frame.push("Per_capita_sell_retail", as_cells(&sell_retail))?;
    frame.push("Per_capita_sell_institutional", as_cells(&sell_institutional))?;
    frame.push("Power_retail", powers(&buy_retail, &sell_retail))?;
    frame.push("Power_institutional", powers(&buy_institutional, &sell_institutional))?;
    Ok(frame)
}

/// Share-count changes keyed by Gregorian date.
pub fn share_change_table(rows: &[ShareChange]) -> Result<Table, ValidationError> {
    Table::new(GREGORIAN_INDEX, rows.iter().map(|r| RowKey::Date(r.date)).collect())
        .with_column("old_shares_amount", cells(rows, |r| Cell::from(r.old_shares)))?
        .with_column("new_shares_amount", cells(rows, |r| Cell::from(r.new_shares)))
}

/// Stock history with the export's own `<TAG>` column names, untouched by adjustment.
pub fn raw_stock_table(ticker: &str, rows: &[PriceRow]) -> Result<Table, ValidationError> {
    Table::new("<DTYYYYMMDD>", rows.iter().map(|r| RowKey::Date(r.date)).collect())
        .with_column("<TICKER>", cells(rows, |_| Cell::text(ticker)))?
        .with_column("<FIRST>", cells(rows, |r| Cell::float(r.open)))?
        .with_column("<HIGH>", cells(rows, |r| Cell::float(r.high)))?
        .with_column("<LOW>", cells(rows, |r| Cell::float(r.low)))?
        .with_column("<CLOSE>", cells(rows, |r| Cell::float(r.final_close)))?
        .with_column("<VALUE>", cells(rows, |r| Cell::float(r.value)))?
        .with_column("<VOL>", cells(rows, |r| Cell::from(r.volume)))?
        .with_column("<OPENINT>", cells(rows, |r| Cell::from(r.trade_count)))?
        .with_column("<PER>", cells(rows, |_| Cell::text("D")))?
        .with_column("<OPEN>", cells(rows, |r| Cell::float(r.yesterday_reference)))?
        .with_column("<LAST>", cells(rows, |r| Cell::float(r.close)))
}

/// Index history with the chart feed's tag names.
pub fn raw_index_table(rows: &[IndexRow]) -> Result<Table, ValidationError> {
    Table::new("<DTYYYYMMDD>", rows.iter().map(|r| RowKey::Date(r.date)).collect())
        .with_column("<HIGH>", cells(rows, |r| Cell::float(r.high)))?
        .with_column("<LOW>", cells(rows, |r| Cell::float(r.low)))?
        .with_column("<OPEN>", cells(rows, |r| Cell::float(r.open)))?
        .with_column("<CLOSE>", cells(rows, |r| Cell::float(r.close)))?
        .with_column("<VOL>", cells(rows, |r| Cell::from(r.volume)))?
        .with_column("<ADJCLOSE>", cells(rows, |r| Cell::float(r.adj_close)))
}
