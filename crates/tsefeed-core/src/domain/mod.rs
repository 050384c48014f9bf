pub mod instrument;
pub mod interval;
pub mod models;
pub mod table;

pub use instrument::{normalize_symbol, Instrument, InstrumentKind};
pub use interval::IntradayInterval;
pub use models::{
    chronological, Candle, ClientTypeRow, CumulativeSnapshot, CurrencyRow, Dated, IndexRow,
    IndustryRow, PriceRow, ShareChange, Snapshot, TradeTick,
};
pub use table::{Cell, Column, ColumnKey, RowKey, Table};
