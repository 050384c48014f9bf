//! Normalization stages applied between a raw provider response and the returned table.

pub mod adjustment;
pub mod combine;
pub mod filter;
pub mod format;
pub mod intraday;
pub mod returns;
pub mod series;

pub use adjustment::{adjust, AdjustedRow};
pub use combine::combine;
pub use filter::{filter, SeriesWindow};
pub use format::{format, DateFormat, Frame, OutputType};
pub use returns::{add_returns, ReturnMode, ReturnSpec};
