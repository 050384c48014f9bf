use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{Cell, ColumnKey, Table};
use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnMode {
    Simple,
    Log,
    Both,
}

impl ReturnMode {
    pub const ALL: [Self; 3] = [Self::Simple, Self::Log, Self::Both];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Log => "log",
            Self::Both => "both",
        }
    }
}

impl Display for ReturnMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReturnMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "log" => Ok(Self::Log),
            "both" => Ok(Self::Both),
            other => Err(ValidationError::InvalidReturnMode {
                value: other.to_owned(),
            }),
        }
    }
}

/// A return column request: mode, optional source column and lookback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnSpec {
    pub mode: ReturnMode,
    pub column: Option<String>,
    pub period: usize,
}

impl ReturnSpec {
    pub const fn new(mode: ReturnMode) -> Self {
        Self {
            mode,
            column: None,
            period: 1,
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub const fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }
}

/// Accepts `mode`, `mode:Column` or `mode:Column:period`.
impl FromStr for ReturnSpec {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split(':').map(str::trim);
        let mode = ReturnMode::from_str(parts.next().unwrap_or_default())?;
        let mut spec = Self::new(mode);
        if let Some(column) = parts.next().filter(|c| !c.is_empty()) {
            spec.column = Some(column.to_owned());
        }
        if let Some(period) = parts.next() {
            spec.period = period
                .parse()
                .map_err(|_| ValidationError::InvalidReturnMode {
                    value: value.to_owned(),
                })?;
        }
        if spec.period == 0 {
            return Err(ValidationError::ZeroPeriod);
        }
        Ok(spec)
    }
}

fn period_returns(prices: &[Option<f64>], period: usize, log: bool) -> Vec<Cell> {
    prices
        .iter()
        .enumerate()
        .map(|(position, current)| {
            let previous = position.checked_sub(period).and_then(|p| prices[p]);
            match (previous, current) {
                (Some(previous), Some(current)) => {
                    let ratio = current / previous;
                    Cell::float(if log { ratio.ln() } else { ratio - 1.0 })
                }
                _ => Cell::Null,
            }
        })
        .collect()
}

/// Appends return columns computed from `column` over `period` rows.
///
/// Single modes write `returns`; `Both` writes `simple_returns` and `log_returns`. The
/// first `period` rows, and any row whose ratio is undefined, are null.
pub fn add_returns(
    mut table: Table,
    mode: ReturnMode,
    column: &str,
    period: usize,
) -> Result<Table, ValidationError> {
    if period == 0 {
        return Err(ValidationError::ZeroPeriod);
    }
    let prices: Vec<Option<f64>> = table.values(column)?.iter().map(Cell::as_f64).collect();

    match mode {
        ReturnMode::Simple => {
            table.push_column(ColumnKey::field("returns"), period_returns(&prices, period, false))?;
        }
        ReturnMode::Log => {
            table.push_column(ColumnKey::field("returns"), period_returns(&prices, period, true))?;
        }
        ReturnMode::Both => {
            table.push_column(
                ColumnKey::field("simple_returns"),
                period_returns(&prices, period, false),
            )?;
            table.push_column(
                ColumnKey::field("log_returns"),
                period_returns(&prices, period, true),
            )?;
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use time::macros::date;
    use time::Duration;

    use super::*;
    use crate::domain::RowKey;

    fn closes(values: &[i64]) -> Table {
        let index = (0..values.len() as i64)
            .map(|offset| RowKey::Date(date!(2024 - 01 - 01) + Duration::days(offset)))
            .collect();
        Table::new("Date", index)
            .with_column("Close", values.iter().map(|v| Cell::Int(*v)).collect())
            .expect("matching length")
    }

    fn floats(table: &Table, field: &str) -> Vec<Option<f64>> {
        table
            .values(field)
            .expect("present")
            .iter()
            .map(Cell::as_f64)
            .collect()
    }

    #[test]
    fn simple_returns() {
        let table = add_returns(closes(&[100, 110, 121]), ReturnMode::Simple, "Close", 1)
            .expect("valid");
        let returns = floats(&table, "returns");
        assert_eq!(returns[0], None);
        assert!((returns[1].expect("defined") - 0.10).abs() < 1e-12);
        assert!((returns[2].expect("defined") - 0.10).abs() < 1e-12);
    }

    #[test]
    fn both_modes_write_two_columns() {
        let table = add_returns(closes(&[100, 110, 121]), ReturnMode::Both, "Close", 1)
            .expect("valid");
        let log = floats(&table, "log_returns");
        assert!((log[1].expect("defined") - 1.1_f64.ln()).abs() < 1e-12);
        assert!((log[2].expect("defined") - 1.1_f64.ln()).abs() < 1e-12);
        assert!(table.column("simple_returns").is_some());
        assert!(table.column("returns").is_none());
    }

    #[test]
    fn longer_period_leaves_leading_nulls() {
        let table = add_returns(closes(&[100, 110, 121]), ReturnMode::Simple, "Close", 2)
            .expect("valid");
        let returns = floats(&table, "returns");
        assert_eq!(&returns[..2], &[None, None]);
        assert!((returns[2].expect("defined") - 0.21).abs() < 1e-12);
    }

    #[test]
    fn zero_previous_price_is_null() {
        let table = add_returns(closes(&[0, 10]), ReturnMode::Log, "Close", 1).expect("valid");
        assert_eq!(floats(&table, "returns"), vec![None, None]);
    }

    #[test]
    fn rejects_missing_column_and_zero_period() {
        let err = add_returns(closes(&[1, 2]), ReturnMode::Simple, "Adj Close", 1)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::MissingColumn { .. }));

        let err = add_returns(closes(&[1, 2]), ReturnMode::Simple, "Close", 0)
            .expect_err("must fail");
        assert_eq!(err, ValidationError::ZeroPeriod);
    }

    #[test]
    fn parses_textual_specs() {
        assert_eq!(
            ReturnSpec::from_str("log").expect("valid"),
            ReturnSpec::new(ReturnMode::Log)
        );
        assert_eq!(
            ReturnSpec::from_str("both:Adj Close:5").expect("valid"),
            ReturnSpec::new(ReturnMode::Both).with_column("Adj Close").with_period(5)
        );
        assert!(ReturnSpec::from_str("simple:Close:0").is_err());
        assert!(ReturnSpec::from_str("weekly").is_err());
    }
}
