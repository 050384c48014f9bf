//! Date indexing and column-set selection shared by every daily series.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::calendar::{self, JalaliDate};
use crate::domain::{Cell, ColumnKey, RowKey, Table};
use crate::ValidationError;

pub const GREGORIAN_INDEX: &str = "Date";
pub const JALALI_INDEX: &str = "J-Date";

/// Which calendar keys the rows and which date columns accompany them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    #[default]
    Jalali,
    Gregorian,
    Both,
}

impl DateFormat {
    pub const ALL: [Self; 3] = [Self::Jalali, Self::Gregorian, Self::Both];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jalali => "jalali",
            Self::Gregorian => "gregorian",
            Self::Both => "both",
        }
    }
}

impl Display for DateFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jalali" => Ok(Self::Jalali),
            "gregorian" => Ok(Self::Gregorian),
            "both" => Ok(Self::Both),
            other => Err(ValidationError::InvalidDateFormat {
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    #[default]
    Standard,
    Full,
}

impl OutputType {
    pub const ALL: [Self; 2] = [Self::Standard, Self::Full];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Full => "full",
        }
    }
}

impl Display for OutputType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "full" | "complete" => Ok(Self::Full),
            other => Err(ValidationError::InvalidOutputType {
                value: other.to_owned(),
            }),
        }
    }
}

/// A daily series before date indexing: value columns in full-output order plus the
/// subset shown in standard output.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub ticker: String,
    pub dates: Vec<Date>,
    pub columns: Vec<(&'static str, Vec<Cell>)>,
    pub standard: &'static [&'static str],
}

impl Frame {
    pub fn new(
        ticker: impl Into<String>,
        dates: Vec<Date>,
        standard: &'static [&'static str],
    ) -> Self {
        Self {
            ticker: ticker.into(),
            dates,
            columns: Vec::new(),
            standard,
        }
    }

    pub fn push(&mut self, name: &'static str, values: Vec<Cell>) -> Result<(), ValidationError> {
        if values.len() != self.dates.len() {
            return Err(ValidationError::ColumnLength {
                column: name.to_owned(),
                expected: self.dates.len(),
                actual: values.len(),
            });
        }
        self.columns.push((name, values));
        Ok(())
    }
}

/// Indexes a frame by the requested calendar and picks its column set.
///
/// Full output appends, after the value columns, `J-Date` (both), `Weekday`
/// (gregorian and both), `Weekday_fa` (jalali and both) and `Ticker`.
pub fn format(
    frame: Frame,
    date_format: DateFormat,
    output_type: OutputType,
) -> Result<Table, ValidationError> {
    let jalali_dates = frame
        .dates
        .iter()
        .map(|date| JalaliDate::from_gregorian(*date))
        .collect::<Result<Vec<_>, _>>()?;

    let (index_name, index) = match date_format {
        DateFormat::Jalali => (
            JALALI_INDEX,
            jalali_dates.iter().copied().map(RowKey::Jalali).collect(),
        ),
        DateFormat::Gregorian | DateFormat::Both => (
            GREGORIAN_INDEX,
            frame.dates.iter().copied().map(RowKey::Date).collect(),
        ),
    };

    let mut table = Table::new(index_name, index);
    for (name, values) in frame.columns {
        table.push_column(ColumnKey::field(name), values)?;
    }

    if output_type == OutputType::Standard {
        return Ok(table.select(frame.standard));
    }

    if date_format == DateFormat::Both {
        table.push_column(
            ColumnKey::field(JALALI_INDEX),
            jalali_dates.iter().map(|d| Cell::text(d.to_string())).collect(),
        )?;
    }
    if date_format != DateFormat::Jalali {
        table.push_column(
            ColumnKey::field("Weekday"),
            frame
                .dates
                .iter()
                .map(|d| Cell::text(calendar::weekday_en(d.weekday())))
                .collect(),
        )?;
    }
    if date_format != DateFormat::Gregorian {
        table.push_column(
            ColumnKey::field("Weekday_fa"),
            frame
                .dates
                .iter()
                .map(|d| Cell::text(calendar::weekday_fa(d.weekday())))
                .collect(),
        )?;
    }
    let rows = table.len();
    table.push_column(
        ColumnKey::field("Ticker"),
        vec![Cell::text(frame.ticker); rows],
    )?;
    Ok(table)
}
