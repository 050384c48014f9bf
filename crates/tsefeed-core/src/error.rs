use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::InstrumentKind;

/// Validation errors for caller-supplied parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("at least one symbol is required")]
    NoSymbols,

    #[error("invalid date format '{value}', expected one of jalali, gregorian, both")]
    InvalidDateFormat { value: String },
    #[error("invalid output type '{value}', expected one of standard, full")]
    InvalidOutputType { value: String },
    #[error("invalid return mode '{value}', expected one of simple, log, both")]
    InvalidReturnMode { value: String },
    #[error("invalid interval '{value}', expected one of tick, 1min, 5min, 15min, 30min, 1h, 4h, 12h")]
    InvalidInterval { value: String },

    #[error("invalid date '{value}'")]
    InvalidDate { value: String },
    #[error("invalid jalali date {year}-{month}-{day}")]
    InvalidJalaliDate { year: i32, month: u8, day: u8 },
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: String, end: String },

    #[error("return period must be at least 1")]
    ZeroPeriod,
    #[error("column '{column}' is not present in the table")]
    MissingColumn { column: String },
    #[error("column '{column}' has {actual} values but the table has {expected} rows")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("unknown currency '{value}'")]
    UnknownCurrency { value: String },

    #[error("invalid value '{value}' for setting {key}")]
    InvalidSetting { key: &'static str, value: String },
}

/// Broad failure class of a [`TseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ConnectionFailure,
    SymbolNotFound,
    InstrumentKindMismatch,
    DataParsingFailure,
    InvalidParameter,
    NoData,
}

impl ErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionFailure => "connection_failure",
            Self::SymbolNotFound => "symbol_not_found",
            Self::InstrumentKindMismatch => "instrument_kind_mismatch",
            Self::DataParsingFailure => "data_parsing_failure",
            Self::InvalidParameter => "invalid_parameter",
            Self::NoData => "no_data",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level error type for data retrieval and normalization.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TseError {
    #[error("connection failure: {message}")]
    Connection { message: String, status: Option<u16> },

    #[error("symbol '{symbol}' was not found")]
    SymbolNotFound { symbol: String },

    #[error("{operation} is not available for {kind} '{symbol}'")]
    InstrumentKindMismatch {
        symbol: String,
        kind: InstrumentKind,
        operation: &'static str,
    },

    #[error("failed to parse {what}: {message}")]
    DataParsing { what: &'static str, message: String },

    #[error(transparent)]
    InvalidParameter(#[from] ValidationError),

    #[error("no data: {message}")]
    NoData { message: String },
}

impl TseError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            status: None,
        }
    }

    pub fn http_status(status: u16, url: &str) -> Self {
        Self::Connection {
            message: format!("HTTP {status} from {url}"),
            status: Some(status),
        }
    }

    pub fn symbol_not_found(symbol: impl Into<String>) -> Self {
        Self::SymbolNotFound {
            symbol: symbol.into(),
        }
    }

    pub fn parsing(what: &'static str, message: impl Into<String>) -> Self {
        Self::DataParsing {
            what,
            message: message.into(),
        }
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::NoData {
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection { .. } => ErrorKind::ConnectionFailure,
            Self::SymbolNotFound { .. } => ErrorKind::SymbolNotFound,
            Self::InstrumentKindMismatch { .. } => ErrorKind::InstrumentKindMismatch,
            Self::DataParsing { .. } => ErrorKind::DataParsingFailure,
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::NoData { .. } => ErrorKind::NoData,
        }
    }

    /// Stable machine-readable error code.
    pub const fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::ConnectionFailure => "tse.connection",
            ErrorKind::SymbolNotFound => "tse.symbol_not_found",
            ErrorKind::InstrumentKindMismatch => "tse.instrument_kind",
            ErrorKind::DataParsingFailure => "tse.parse",
            ErrorKind::InvalidParameter => "tse.invalid_parameter",
            ErrorKind::NoData => "tse.no_data",
        }
    }
}

impl From<serde_json::Error> for TseError {
    fn from(error: serde_json::Error) -> Self {
        Self::parsing("json payload", error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_kind() {
        let err = TseError::symbol_not_found("فولاد");
        assert_eq!(err.kind(), ErrorKind::SymbolNotFound);
        assert_eq!(err.code(), "tse.symbol_not_found");

        let err = TseError::from(ValidationError::ZeroPeriod);
        assert_eq!(err.code(), "tse.invalid_parameter");
    }

    #[test]
    fn kind_mismatch_message_names_operation() {
        let err = TseError::InstrumentKindMismatch {
            symbol: String::from("شاخص کل"),
            kind: InstrumentKind::Index,
            operation: "intraday data",
        };
        assert_eq!(
            err.to_string(),
            "intraday data is not available for index 'شاخص کل'"
        );
    }

    #[test]
    fn http_status_keeps_status_code() {
        let err = TseError::http_status(503, "http://old.tsetmc.com/x");
        assert!(matches!(err, TseError::Connection { status: Some(503), .. }));
    }
}
