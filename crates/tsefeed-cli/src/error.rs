use thiserror::Error;
use tsefeed_core::{ErrorKind, TseError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tsefeed_core::ValidationError),

    #[error(transparent)]
    Tse(#[from] TseError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Tse(error) => match error.kind() {
                ErrorKind::InvalidParameter => 2,
                ErrorKind::SymbolNotFound
                | ErrorKind::InstrumentKindMismatch
                | ErrorKind::NoData => 3,
                ErrorKind::ConnectionFailure => 7,
                ErrorKind::DataParsingFailure => 8,
            },
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
