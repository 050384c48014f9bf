//! Adapter contracts for the upstream feeds.
//!
//! | Method | Feed |
//! |--------|------|
//! | `resolve` | instrument search (plus the static index catalog) |
//! | `price_history` | daily CSV export |
//! | `index_history` | index chart feed |
//! | `industry_history` | sector index JSON |
//! | `client_type_history` | retail/institutional totals |
//! | `share_changes` | capital increase history |
//! | `today_trades` | live trade list |
//! | `closing_price_history` | a past day's cumulative snapshots |
//! | `currency_history` | TGJU daily quotes |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::adapters::catalog::Currency;
use crate::domain::{
    ClientTypeRow, CumulativeSnapshot, CurrencyRow, IndexRow, IndustryRow, Instrument, PriceRow,
    ShareChange, TradeTick,
};
use crate::{TseError, ValidationError};

/// Upstream providers, reported in output metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Tsetmc,
    Tgju,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::Tsetmc, Self::Tgju];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tsetmc => "tsetmc",
            Self::Tgju => "tgju",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tsetmc" => Ok(Self::Tsetmc),
            "tgju" => Ok(Self::Tgju),
            other => Err(ValidationError::InvalidSetting {
                key: "provider",
                value: other.to_owned(),
            }),
        }
    }
}

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TseError>> + Send + 'a>>;

/// Tehran Stock Exchange feeds. Every method returns rows in the order the feed sent
/// them; callers sort.
pub trait TseDataSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// `Ok(None)` when nothing matches the symbol.
    fn resolve<'a>(&'a self, symbol: &'a str) -> SourceFuture<'a, Option<Instrument>>;

    fn price_history<'a>(&'a self, instrument: &'a Instrument) -> SourceFuture<'a, Vec<PriceRow>>;

    fn index_history<'a>(&'a self, instrument: &'a Instrument) -> SourceFuture<'a, Vec<IndexRow>>;

    fn industry_history<'a>(
        &'a self,
        instrument: &'a Instrument,
    ) -> SourceFuture<'a, Vec<IndustryRow>>;

    fn client_type_history<'a>(
        &'a self,
        instrument: &'a Instrument,
    ) -> SourceFuture<'a, Vec<ClientTypeRow>>;

    fn share_changes<'a>(&'a self, instrument: &'a Instrument)
        -> SourceFuture<'a, Vec<ShareChange>>;

    fn today_trades<'a>(&'a self, instrument: &'a Instrument) -> SourceFuture<'a, Vec<TradeTick>>;

    fn closing_price_history<'a>(
        &'a self,
        instrument: &'a Instrument,
        day: Date,
    ) -> SourceFuture<'a, Vec<CumulativeSnapshot>>;
}

/// Currency and coin quotes.
pub trait CurrencySource: Send + Sync {
    fn id(&self) -> ProviderId;

    fn currency_history<'a>(&'a self, currency: &'a Currency)
        -> SourceFuture<'a, Vec<CurrencyRow>>;
}
