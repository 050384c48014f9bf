use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Bar width for intraday data. `Tick` returns the snapshots untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntradayInterval {
    #[serde(rename = "tick")]
    Tick,
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "12h")]
    TwelveHours,
}

impl IntradayInterval {
    pub const ALL: [Self; 8] = [
        Self::Tick,
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::OneHour,
        Self::FourHours,
        Self::TwelveHours,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tick => "tick",
            Self::OneMinute => "1min",
            Self::FiveMinutes => "5min",
            Self::FifteenMinutes => "15min",
            Self::ThirtyMinutes => "30min",
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::TwelveHours => "12h",
        }
    }

    /// Bucket width in seconds, `None` for tick data.
    pub const fn seconds(self) -> Option<u32> {
        match self {
            Self::Tick => None,
            Self::OneMinute => Some(60),
            Self::FiveMinutes => Some(300),
            Self::FifteenMinutes => Some(900),
            Self::ThirtyMinutes => Some(1_800),
            Self::OneHour => Some(3_600),
            Self::FourHours => Some(14_400),
            Self::TwelveHours => Some(43_200),
        }
    }
}

impl Display for IntradayInterval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntradayInterval {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tick" | "ticks" | "raw" => Ok(Self::Tick),
            "1min" | "1m" | "1" => Ok(Self::OneMinute),
            "5min" | "5m" | "5" => Ok(Self::FiveMinutes),
            "15min" | "15m" | "15" => Ok(Self::FifteenMinutes),
            "30min" | "30m" | "30" => Ok(Self::ThirtyMinutes),
            "1h" | "1hour" | "60min" | "60m" | "60" => Ok(Self::OneHour),
            "4h" | "4hour" | "240min" | "240m" | "240" => Ok(Self::FourHours),
            "12h" | "12hour" | "720min" | "720m" | "720" => Ok(Self::TwelveHours),
            other => Err(ValidationError::InvalidInterval {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!(IntradayInterval::from_str("1m"), Ok(IntradayInterval::OneMinute));
        assert_eq!(IntradayInterval::from_str("60"), Ok(IntradayInterval::OneHour));
        assert_eq!(IntradayInterval::from_str("240min"), Ok(IntradayInterval::FourHours));
        assert_eq!(IntradayInterval::from_str(" RAW "), Ok(IntradayInterval::Tick));
    }

    #[test]
    fn canonical_names_round_trip() {
        for interval in IntradayInterval::ALL {
            assert_eq!(IntradayInterval::from_str(interval.as_str()), Ok(interval));
        }
    }

    #[test]
    fn rejects_unknown_interval() {
        let err = IntradayInterval::from_str("2h").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidInterval { .. }));
    }
}
