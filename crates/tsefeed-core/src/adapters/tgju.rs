//! TGJU currency and coin quotes.

use serde::Deserialize;
use serde_json::Value;

use crate::adapters::catalog::Currency;
use crate::calendar;
use crate::config::{fill, Endpoints};
use crate::data_source::{CurrencySource, ProviderId, SourceFuture};
use crate::domain::CurrencyRow;
use crate::transport::Transport;
use crate::TseError;

#[derive(Debug, Clone)]
pub struct TgjuAdapter {
    transport: Transport,
    endpoints: Endpoints,
}

impl TgjuAdapter {
    pub fn new(transport: Transport, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }
}

impl CurrencySource for TgjuAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Tgju
    }

    fn currency_history<'a>(&'a self, currency: &'a Currency) -> SourceFuture<'a, Vec<CurrencyRow>> {
        Box::pin(async move {
            let url = fill(&self.endpoints.currency, &[currency.slug]);
            parse_summary_table(&self.transport.get_text(&url).await?)
        })
    }
}

#[derive(Deserialize)]
struct SummaryTable {
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

fn quote(row: &[Value], position: usize) -> Result<f64, TseError> {
    let cell = row
        .get(position)
        .ok_or_else(|| TseError::parsing("currency quote", format!("missing field {position}")))?;
    match cell {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| TseError::parsing("currency quote", number.to_string())),
        Value::String(text) => text
            .replace(',', "")
            .trim()
            .parse()
            .map_err(|_| TseError::parsing("currency quote", format!("'{text}' is not a number"))),
        other => Err(TseError::parsing("currency quote", other.to_string())),
    }
}

/// Rows of the summary table: `[open, low, high, close, .., .., gregorian, jalali]`, with
/// thousands separators in the prices and `YYYY/MM/DD` dates. Newest rows come first.
pub fn parse_summary_table(body: &str) -> Result<Vec<CurrencyRow>, TseError> {
    let table: SummaryTable = serde_json::from_str(body)
        .map_err(|e| TseError::parsing("currency history", e.to_string()))?;
    table
        .data
        .iter()
        .map(|row| {
            let date = row
                .get(6)
                .and_then(Value::as_str)
                .and_then(calendar::to_gregorian)
                .ok_or_else(|| {
                    TseError::parsing("currency history", format!("bad date in {row:?}"))
                })?;
            Ok(CurrencyRow {
                date,
                open: quote(row, 0)?,
                low: quote(row, 1)?,
                high: quote(row, 2)?,
                close: quote(row, 3)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn parses_quotes_with_separators() {
        let rows = parse_summary_table(
            r#"{"data":[
                ["590,100","585,000","596,500","592,300","1,200","0.2%","2024/01/07","1402/10/17"],
                ["588,000","584,100","591,000","590,100","900","0.1%","2024/01/06","1402/10/16"]
            ]}"#,
        )
        .expect("well formed");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date!(2024 - 01 - 07));
        assert_eq!(rows[0].open, 590_100.0);
        assert_eq!(rows[0].low, 585_000.0);
        assert_eq!(rows[0].high, 596_500.0);
        assert_eq!(rows[0].close, 592_300.0);
    }

    #[test]
    fn rejects_rows_without_a_date() {
        let err = parse_summary_table(r#"{"data":[["1","1","1","1"]]}"#).expect_err("must fail");
        assert_eq!(err.code(), "tse.parse");
    }

    #[test]
    fn missing_data_is_empty() {
        assert!(parse_summary_table("{}").expect("well formed").is_empty());
    }
}
