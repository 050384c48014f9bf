//! Back-adjustment of daily prices for capital actions.
//!
//! TSETMC publishes, for every session, the reference price the exchange used after any
//! split, rights issue or dividend. When that reference differs from the previous
//! session's final price, everything before that session is scaled by the ratio. The
//! product of all later ratios gives each row its coefficient; the latest row is the
//! anchor with coefficient 1.

use serde::Serialize;

use crate::domain::PriceRow;

/// Reference price TSETMC reports when it has no real value for the previous session.
pub const REFERENCE_SENTINEL: f64 = 1000.0;

/// A raw row together with its adjustment coefficient and adjusted values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjustedRow {
    pub raw: PriceRow,
    pub coefficient: f64,
    pub open: i64,
    pub high: i64,
    pub low: i64,
    pub close: i64,
    pub final_close: i64,
    pub volume: u64,
}

/// Replaces 0 and sentinel reference prices with the previous row's final price.
/// The first row has no predecessor and keeps whatever it reported.
pub fn correct_yesterday_reference(rows: &mut [PriceRow]) {
    for position in 1..rows.len() {
        let reference = rows[position].yesterday_reference;
        if reference == 0.0 || reference == REFERENCE_SENTINEL {
            rows[position].yesterday_reference = rows[position - 1].final_close;
        }
    }
}

/// Day-over-day ratios `reference[i + 1] / final[i]`, 1 for the latest row.
///
/// A ratio that is not a finite positive number (zero final price, missing reference)
/// is treated as 1 so the coefficient carries over unchanged.
pub fn ratios(rows: &[PriceRow]) -> Vec<f64> {
    let mut ratios = vec![1.0; rows.len()];
    for position in 0..rows.len().saturating_sub(1) {
        let ratio = rows[position + 1].yesterday_reference / rows[position].final_close;
        if ratio.is_finite() && ratio > 0.0 {
            ratios[position] = ratio;
        }
    }
    ratios
}

/// Reverse cumulative product of the ratios.
pub fn coefficients(rows: &[PriceRow]) -> Vec<f64> {
    let mut coefficients = ratios(rows);
    let mut running = 1.0;
    for coefficient in coefficients.iter_mut().rev() {
        running *= *coefficient;
        *coefficient = running;
    }
    coefficients
}

/// Adjusts a chronological price history. Prices are truncated toward zero.
pub fn adjust(mut rows: Vec<PriceRow>) -> Vec<AdjustedRow> {
    correct_yesterday_reference(&mut rows);
    let coefficients = coefficients(&rows);

    rows.into_iter()
        .zip(coefficients)
        .map(|(raw, coefficient)| {
            let volume_coefficient = 1.0 / coefficient;
            AdjustedRow {
                open: (raw.open * coefficient) as i64,
                high: (raw.high * coefficient) as i64,
                low: (raw.low * coefficient) as i64,
                close: (raw.close * coefficient) as i64,
                final_close: (raw.final_close * coefficient) as i64,
                volume: (raw.volume as f64 * volume_coefficient) as u64,
                coefficient,
                raw,
            }
        })
        .collect()
}
