//! Intraday snapshot normalization and candle aggregation.

use std::collections::BTreeMap;

use time::{Date, Duration, PrimitiveDateTime, Time};

use crate::calendar::{self, JalaliDate};
use crate::domain::{Candle, Cell, CumulativeSnapshot, RowKey, Snapshot, Table, TradeTick};
use crate::ValidationError;

pub const DATETIME_INDEX: &str = "DateTime";

/// Turns cumulative counters into per-row increments.
///
/// The first value is kept as is. A counter that goes backwards yields 0, never a
/// negative increment.
pub fn incremental(cumulative: &[u64]) -> Vec<u64> {
    let mut previous = None;
    cumulative
        .iter()
        .map(|&current| {
            let increment = match previous {
                None => current,
                Some(previous) => current.saturating_sub(previous),
            };
            previous = Some(current);
            increment
        })
        .collect()
}

/// Today's trades as snapshots: canceled and zero-price trades are dropped and the
/// rest ordered by trade number.
pub fn live_snapshots(day: Date, mut trades: Vec<TradeTick>) -> Vec<Snapshot> {
    trades.retain(|trade| !trade.canceled && trade.price > 0.0);
    trades.sort_by_key(|trade| trade.trade_no);
    trades
        .into_iter()
        .map(|trade| Snapshot {
            timestamp: PrimitiveDateTime::new(day, trade.time),
            price: trade.price,
            volume: trade.volume,
            trade_count: None,
            trade_no: Some(trade.trade_no),
        })
        .collect()
}

/// One past day's cumulative snapshots as incremental snapshots, ordered by time.
pub fn historical_snapshots(day: Date, mut snapshots: Vec<CumulativeSnapshot>) -> Vec<Snapshot> {
    snapshots.retain(|snapshot| snapshot.price > 0.0);
    snapshots.sort_by_key(|snapshot| snapshot.time);

    let volumes: Vec<u64> = snapshots.iter().map(|s| s.cumulative_volume).collect();
    let trades: Vec<u64> = snapshots.iter().map(|s| s.cumulative_trades).collect();

    snapshots
        .iter()
        .zip(incremental(&volumes))
        .zip(incremental(&trades))
        .map(|((snapshot, volume), trade_count)| Snapshot {
            timestamp: PrimitiveDateTime::new(day, snapshot.time),
            price: snapshot.price,
            volume,
            trade_count: Some(trade_count),
            trade_no: None,
        })
        .collect()
}

/// Calendar days in `[start, end]` that are not Thursday or Friday.
pub fn trading_days(start: Date, end: Date) -> Vec<Date> {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        if calendar::is_trading_day(day.weekday()) {
            days.push(day);
        }
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

/// Start of the clock-aligned bucket of `width_seconds` containing `timestamp`.
pub fn bucket_start(timestamp: PrimitiveDateTime, width_seconds: u32) -> PrimitiveDateTime {
    let time = timestamp.time();
    let seconds = u32::from(time.hour()) * 3_600
        + u32::from(time.minute()) * 60
        + u32::from(time.second());
    let floored = seconds - seconds % width_seconds.max(1);
    PrimitiveDateTime::new(
        timestamp.date(),
        Time::MIDNIGHT + Duration::seconds(i64::from(floored)),
    )
}

/// Folds snapshots into candles of `width_seconds`. Buckets without snapshots are not
/// emitted. Snapshots are folded in the order given.
pub fn resample(snapshots: &[Snapshot], width_seconds: u32) -> Vec<Candle> {
    let mut buckets: BTreeMap<PrimitiveDateTime, Candle> = BTreeMap::new();
    for snapshot in snapshots {
        let start = bucket_start(snapshot.timestamp, width_seconds);
        let price = snapshot.price as i64;
        buckets
            .entry(start)
            .and_modify(|candle| {
                candle.high = candle.high.max(price);
                candle.low = candle.low.min(price);
                candle.close = price;
                candle.volume += snapshot.volume;
                candle.trade_count += 1;
            })
            .or_insert(Candle {
                start,
                open: price,
                high: price,
                low: price,
                close: price,
                volume: snapshot.volume,
                trade_count: 1,
            });
    }
    buckets.into_values().collect()
}

pub fn candles_table(candles: &[Candle]) -> Result<Table, ValidationError> {
    let index = candles
        .iter()
        .map(|candle| RowKey::DateTime(candle.start))
        .collect();
    let column = |f: fn(&Candle) -> Cell| candles.iter().map(f).collect::<Vec<_>>();

    Table::new(DATETIME_INDEX, index)
        .with_column("Open", column(|c| Cell::Int(c.open)))?
        .with_column("High", column(|c| Cell::Int(c.high)))?
        .with_column("Low", column(|c| Cell::Int(c.low)))?
        .with_column("Close", column(|c| Cell::Int(c.close)))?
        .with_column("Volume", column(|c| Cell::from(c.volume)))?
        .with_column("TradeCount", column(|c| Cell::from(c.trade_count)))
}

/// Tick-level table. Live trades carry `TradeNo` and `J-Date`; historical snapshots carry
/// `TradeCount`.
pub fn ticks_table(snapshots: &[Snapshot], live: bool) -> Result<Table, ValidationError> {
    let index = snapshots
        .iter()
        .map(|snapshot| RowKey::DateTime(snapshot.timestamp))
        .collect();
    let optional = |value: Option<u64>| value.map_or(Cell::Null, Cell::from);
    let prices = snapshots.iter().map(|s| Cell::float(s.price)).collect();
    let volumes = snapshots.iter().map(|s| Cell::from(s.volume)).collect();

    let table = Table::new(DATETIME_INDEX, index);
    if live {
        let jalali_dates = snapshots
            .iter()
            .map(|s| {
                JalaliDate::from_gregorian(s.timestamp.date())
                    .map(|date| Cell::text(date.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        table
            .with_column("TradeNo", snapshots.iter().map(|s| optional(s.trade_no)).collect())?
            .with_column("Price", prices)?
            .with_column("Volume", volumes)?
            .with_column("J-Date", jalali_dates)
    } else {
        table
            .with_column("Price", prices)?
            .with_column("Volume", volumes)?
            .with_column(
                "TradeCount",
                snapshots.iter().map(|s| optional(s.trade_count)).collect(),
            )
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime, time};

    use super::*;

    fn snapshot(timestamp: PrimitiveDateTime, price: f64, volume: u64) -> Snapshot {
        Snapshot {
            timestamp,
            price,
            volume,
            trade_count: None,
            trade_no: None,
        }
    }

    #[test]
    fn cumulative_counters_become_increments() {
        assert_eq!(incremental(&[0, 100, 250, 250, 400]), vec![0, 100, 150, 0, 150]);
        assert_eq!(incremental(&[50, 40, 60]), vec![50, 0, 20]);
        assert!(incremental(&[]).is_empty());
    }

    #[test]
    fn one_minute_candles_from_three_snapshots() {
        let snapshots = vec![
            snapshot(datetime!(2024-01-06 09:00:05), 100.0, 10),
            snapshot(datetime!(2024-01-06 09:00:40), 105.0, 5),
            snapshot(datetime!(2024-01-06 09:01:10), 103.0, 7),
        ];
        let candles = resample(&snapshots, 60);

        assert_eq!(
            candles,
            vec![
                Candle {
                    start: datetime!(2024-01-06 09:00:00),
                    open: 100,
                    high: 105,
                    low: 100,
                    close: 105,
                    volume: 15,
                    trade_count: 2,
                },
                Candle {
                    start: datetime!(2024-01-06 09:01:00),
                    open: 103,
                    high: 103,
                    low: 103,
                    close: 103,
                    volume: 7,
                    trade_count: 1,
                },
            ]
        );
    }

    #[test]
    fn empty_buckets_are_dropped() {
        let snapshots = vec![
            snapshot(datetime!(2024-01-06 09:00:05), 100.0, 1),
            snapshot(datetime!(2024-01-06 09:20:00), 101.0, 1),
        ];
        let candles = resample(&snapshots, 300);
        let starts: Vec<_> = candles.iter().map(|c| c.start).collect();
        assert_eq!(
            starts,
            vec![datetime!(2024-01-06 09:00:00), datetime!(2024-01-06 09:20:00)]
        );
    }

    #[test]
    fn buckets_align_to_the_clock() {
        assert_eq!(
            bucket_start(datetime!(2024-01-06 12:29:59), 14_400),
            datetime!(2024-01-06 12:00:00)
        );
        assert_eq!(
            bucket_start(datetime!(2024-01-06 09:44:00), 1_800),
            datetime!(2024-01-06 09:30:00)
        );
    }

    #[test]
    fn live_trades_drop_canceled_and_sort_by_number() {
        let trade = |trade_no, price, canceled| TradeTick {
            trade_no,
            time: time!(09:00:00),
            volume: 10,
            price,
            canceled,
        };
        let snapshots = live_snapshots(
            date!(2024 - 01 - 06),
            vec![trade(3, 100.0, false), trade(1, 99.0, false), trade(2, 98.0, true), trade(4, 0.0, false)],
        );
        let numbers: Vec<_> = snapshots.iter().filter_map(|s| s.trade_no).collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[test]
    fn historical_snapshots_skip_zero_prices_before_differencing() {
        let raw = |time, price, volume, trades| CumulativeSnapshot {
            time,
            price,
            cumulative_volume: volume,
            cumulative_trades: trades,
        };
        let snapshots = historical_snapshots(
            date!(2024 - 01 - 06),
            vec![
                raw(time!(09:05:00), 101.0, 250, 3),
                raw(time!(09:00:00), 0.0, 0, 0),
                raw(time!(09:01:00), 100.0, 100, 1),
            ],
        );
        let volumes: Vec<_> = snapshots.iter().map(|s| s.volume).collect();
        let trades: Vec<_> = snapshots.iter().filter_map(|s| s.trade_count).collect();
        assert_eq!(volumes, vec![100, 150]);
        assert_eq!(trades, vec![1, 2]);
    }

    #[test]
    fn trading_days_skip_the_weekend() {
        // 2024-01-04 is a Thursday.
        let days = trading_days(date!(2024 - 01 - 03), date!(2024 - 01 - 07));
        assert_eq!(
            days,
            vec![date!(2024 - 01 - 03), date!(2024 - 01 - 06), date!(2024 - 01 - 07)]
        );
        assert!(trading_days(date!(2024 - 01 - 05), date!(2024 - 01 - 04)).is_empty());
    }

    #[test]
    fn live_tick_table_has_trade_numbers_and_jalali_date() {
        let mut tick = snapshot(datetime!(2024-01-06 09:00:05), 100.0, 10);
        tick.trade_no = Some(7);
        let table = ticks_table(&[tick], true).expect("consistent lengths");
        let fields: Vec<_> = table.columns().iter().map(|c| c.key.field.as_str()).collect();
        assert_eq!(fields, vec!["TradeNo", "Price", "Volume", "J-Date"]);
        assert_eq!(table.values("J-Date").expect("present")[0], Cell::text("1402-10-16"));
    }
}
