use time::Date;

use crate::calendar;
use crate::domain::Dated;
use crate::ValidationError;

/// Row window applied to a chronological daily series.
///
/// A non-zero `limit` wins over the date bounds and keeps the trailing rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeriesWindow {
    pub limit: usize,
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl SeriesWindow {
    pub const fn all() -> Self {
        Self {
            limit: 0,
            start: None,
            end: None,
        }
    }

    pub const fn last(limit: usize) -> Self {
        Self {
            limit,
            start: None,
            end: None,
        }
    }

    pub const fn between(start: Option<Date>, end: Option<Date>) -> Self {
        Self {
            limit: 0,
            start,
            end,
        }
    }

    /// Builds a window from user input in either calendar. A Gregorian `YYYY-MM` bound
    /// stands for the first day of that month as a start and its last day as an end.
    ///
    /// When any date bound is given the row limit is cleared, so a request for
    /// "the last 10 rows since 1402-01-01" returns everything since that date.
    pub fn from_request(
        limit: usize,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let start = start
            .map(|value| bound(value, |(first, _)| first))
            .transpose()?;
        let end = end.map(|value| bound(value, |(_, last)| last)).transpose()?;
        if start.is_some() || end.is_some() {
            return Ok(Self::between(start, end));
        }
        Ok(Self::last(limit))
    }

    pub fn apply<T: Dated>(&self, rows: Vec<T>) -> Vec<T> {
        filter(rows, self.limit, self.start, self.end)
    }
}

fn bound(value: &str, pick: fn((Date, Date)) -> Date) -> Result<Date, ValidationError> {
    match calendar::month_span(value) {
        Some(span) => Ok(pick(span)),
        None => calendar::parse_date(value),
    }
}

/// Trims a chronological series to its trailing `limit` rows, or to the inclusive
/// `[start, end]` range when `limit` is zero. Open bounds are unbounded.
pub fn filter<T: Dated>(
    mut rows: Vec<T>,
    limit: usize,
    start: Option<Date>,
    end: Option<Date>,
) -> Vec<T> {
    if limit != 0 {
        let skip = rows.len().saturating_sub(limit);
        return rows.split_off(skip);
    }

    rows.retain(|row| {
        let date = row.date();
        start.map_or(true, |start| date >= start) && end.map_or(true, |end| date <= end)
    });
    rows
}

#[cfg(test)]
mod tests {
    use time::macros::date;
    use time::Duration;

    use super::*;
    use crate::domain::ShareChange;

    fn series(days: i64) -> Vec<ShareChange> {
        (0..days)
            .map(|offset| ShareChange {
                date: date!(2024 - 01 - 01) + Duration::days(offset),
                old_shares: offset as u64,
                new_shares: offset as u64,
            })
            .collect()
    }

    #[test]
    fn limit_keeps_trailing_rows_and_ignores_dates() {
        let rows = filter(series(10), 3, Some(date!(2024 - 01 - 01)), None);
        let kept: Vec<u64> = rows.iter().map(|r| r.old_shares).collect();
        assert_eq!(kept, vec![7, 8, 9]);
    }

    #[test]
    fn limit_larger_than_series_keeps_everything() {
        assert_eq!(filter(series(4), 10, None, None).len(), 4);
    }

    #[test]
    fn limit_is_idempotent() {
        let once = filter(series(20), 5, None, None);
        let twice = filter(once.clone(), 5, None, None);
        assert_eq!(once, twice);
    }

    #[test]
    fn date_range_is_inclusive() {
        let rows = filter(
            series(10),
            0,
            Some(date!(2024 - 01 - 03)),
            Some(date!(2024 - 01 - 05)),
        );
        let kept: Vec<u64> = rows.iter().map(|r| r.old_shares).collect();
        assert_eq!(kept, vec![2, 3, 4]);
    }

    #[test]
    fn open_ended_bounds() {
        assert_eq!(filter(series(10), 0, Some(date!(2024 - 01 - 08)), None).len(), 3);
        assert_eq!(filter(series(10), 0, None, Some(date!(2024 - 01 - 02))).len(), 2);
        assert_eq!(filter(series(10), 0, None, None).len(), 10);
    }

    #[test]
    fn request_dates_clear_the_limit() {
        let window = SeriesWindow::from_request(5, Some("1402-10-11"), None).expect("valid");
        assert_eq!(window.limit, 0);
        assert_eq!(window.start, Some(date!(2024 - 01 - 01)));

        let window = SeriesWindow::from_request(5, None, None).expect("valid");
        assert_eq!(window, SeriesWindow::last(5));
    }

    #[test]
    fn month_bounds_cover_the_whole_month() {
        let window =
            SeriesWindow::from_request(0, Some("2024-01"), Some("2024-02")).expect("month bounds");
        assert_eq!(
            window,
            SeriesWindow::between(Some(date!(2024 - 01 - 01)), Some(date!(2024 - 02 - 29)))
        );
        assert_eq!(window.apply(series(70)).len(), 60);
    }

    #[test]
    fn request_rejects_unparseable_dates() {
        let err = SeriesWindow::from_request(0, Some("someday"), None).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }
}
