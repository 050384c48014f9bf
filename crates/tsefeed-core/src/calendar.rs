//! Jalali (Solar Hijri) calendar support and flexible date-string parsing.
//!
//! Conversions use the break-year table of the astronomical Jalali calendar and go
//! through Julian day numbers, so they agree with the official calendar for every year
//! between -61 and 3177.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Serialize, Serializer};
use time::macros::offset;
use time::{Date, Month, OffsetDateTime, UtcOffset, Weekday};

use crate::ValidationError;

/// Jalali years at which the 33-year leap cycle shifts.
const BREAKS: [i32; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// Iran Standard Time. Daylight saving was abolished in 2022.
pub const TEHRAN_OFFSET: UtcOffset = offset!(+3:30);

/// A validated date in the Jalali calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JalaliDate {
    year: i32,
    month: u8,
    day: u8,
}

struct YearInfo {
    gregorian_year: i32,
    march_day: u8,
    leap: i32,
}

fn year_info(year: i32) -> Option<YearInfo> {
    if year < BREAKS[0] || year >= BREAKS[BREAKS.len() - 1] {
        return None;
    }

    let gregorian_year = year + 621;
    let mut leap_j = -14;
    let mut jp = BREAKS[0];
    let mut jump = 0;
    for &jm in &BREAKS[1..] {
        jump = jm - jp;
        if year < jm {
            break;
        }
        leap_j += jump / 33 * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = year - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gregorian_year / 4 - (gregorian_year / 100 + 1) * 3 / 4 - 150;
    let march_day = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Some(YearInfo {
        gregorian_year,
        march_day: u8::try_from(march_day).ok()?,
        leap,
    })
}

fn nowruz_julian_day(info: &YearInfo) -> Option<i32> {
    Date::from_calendar_date(info.gregorian_year, Month::March, info.march_day)
        .ok()
        .map(Date::to_julian_day)
}

impl JalaliDate {
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidJalaliDate { year, month, day };
        if !(1..=12).contains(&month) || day == 0 {
            return Err(invalid());
        }
        let length = Self::month_length(year, month).ok_or_else(invalid)?;
        if day > length {
            return Err(invalid());
        }
        Ok(Self { year, month, day })
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u8 {
        self.month
    }

    pub const fn day(self) -> u8 {
        self.day
    }

    /// Returns `None` outside the supported year range.
    pub fn is_leap_year(year: i32) -> Option<bool> {
        year_info(year).map(|info| info.leap == 0)
    }

    pub fn month_length(year: i32, month: u8) -> Option<u8> {
        let leap = Self::is_leap_year(year)?;
        match month {
            1..=6 => Some(31),
            7..=11 => Some(30),
            12 if leap => Some(30),
            12 => Some(29),
            _ => None,
        }
    }

    pub fn from_gregorian(date: Date) -> Result<Self, ValidationError> {
        let out_of_range = || ValidationError::InvalidDate {
            value: date.to_string(),
        };
        let julian_day = date.to_julian_day();
        let mut year = date.year() - 621;
        let info = year_info(year).ok_or_else(out_of_range)?;
        let first_day = nowruz_julian_day(&info).ok_or_else(out_of_range)?;

        let mut k = julian_day - first_day;
        if k >= 0 {
            if k <= 185 {
                return Self::new(year, (1 + k / 31) as u8, (k % 31 + 1) as u8);
            }
            k -= 186;
        } else {
            year -= 1;
            k += 179;
            if info.leap == 1 {
                k += 1;
            }
        }
        Self::new(year, (7 + k / 30) as u8, (k % 30 + 1) as u8)
    }

    pub fn to_gregorian(self) -> Result<Date, ValidationError> {
        let invalid = || ValidationError::InvalidJalaliDate {
            year: self.year,
            month: self.month,
            day: self.day,
        };
        let info = year_info(self.year).ok_or_else(invalid)?;
        let first_day = nowruz_julian_day(&info).ok_or_else(invalid)?;
        let month = i32::from(self.month);
        let julian_day =
            first_day + (month - 1) * 31 - month / 7 * (month - 7) + i32::from(self.day) - 1;
        Date::from_julian_day(julian_day).map_err(|_| invalid())
    }

    /// `YYYY/MM/DD`, the separator used by Iranian market sites.
    pub fn to_slashed(self) -> String {
        format!("{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

impl Display for JalaliDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl Serialize for JalaliDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for JalaliDate {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_jalali(value)
    }
}

/// Maps Persian and Arabic-Indic digits to ASCII and drops surrounding whitespace.
pub fn normalize_digits(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| match ch {
            '۰'..='۹' => char::from(b'0' + (ch as u32 - '۰' as u32) as u8),
            '٠'..='٩' => char::from(b'0' + (ch as u32 - '٠' as u32) as u8),
            other => other,
        })
        .collect()
}

fn split_date(value: &str) -> Option<(String, String, String)> {
    let mut text = normalize_digits(value).replace('/', "-");
    if !text.contains('-') {
        if text.len() != 8 || !text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        text = format!("{}-{}-{}", &text[..4], &text[4..6], &text[6..]);
    }
    let mut parts = text.split('-');
    let year = parts.next()?.trim().to_owned();
    let month = parts.next()?.trim().to_owned();
    let day = parts.next()?.trim().to_owned();
    if parts.next().is_some() {
        return None;
    }
    Some((year, month, day))
}

/// Parses a user-supplied date that may be written in either calendar.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD` and `YYYYMMDD`. A year starting with 13, 14 or 15
/// is read as Jalali. Anything unparseable yields `None`.
pub fn to_gregorian(value: &str) -> Option<Date> {
    let (year, month, day) = split_date(value)?;
    let jalali = ["13", "14", "15"].iter().any(|prefix| year.starts_with(prefix));
    let year: i32 = year.parse().ok()?;
    let month: u8 = month.parse().ok()?;
    let day: u8 = day.parse().ok()?;

    if jalali {
        JalaliDate::new(year, month, day).ok()?.to_gregorian().ok()
    } else {
        Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()
    }
}

/// First and last day of a Gregorian month written `YYYY-MM` or `YYYY/MM`.
pub fn month_span(value: &str) -> Option<(Date, Date)> {
    let text = normalize_digits(value).replace('/', "-");
    let (year, month) = text.split_once('-')?;
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if year.len() != 4 || month.len() > 2 || !digits(year) || !digits(month) {
        return None;
    }
    if ["13", "14", "15"].iter().any(|prefix| year.starts_with(prefix)) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let next = match month {
        Month::December => Date::from_calendar_date(year + 1, Month::January, 1).ok()?,
        _ => Date::from_calendar_date(year, month.next(), 1).ok()?,
    };
    Some((first, next.previous_day()?))
}

/// Like [`to_gregorian`] but reports the offending input.
pub fn parse_date(value: &str) -> Result<Date, ValidationError> {
    to_gregorian(value).ok_or_else(|| ValidationError::InvalidDate {
        value: value.to_owned(),
    })
}

/// Formats a Gregorian date as a Jalali `YYYY/MM/DD` string.
pub fn to_jalali_string(date: Date) -> Result<String, ValidationError> {
    JalaliDate::from_gregorian(date).map(JalaliDate::to_slashed)
}

/// Parses a Jalali date. Two-digit years below 80 land in the 1400s, others in the 1300s.
pub fn parse_jalali(value: &str) -> Result<JalaliDate, ValidationError> {
    let invalid = || ValidationError::InvalidDate {
        value: value.to_owned(),
    };
    let (year_text, month, day) = split_date(value).ok_or_else(invalid)?;
    let mut year: i32 = year_text.parse().map_err(|_| invalid())?;
    if year_text.len() <= 2 {
        year += if year < 80 { 1400 } else { 1300 };
    }
    let month: u8 = month.parse().map_err(|_| invalid())?;
    let day: u8 = day.parse().map_err(|_| invalid())?;
    JalaliDate::new(year, month, day)
}

pub const fn weekday_en(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
        Weekday::Friday => "Friday",
        Weekday::Saturday => "Saturday",
        Weekday::Sunday => "Sunday",
    }
}

pub const fn weekday_fa(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "دوشنبه",
        Weekday::Tuesday => "سه شنبه",
        Weekday::Wednesday => "چهارشنبه",
        Weekday::Thursday => "پنجشنبه",
        Weekday::Friday => "جمعه",
        Weekday::Saturday => "شنبه",
        Weekday::Sunday => "یکشنبه",
    }
}

/// Thursday and Friday make up the Iranian market weekend.
pub const fn is_trading_day(weekday: Weekday) -> bool {
    !matches!(weekday, Weekday::Thursday | Weekday::Friday)
}

/// Current calendar date in Tehran.
pub fn tehran_today() -> Date {
    OffsetDateTime::now_utc().to_offset(TEHRAN_OFFSET).date()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn converts_known_dates_both_ways() {
        let cases = [
            (JalaliDate::new(1404, 11, 6).expect("valid"), date!(2026 - 01 - 26)),
            (JalaliDate::new(1401, 10, 1).expect("valid"), date!(2022 - 12 - 22)),
            (JalaliDate::new(1403, 1, 1).expect("valid"), date!(2024 - 03 - 20)),
            (JalaliDate::new(1402, 1, 1).expect("valid"), date!(2023 - 03 - 21)),
            (JalaliDate::new(1402, 12, 29).expect("valid"), date!(2024 - 03 - 19)),
        ];

        for (jalali, gregorian) in cases {
            assert_eq!(jalali.to_gregorian().expect("convertible"), gregorian);
            assert_eq!(JalaliDate::from_gregorian(gregorian).expect("in range"), jalali);
        }
    }

    #[test]
    fn leap_years_follow_the_33_year_cycle() {
        assert_eq!(JalaliDate::is_leap_year(1399), Some(true));
        assert_eq!(JalaliDate::is_leap_year(1403), Some(true));
        assert_eq!(JalaliDate::is_leap_year(1402), Some(false));
        assert_eq!(JalaliDate::month_length(1403, 12), Some(30));
        assert_eq!(JalaliDate::month_length(1402, 12), Some(29));
        assert!(JalaliDate::new(1402, 12, 30).is_err());
        assert!(JalaliDate::new(1403, 12, 30).is_ok());
    }

    #[test]
    fn to_gregorian_accepts_both_calendars_and_layouts() {
        assert_eq!(to_gregorian("1401-10-01"), Some(date!(2022 - 12 - 22)));
        assert_eq!(to_gregorian("14011001"), Some(date!(2022 - 12 - 22)));
        assert_eq!(to_gregorian("1401/10/01"), Some(date!(2022 - 12 - 22)));
        assert_eq!(to_gregorian("۱۴۰۱/۱۰/۰۱"), Some(date!(2022 - 12 - 22)));
        assert_eq!(to_gregorian("2022-12-22"), Some(date!(2022 - 12 - 22)));
        assert_eq!(to_gregorian("20221222"), Some(date!(2022 - 12 - 22)));
    }

    #[test]
    fn to_gregorian_swallows_garbage() {
        assert_eq!(to_gregorian(""), None);
        assert_eq!(to_gregorian("yesterday"), None);
        assert_eq!(to_gregorian("1401-13-01"), None);
        assert_eq!(to_gregorian("2022-02-30"), None);
    }

    #[test]
    fn month_span_covers_whole_gregorian_months() {
        assert_eq!(
            month_span("2022-12"),
            Some((date!(2022 - 12 - 01), date!(2022 - 12 - 31)))
        );
        assert_eq!(
            month_span("2024/2"),
            Some((date!(2024 - 02 - 01), date!(2024 - 02 - 29)))
        );
        assert_eq!(month_span("2024-13"), None);
        assert_eq!(month_span("1402-10"), None);
        assert_eq!(month_span("2024-01-06"), None);
    }

    #[test]
    fn jalali_string_round_trips_through_to_gregorian() {
        let mut day = date!(2019 - 01 - 01);
        while day <= date!(2027 - 12 - 31) {
            let text = to_jalali_string(day).expect("in range");
            assert_eq!(to_gregorian(&text), Some(day), "{text}");
            day = day.next_day().expect("not the last representable day");
        }
    }

    #[test]
    fn two_digit_jalali_years_are_expanded() {
        assert_eq!(
            parse_jalali("02/01/15").expect("parses"),
            JalaliDate::new(1402, 1, 15).expect("valid")
        );
        assert_eq!(
            parse_jalali("99/12/30").expect("parses"),
            JalaliDate::new(1399, 12, 30).expect("valid")
        );
    }

    #[test]
    fn weekday_names() {
        let day = date!(2022 - 12 - 22);
        assert_eq!(weekday_en(day.weekday()), "Thursday");
        assert_eq!(weekday_fa(day.weekday()), "پنجشنبه");
        assert!(!is_trading_day(day.weekday()));
        assert!(is_trading_day(Weekday::Saturday));
    }

    #[test]
    fn display_uses_iso_layout() {
        let day = JalaliDate::new(1402, 1, 5).expect("valid");
        assert_eq!(day.to_string(), "1402-01-05");
        assert_eq!(day.to_slashed(), "1402/01/05");
    }
}
