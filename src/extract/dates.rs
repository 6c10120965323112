//! Date coercion for the day zero heading and the stats banner
//!
//! The dashboard shows dates without a time of day. They are pinned to
//! midnight in Africa/Johannesburg, which is UTC+2 all year.

use crate::extract::text::clean;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

const SAST_OFFSET_SECS: i32 = 2 * 3600;

const STATS_PREFIX: &str = "STATS AS AT WEEK ";

const MONTHS: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// Resolves an English month name, ignoring case and surrounding whitespace
///
/// Returns the month number (1-12), or `None` for anything else.
pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.trim().to_uppercase();
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|index| index as u32 + 1)
}

/// Midnight on the given day in South African Standard Time
pub fn sast_midnight(year: i32, month: u32, day: u32) -> Result<DateTime<FixedOffset>, String> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("no midnight on {}", date))?;
    let offset = FixedOffset::east_opt(SAST_OFFSET_SECS)
        .ok_or_else(|| "invalid SAST offset".to_string())?;

    offset
        .from_local_datetime(&midnight)
        .single()
        .ok_or_else(|| format!("ambiguous local time {}", midnight))
}

/// Parses the compact day zero heading, e.g. `12 04 2018` or `12042018`
///
/// All whitespace is removed first. The first two characters are the day,
/// the next two the month and the four after that the year.
pub fn parse_day_zero(heading: &str) -> Result<DateTime<FixedOffset>, String> {
    let compact: Vec<char> = heading.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.len() < 8 {
        return Err(format!(
            "heading '{}' is too short for a DDMMYYYY date",
            clean(heading)
        ));
    }

    let day = parse_component(&compact[0..2], "day")?;
    let month = parse_component(&compact[2..4], "month")?;
    let year = parse_component(&compact[4..8], "year")?;

    sast_midnight(year as i32, month, day)
}

/// Parses the stats banner, e.g. `STATS AS AT WEEK 22 JANUARY 2018`
pub fn parse_stats_as_at(banner: &str) -> Result<DateTime<FixedOffset>, String> {
    let banner = clean(banner);
    let rest = banner.strip_prefix(STATS_PREFIX).unwrap_or(&banner);

    let parts: Vec<&str> = rest.split(' ').collect();
    if parts.len() != 3 {
        return Err(format!(
            "expected '<day> <month> <year>', got '{}'",
            rest
        ));
    }

    let day = parts[0]
        .parse::<u32>()
        .map_err(|e| format!("invalid day '{}': {}", parts[0], e))?;
    let month =
        month_from_name(parts[1]).ok_or_else(|| format!("unknown month '{}'", parts[1]))?;
    let year = parts[2]
        .parse::<i32>()
        .map_err(|e| format!("invalid year '{}': {}", parts[2], e))?;

    sast_midnight(year, month, day)
}

fn parse_component(chars: &[char], name: &str) -> Result<u32, String> {
    let text: String = chars.iter().collect();
    text.parse::<u32>()
        .map_err(|e| format!("invalid {} '{}': {}", name, text, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_month_from_name() {
        let cases = [
            ("JANUARY", 1),
            ("march", 3),
            ("  May ", 5),
            ("September", 9),
            ("DECEMBER", 12),
        ];
        for (name, want) in cases {
            assert_eq!(month_from_name(name), Some(want), "month {}", name);
        }
    }

    #[test]
    fn test_month_from_name_covers_all_months() {
        for (index, name) in MONTHS.iter().enumerate() {
            assert_eq!(month_from_name(name), Some(index as u32 + 1));
            assert_eq!(month_from_name(&name.to_lowercase()), Some(index as u32 + 1));
        }
    }

    #[test]
    fn test_unknown_month_is_none() {
        assert_eq!(month_from_name("JANVIER"), None);
        assert_eq!(month_from_name("JAN"), None);
        assert_eq!(month_from_name(""), None);
    }

    #[test]
    fn test_parse_day_zero() {
        let date = parse_day_zero("12 04\n 2018").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2018, 4, 12));
        assert_eq!(date.to_rfc3339(), "2018-04-12T00:00:00+02:00");
    }

    #[test]
    fn test_parse_day_zero_too_short() {
        assert!(parse_day_zero("12 04 18").is_err());
    }

    #[test]
    fn test_parse_day_zero_non_numeric() {
        assert!(parse_day_zero("1a042018").is_err());
        assert!(parse_day_zero("DAY ZERO").is_err());
    }

    #[test]
    fn test_parse_day_zero_impossible_date() {
        assert!(parse_day_zero("31022018").is_err());
    }

    #[test]
    fn test_parse_stats_as_at() {
        let date = parse_stats_as_at("STATS AS AT WEEK 22 JANUARY 2018").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2018, 1, 22));
    }

    #[test]
    fn test_parse_stats_as_at_extra_whitespace() {
        let date = parse_stats_as_at("\n  STATS AS AT WEEK  5   march 2018 ").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2018, 3, 5));
    }

    #[test]
    fn test_parse_stats_as_at_wrong_token_count() {
        assert!(parse_stats_as_at("STATS AS AT WEEK 22 JANUARY").is_err());
        assert!(parse_stats_as_at("STATS AS AT WEEK 22 JANUARY 2018 EXTRA").is_err());
    }

    #[test]
    fn test_parse_stats_as_at_unknown_month() {
        assert!(parse_stats_as_at("STATS AS AT WEEK 22 JANVIER 2018").is_err());
    }
}
