use crate::common::ParsedTime;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;

static TIME_24H: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2}):(\d{2})(?:\.(\d{1,3}))?").expect("valid 24-hour pattern")
});

static TIME_12H: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,2}):(\d{2}):(\d{2})(?:\.(\d{1,3}))?\s*(AM|PM)")
        .expect("valid 12-hour pattern")
});

static MERIDIEM_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(AM|PM)").expect("valid meridiem pattern"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Turns noisy OCR text from a clock region into a time of day.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampParser;

impl TimestampParser {
    pub fn new() -> Self {
        Self
    }

    /// Never fails: text that matches no known format yields `ParsedTime::Invalid`.
    pub fn parse(&self, ocr_text: &str) -> ParsedTime {
        let cleaned = Self::normalize(ocr_text);

        if let Some(parsed) = Self::match_24h(&cleaned) {
            return parsed;
        }
        if let Some(parsed) = Self::match_12h(&cleaned) {
            return parsed;
        }
        if let Some(parsed) = Self::match_date_time(&cleaned) {
            return parsed;
        }

        warn!(
            "Failed to parse timestamp: {:?} (cleaned: {:?})",
            ocr_text, cleaned
        );
        ParsedTime::Invalid
    }

    /// Applies the fixed misread corrections in order: `|` to `:`, `O` to `0`,
    /// `l` and `I` to `1`, then collapses whitespace runs.
    pub fn normalize(ocr_text: &str) -> String {
        let corrected = ocr_text
            .trim()
            .replace('|', ":")
            .replace('O', "0")
            .replace(['l', 'I'], "1");
        WHITESPACE.replace_all(&corrected, " ").into_owned()
    }

    fn match_24h(cleaned: &str) -> Option<ParsedTime> {
        let captures = TIME_24H.captures(cleaned)?;
        let whole = captures.get(0)?;
        // A trailing meridiem belongs to the 12-hour format.
        if MERIDIEM_SUFFIX.is_match(&cleaned[whole.end()..]) {
            return None;
        }
        let (hours, minutes, seconds, millis) = Self::components(&captures)?;
        Self::valid(hours, minutes, seconds, millis)
    }

    fn match_12h(cleaned: &str) -> Option<ParsedTime> {
        let captures = TIME_12H.captures(cleaned)?;
        let (hours, minutes, seconds, millis) = Self::components(&captures)?;
        let is_pm = captures.get(5)?.as_str().eq_ignore_ascii_case("PM");

        // A 24-hour reading with a stray meridiem keeps its hour.
        let hours = match (is_pm, hours) {
            (_, h) if h > 12 => h,
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, 12) => 0,
            (false, h) => h,
        };
        Self::valid(hours, minutes, seconds, millis)
    }

    fn valid(hours: u32, minutes: u32, seconds: u32, millis: u32) -> Option<ParsedTime> {
        Some(ParsedTime::from_hms_milli(hours, minutes, seconds, millis)).filter(ParsedTime::is_valid)
    }

    fn match_date_time(cleaned: &str) -> Option<ParsedTime> {
        if let Ok(instant) = DateTime::parse_from_rfc3339(cleaned) {
            return Some(instant.naive_local().time().into());
        }
        if let Ok(instant) = DateTime::parse_from_rfc2822(cleaned) {
            return Some(instant.naive_local().time().into());
        }
        for format in DATE_TIME_FORMATS {
            if let Ok(instant) = NaiveDateTime::parse_from_str(cleaned, format) {
                return Some(instant.time().into());
            }
        }
        for format in DATE_FORMATS {
            if NaiveDate::parse_from_str(cleaned, format).is_ok() {
                return Some(NaiveTime::MIN.into());
            }
        }
        None
    }

    fn components(captures: &Captures<'_>) -> Option<(u32, u32, u32, u32)> {
        let hours = captures.get(1)?.as_str().parse().ok()?;
        let minutes = captures.get(2)?.as_str().parse().ok()?;
        let seconds = captures.get(3)?.as_str().parse().ok()?;
        let millis = match captures.get(4) {
            Some(fraction) => format!("{:0<3}", fraction.as_str()).parse().ok()?,
            None => 0,
        };
        Some((hours, minutes, seconds, millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn parse(text: &str) -> ParsedTime {
        TimestampParser::new().parse(text)
    }

    #[test]
    fn parses_24_hour_times_exactly() {
        for (h, m, s, ms) in [(0, 0, 0, 0), (9, 5, 7, 42), (13, 59, 59, 999), (23, 0, 1, 100)] {
            let text = format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms);
            assert_eq!(parse(&text), ParsedTime::from_hms_milli(h, m, s, ms), "{}", text);
        }
    }

    #[test]
    fn missing_or_short_milliseconds_are_padded() {
        assert_eq!(parse("10:20:30"), ParsedTime::from_hms_milli(10, 20, 30, 0));
        assert_eq!(parse("10:20:30.5"), ParsedTime::from_hms_milli(10, 20, 30, 500));
        assert_eq!(parse("10:20:30.05"), ParsedTime::from_hms_milli(10, 20, 30, 50));
        assert_eq!(parse("7:20:30"), ParsedTime::from_hms_milli(7, 20, 30, 0));
    }

    #[test]
    fn applies_12_hour_rules() {
        assert_eq!(parse("12:30:45 PM").time().map(|t| t.hour()), Some(12));
        assert_eq!(parse("12:30:45 PM").seconds_of_day(), Some(12 * 3600 + 30 * 60 + 45));
        assert_eq!(parse("12:30:45 AM").seconds_of_day(), Some(30 * 60 + 45));
        assert_eq!(parse("01:15:00 PM").seconds_of_day(), Some(13 * 3600 + 15 * 60));
        assert_eq!(parse("01:15:00.25pm"), ParsedTime::from_hms_milli(13, 15, 0, 250));
    }

    #[test]
    fn meridiem_after_a_24_hour_reading_is_ignored() {
        assert_eq!(parse("13:00:00 PM"), ParsedTime::from_hms_milli(13, 0, 0, 0));
        assert_eq!(parse("23:59:59.5 am"), ParsedTime::from_hms_milli(23, 59, 59, 500));
        assert_eq!(parse("25:00:00 PM"), ParsedTime::Invalid);
    }

    #[test]
    fn corrects_common_misreads() {
        assert_eq!(parse(" 1O|2O|3O "), ParsedTime::from_hms_milli(10, 20, 30, 0));
        assert_eq!(parse("l2:0I:00"), ParsedTime::from_hms_milli(12, 1, 0, 0));
        assert_eq!(parse("Clock:   10:00:05.120"), ParsedTime::from_hms_milli(10, 0, 5, 120));
    }

    #[test]
    fn seeded_noise_input_follows_literal_replacement_order() {
        assert_eq!(TimestampParser::normalize("O1|15I00"), "01:15100");
        assert_eq!(parse("O1|15I00"), ParsedTime::Invalid);
    }

    #[test]
    fn normalization_collapses_whitespace() {
        assert_eq!(TimestampParser::normalize("  10 \t 20\n30  "), "10 20 30");
    }

    #[test]
    fn falls_back_to_calendar_formats() {
        assert_eq!(
            parse("2024-03-01T08:09:10.250Z"),
            ParsedTime::from_hms_milli(8, 9, 10, 250)
        );
        assert_eq!(parse("2024-03-01"), ParsedTime::from_hms_milli(0, 0, 0, 0));
        assert_eq!(parse("2024-03-01 08:09"), ParsedTime::from_hms_milli(8, 9, 0, 0));
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(parse("not a time"), ParsedTime::Invalid);
        assert_eq!(parse(""), ParsedTime::Invalid);
        assert_eq!(parse("99:99:99"), ParsedTime::Invalid);
    }
}
