use chrono::{NaiveTime, Timelike};
use std::fmt;

/// A clock reading recovered from OCR text.
///
/// Only the time of day is meaningful; the date the clock was showing is
/// never read. `Invalid` marks a reading that could not be parsed or could
/// not be anchored to a second boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedTime {
    Valid(NaiveTime),
    Invalid,
}

impl ParsedTime {
    pub fn from_hms_milli(hour: u32, minute: u32, second: u32, milli: u32) -> Self {
        NaiveTime::from_hms_milli_opt(hour, minute, second, milli)
            .map(ParsedTime::Valid)
            .unwrap_or(ParsedTime::Invalid)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedTime::Valid(_))
    }

    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            ParsedTime::Valid(time) => Some(*time),
            ParsedTime::Invalid => None,
        }
    }

    /// Whole seconds since midnight, ignoring milliseconds.
    pub fn seconds_of_day(&self) -> Option<u32> {
        self.time()
            .map(|t| t.hour() * 3600 + t.minute() * 60 + t.second())
    }

    pub fn millisecond(&self) -> Option<u32> {
        self.time().map(|t| (t.nanosecond() / 1_000_000).min(999))
    }

    /// Same second, new millisecond. Values above 999 are clamped.
    pub fn with_millisecond(&self, milli: u32) -> Self {
        match self {
            ParsedTime::Valid(t) => {
                ParsedTime::from_hms_milli(t.hour(), t.minute(), t.second(), milli.min(999))
            }
            ParsedTime::Invalid => ParsedTime::Invalid,
        }
    }

    /// Milliseconds since midnight.
    pub fn total_millis(&self) -> Option<i64> {
        match (self.seconds_of_day(), self.millisecond()) {
            (Some(seconds), Some(milli)) => Some(i64::from(seconds) * 1000 + i64::from(milli)),
            _ => None,
        }
    }

    /// `self - earlier` in milliseconds, when both readings are valid.
    pub fn millis_since(&self, earlier: &ParsedTime) -> Option<i64> {
        Some(self.total_millis()? - earlier.total_millis()?)
    }
}

impl From<NaiveTime> for ParsedTime {
    fn from(time: NaiveTime) -> Self {
        ParsedTime::Valid(time)
    }
}

impl fmt::Display for ParsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedTime::Valid(time) => write!(f, "{}", time.format("%H:%M:%S%.3f")),
            ParsedTime::Invalid => write!(f, "Skipped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_components_are_invalid() {
        assert_eq!(ParsedTime::from_hms_milli(24, 0, 0, 0), ParsedTime::Invalid);
        assert_eq!(ParsedTime::from_hms_milli(10, 61, 0, 0), ParsedTime::Invalid);
    }

    #[test]
    fn millisecond_replacement_keeps_the_second() {
        let time = ParsedTime::from_hms_milli(1, 2, 3, 400);
        let updated = time.with_millisecond(660);
        assert_eq!(updated.seconds_of_day(), Some(3723));
        assert_eq!(updated.millisecond(), Some(660));
        assert_eq!(time.with_millisecond(1000).millisecond(), Some(999));
        assert_eq!(ParsedTime::Invalid.with_millisecond(5), ParsedTime::Invalid);
    }

    #[test]
    fn difference_requires_two_valid_readings() {
        let capture = ParsedTime::from_hms_milli(12, 0, 0, 900);
        let viewer = ParsedTime::from_hms_milli(12, 0, 1, 50);
        assert_eq!(viewer.millis_since(&capture), Some(150));
        assert_eq!(viewer.millis_since(&ParsedTime::Invalid), None);
    }

    #[test]
    fn display_matches_report_format() {
        assert_eq!(ParsedTime::from_hms_milli(9, 5, 7, 42).to_string(), "09:05:07.042");
        assert_eq!(ParsedTime::Invalid.to_string(), "Skipped");
    }
}
