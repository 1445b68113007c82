//! Meeting-time model.
//!
//! A meeting is a set of weekdays plus a same-day `[start, end]` span on
//! the 24-hour clock. Catalog text such as `"9:30 am - 10:20 am"` is turned
//! into this form once, at load time; everything downstream compares plain
//! integers.
//!
//! # Overlap
//! Two meetings conflict when they share a day and neither ends strictly
//! before the other starts. Boundaries are inclusive: a class ending at
//! 10:00 conflicts with one starting at 10:00.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::HourConvention;
use crate::error::ParseError;

/// Catalog sentinel for "no fixed time".
pub const TBA: &str = "TBA";

const DAY_SYMBOLS: [char; 7] = ['M', 'T', 'W', 'R', 'F', 'S', 'U'];

/// A set of weekdays, one bit per symbol of `MTWRFSU`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct DayMask(u8);

impl DayMask {
    /// The empty set.
    pub const EMPTY: DayMask = DayMask(0);

    /// Parses a catalog day string such as `"MWF"` or `"TR"`.
    ///
    /// Whitespace is ignored and symbols are case-insensitive. Repeated
    /// symbols collapse.
    pub fn parse(days: &str) -> Result<Self, ParseError> {
        let mut bits = 0u8;
        for symbol in days.chars().filter(|c| !c.is_whitespace()) {
            let upper = symbol.to_ascii_uppercase();
            let position = DAY_SYMBOLS
                .iter()
                .position(|&d| d == upper)
                .ok_or_else(|| ParseError::UnknownDay {
                    symbol,
                    days: days.to_string(),
                })?;
            bits |= 1 << position;
        }
        Ok(DayMask(bits))
    }

    /// Whether the two sets share at least one day.
    #[inline]
    pub fn intersects(self, other: DayMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether no day is set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of days in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set contains the given symbol.
    pub fn contains(self, symbol: char) -> bool {
        DAY_SYMBOLS
            .iter()
            .position(|&d| d == symbol.to_ascii_uppercase())
            .is_some_and(|p| self.0 & (1 << p) != 0)
    }
}

impl fmt::Display for DayMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, symbol) in DAY_SYMBOLS.iter().enumerate() {
            if self.0 & (1 << position) != 0 {
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}

impl TryFrom<String> for DayMask {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DayMask::parse(&value)
    }
}

impl From<DayMask> for String {
    fn from(mask: DayMask) -> Self {
        mask.to_string()
    }
}

/// A wall-clock time on the 24-hour clock.
///
/// Ordering is lexicographic on `(hour, minute)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    /// Creates a time, or `None` if `hour > 23` or `minute > 59`.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    /// Strictly earlier than `other`.
    #[inline]
    pub fn is_before(&self, other: &TimeOfDay) -> bool {
        self < other
    }

    /// Strictly later than `other`.
    #[inline]
    pub fn is_after(&self, other: &TimeOfDay) -> bool {
        self > other
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// am / pm marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "am" => Some(Meridiem::Am),
            "pm" => Some(Meridiem::Pm),
            _ => None,
        }
    }
}

/// Converts a 12-hour clock hour to the 24-hour clock.
///
/// Under [`HourConvention::Legacy`] only pm hours below 12 move, so
/// `12 am` stays at 12.
pub fn to_24_hour(hour: u8, suffix: Meridiem, convention: HourConvention) -> u8 {
    match (convention, suffix) {
        (HourConvention::Legacy, Meridiem::Pm) if hour < 12 => hour + 12,
        (HourConvention::Legacy, _) => hour,
        (HourConvention::Standard, Meridiem::Am) if hour == 12 => 0,
        (HourConvention::Standard, Meridiem::Am) => hour,
        (HourConvention::Standard, Meridiem::Pm) if hour < 12 => hour + 12,
        (HourConvention::Standard, Meridiem::Pm) => hour,
    }
}

fn meeting_time_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(\d{1,2}):(\d{2})\s*([ap]m)\s*-\s*(\d{1,2}):(\d{2})\s*([ap]m)\s*$")
            .expect("meeting time pattern is valid")
    })
}

/// One weekly meeting: a day set and a same-day time span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MeetingInterval {
    pub days: DayMask,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl MeetingInterval {
    /// Creates an interval from already-validated parts.
    pub fn new(days: DayMask, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { days, start, end }
    }

    /// Parses a catalog meeting (`days`, `"H:MM am - H:MM pm"`).
    ///
    /// The `TBA` sentinel is not a time and is rejected; callers filter it
    /// out before parsing.
    pub fn parse(days: &str, text: &str, convention: HourConvention) -> Result<Self, ParseError> {
        let caps = meeting_time_regex()
            .captures(text)
            .ok_or_else(|| ParseError::MeetingTime(text.to_string()))?;

        let clock = |hour: usize, minute: usize, suffix: usize| -> Result<TimeOfDay, ParseError> {
            let out_of_range = || ParseError::OutOfRange(text.to_string());
            let raw_hour: u8 = caps[hour].parse().map_err(|_| out_of_range())?;
            let raw_minute: u8 = caps[minute].parse().map_err(|_| out_of_range())?;
            let meridiem = Meridiem::parse(&caps[suffix])
                .ok_or_else(|| ParseError::MeetingTime(text.to_string()))?;
            if convention == HourConvention::Standard && !(1..=12).contains(&raw_hour) {
                return Err(out_of_range());
            }
            TimeOfDay::new(to_24_hour(raw_hour, meridiem, convention), raw_minute)
                .ok_or_else(out_of_range)
        };

        let start = clock(1, 2, 3)?;
        let end = clock(4, 5, 6)?;
        if !start.is_before(&end) {
            return Err(ParseError::Inverted(text.to_string()));
        }

        Ok(Self {
            days: DayMask::parse(days)?,
            start,
            end,
        })
    }

    /// Whether the two meetings conflict (shared day, inclusive overlap).
    #[inline]
    pub fn overlaps(&self, other: &MeetingInterval) -> bool {
        self.days.intersects(other.days)
            && !self.end.is_before(&other.start)
            && !self.start.is_after(&other.end)
    }

    /// Whether this meeting lies inside a daily window where the end hour
    /// may not exceed `latest_end_hour`.
    pub fn within_hours(&self, earliest_start_hour: u8, latest_end_hour: u8) -> bool {
        self.start.hour >= earliest_start_hour && self.end.hour <= latest_end_hour
    }
}

impl fmt::Display for MeetingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.days, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn t(hour: u8, minute: u8) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    fn meeting(days: &str, start: (u8, u8), end: (u8, u8)) -> MeetingInterval {
        MeetingInterval::new(
            DayMask::parse(days).unwrap(),
            t(start.0, start.1),
            t(end.0, end.1),
        )
    }

    #[test]
    fn test_day_mask_parse() {
        let mwf = DayMask::parse("MWF").unwrap();
        assert_eq!(mwf.len(), 3);
        assert!(mwf.contains('M'));
        assert!(mwf.contains('f'));
        assert!(!mwf.contains('T'));
        assert_eq!(mwf.to_string(), "MWF");

        let tr = DayMask::parse(" t r ").unwrap();
        assert_eq!(tr.to_string(), "TR");
        assert!(!mwf.intersects(tr));
        assert!(DayMask::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_day_mask_unknown_symbol() {
        let err = DayMask::parse("MXF").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownDay {
                symbol: 'X',
                days: "MXF".into()
            }
        );
    }

    #[test]
    fn test_day_mask_serde_as_string() {
        let mask = DayMask::parse("TR").unwrap();
        assert_eq!(serde_json::to_string(&mask).unwrap(), "\"TR\"");
        let back: DayMask = serde_json::from_str("\"RT\"").unwrap();
        assert_eq!(back, mask);
        assert!(serde_json::from_str::<DayMask>("\"Q\"").is_err());
    }

    #[test]
    fn test_time_of_day_bounds() {
        assert!(TimeOfDay::new(23, 59).is_some());
        assert!(TimeOfDay::new(24, 0).is_none());
        assert!(TimeOfDay::new(9, 60).is_none());
    }

    #[test]
    fn test_before_after_strict() {
        assert!(t(9, 0).is_before(&t(9, 1)));
        assert!(t(8, 59).is_before(&t(9, 0)));
        assert!(t(10, 0).is_after(&t(9, 59)));
        assert!(!t(9, 0).is_before(&t(9, 0)));
        assert!(!t(9, 0).is_after(&t(9, 0)));
    }

    #[test]
    fn test_to_24_hour_standard() {
        let c = HourConvention::Standard;
        assert_eq!(to_24_hour(9, Meridiem::Am, c), 9);
        assert_eq!(to_24_hour(12, Meridiem::Am, c), 0);
        assert_eq!(to_24_hour(12, Meridiem::Pm, c), 12);
        assert_eq!(to_24_hour(1, Meridiem::Pm, c), 13);
    }

    #[test]
    fn test_to_24_hour_legacy() {
        let c = HourConvention::Legacy;
        assert_eq!(to_24_hour(12, Meridiem::Am, c), 12);
        assert_eq!(to_24_hour(12, Meridiem::Pm, c), 12);
        assert_eq!(to_24_hour(11, Meridiem::Pm, c), 23);
        assert_eq!(to_24_hour(7, Meridiem::Am, c), 7);
    }

    #[test]
    fn test_parse_meeting_time() {
        let m = MeetingInterval::parse("MWF", "9:30 am - 10:20 am", HourConvention::Standard)
            .unwrap();
        assert_eq!(m.start, t(9, 30));
        assert_eq!(m.end, t(10, 20));
        assert_eq!(m.to_string(), "MWF 09:30-10:20");

        let m = MeetingInterval::parse("TR", "1:00 PM - 2:20 PM", HourConvention::Standard)
            .unwrap();
        assert_eq!(m.start, t(13, 0));
        assert_eq!(m.end, t(14, 20));

        let m = MeetingInterval::parse("T", "11:30am-12:50pm", HourConvention::Standard).unwrap();
        assert_eq!(m.start, t(11, 30));
        assert_eq!(m.end, t(12, 50));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let c = HourConvention::Standard;
        assert!(matches!(
            MeetingInterval::parse("M", TBA, c),
            Err(ParseError::MeetingTime(_))
        ));
        assert!(matches!(
            MeetingInterval::parse("M", "9:3 am - 10:20 am", c),
            Err(ParseError::MeetingTime(_))
        ));
        assert!(matches!(
            MeetingInterval::parse("M", "9:30 - 10:20", c),
            Err(ParseError::MeetingTime(_))
        ));
        assert!(matches!(
            MeetingInterval::parse("M", "9:75 am - 10:20 am", c),
            Err(ParseError::OutOfRange(_))
        ));
        assert!(matches!(
            MeetingInterval::parse("M", "13:00 pm - 2:00 pm", c),
            Err(ParseError::OutOfRange(_))
        ));
        assert!(matches!(
            MeetingInterval::parse("M", "3:00 pm - 2:00 pm", c),
            Err(ParseError::Inverted(_))
        ));
        assert!(matches!(
            MeetingInterval::parse("MZ", "2:00 pm - 3:00 pm", c),
            Err(ParseError::UnknownDay { .. })
        ));
    }

    #[test]
    fn test_parse_legacy_noon_midnight() {
        // 11:30 am - 12:20 am reads as 11:30-12:20 only under the legacy rule.
        let m = MeetingInterval::parse("M", "11:30 am - 12:20 am", HourConvention::Legacy)
            .unwrap();
        assert_eq!(m.end, t(12, 20));
        assert!(matches!(
            MeetingInterval::parse("M", "11:30 am - 12:20 am", HourConvention::Standard),
            Err(ParseError::Inverted(_))
        ));
    }

    #[test]
    fn test_boundary_touch_conflicts() {
        let a = meeting("M", (9, 0), (10, 0));
        let b = meeting("M", (10, 0), (11, 0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_disjoint_days_never_conflict() {
        let a = meeting("MWF", (9, 0), (12, 0));
        let b = meeting("TR", (9, 0), (12, 0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_separated_times_do_not_conflict() {
        let a = meeting("MWF", (9, 0), (9, 50));
        let b = meeting("MWF", (10, 0), (10, 50));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_overlap_symmetric_randomized() {
        let mut rng = StdRng::seed_from_u64(7);
        let days = ["M", "T", "W", "R", "F", "MWF", "TR", "MW", "S", ""];
        let random_meeting = |rng: &mut StdRng| {
            let start = rng.random_range(0..23 * 60);
            let end = rng.random_range(start + 1..24 * 60);
            meeting(
                days[rng.random_range(0..days.len())],
                ((start / 60) as u8, (start % 60) as u8),
                ((end / 60) as u8, (end % 60) as u8),
            )
        };

        for _ in 0..2000 {
            let a = random_meeting(&mut rng);
            let b = random_meeting(&mut rng);
            assert_eq!(a.overlaps(&b), b.overlaps(&a), "{a} vs {b}");
            if !a.days.intersects(b.days) {
                assert!(!a.overlaps(&b));
            }
        }
    }

    #[test]
    fn test_within_hours() {
        let m = meeting("M", (7, 0), (23, 50));
        assert!(m.within_hours(7, 23));
        assert!(!m.within_hours(8, 23));
        assert!(!m.within_hours(7, 22));
    }
}
