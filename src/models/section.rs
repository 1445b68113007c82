//! Section model.
//!
//! A section is one schedulable offering of a course component: a
//! lecture, a second lecture stream, or a tutorial. After grouping, a
//! `Section` may stand for several catalog sections (CRNs) that meet at
//! exactly the same times, because choosing between them never changes
//! whether a timetable conflicts.

use serde::{Deserialize, Serialize};

use super::MeetingInterval;
use crate::error::ParseError;

/// The structural role of a section within a course.
///
/// Ordering follows the catalog's code letters, which is also the order
/// candidate lists are produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Section codes starting with `A`.
    PrimaryLecture,
    /// Section codes starting with `B`.
    SecondaryLecture,
    /// Section codes starting with `T`.
    Tutorial,
}

impl Category {
    /// All categories in candidate order.
    pub const ALL: [Category; 3] = [
        Category::PrimaryLecture,
        Category::SecondaryLecture,
        Category::Tutorial,
    ];

    /// Derives the category from a catalog section code such as `"A01"`.
    pub fn from_section_code(code: &str) -> Result<Self, ParseError> {
        match code.trim_start().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('A') => Ok(Category::PrimaryLecture),
            Some('B') => Ok(Category::SecondaryLecture),
            Some('T') => Ok(Category::Tutorial),
            _ => Err(ParseError::SectionCode(code.to_string())),
        }
    }

    /// The catalog code letter.
    pub fn code(self) -> char {
        match self {
            Category::PrimaryLecture => 'A',
            Category::SecondaryLecture => 'B',
            Category::Tutorial => 'T',
        }
    }
}

/// A meeting entry as delivered by the course catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMeeting {
    /// Day symbols, e.g. `"MWF"`.
    pub days: String,
    /// Time text, e.g. `"9:30 am - 10:20 am"`, or `"TBA"`.
    pub time: String,
}

impl RawMeeting {
    /// Creates a raw meeting.
    pub fn new(days: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            days: days.into(),
            time: time.into(),
        }
    }

    /// Whether the catalog has no fixed time for this meeting.
    pub fn is_tba(&self) -> bool {
        self.time.trim().eq_ignore_ascii_case(super::time::TBA)
    }
}

/// A section record as delivered by the course catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSection {
    /// Display code, e.g. `"A01"`, `"T03"`.
    pub section_code: String,
    /// Course reference number.
    pub crn: String,
    /// Weekly meetings.
    #[serde(default)]
    pub meeting_times: Vec<RawMeeting>,
}

impl RawSection {
    /// Creates a raw section with no meetings.
    pub fn new(section_code: impl Into<String>, crn: impl Into<String>) -> Self {
        Self {
            section_code: section_code.into(),
            crn: crn.into(),
            meeting_times: Vec::new(),
        }
    }

    /// Adds a meeting.
    pub fn with_meeting(mut self, days: impl Into<String>, time: impl Into<String>) -> Self {
        self.meeting_times.push(RawMeeting::new(days, time));
        self
    }
}

/// A normalized, possibly merged, section.
///
/// Immutable once grouping is done; the enumerator only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Owning course, e.g. `"SENG265"`.
    pub course: String,
    /// Structural role.
    pub category: Category,
    /// Weekly meetings in catalog order.
    pub meeting_intervals: Vec<MeetingInterval>,
    /// CRNs of every catalog section merged into this one.
    pub identifiers: Vec<String>,
    /// Display codes of every catalog section merged into this one.
    pub display_codes: Vec<String>,
}

impl Section {
    /// Creates a section with no meetings or identifiers.
    pub fn new(course: impl Into<String>, category: Category) -> Self {
        Self {
            course: course.into(),
            category,
            meeting_intervals: Vec::new(),
            identifiers: Vec::new(),
            display_codes: Vec::new(),
        }
    }

    /// Adds a meeting.
    pub fn with_interval(mut self, interval: MeetingInterval) -> Self {
        self.meeting_intervals.push(interval);
        self
    }

    /// Adds a CRN.
    pub fn with_identifier(mut self, crn: impl Into<String>) -> Self {
        push_unique(&mut self.identifiers, crn.into());
        self
    }

    /// Adds a display code.
    pub fn with_display_code(mut self, code: impl Into<String>) -> Self {
        push_unique(&mut self.display_codes, code.into());
        self
    }

    /// Folds another section's identifiers and display codes into this one.
    ///
    /// Meeting intervals are left untouched; the caller has already decided
    /// the two are equivalent.
    pub fn absorb(&mut self, other: Section) {
        for crn in other.identifiers {
            push_unique(&mut self.identifiers, crn);
        }
        for code in other.display_codes {
            push_unique(&mut self.display_codes, code);
        }
    }

    /// Whether any two of this section's own meetings conflict.
    pub fn is_self_conflicting(&self) -> bool {
        let intervals = &self.meeting_intervals;
        (0..intervals.len()).any(|i| {
            intervals[i + 1..]
                .iter()
                .any(|other| intervals[i].overlaps(other))
        })
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}
