//! Section normalization.
//!
//! Turns catalog section records into [`Section`]s with parsed meeting
//! intervals, dropping sections that fall outside the daily window.
//!
//! # Rules
//! - `TBA` meetings carry no time and are skipped.
//! - One meeting outside the window rejects the whole section: a student
//!   cannot attend "most" of a section.
//! - The category comes from the first letter of the section code.
//! - Malformed time text is an error. Whether that drops the section or
//!   the course is the caller's decision.

use tracing::debug;

use crate::config::{HourConvention, HourWindow, ResolverConfig};
use crate::error::ParseError;
use crate::models::{Category, MeetingInterval, RawSection, Section};

/// Normalizes raw sections for one daily window and clock convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionNormalizer {
    window: HourWindow,
    convention: HourConvention,
}

impl SectionNormalizer {
    /// Creates a normalizer.
    pub fn new(window: HourWindow, convention: HourConvention) -> Self {
        Self { window, convention }
    }

    /// Creates a normalizer from the section window and clock convention
    /// of a resolver configuration.
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.section_window, config.hour_convention)
    }

    /// The window in use.
    pub fn window(&self) -> HourWindow {
        self.window
    }

    /// Normalizes one catalog record of `course`.
    ///
    /// Returns `Ok(None)` when the section is out of the window.
    pub fn normalize(&self, course: &str, raw: &RawSection) -> Result<Option<Section>, ParseError> {
        let category = Category::from_section_code(&raw.section_code)?;
        let mut intervals = Vec::with_capacity(raw.meeting_times.len());

        for meeting in raw.meeting_times.iter().filter(|m| !m.is_tba()) {
            let interval = MeetingInterval::parse(&meeting.days, &meeting.time, self.convention)?;
            if !interval.within_hours(self.window.earliest_start_hour, self.window.latest_end_hour)
            {
                debug!(
                    course,
                    section = %raw.section_code,
                    crn = %raw.crn,
                    meeting = %interval,
                    "section outside daily window"
                );
                return Ok(None);
            }
            intervals.push(interval);
        }

        Ok(Some(Section {
            course: course.to_string(),
            category,
            meeting_intervals: intervals,
            identifiers: vec![raw.crn.clone()],
            display_codes: vec![raw.section_code.clone()],
        }))
    }
}

/// Normalizes one catalog record with an explicit window.
///
/// Shorthand for [`SectionNormalizer::normalize`].
pub fn normalize_section(
    course: &str,
    raw: &RawSection,
    earliest_start_hour: u8,
    latest_end_hour: u8,
    convention: HourConvention,
) -> Result<Option<Section>, ParseError> {
    SectionNormalizer::new(
        HourWindow::new(earliest_start_hour, latest_end_hour),
        convention,
    )
    .normalize(course, raw)
}
