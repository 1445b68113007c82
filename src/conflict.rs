//! Conflict detection over sets of meeting intervals.
//!
//! Two checks run in order:
//! 1. An optional daily-window pre-check: any meeting starting before the
//!    floor hour, or ending in or after the ceiling hour, makes the whole
//!    set conflicting. This is independent of the normalizer's window and
//!    lets callers tighten the day without reloading sections.
//! 2. Pairwise overlap between distinct positions. A meeting is never
//!    compared with itself.

use crate::config::HourWindow;
use crate::models::MeetingInterval;

/// Decides whether a set of meetings can be attended together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConflictDetector {
    window: Option<HourWindow>,
}

impl ConflictDetector {
    /// Creates a detector with no window pre-check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the window pre-check.
    pub fn with_window(mut self, floor_hour: u8, ceiling_hour: u8) -> Self {
        self.window = Some(HourWindow::new(floor_hour, ceiling_hour));
        self
    }

    /// Sets or clears the window pre-check.
    pub fn with_optional_window(mut self, window: Option<HourWindow>) -> Self {
        self.window = window;
        self
    }

    /// The window pre-check, if enabled.
    pub fn window(&self) -> Option<HourWindow> {
        self.window
    }

    /// Whether a single meeting violates the window pre-check.
    #[inline]
    pub fn outside_window(&self, interval: &MeetingInterval) -> bool {
        self.window.is_some_and(|w| {
            interval.start.hour < w.earliest_start_hour || interval.end.hour >= w.latest_end_hour
        })
    }

    /// Whether any meeting violates the window or any two distinct
    /// meetings overlap.
    pub fn has_conflict(&self, intervals: &[MeetingInterval]) -> bool {
        if intervals.iter().any(|i| self.outside_window(i)) {
            return true;
        }
        has_overlap(intervals)
    }

    /// Incremental check for extending a conflict-free set.
    ///
    /// `placed` is assumed already checked. Only the new meetings are
    /// window-checked and compared, both among themselves and against
    /// `placed`, so `has_conflict(placed ++ added)` equals
    /// `conflicts_with(placed, added)` whenever `placed` is clean.
    pub fn conflicts_with(&self, placed: &[MeetingInterval], added: &[MeetingInterval]) -> bool {
        if added.iter().any(|i| self.outside_window(i)) {
            return true;
        }
        has_overlap(added)
            || added
                .iter()
                .any(|new| placed.iter().any(|old| new.overlaps(old)))
    }
}

/// Whether any two distinct positions overlap.
///
/// Overlap is symmetric, so each unordered pair is tested once.
pub fn has_overlap(intervals: &[MeetingInterval]) -> bool {
    intervals
        .iter()
        .enumerate()
        .any(|(i, a)| intervals[i + 1..].iter().any(|b| a.overlaps(b)))
}
