//! Section grouping.
//!
//! Catalog sections of one course that meet at exactly the same times are
//! interchangeable for conflict purposes. Grouping folds them into one
//! [`Section`] carrying every CRN, which shrinks the selection product
//! without losing any timetable.
//!
//! # Algorithm
//! Sections are visited in input order. Each is compared against the
//! entries already collected for its category; on a match its identifiers
//! are merged into that entry, otherwise it becomes a new entry. The scan
//! is quadratic in the per-category count, which stays in the tens.
//!
//! What "the same times" means is a pluggable [`SectionEquivalence`].

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use tracing::debug;

use crate::config::GroupingMode;
use crate::models::{Category, CourseCandidates, MeetingInterval, Section};

/// Decides whether two meeting sequences make sections interchangeable.
pub trait SectionEquivalence: Send + Sync + Debug {
    /// Equivalence name for logs.
    fn name(&self) -> &'static str;

    /// Whether sections meeting at `a` and at `b` are interchangeable.
    fn equivalent(&self, a: &[MeetingInterval], b: &[MeetingInterval]) -> bool;
}

/// Element-wise equality: same meetings in the same order.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderSensitive;

impl SectionEquivalence for OrderSensitive {
    fn name(&self) -> &'static str {
        "order-sensitive"
    }

    fn equivalent(&self, a: &[MeetingInterval], b: &[MeetingInterval]) -> bool {
        a == b
    }
}

/// Multiset equality: same meetings in any order.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderInsensitive;

impl SectionEquivalence for OrderInsensitive {
    fn name(&self) -> &'static str {
        "order-insensitive"
    }

    fn equivalent(&self, a: &[MeetingInterval], b: &[MeetingInterval]) -> bool {
        if a.len() != b.len() {
            return false;
        }
        let mut a = a.to_vec();
        let mut b = b.to_vec();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

/// Groups normalized sections with an injected equivalence.
#[derive(Debug, Clone)]
pub struct SectionGrouper {
    equivalence: Arc<dyn SectionEquivalence>,
}

impl Default for SectionGrouper {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionGrouper {
    /// Creates a grouper with [`OrderSensitive`] equivalence.
    pub fn new() -> Self {
        Self {
            equivalence: Arc::new(OrderSensitive),
        }
    }

    /// Creates a grouper for a configured grouping mode.
    pub fn for_mode(mode: GroupingMode) -> Self {
        match mode {
            GroupingMode::OrderSensitive => Self::new(),
            GroupingMode::OrderInsensitive => Self::new().with_equivalence(OrderInsensitive),
        }
    }

    /// Replaces the equivalence.
    pub fn with_equivalence<E: SectionEquivalence + 'static>(mut self, equivalence: E) -> Self {
        self.equivalence = Arc::new(equivalence);
        self
    }

    /// Name of the equivalence in use.
    pub fn equivalence_name(&self) -> &'static str {
        self.equivalence.name()
    }

    /// Groups sections by category, merging equivalent ones.
    pub fn group<I>(&self, sections: I) -> BTreeMap<Category, Vec<Section>>
    where
        I: IntoIterator<Item = Section>,
    {
        let mut grouped: BTreeMap<Category, Vec<Section>> = BTreeMap::new();

        for section in sections {
            let entries = grouped.entry(section.category).or_default();
            let existing = entries.iter_mut().find(|entry| {
                self.equivalence
                    .equivalent(&entry.meeting_intervals, &section.meeting_intervals)
            });

            match existing {
                Some(entry) => {
                    debug!(
                        course = %section.course,
                        merged = ?section.display_codes,
                        into = ?entry.display_codes,
                        "merging equivalent section"
                    );
                    entry.absorb(section);
                }
                None => entries.push(section),
            }
        }

        grouped
    }

    /// Groups the sections of one course into its candidate lists.
    pub fn group_course<I>(&self, name: impl Into<String>, sections: I) -> CourseCandidates
    where
        I: IntoIterator<Item = Section>,
    {
        CourseCandidates {
            name: name.into(),
            categories: self.group(sections),
        }
    }
}

/// Groups with the default order-sensitive equivalence.
pub fn group_sections<I>(sections: I) -> BTreeMap<Category, Vec<Section>>
where
    I: IntoIterator<Item = Section>,
{
    SectionGrouper::new().group(sections)
}
