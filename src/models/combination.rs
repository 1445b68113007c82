//! Combination model.
//!
//! A combination is one concrete timetable: exactly one section for every
//! populated (course, category) pair, in candidate-list order. It borrows
//! the sections from the candidate lists; sinks copy what they keep.

use serde::{Deserialize, Serialize};

use super::{MeetingInterval, Section};

/// One choice of section per candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Combination<'a> {
    /// Selected position in each candidate list.
    pub indexes: Vec<usize>,
    /// Selected sections, parallel to `indexes`.
    pub sections: Vec<&'a Section>,
}

impl<'a> Combination<'a> {
    /// Selects `lists[k][indexes[k]]` for every list.
    ///
    /// # Panics
    /// If `indexes` and `lists` differ in length or an index is out of
    /// bounds; the enumerator never builds such a vector.
    pub fn select(lists: &[&'a [Section]], indexes: &[usize]) -> Self {
        assert_eq!(lists.len(), indexes.len(), "one index per candidate list");
        Self {
            indexes: indexes.to_vec(),
            sections: lists
                .iter()
                .zip(indexes)
                .map(|(list, &i)| &list[i])
                .collect(),
        }
    }

    /// Number of selected sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// All meetings of all selected sections.
    pub fn meeting_intervals(&self) -> impl Iterator<Item = &'a MeetingInterval> + '_ {
        self.sections
            .iter()
            .flat_map(|&section| section.meeting_intervals.iter())
    }

    /// Owned copies of the selected sections.
    pub fn to_owned_sections(&self) -> Vec<Section> {
        self.sections.iter().map(|&s| s.clone()).collect()
    }

    /// Owned copy detached from the candidate lists.
    pub fn to_schedule(&self) -> Schedule {
        Schedule {
            indexes: self.indexes.clone(),
            sections: self.to_owned_sections(),
        }
    }

    /// One line per section: `COURSE: CODE, CODE`.
    pub fn summary(&self) -> String {
        summarize(self.sections.iter().copied())
    }
}

/// An owned, conflict-free timetable kept by a sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Selected position in each candidate list.
    pub indexes: Vec<usize>,
    /// Selected sections.
    pub sections: Vec<Section>,
}

impl Schedule {
    /// All CRNs that can be registered for this timetable.
    pub fn identifiers(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|s| s.identifiers.iter().map(String::as_str))
            .collect()
    }

    /// One line per section: `COURSE: CODE, CODE`.
    pub fn summary(&self) -> String {
        summarize(self.sections.iter())
    }
}

fn summarize<'s>(sections: impl Iterator<Item = &'s Section>) -> String {
    sections
        .map(|s| format!("{}: {}", s.course, s.display_codes.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}
