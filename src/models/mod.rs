//! Timetable domain models.
//!
//! Provides the data types the resolver moves between stages: raw catalog
//! records, normalized meeting times, grouped sections, per-course
//! candidate lists, and the combinations the enumerator emits.
//!
//! # Domain Mappings
//!
//! | u-timetable | Catalog | Meaning |
//! |-------------|---------|---------|
//! | RawSection | section record | One CRN with its meeting entries |
//! | Section | merged records | One or more CRNs with identical meetings |
//! | Category | code letter | Lecture A, lecture B, tutorial |
//! | Combination | timetable | One section per populated category |

mod combination;
mod course;
mod section;
pub mod time;

pub use combination::{Combination, Schedule};
pub use course::{CourseCandidates, CourseRequest};
pub use section::{Category, RawMeeting, RawSection, Section};
pub use time::{to_24_hour, DayMask, MeetingInterval, Meridiem, TimeOfDay};
