//! Timetable conflict resolution for course registration.
//!
//! Given the sections a catalog offers for a set of courses, produces every
//! timetable that takes one section per (course, category) and has no two
//! meetings overlapping. Results stream to a sink as they are found; the
//! full product is never materialized.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `MeetingInterval`, `Section`,
//!   `CourseCandidates`, `Combination`, `Schedule`
//! - **`normalize`**: Catalog records to sections, daily-window filter
//! - **`grouping`**: Merging of time-equivalent sections per category
//! - **`conflict`**: Pairwise overlap and window checks
//! - **`enumerator`**: Odometer, pruned and sharded walks with cancellation
//! - **`sink`**: Consumers of conflict-free combinations
//! - **`catalog`**: Fetcher seam and the end-to-end `Resolver`
//! - **`validation`**: Candidate integrity checks (duplicate CRNs, misfiled
//!   or self-conflicting sections)
//! - **`config`**, **`error`**: Resolver settings and error types
//!
//! # Quick start
//!
//! ```
//! use u_timetable::{
//!     CancellationToken, CollectSink, CourseRequest, InMemoryCatalog, RawSection, Resolver,
//! };
//!
//! let catalog = InMemoryCatalog::new()
//!     .with_course("MATH101", vec![
//!         RawSection::new("A01", "11").with_meeting("MWF", "9:00 am - 9:50 am"),
//!         RawSection::new("A02", "12").with_meeting("MWF", "10:00 am - 10:50 am"),
//!     ])
//!     .with_course("PHYS102", vec![
//!         RawSection::new("A01", "21").with_meeting("TR", "9:00 am - 10:20 am"),
//!         RawSection::new("A02", "22").with_meeting("MWF", "9:30 am - 10:20 am"),
//!     ]);
//! let requests = vec![
//!     CourseRequest::parse("MATH101", "202501").unwrap(),
//!     CourseRequest::parse("PHYS102", "202501").unwrap(),
//! ];
//!
//! let mut sink = CollectSink::new();
//! let report = Resolver::new(catalog)
//!     .resolve(&requests, &mut sink, &CancellationToken::new())
//!     .unwrap();
//! assert_eq!(report.total, Some(4));
//! assert_eq!(sink.len(), 3);
//! ```
//!
//! # References
//!
//! - Knuth (2011), "The Art of Computer Programming", Vol. 4A, §7.2.1.1
//!   (Generating all n-tuples, mixed-radix)
//! - Golomb & Baumert (1965), "Backtrack Programming", J. ACM 12(4)

pub mod catalog;
pub mod config;
pub mod conflict;
pub mod enumerator;
pub mod error;
pub mod grouping;
pub mod models;
pub mod normalize;
pub mod sink;
pub mod validation;

pub use catalog::{build_candidates, CatalogFetcher, InMemoryCatalog, Resolver};
pub use config::ResolverConfig;
pub use enumerator::{
    CancellationToken, CombinationEnumerator, EnumerationOutcome, EnumerationReport,
};
pub use error::{ParseError, ResolveError, Result, SinkError};
pub use models::{
    Combination, CourseCandidates, CourseRequest, MeetingInterval, RawSection, Section,
};
pub use sink::{CollectSink, CountingSink, JsonLinesSink, ResultSink};
