//! Catalog access and the resolver pipeline.
//!
//! ```text
//! CourseRequest ──fetch──▶ RawSection ──normalize──▶ Section
//!        ──group──▶ CourseCandidates ──enumerate──▶ ResultSink
//! ```
//!
//! The transport behind [`CatalogFetcher`] (HTTP, a file, a fixture) is the
//! caller's business. Fetch failures are returned as they happen; nothing
//! is retried.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{ParsePolicy, ResolverConfig};
use crate::enumerator::{CancellationToken, CombinationEnumerator, EnumerationReport};
use crate::error::{ResolveError, Result};
use crate::grouping::SectionGrouper;
use crate::models::{CourseCandidates, CourseRequest, RawSection};
use crate::normalize::SectionNormalizer;
use crate::sink::ResultSink;
use crate::validation::validate_candidates;

/// Source of raw section records for a course.
pub trait CatalogFetcher {
    /// Returns every section record the catalog lists for `request`.
    fn fetch(&self, request: &CourseRequest) -> Result<Vec<RawSection>>;
}

impl<F> CatalogFetcher for F
where
    F: Fn(&CourseRequest) -> Result<Vec<RawSection>>,
{
    fn fetch(&self, request: &CourseRequest) -> Result<Vec<RawSection>> {
        self(request)
    }
}

/// A catalog held in memory, keyed by course name (`"SENG265"`).
///
/// Deserializes from a JSON object mapping course names to arrays of
/// catalog section records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryCatalog {
    courses: BTreeMap<String, Vec<RawSection>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the records of one course.
    pub fn with_course(mut self, name: impl Into<String>, sections: Vec<RawSection>) -> Self {
        self.courses.insert(name.into(), sections);
        self
    }

    /// Parses a catalog from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Number of courses.
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog has no courses.
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

impl CatalogFetcher for InMemoryCatalog {
    fn fetch(&self, request: &CourseRequest) -> Result<Vec<RawSection>> {
        let name = request.name();
        self.courses
            .get(&name)
            .cloned()
            .ok_or_else(|| ResolveError::Fetch {
                course: name,
                reason: "course not in catalog".into(),
            })
    }
}

/// Fetches, normalizes and groups every requested course.
///
/// Candidates come back in request order. A section that fails to parse
/// is dropped or fails the whole call depending on
/// [`ResolverConfig::parse_policy`].
pub fn build_candidates<F>(
    fetcher: &F,
    requests: &[CourseRequest],
    config: &ResolverConfig,
) -> Result<Vec<CourseCandidates>>
where
    F: CatalogFetcher + ?Sized,
{
    let normalizer = SectionNormalizer::from_config(config);
    let grouper = SectionGrouper::for_mode(config.grouping);
    let mut courses = Vec::with_capacity(requests.len());

    for request in requests {
        let name = request.name();
        let records = fetcher.fetch(request)?;
        debug!(
            course = %name,
            term = %request.term,
            records = records.len(),
            "fetched catalog records"
        );

        let mut sections = Vec::with_capacity(records.len());
        for record in &records {
            match normalizer.normalize(&name, record) {
                Ok(Some(section)) => sections.push(section),
                Ok(None) => {}
                Err(source) => match config.parse_policy {
                    ParsePolicy::SkipSection => {
                        warn!(
                            course = %name,
                            section = %record.section_code,
                            crn = %record.crn,
                            error = %source,
                            "skipping unparseable section"
                        );
                    }
                    ParsePolicy::AbortCourse => {
                        return Err(ResolveError::Section {
                            course: name,
                            section_code: record.section_code.clone(),
                            source,
                        });
                    }
                },
            }
        }

        let candidates = grouper.group_course(name, sections);
        for (category, list) in &candidates.categories {
            debug!(
                course = %candidates.name,
                category = %category.code(),
                unique_sections = list.len(),
                "grouped candidate sections"
            );
        }
        courses.push(candidates);
    }

    Ok(courses)
}

/// End-to-end resolver: catalog in, conflict-free timetables out.
///
/// # Example
/// ```
/// use u_timetable::catalog::{InMemoryCatalog, Resolver};
/// use u_timetable::enumerator::CancellationToken;
/// use u_timetable::models::{CourseRequest, RawSection};
/// use u_timetable::sink::CountingSink;
///
/// let catalog = InMemoryCatalog::new().with_course(
///     "CSC110",
///     vec![RawSection::new("A01", "10001").with_meeting("MR", "1:00 pm - 2:20 pm")],
/// );
/// let requests = vec![CourseRequest::parse("CSC110", "202409").unwrap()];
///
/// let mut sink = CountingSink::default();
/// let report = Resolver::new(catalog)
///     .resolve(&requests, &mut sink, &CancellationToken::new())
///     .unwrap();
/// assert_eq!(sink.count, 1);
/// assert!(report.is_complete());
/// ```
#[derive(Debug, Clone)]
pub struct Resolver<F> {
    fetcher: F,
    config: ResolverConfig,
}

impl<F: CatalogFetcher> Resolver<F> {
    /// Creates a resolver with the default configuration.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            config: ResolverConfig::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Builds the candidate lists for `requests`.
    pub fn candidates(&self, requests: &[CourseRequest]) -> Result<Vec<CourseCandidates>> {
        self.config.validate()?;
        build_candidates(&self.fetcher, requests, &self.config)
    }

    /// Builds candidates and streams every conflict-free combination into
    /// `sink` on the calling thread, using the configured strategy.
    ///
    /// The configured shard count is not consulted here; see
    /// [`Resolver::resolve_sharded`].
    pub fn resolve<S>(
        &self,
        requests: &[CourseRequest],
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<EnumerationReport>
    where
        S: ResultSink + ?Sized,
    {
        let courses = self.checked_candidates(requests)?;
        self.enumerator(&courses).run(sink, cancel)
    }

    /// Like [`Resolver::resolve`], but walks on `shards` worker threads
    /// when the configuration asks for more than one.
    pub fn resolve_sharded<S>(
        &self,
        requests: &[CourseRequest],
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<EnumerationReport>
    where
        S: ResultSink + Send + ?Sized,
    {
        let courses = self.checked_candidates(requests)?;
        let enumerator = self.enumerator(&courses);
        if self.config.shards > 1 {
            enumerator.run_sharded(self.config.shards, sink, cancel)
        } else {
            enumerator.run(sink, cancel)
        }
    }

    /// Candidates with validation findings logged.
    fn checked_candidates(&self, requests: &[CourseRequest]) -> Result<Vec<CourseCandidates>> {
        let courses = self.candidates(requests)?;
        if let Err(problems) = validate_candidates(&courses) {
            for problem in &problems {
                warn!(kind = ?problem.kind, "{}", problem.message);
            }
        }
        Ok(courses)
    }

    fn enumerator<'c>(&self, courses: &'c [CourseCandidates]) -> CombinationEnumerator<'c> {
        let enumerator = CombinationEnumerator::from_courses(courses).with_config(&self.config);
        info!(
            courses = courses.len(),
            lists = enumerator.lists().len(),
            shards = self.config.shards,
            "resolving timetables"
        );
        enumerator
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::config::{GroupingMode, SearchStrategy};
    use crate::error::{ParseError, SinkError};
    use crate::models::{Category, Combination};
    use crate::sink::{CollectSink, CountingSink};

    const TERM: &str = "202501";

    fn request(token: &str) -> CourseRequest {
        CourseRequest::parse(token, TERM).unwrap()
    }

    fn two_course_catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_course(
                "MATH101",
                vec![
                    RawSection::new("A01", "11").with_meeting("MWF", "9:00 am - 9:50 am"),
                    RawSection::new("A02", "12").with_meeting("MWF", "10:00 am - 10:50 am"),
                ],
            )
            .with_course(
                "PHYS102",
                vec![
                    RawSection::new("A01", "21").with_meeting("TR", "9:00 am - 10:20 am"),
                    RawSection::new("A02", "22").with_meeting("MWF", "9:30 am - 10:20 am"),
                ],
            )
    }

    #[test]
    fn test_end_to_end_scenario() {
        let resolver = Resolver::new(two_course_catalog());
        let requests = vec![request("MATH101"), request("PHYS102")];

        let mut sink = CollectSink::new();
        let report = resolver
            .resolve(&requests, &mut sink, &CancellationToken::new())
            .unwrap();

        assert_eq!(report.total, Some(4));
        assert_eq!(report.emitted, 3);
        assert_eq!(sink.index_vectors(), vec![vec![0, 0], vec![0, 1], vec![1, 0]]);
        let crns: Vec<Vec<&str>> = sink.schedules.iter().map(|s| s.identifiers()).collect();
        assert_eq!(crns, vec![vec!["11", "21"], vec!["11", "22"], vec!["12", "21"]]);
    }

    #[test]
    fn test_end_to_end_sharded_and_pruned() {
        let requests = vec![request("MATH101"), request("PHYS102")];
        for config in [
            ResolverConfig::new().with_shards(3),
            ResolverConfig::new().with_strategy(SearchStrategy::Pruned),
        ] {
            let mut sink = CollectSink::new();
            Resolver::new(two_course_catalog())
                .with_config(config)
                .resolve_sharded(&requests, &mut sink, &CancellationToken::new())
                .unwrap();
            let mut got = sink.index_vectors();
            got.sort();
            assert_eq!(got, vec![vec![0, 0], vec![0, 1], vec![1, 0]]);
        }
    }

    #[test]
    fn test_resolve_accepts_thread_local_sink() {
        let requests = vec![request("MATH101"), request("PHYS102")];
        let seen = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&seen);
        let mut sink = move |_: &Combination<'_>| -> std::result::Result<(), SinkError> {
            counter.set(counter.get() + 1);
            Ok(())
        };

        let report = Resolver::new(two_course_catalog())
            .with_config(ResolverConfig::new().with_shards(4))
            .resolve(&requests, &mut sink, &CancellationToken::new())
            .unwrap();
        assert_eq!(seen.get(), 3);
        assert_eq!(report.emitted, 3);
        assert!(report.is_complete());
    }

    #[test]
    fn test_build_candidates_groups_and_filters() {
        let catalog = InMemoryCatalog::new().with_course(
            "SENG265",
            vec![
                RawSection::new("A01", "30001").with_meeting("TWF", "10:30 am - 11:20 am"),
                RawSection::new("A02", "30002").with_meeting("TWF", "10:30 am - 11:20 am"),
                RawSection::new("A03", "30003").with_meeting("M", "6:30 am - 7:50 am"),
                RawSection::new("B01", "30004").with_meeting("TBA", "TBA"),
                RawSection::new("T01", "30005").with_meeting("R", "2:30 pm - 3:20 pm"),
            ],
        );
        let courses =
            build_candidates(&catalog, &[request("seng265")], &ResolverConfig::default()).unwrap();

        assert_eq!(courses.len(), 1);
        let seng = &courses[0];
        assert_eq!(seng.name, "SENG265");
        // A01 and A02 merge; A03 starts before 7.
        let lectures = seng.sections(Category::PrimaryLecture);
        assert_eq!(lectures.len(), 1);
        assert_eq!(lectures[0].identifiers, vec!["30001", "30002"]);
        // An all-TBA section has no meetings and stays a candidate.
        assert_eq!(seng.sections(Category::SecondaryLecture).len(), 1);
        assert!(seng.sections(Category::SecondaryLecture)[0].meeting_intervals.is_empty());
        assert_eq!(seng.sections(Category::Tutorial).len(), 1);
        assert_eq!(seng.populated_categories(), 3);
    }

    #[test]
    fn test_parse_policy() {
        let catalog = InMemoryCatalog::new().with_course(
            "CSC225",
            vec![
                RawSection::new("A01", "1").with_meeting("MR", "8:30 am - 9:50 am"),
                RawSection::new("A02", "2").with_meeting("MR", "half past nine"),
            ],
        );
        let requests = [request("CSC225")];

        let err = build_candidates(&catalog, &requests, &ResolverConfig::default()).unwrap_err();
        match err {
            ResolveError::Section {
                course,
                section_code,
                source,
            } => {
                assert_eq!(course, "CSC225");
                assert_eq!(section_code, "A02");
                assert!(matches!(source, ParseError::MeetingTime(_)));
            }
            other => panic!("unexpected error: {other}"),
        }

        let config = ResolverConfig::new().with_parse_policy(ParsePolicy::SkipSection);
        let courses = build_candidates(&catalog, &requests, &config).unwrap();
        assert_eq!(courses[0].section_count(), 1);
    }

    #[test]
    fn test_unknown_course_is_fetch_error() {
        let err = build_candidates(
            &two_course_catalog(),
            &[request("MATH101"), request("ART100")],
            &ResolverConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ResolveError::Fetch { ref course, .. } if course == "ART100"));
    }

    #[test]
    fn test_closure_fetcher() {
        let fetcher = |req: &CourseRequest| -> Result<Vec<RawSection>> {
            Ok(vec![RawSection::new("A01", format!("{}-1", req.code))
                .with_meeting("F", "1:30 pm - 2:20 pm")])
        };
        let courses =
            build_candidates(&fetcher, &[request("ECON103")], &ResolverConfig::default()).unwrap();
        assert_eq!(
            courses[0].sections(Category::PrimaryLecture)[0].identifiers,
            vec!["103-1"]
        );
    }

    #[test]
    fn test_order_insensitive_grouping_from_config() {
        let catalog = InMemoryCatalog::new().with_course(
            "BIOL184",
            vec![
                RawSection::new("B01", "1")
                    .with_meeting("M", "1:00 pm - 1:50 pm")
                    .with_meeting("W", "3:00 pm - 3:50 pm"),
                RawSection::new("B02", "2")
                    .with_meeting("W", "3:00 pm - 3:50 pm")
                    .with_meeting("M", "1:00 pm - 1:50 pm"),
            ],
        );
        let requests = [request("BIOL184")];

        let sensitive = build_candidates(&catalog, &requests, &ResolverConfig::default()).unwrap();
        assert_eq!(sensitive[0].section_count(), 2);

        let config = ResolverConfig::new().with_grouping(GroupingMode::OrderInsensitive);
        let insensitive = build_candidates(&catalog, &requests, &config).unwrap();
        assert_eq!(insensitive[0].section_count(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let resolver =
            Resolver::new(two_course_catalog()).with_config(ResolverConfig::new().with_shards(0));
        let mut sink = CountingSink::default();
        let err = resolver
            .resolve(&[request("MATH101")], &mut sink, &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, ResolveError::Config(_)));
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "STAT260": [
                {"sectionCode": "A01", "crn": "40001",
                 "meetingTimes": [{"days": "TWF", "time": "11:30 am - 12:20 pm"}]},
                {"sectionCode": "T01", "crn": "40002"}
            ]
        }"#;
        let catalog = InMemoryCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);

        let records = catalog.fetch(&request("STAT260")).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].meeting_times.is_empty());
    }
}
