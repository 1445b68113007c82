//! Combination enumeration.
//!
//! Walks the Cartesian product of candidate lists, one list per populated
//! (course, category) pair, and hands every conflict-free combination to a
//! [`ResultSink`] as soon as it is found. Nothing proportional to the
//! product is ever stored: state is one digit per list plus a scratch
//! buffer of meetings.
//!
//! # Strategies
//! - [`SearchStrategy::Odometer`]: mixed-radix counter, one full conflict
//!   check per index vector.
//! - [`SearchStrategy::Pruned`]: depth-first over partial assignments; a
//!   conflicting prefix discards its whole subtree. Same emissions, same
//!   order, usually far fewer checks.
//! - [`CombinationEnumerator::run_sharded`]: the odometer over contiguous
//!   slices of the linear index space on worker threads. Emissions from
//!   different shards interleave.
//!
//! # Stopping
//! The walk checks its [`CancellationToken`] and step budget before every
//! step. A stop is not an error: the report says why the walk ended and
//! the sink keeps what it already received. A sink error ends the walk and
//! is returned as [`ResolveError::Sink`].

mod cancel;
mod odometer;
mod report;
mod search;
mod shard;

pub use cancel::CancellationToken;
pub use odometer::{shard_ranges, total_combinations, Odometer};
pub use report::{EnumerationOutcome, EnumerationReport};

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tracing::{info, warn};

use crate::config::{ResolverConfig, SearchStrategy};
use crate::conflict::ConflictDetector;
use crate::error::{ResolveError, Result};
use crate::models::{Combination, CourseCandidates, MeetingInterval, Schedule, Section};
use crate::sink::{CollectSink, ResultSink};

/// Enumerates conflict-free combinations of candidate sections.
///
/// # Example
/// ```
/// use u_timetable::enumerator::{CancellationToken, CombinationEnumerator};
/// use u_timetable::models::{Category, CourseCandidates, MeetingInterval, Section};
/// use u_timetable::config::HourConvention;
/// use u_timetable::sink::CollectSink;
///
/// let lecture = |time: &str| {
///     Section::new("MATH122", Category::PrimaryLecture)
///         .with_interval(MeetingInterval::parse("MWF", time, HourConvention::Standard).unwrap())
/// };
/// let courses = vec![CourseCandidates::new("MATH122")
///     .with_section(lecture("9:00 am - 9:50 am"))
///     .with_section(lecture("1:00 pm - 1:50 pm"))];
///
/// let mut sink = CollectSink::new();
/// let report = CombinationEnumerator::from_courses(&courses)
///     .run(&mut sink, &CancellationToken::new())
///     .unwrap();
/// assert_eq!(report.emitted, 2);
/// ```
#[derive(Debug, Clone)]
pub struct CombinationEnumerator<'a> {
    lists: Vec<&'a [Section]>,
    detector: ConflictDetector,
    strategy: SearchStrategy,
    max_steps: Option<u64>,
    progress_interval: u64,
}

impl<'a> CombinationEnumerator<'a> {
    /// Creates an enumerator over explicit candidate lists.
    pub fn new(lists: Vec<&'a [Section]>) -> Self {
        Self {
            lists,
            detector: ConflictDetector::new(),
            strategy: SearchStrategy::Odometer,
            max_steps: None,
            progress_interval: 1_000_000,
        }
    }

    /// Creates an enumerator over every populated category of every
    /// course, in course order then category order.
    pub fn from_courses(courses: &'a [CourseCandidates]) -> Self {
        let mut lists = Vec::new();
        for course in courses {
            lists.extend(course.candidate_lists());
        }
        Self::new(lists)
    }

    /// Applies the detector window, strategy, step budget and progress
    /// interval of a configuration.
    pub fn with_config(self, config: &ResolverConfig) -> Self {
        let mut this = self
            .with_detector(ConflictDetector::new().with_optional_window(config.detector_window))
            .with_strategy(config.strategy)
            .with_progress_interval(config.progress_interval);
        this.max_steps = config.max_steps;
        this
    }

    /// Sets the conflict detector.
    pub fn with_detector(mut self, detector: ConflictDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Sets the search strategy.
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Stops after `steps` evaluated steps.
    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Sets the progress log interval (`0` disables it).
    pub fn with_progress_interval(mut self, steps: u64) -> Self {
        self.progress_interval = steps;
        self
    }

    /// The candidate lists, in digit order.
    pub fn lists(&self) -> &[&'a [Section]] {
        &self.lists
    }

    /// Length of each candidate list.
    pub fn radices(&self) -> Vec<usize> {
        self.lists.iter().map(|list| list.len()).collect()
    }

    /// Size of the selection product, or `None` past `u128`.
    pub fn total_combinations(&self) -> Option<u128> {
        total_combinations(&self.radices())
    }

    /// Walks the product on the calling thread.
    pub fn run<S>(&self, sink: &mut S, cancel: &CancellationToken) -> Result<EnumerationReport>
    where
        S: ResultSink + ?Sized,
    {
        let total = self.total_combinations();
        info!(
            lists = self.lists.len(),
            total = ?total,
            strategy = ?self.strategy,
            "starting enumeration"
        );

        let started = Instant::now();
        let mut gate = StepGate::new(cancel, None, self.max_steps, None, self.progress_interval);
        let outcome = match self.strategy {
            SearchStrategy::Odometer => {
                self.walk_odometer(Odometer::new(self.radices()), None, &mut gate, sink)?
            }
            SearchStrategy::Pruned => {
                search::depth_first(&self.lists, &self.detector, &mut gate, sink)?
            }
        };

        let report = EnumerationReport {
            total,
            visited: gate.visited,
            emitted: gate.emitted,
            outcome,
            elapsed: started.elapsed(),
        };
        info!(
            visited = report.visited,
            emitted = report.emitted,
            outcome = ?report.outcome,
            elapsed = ?report.elapsed,
            "enumeration finished"
        );
        Ok(report)
    }

    /// Walks the product and returns owned copies of every emission.
    pub fn collect(
        &self,
        cancel: &CancellationToken,
    ) -> Result<(Vec<Schedule>, EnumerationReport)> {
        let mut sink = CollectSink::new();
        let report = self.run(&mut sink, cancel)?;
        Ok((sink.into_schedules(), report))
    }

    /// Odometer walk from the counter's current position.
    ///
    /// `span` limits the walk to that many index vectors (a shard);
    /// `None` walks until the counter is exhausted.
    pub(crate) fn walk_odometer<S>(
        &self,
        mut odometer: Odometer,
        span: Option<u128>,
        gate: &mut StepGate<'_>,
        sink: &mut S,
    ) -> Result<EnumerationOutcome>
    where
        S: ResultSink + ?Sized,
    {
        let mut scratch: Vec<MeetingInterval> = Vec::new();
        let mut remaining = span;

        while !odometer.is_exhausted() && remaining != Some(0) {
            if let Some(stop) = gate.claim_step() {
                return Ok(stop);
            }

            scratch.clear();
            for (list, &index) in self.lists.iter().zip(odometer.digits()) {
                scratch.extend_from_slice(&list[index].meeting_intervals);
            }

            if !self.detector.has_conflict(&scratch) {
                let combination = Combination::select(&self.lists, odometer.digits());
                emit(sink, &combination)?;
                gate.record_emission();
            }
            gate.log_progress();

            if let Some(left) = remaining.as_mut() {
                *left -= 1;
            }
            odometer.advance();
        }

        Ok(EnumerationOutcome::Completed)
    }
}

/// Delivers one combination, logging a refusal.
pub(crate) fn emit<S>(sink: &mut S, combination: &Combination<'_>) -> Result<()>
where
    S: ResultSink + ?Sized,
{
    sink.emit(combination).map_err(|err| {
        warn!(indexes = ?combination.indexes, error = %err, "result sink refused combination");
        ResolveError::Sink(err)
    })
}

/// Per-walk step accounting: cancellation, budget and progress logging.
pub(crate) struct StepGate<'t> {
    cancel: &'t CancellationToken,
    abort: Option<&'t CancellationToken>,
    max_steps: Option<u64>,
    shared_steps: Option<&'t AtomicU64>,
    progress_interval: u64,
    pub(crate) visited: u64,
    pub(crate) emitted: u64,
}

impl<'t> StepGate<'t> {
    /// `shared_steps` makes the budget global across shards.
    pub(crate) fn new(
        cancel: &'t CancellationToken,
        abort: Option<&'t CancellationToken>,
        max_steps: Option<u64>,
        shared_steps: Option<&'t AtomicU64>,
        progress_interval: u64,
    ) -> Self {
        Self {
            cancel,
            abort,
            max_steps,
            shared_steps,
            progress_interval,
            visited: 0,
            emitted: 0,
        }
    }

    /// Reserves the next step, or says why the walk must stop.
    pub(crate) fn claim_step(&mut self) -> Option<EnumerationOutcome> {
        if self.cancel.is_cancelled() || self.abort.is_some_and(CancellationToken::is_cancelled) {
            return Some(EnumerationOutcome::Cancelled);
        }
        if let Some(max) = self.max_steps {
            let used = match self.shared_steps {
                Some(counter) => counter.fetch_add(1, Ordering::Relaxed),
                None => self.visited,
            };
            if used >= max {
                return Some(EnumerationOutcome::StepLimit);
            }
        }
        self.visited += 1;
        None
    }

    pub(crate) fn record_emission(&mut self) {
        self.emitted += 1;
    }

    pub(crate) fn log_progress(&self) {
        if self.progress_interval > 0 && self.visited % self.progress_interval == 0 {
            info!(
                visited = self.visited,
                emitted = self.emitted,
                "enumeration progress"
            );
        }
    }
}
