//! Error types for the conflict resolver.
//!
//! Only genuine failures are errors. An empty candidate list and a
//! cancelled walk are normal terminal states and are reported through
//! [`EnumerationOutcome`](crate::enumerator::EnumerationOutcome) instead.

use thiserror::Error;

/// Failure to turn catalog text into a model value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Meeting-time text does not match `H:MM am|pm - H:MM am|pm`.
    #[error("meeting time '{0}' does not match 'H:MM am - H:MM pm'")]
    MeetingTime(String),

    /// Hour or minute outside the 12-hour clock face.
    #[error("time component out of range in '{0}'")]
    OutOfRange(String),

    /// Interval whose end is not after its start.
    #[error("meeting time '{0}' ends before it starts")]
    Inverted(String),

    /// Day string contains a symbol outside `MTWRFSU`.
    #[error("unknown day symbol '{symbol}' in '{days}'")]
    UnknownDay { symbol: char, days: String },

    /// Section code with no recognizable category prefix.
    #[error("section code '{0}' has no known category (expected A, B or T)")]
    SectionCode(String),

    /// Course token that is not `<letters><digits>`.
    #[error("course '{0}' is not of the form SUBJECT123")]
    CourseName(String),
}

/// The result sink refused an emission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The underlying transport has been closed by the consumer.
    #[error("result sink closed")]
    Closed,

    /// Writing the emission failed.
    #[error("result sink write failed: {0}")]
    Write(String),
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::Write(err.to_string())
    }
}

impl From<serde_json::Error> for SinkError {
    fn from(err: serde_json::Error) -> Self {
        SinkError::Write(err.to_string())
    }
}

/// Top-level error for the resolver pipeline.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The catalog fetcher failed for a course.
    #[error("catalog fetch failed for {course}: {reason}")]
    Fetch { course: String, reason: String },

    /// A raw section could not be normalized while building a course.
    #[error("section {section_code} of {course}: {source}")]
    Section {
        course: String,
        section_code: String,
        #[source]
        source: ParseError,
    },

    /// Configuration values that cannot describe a daily window.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The combination count does not fit the sharding index space.
    #[error("combination count exceeds the shardable index space")]
    Unbounded,

    /// A shard worker panicked.
    #[error("shard worker {0} panicked")]
    Worker(usize),
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, ResolveError>;
