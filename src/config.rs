//! Resolver configuration.
//!
//! All knobs the core consumes: the normalizer's daily window, the
//! detector's optional second window, the 12-hour clock convention,
//! grouping equivalence, search strategy and walk limits.
//!
//! By default sections must start at or after 07:00 and end no later than
//! 23:59. There is no detector window, and the walk is a full odometer pass
//! on one thread.

use serde::{Deserialize, Serialize};

use crate::error::{ResolveError, Result};

/// A daily window expressed in whole hours.
///
/// How the bounds are compared depends on the stage that uses the window:
/// the normalizer rejects `end.hour > latest`, the conflict detector
/// rejects `end.hour >= latest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourWindow {
    /// Earliest allowed start hour (inclusive).
    pub earliest_start_hour: u8,
    /// Latest allowed end hour.
    pub latest_end_hour: u8,
}

impl HourWindow {
    /// Creates a window.
    pub fn new(earliest_start_hour: u8, latest_end_hour: u8) -> Self {
        Self {
            earliest_start_hour,
            latest_end_hour,
        }
    }

    /// Window used when loading sections from the catalog.
    pub fn catalog_default() -> Self {
        Self::new(7, 23)
    }

    /// Window of the batch variant's detector pre-check.
    pub fn office_hours() -> Self {
        Self::new(7, 17)
    }

    fn validate(&self, label: &str) -> Result<()> {
        if self.earliest_start_hour > 23 || self.latest_end_hour > 24 {
            return Err(ResolveError::Config(format!(
                "{label} window {}..{} is outside the day",
                self.earliest_start_hour, self.latest_end_hour
            )));
        }
        if self.earliest_start_hour > self.latest_end_hour {
            return Err(ResolveError::Config(format!(
                "{label} window starts at {} but ends at {}",
                self.earliest_start_hour, self.latest_end_hour
            )));
        }
        Ok(())
    }
}

impl Default for HourWindow {
    fn default() -> Self {
        Self::catalog_default()
    }
}

/// How `12 am` / `12 pm` map onto the 24-hour clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HourConvention {
    /// 12 am is midnight (hour 0), 12 pm is noon.
    #[default]
    Standard,
    /// Add 12 to pm hours below 12, leave everything else alone.
    /// `12 am` therefore lands on hour 12.
    Legacy,
}

/// Which equality decides that two sections are interchangeable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupingMode {
    /// Interval sequences must match position by position.
    #[default]
    OrderSensitive,
    /// Interval sequences must match as multisets.
    OrderInsensitive,
}

/// How the enumerator walks the candidate product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Visit every index vector with a mixed-radix counter.
    #[default]
    Odometer,
    /// Depth-first over partial assignments, dropping a prefix as soon as
    /// it conflicts. Emits the same combinations in the same order.
    Pruned,
}

/// What candidate building does with a section whose times fail to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsePolicy {
    /// Log and drop the section; keep the rest of the course.
    SkipSection,
    /// Fail the whole course.
    #[default]
    AbortCourse,
}

/// Complete configuration for candidate building and enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Window applied while normalizing catalog sections.
    pub section_window: HourWindow,
    /// Optional window applied by the conflict detector to every
    /// combination. `None` disables the pre-check.
    pub detector_window: Option<HourWindow>,
    /// am/pm resolution rule.
    pub hour_convention: HourConvention,
    /// Section equivalence used by the grouper.
    pub grouping: GroupingMode,
    /// Enumeration strategy.
    pub strategy: SearchStrategy,
    /// Reaction to unparsable meeting times.
    pub parse_policy: ParsePolicy,
    /// Stop after this many evaluated steps. `None` = walk to the end.
    pub max_steps: Option<u64>,
    /// Steps between progress log lines. `0` disables progress logging.
    pub progress_interval: u64,
    /// Number of worker threads for a sharded walk. `1` = sequential.
    pub shards: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            section_window: HourWindow::catalog_default(),
            detector_window: None,
            hour_convention: HourConvention::Standard,
            grouping: GroupingMode::OrderSensitive,
            strategy: SearchStrategy::Odometer,
            parse_policy: ParsePolicy::AbortCourse,
            max_steps: None,
            progress_interval: 1_000_000,
            shards: 1,
        }
    }
}

impl ResolverConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the normalizer window.
    pub fn with_section_window(mut self, earliest_start_hour: u8, latest_end_hour: u8) -> Self {
        self.section_window = HourWindow::new(earliest_start_hour, latest_end_hour);
        self
    }

    /// Enables the detector's window pre-check.
    pub fn with_detector_window(mut self, floor_hour: u8, ceiling_hour: u8) -> Self {
        self.detector_window = Some(HourWindow::new(floor_hour, ceiling_hour));
        self
    }

    /// Sets the 12-hour clock convention.
    pub fn with_hour_convention(mut self, convention: HourConvention) -> Self {
        self.hour_convention = convention;
        self
    }

    /// Sets the grouping equivalence.
    pub fn with_grouping(mut self, grouping: GroupingMode) -> Self {
        self.grouping = grouping;
        self
    }

    /// Sets the search strategy.
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the parse policy.
    pub fn with_parse_policy(mut self, policy: ParsePolicy) -> Self {
        self.parse_policy = policy;
        self
    }

    /// Limits the walk to `steps` evaluations.
    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    /// Sets the progress log interval.
    pub fn with_progress_interval(mut self, steps: u64) -> Self {
        self.progress_interval = steps;
        self
    }

    /// Sets the number of shard workers.
    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    /// Checks that windows describe a valid day and that at least one
    /// worker is requested.
    pub fn validate(&self) -> Result<()> {
        self.section_window.validate("section")?;
        if let Some(window) = &self.detector_window {
            window.validate("detector")?;
        }
        if self.shards == 0 {
            return Err(ResolveError::Config("shards must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.section_window, HourWindow::new(7, 23));
        assert_eq!(config.detector_window, None);
        assert_eq!(config.hour_convention, HourConvention::Standard);
        assert_eq!(config.strategy, SearchStrategy::Odometer);
        assert_eq!(config.shards, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ResolverConfig::new()
            .with_section_window(8, 20)
            .with_detector_window(7, 17)
            .with_hour_convention(HourConvention::Legacy)
            .with_grouping(GroupingMode::OrderInsensitive)
            .with_strategy(SearchStrategy::Pruned)
            .with_parse_policy(ParsePolicy::SkipSection)
            .with_max_steps(10)
            .with_progress_interval(0)
            .with_shards(4);

        assert_eq!(config.section_window.earliest_start_hour, 8);
        assert_eq!(config.detector_window, Some(HourWindow::office_hours()));
        assert_eq!(config.max_steps, Some(10));
        assert_eq!(config.shards, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let config = ResolverConfig::new().with_section_window(18, 9);
        assert!(matches!(config.validate(), Err(ResolveError::Config(_))));
    }

    #[test]
    fn test_out_of_day_window_rejected() {
        let config = ResolverConfig::new().with_detector_window(7, 30);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_shards_rejected() {
        let config = ResolverConfig::new().with_shards(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"detector_window": {"earliest_start_hour": 7, "latest_end_hour": 17}}"#;
        let config: ResolverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.detector_window, Some(HourWindow::office_hours()));
        assert_eq!(config.section_window, HourWindow::catalog_default());
        assert_eq!(config.progress_interval, 1_000_000);
    }
}
