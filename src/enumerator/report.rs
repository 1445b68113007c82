//! Enumeration run summary.
//!
//! | Field | Meaning |
//! |-------|---------|
//! | total | Size of the selection product (`None` past `u128`) |
//! | visited | Steps evaluated (full combinations, or partial assignments when pruned) |
//! | emitted | Conflict-free combinations delivered to the sink |
//! | outcome | Why the walk stopped |

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnumerationOutcome {
    /// Every index vector was considered.
    Completed,
    /// The cancellation token was set.
    Cancelled,
    /// The configured step budget ran out.
    StepLimit,
}

/// Summary of one enumeration run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationReport {
    /// Product of candidate-list lengths.
    pub total: Option<u128>,
    /// Steps evaluated.
    pub visited: u64,
    /// Combinations delivered.
    pub emitted: u64,
    /// Stop reason.
    pub outcome: EnumerationOutcome,
    /// Wall-clock duration.
    pub elapsed: Duration,
}

impl EnumerationReport {
    /// Whether the walk ran to the end.
    pub fn is_complete(&self) -> bool {
        self.outcome == EnumerationOutcome::Completed
    }

    /// Fraction of visited steps that produced an emission.
    pub fn yield_rate(&self) -> f64 {
        if self.visited == 0 {
            0.0
        } else {
            self.emitted as f64 / self.visited as f64
        }
    }

    /// Combines the reports of disjoint shards of one walk.
    ///
    /// The merged outcome is `Completed` only if every shard completed;
    /// otherwise the first non-completed outcome wins.
    pub fn merge(total: Option<u128>, shards: &[EnumerationReport]) -> Self {
        let outcome = shards
            .iter()
            .map(|r| r.outcome)
            .find(|o| *o != EnumerationOutcome::Completed)
            .unwrap_or(EnumerationOutcome::Completed);

        Self {
            total,
            visited: shards.iter().map(|r| r.visited).sum(),
            emitted: shards.iter().map(|r| r.emitted).sum(),
            outcome,
            elapsed: shards.iter().map(|r| r.elapsed).max().unwrap_or_default(),
        }
    }
}
