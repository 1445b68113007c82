//! Pruned depth-first search over partial assignments.
//!
//! # Algorithm
//! Level `k` chooses a section from list `k`. A candidate is tested only
//! against the meetings already placed at levels `0..k`
//! ([`ConflictDetector::conflicts_with`]); on conflict every completion of
//! that prefix is skipped. Sibling order is list order, so emissions come
//! out in the same lexicographic order as the odometer.
//!
//! The walk is iterative: `placed` holds the meetings of the current
//! prefix and `marks[k]` is its length before level `k` was added, so
//! backtracking is a truncate.
//!
//! Each tested node counts as one step against the budget.

use super::{emit, EnumerationOutcome, StepGate};
use crate::conflict::ConflictDetector;
use crate::error::Result;
use crate::models::{Combination, MeetingInterval, Section};
use crate::sink::ResultSink;

pub(crate) fn depth_first<S>(
    lists: &[&[Section]],
    detector: &ConflictDetector,
    gate: &mut StepGate<'_>,
    sink: &mut S,
) -> Result<EnumerationOutcome>
where
    S: ResultSink + ?Sized,
{
    if lists.is_empty() || lists.iter().any(|list| list.is_empty()) {
        return Ok(EnumerationOutcome::Completed);
    }

    let leaf = lists.len() - 1;
    let mut digits = vec![0usize; lists.len()];
    let mut marks: Vec<usize> = Vec::with_capacity(lists.len());
    let mut placed: Vec<MeetingInterval> = Vec::new();
    let mut depth = 0;

    loop {
        if let Some(stop) = gate.claim_step() {
            return Ok(stop);
        }

        let section = &lists[depth][digits[depth]];
        let accepted = !detector.conflicts_with(&placed, &section.meeting_intervals);
        gate.log_progress();

        if accepted {
            if depth < leaf {
                marks.push(placed.len());
                placed.extend_from_slice(&section.meeting_intervals);
                depth += 1;
                digits[depth] = 0;
                continue;
            }
            let combination = Combination::select(lists, &digits);
            emit(sink, &combination)?;
            gate.record_emission();
        }

        // Next sibling, climbing out of exhausted levels.
        loop {
            digits[depth] += 1;
            if digits[depth] < lists[depth].len() {
                break;
            }
            if depth == 0 {
                return Ok(EnumerationOutcome::Completed);
            }
            depth -= 1;
            if let Some(mark) = marks.pop() {
                placed.truncate(mark);
            }
        }
    }
}
