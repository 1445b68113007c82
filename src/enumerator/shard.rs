//! Sharded odometer walk on scoped worker threads.
//!
//! The linear index space `[0, total)` is cut into contiguous ranges
//! ([`shard_ranges`]); each worker positions an [`Odometer`] at its range
//! start and walks exactly the range length. Shards are disjoint and cover
//! the space, so the union of emissions equals a sequential walk. Order
//! across shards is not defined.
//!
//! Workers share the sink behind a mutex, the caller's cancellation token,
//! and one step counter for the budget. When a worker's sink call fails,
//! an internal abort token stops the others at their next step boundary
//! and the first error is returned.

use std::ops::Range;
use std::sync::atomic::AtomicU64;
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use super::{
    shard_ranges, CancellationToken, CombinationEnumerator, EnumerationReport, Odometer, StepGate,
};
use crate::error::{ResolveError, Result, SinkError};
use crate::models::Combination;
use crate::sink::ResultSink;

/// Forwards emissions to a sink shared between workers.
struct SharedSink<'m, 's, S: ?Sized> {
    inner: &'m Mutex<&'s mut S>,
}

impl<S: ResultSink + ?Sized> ResultSink for SharedSink<'_, '_, S> {
    fn emit(&mut self, combination: &Combination<'_>) -> std::result::Result<(), SinkError> {
        let mut guard = self.inner.lock().map_err(|_| SinkError::Closed)?;
        (**guard).emit(combination)
    }
}

impl CombinationEnumerator<'_> {
    /// Walks the product on `shards` scoped threads.
    ///
    /// Always uses the odometer regardless of the configured strategy. The
    /// step budget is global: the shards together evaluate at most
    /// `max_steps` index vectors.
    pub fn run_sharded<S>(
        &self,
        shards: usize,
        sink: &mut S,
        cancel: &CancellationToken,
    ) -> Result<EnumerationReport>
    where
        S: ResultSink + Send + ?Sized,
    {
        let total = self.total_combinations().ok_or(ResolveError::Unbounded)?;
        let ranges = shard_ranges(total, shards);
        info!(
            lists = self.lists.len(),
            total = %total,
            shards = ranges.len(),
            "starting sharded enumeration"
        );

        let started = Instant::now();
        let abort = CancellationToken::new();
        let steps = AtomicU64::new(0);
        let shared = Mutex::new(sink);

        let results: Vec<Result<EnumerationReport>> = thread::scope(|scope| {
            let handles: Vec<_> = ranges
                .into_iter()
                .enumerate()
                .map(|(worker, range)| {
                    let (abort, steps, shared) = (&abort, &steps, &shared);
                    scope.spawn(move || {
                        let result = self.walk_shard(worker, range, shared, cancel, abort, steps);
                        if result.is_err() {
                            abort.cancel();
                        }
                        result
                    })
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(worker, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        abort.cancel();
                        Err(ResolveError::Worker(worker))
                    })
                })
                .collect()
        });

        let mut reports = Vec::with_capacity(results.len());
        for result in results {
            reports.push(result?);
        }

        let mut report = EnumerationReport::merge(Some(total), &reports);
        report.elapsed = started.elapsed();
        info!(
            visited = report.visited,
            emitted = report.emitted,
            outcome = ?report.outcome,
            elapsed = ?report.elapsed,
            "sharded enumeration finished"
        );
        Ok(report)
    }

    fn walk_shard<S>(
        &self,
        worker: usize,
        range: Range<u128>,
        shared: &Mutex<&mut S>,
        cancel: &CancellationToken,
        abort: &CancellationToken,
        steps: &AtomicU64,
    ) -> Result<EnumerationReport>
    where
        S: ResultSink + ?Sized,
    {
        debug!(worker, start = %range.start, end = %range.end, "shard started");
        let started = Instant::now();
        let shared_steps = self.max_steps.map(|_| steps);
        let mut gate = StepGate::new(
            cancel,
            Some(abort),
            self.max_steps,
            shared_steps,
            self.progress_interval,
        );
        let mut sink = SharedSink { inner: shared };

        let odometer = Odometer::starting_at(self.radices(), range.start);
        let span = range.end - range.start;
        let outcome = self.walk_odometer(odometer, Some(span), &mut gate, &mut sink)?;

        debug!(
            worker,
            visited = gate.visited,
            emitted = gate.emitted,
            outcome = ?outcome,
            "shard finished"
        );
        Ok(EnumerationReport {
            total: Some(span),
            visited: gate.visited,
            emitted: gate.emitted,
            outcome,
            elapsed: started.elapsed(),
        })
    }
}
