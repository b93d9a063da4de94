//! Execution counters collected while a program runs

use rustc_hash::FxHashMap;

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Instructions dispatched (inert bytes excluded)
    pub instructions: u64,
    /// Loop checks that found a non-zero cell
    pub loop_entries: u64,
    /// Loop checks that found zero and skipped or left the loop
    pub loop_skips: u64,
    /// Bytes taken from the program input (end-of-input excluded)
    pub bytes_read: u64,
    /// Bytes written to the program output
    pub bytes_written: u64,
    /// Body executions per loop, keyed by the loop's start offset
    pub loop_iterations: FxHashMap<u64, u64>,
}

impl ExecutionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_entry(&mut self, start: u64) {
        self.loop_entries += 1;
        *self.loop_iterations.entry(start).or_insert(0) += 1;
    }

    /// Iterations run so far by the loop starting at `start`
    pub fn iterations(&self, start: u64) -> u64 {
        self.loop_iterations.get(&start).copied().unwrap_or(0)
    }

    /// The loop with the most iterations, ties broken by lowest offset
    pub fn hottest_loop(&self) -> Option<(u64, u64)> {
        self.loop_iterations
            .iter()
            .map(|(&start, &count)| (start, count))
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
    }
}
