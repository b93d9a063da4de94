//! Recorded execution history.
//!
//! [`Timeline::record`] runs a program to the end before any UI is shown,
//! taking a [`Snapshot`] after every instruction. Navigation afterwards only
//! moves a cursor through the recorded snapshots; nothing is re-executed.
//!
//! Program output is stored once for the whole run and each snapshot keeps
//! only the output length, so stepping backward "un-prints" output by
//! slicing.

use super::{Snapshot, SnapshotError, SnapshotManager};
use crate::interpreter::engine::{Engine, EngineConfig, Step};
use crate::interpreter::errors::{EngineError, ErrorKind};
use crate::interpreter::stats::ExecutionStats;
use std::io::{Read, Seek};
use tracing::{debug, warn};

/// How the recorded run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Completed,
    /// The engine stopped on a fault
    Failed {
        kind: ErrorKind,
        offset: u64,
        message: String,
    },
}

/// A recorded run plus a cursor into it
#[derive(Debug)]
pub struct Timeline {
    snapshots: SnapshotManager,
    output: Vec<u8>,
    outcome: RecordOutcome,
    /// Budget that stopped snapshotting early, if any
    truncated: Option<usize>,
    stats: ExecutionStats,
    position: usize,
}

impl Timeline {
    /// Execute the program, snapshotting every instruction.
    ///
    /// Running out of snapshot budget only stops snapshotting: the engine is
    /// still driven to its end, so output and outcome match a plain run.
    pub fn record<S: Read + Seek, I: Read>(
        source: S,
        input: I,
        config: EngineConfig,
        memory_limit: usize,
    ) -> Self {
        let mut engine = Engine::with_config(source, input, Vec::new(), config);
        let mut snapshots = SnapshotManager::new(memory_limit);

        let mut recording = match snapshots.push(Snapshot::capture(&engine, None)) {
            Ok(()) => true,
            Err(e) => {
                warn!("recording stopped: {}", e);
                false
            }
        };

        let outcome = loop {
            match engine.step() {
                Ok(Step::Executed {
                    instruction,
                    offset,
                }) => {
                    if !recording {
                        continue;
                    }
                    let snapshot = Snapshot::capture(&engine, Some((instruction, offset)));
                    if let Err(e) = snapshots.push(snapshot) {
                        warn!(executed = engine.stats().instructions, "recording stopped: {}", e);
                        recording = false;
                    }
                }
                Ok(Step::Finished) => break RecordOutcome::Completed,
                Ok(Step::Halted { kind, offset }) => {
                    break RecordOutcome::Failed {
                        kind,
                        offset,
                        message: EngineError::halted(kind, offset).to_string(),
                    }
                }
                Err(e) => {
                    break RecordOutcome::Failed {
                        kind: e.kind(),
                        offset: e.offset(),
                        message: e.to_string(),
                    }
                }
            }
        };

        debug!(
            snapshots = snapshots.len(),
            bytes = snapshots.memory_usage(),
            limit = snapshots.memory_limit(),
            "recording finished"
        );

        let stats = engine.stats().clone();
        Timeline {
            snapshots,
            output: engine.into_output(),
            outcome,
            truncated: (!recording).then_some(memory_limit),
            stats,
            position: 0,
        }
    }

    pub fn outcome(&self) -> &RecordOutcome {
        &self.outcome
    }

    /// Counters for the whole recorded run
    pub fn stats(&self) -> &ExecutionStats {
        &self.stats
    }

    /// Snapshot under the cursor
    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.position)
    }

    /// Snapshot budget that cut the history short, if it ran out
    pub fn truncated(&self) -> Option<usize> {
        self.truncated
    }

    /// Everything the program wrote during the whole run
    pub fn full_output(&self) -> &[u8] {
        &self.output
    }

    /// Program output produced up to the cursor
    pub fn output(&self) -> &[u8] {
        let len = self.current().map_or(0, |s| s.output_len);
        &self.output[..len.min(self.output.len())]
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.snapshots.len()
    }

    pub fn step_forward(&mut self) -> Result<(), SnapshotError> {
        if self.is_at_end() {
            return Err(SnapshotError::AtEnd);
        }
        self.position += 1;
        Ok(())
    }

    pub fn step_backward(&mut self) -> Result<(), SnapshotError> {
        if self.position == 0 {
            return Err(SnapshotError::AtStart);
        }
        self.position -= 1;
        Ok(())
    }

    pub fn rewind_to_start(&mut self) -> Result<(), SnapshotError> {
        if self.snapshots.is_empty() {
            return Err(SnapshotError::Empty);
        }
        self.position = 0;
        Ok(())
    }

    pub fn jump_to_end(&mut self) -> Result<(), SnapshotError> {
        if self.snapshots.is_empty() {
            return Err(SnapshotError::Empty);
        }
        self.position = self.snapshots.len() - 1;
        Ok(())
    }
}
