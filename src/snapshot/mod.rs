// Snapshot management for reverse execution

pub mod timeline;

pub use timeline::{RecordOutcome, Timeline};

use crate::interpreter::engine::Engine;
use crate::interpreter::instruction::Instruction;
use crate::memory::{tape::Tape, Cell};
use std::io::{Read, Seek};
use std::mem::size_of;
use thiserror::Error;

/// Errors from recording or navigating execution history
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("Snapshot memory limit exceeded: {current} + {requested} > {limit}")]
    LimitExceeded {
        current: usize,
        requested: usize,
        limit: usize,
    },

    #[error("Already at the beginning of execution")]
    AtStart,

    #[error("No more snapshots available (execution finished)")]
    AtEnd,

    #[error("No snapshots available")]
    Empty,
}

/// An active loop as seen at one point in history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameView {
    /// Offset just after the loop's `[`
    pub start: u64,
    /// Body executions so far
    pub iterations: u64,
}

/// Snapshot of execution state after one instruction
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tape: Tape,
    pub loops: Vec<FrameView>,
    /// Instruction that produced this state (`None` for the initial state)
    pub instruction: Option<Instruction>,
    /// Source offset of that instruction's byte
    pub offset: u64,
    /// Length of the program output at this point
    pub output_len: usize,
    /// Instructions executed so far
    pub executed: u64,
}

impl Snapshot {
    /// Capture the engine's current state
    pub fn capture<S: Read + Seek, I: Read>(
        engine: &Engine<S, I, Vec<u8>>,
        step: Option<(Instruction, u64)>,
    ) -> Self {
        let stats = engine.stats();
        let loops = engine
            .loops()
            .frames()
            .iter()
            .map(|frame| FrameView {
                start: frame.start,
                iterations: stats.iterations(frame.start),
            })
            .collect();

        Snapshot {
            tape: engine.tape().clone(),
            loops,
            instruction: step.map(|(instruction, _)| instruction),
            offset: step.map_or(0, |(_, offset)| offset),
            output_len: engine.output().len(),
            executed: stats.instructions,
        }
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        size_of::<Self>()
            + self.tape.len() * size_of::<Cell>()
            + self.loops.len() * size_of::<FrameView>()
    }
}

/// Manages execution history for reverse execution
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(SnapshotError::LimitExceeded {
                current: self.current_memory,
                requested: snapshot_size,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}
