//! Error types for the tape interpreter
//!
//! This module defines [`EngineError`], which represents every fault the
//! execution engine can detect, and [`ErrorKind`], the flat taxonomy shared
//! with the harness (which adds the "stream unavailable" kinds itself).
//!
//! All engine errors are fatal: the engine halts and reports the byte offset
//! of the fault. Neither the tape nor the loop tracker can fail on their own.

use super::constants::{
    EXIT_IO_FAULT, EXIT_UNAVAILABLE, EXIT_UNMATCHED_CLOSE, EXIT_UNMATCHED_OPEN,
};
use std::io;
use thiserror::Error;

/// Flat classification of every terminal failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source file could not be opened (harness only)
    SourceUnavailable,
    /// The program input file could not be opened (harness only)
    InputUnavailable,
    /// A loop skip scan, or the end of the source, was reached with a loop
    /// still open
    UnmatchedOpen,
    /// A `]` was met with no active loop frame
    UnmatchedClose,
    /// Reading or writing a program stream failed
    IoFault,
}

impl ErrorKind {
    /// Process exit code the harness reports for this kind
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::SourceUnavailable | ErrorKind::InputUnavailable => EXIT_UNAVAILABLE,
            ErrorKind::UnmatchedOpen => EXIT_UNMATCHED_OPEN,
            ErrorKind::UnmatchedClose => EXIT_UNMATCHED_CLOSE,
            ErrorKind::IoFault => EXIT_IO_FAULT,
        }
    }
}

/// Faults raised while executing a program
#[derive(Debug, Error)]
pub enum EngineError {
    /// `offset` is where the skip scan started (just after the `[`)
    #[error("Unmatched start loop encountered.")]
    UnmatchedOpen { offset: u64 },

    /// `offset` is the position of the offending `]`
    #[error("Unmatched end loop encountered.")]
    UnmatchedClose { offset: u64 },

    #[error("I/O fault: {source}")]
    Io {
        offset: u64,
        #[source]
        source: io::Error,
    },
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::UnmatchedOpen { .. } => ErrorKind::UnmatchedOpen,
            EngineError::UnmatchedClose { .. } => ErrorKind::UnmatchedClose,
            EngineError::Io { .. } => ErrorKind::IoFault,
        }
    }

    /// Rebuild the error a halted engine stopped on from its recorded status
    pub fn halted(kind: ErrorKind, offset: u64) -> Self {
        match kind {
            ErrorKind::UnmatchedOpen => EngineError::UnmatchedOpen { offset },
            ErrorKind::UnmatchedClose => EngineError::UnmatchedClose { offset },
            ErrorKind::IoFault | ErrorKind::SourceUnavailable | ErrorKind::InputUnavailable => {
                EngineError::Io {
                    offset,
                    source: io::Error::other("engine halted by an earlier I/O fault"),
                }
            }
        }
    }

    /// Source byte offset at which the fault was detected
    pub fn offset(&self) -> u64 {
        match self {
            EngineError::UnmatchedOpen { offset }
            | EngineError::UnmatchedClose { offset }
            | EngineError::Io { offset, .. } => *offset,
        }
    }
}
