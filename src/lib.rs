//! # Introduction
//!
//! tapeworm executes programs for an eight-instruction tape machine
//! (`> < + - . , [ ]`), reading the source one byte at a time from a seekable
//! stream. Loops are matched lazily: there is no pre-scan and no jump table,
//! so every loop entry, repeat and skip re-reads the source around it.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source (Read + Seek) → Engine ⇄ Tape / LoopStack → Output
//!                           ↓
//!                      Snapshots → TUI
//! ```
//!
//! 1. [`interpreter`]: the [`interpreter::engine::Engine`] dispatch loop, the
//!    loop frame stack, typed errors and run statistics.
//! 2. [`memory`]: the bidirectionally unbounded [`memory::tape::Tape`] and
//!    cell width configuration.
//! 3. [`harness`]: stream setup, the error banner and the execution report
//!    used by the command-line front end.
//! 4. [`snapshot`]: records a whole run as a [`snapshot::Timeline`] of
//!    per-instruction snapshots under a memory budget.
//! 5. [`ui`]: ratatui-based TUI for stepping through a timeline; not part of
//!    the stable library API.
//!
//! ## Quick start
//!
//! ```
//! use std::io::{empty, Cursor};
//! use tapeworm::interpreter::engine::run;
//!
//! let mut output = Vec::new();
//! run(Cursor::new(b"++++++++[>++++++++<-]>+.".to_vec()), empty(), &mut output).unwrap();
//! assert_eq!(output, b"A");
//! ```

pub mod harness;
pub mod interpreter;
pub mod memory;
pub mod snapshot;
pub mod ui;
