//! Tape-language execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: The [`engine::Engine`] and its dispatch loop
//! - [`loops`]: Active-loop frames and the re-entry rule
//! - [`source`]: Seekable, offset-tracking access to the program text
//! - [`instruction`]: The eight instructions; every other byte is inert
//! - [`errors`]: Engine error types and the shared error taxonomy
//! - [`stats`]: Counters collected during a run
//!
//! # Execution Model
//!
//! The engine interprets the source stream directly. There is no compile or
//! bracket-matching pass: a `[` that must be skipped is scanned forward to
//! its match every time, and a `]` seeks back onto the innermost active `[`
//! so its entry check runs again.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod instruction;
pub mod loops;
pub mod source;
pub mod stats;
