//! Memory model for the tape machine
//!
//! This module provides the data the program operates on:
//! - [`tape`]: The unbounded, bidirectional [`tape::Tape`] of cells
//!
//! # Cell Width
//!
//! Cells are stored as [`Cell`] (`i64`) and normalized by [`CellWidth`]:
//! - `Byte`: 8-bit wrapping, values stay in `0..=255`
//! - `Native`: full 64-bit wrapping arithmetic
//!
//! Output always emits the low 8 bits of a cell regardless of width.

pub mod tape;

/// Raw storage type of a tape cell
pub type Cell = i64;

/// Arithmetic width applied to every cell mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellWidth {
    /// 8-bit unsigned cells with wraparound
    #[default]
    Byte,
    /// 64-bit signed cells with wraparound
    Native,
}

impl CellWidth {
    /// Normalize a value into the range of this width
    pub fn wrap(self, value: Cell) -> Cell {
        match self {
            CellWidth::Byte => Cell::from(value as u8),
            CellWidth::Native => value,
        }
    }
}
