//! Bidirectionally unbounded tape of integer cells
//!
//! The tape is a ring buffer of cells plus two indices: `origin` (where
//! position 0 lives in the buffer) and `cursor`. Moving past either end
//! materializes a fresh zero cell, so the cursor always designates an
//! existing cell and no move can fail.
//!
//! # Layout
//!
//! ```text
//!  position:  -2  -1   0   1   2
//!  buffer:   [ 0 | 7 | 3 | 0 | 1 ]
//!                      ^origin
//! ```
//!
//! Growing left pushes to the front of the buffer and shifts `origin` and
//! `cursor` by one, which keeps every existing cell's position stable.

use super::{Cell, CellWidth};
use std::collections::VecDeque;

/// The tape operated on by a running program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: VecDeque<Cell>,
    origin: usize,
    cursor: usize,
    width: CellWidth,
}

impl Tape {
    /// Create a tape holding a single zero cell at position 0
    pub fn new(width: CellWidth) -> Self {
        let mut cells = VecDeque::with_capacity(64);
        cells.push_back(0);
        Tape {
            cells,
            origin: 0,
            cursor: 0,
            width,
        }
    }

    /// Move the cursor one cell to the right, growing the tape if needed
    pub fn move_right(&mut self) {
        self.cursor += 1;
        if self.cursor == self.cells.len() {
            self.cells.push_back(0);
        }
    }

    /// Move the cursor one cell to the left, growing the tape if needed
    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            self.cells.push_front(0);
            self.origin += 1;
        } else {
            self.cursor -= 1;
        }
    }

    pub fn increment(&mut self) {
        let value = self.get().wrapping_add(1);
        self.set(value);
    }

    pub fn decrement(&mut self) {
        let value = self.get().wrapping_sub(1);
        self.set(value);
    }

    /// Raw value of the cell under the cursor
    pub fn get(&self) -> Cell {
        self.cells[self.cursor]
    }

    /// Store a raw value under the cursor, wrapped to the tape's cell width
    pub fn set(&mut self, value: Cell) {
        self.cells[self.cursor] = self.width.wrap(value);
    }

    /// The cursor cell as an output byte (low 8 bits)
    pub fn read(&self) -> u8 {
        self.get() as u8
    }

    /// Store an input byte under the cursor
    pub fn write(&mut self, byte: u8) {
        self.set(Cell::from(byte));
    }

    /// Cursor position relative to the origin
    pub fn position(&self) -> i64 {
        self.cursor as i64 - self.origin as i64
    }

    /// Leftmost and rightmost materialized positions
    pub fn extent(&self) -> (i64, i64) {
        let left = -(self.origin as i64);
        let right = (self.cells.len() - 1 - self.origin) as i64;
        (left, right)
    }

    /// Value at an arbitrary position, if that cell has been materialized
    pub fn value_at(&self, position: i64) -> Option<Cell> {
        let index = position.checked_add(self.origin as i64)?;
        if index < 0 {
            return None;
        }
        self.cells.get(index as usize).copied()
    }

    /// Number of materialized cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A tape always holds at least the origin cell
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate `(position, value)` pairs from the leftmost cell
    pub fn cells(&self) -> impl Iterator<Item = (i64, Cell)> + '_ {
        let origin = self.origin as i64;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &value)| (i as i64 - origin, value))
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(CellWidth::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tape_has_one_zero_cell() {
        let tape = Tape::default();
        assert_eq!(tape.len(), 1);
        assert_eq!(tape.get(), 0);
        assert_eq!(tape.position(), 0);
        assert_eq!(tape.extent(), (0, 0));
    }

    #[test]
    fn test_grows_right_lazily() {
        let mut tape = Tape::default();
        tape.move_right();
        tape.move_right();
        assert_eq!(tape.len(), 3);
        assert_eq!(tape.position(), 2);

        // Revisiting existing cells does not grow the tape
        tape.move_left();
        tape.move_right();
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn test_grows_left_without_bound() {
        let mut tape = Tape::default();
        tape.increment();
        for _ in 0..1000 {
            tape.move_left();
        }
        assert_eq!(tape.position(), -1000);
        assert_eq!(tape.extent(), (-1000, 0));
        assert_eq!(tape.value_at(0), Some(1));
        assert_eq!(tape.value_at(-1000), Some(0));
        assert_eq!(tape.value_at(1), None);
    }

    #[test]
    fn test_round_trip_keeps_value() {
        let mut tape = Tape::default();
        tape.set(42);
        tape.move_left();
        tape.move_right();
        assert_eq!(tape.get(), 42);
        tape.move_right();
        tape.move_left();
        assert_eq!(tape.get(), 42);
    }

    #[test]
    fn test_byte_cells_wrap() {
        let mut tape = Tape::new(CellWidth::Byte);
        tape.decrement();
        assert_eq!(tape.get(), 255);
        tape.increment();
        assert_eq!(tape.get(), 0);
        tape.set(-1);
        assert_eq!(tape.read(), 255);
    }

    #[test]
    fn test_native_cells_go_negative() {
        let mut tape = Tape::new(CellWidth::Native);
        tape.decrement();
        assert_eq!(tape.get(), -1);
        assert_eq!(tape.read(), 255);

        tape.set(Cell::MAX);
        tape.increment();
        assert_eq!(tape.get(), Cell::MIN);
    }

    #[test]
    fn test_write_reads_back_as_byte() {
        let mut tape = Tape::new(CellWidth::Native);
        tape.write(200);
        assert_eq!(tape.get(), 200);
        tape.set(0x1_41);
        assert_eq!(tape.read(), 0x41);
    }

    #[test]
    fn test_cells_iterates_by_position() {
        let mut tape = Tape::default();
        tape.move_left();
        tape.set(5);
        tape.move_right();
        tape.move_right();
        tape.set(7);

        let cells: Vec<(i64, Cell)> = tape.cells().collect();
        assert_eq!(cells, vec![(-1, 5), (0, 0), (1, 7)]);
    }
}
