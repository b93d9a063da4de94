//! The eight-instruction set
//!
//! Every source byte is either one of the instructions below or inert.
//! Inert bytes are skipped by the engine, so arbitrary text may be
//! interleaved with code.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `>`
    MoveRight,
    /// `<`
    MoveLeft,
    /// `+`
    Increment,
    /// `-`
    Decrement,
    /// `.`
    Output,
    /// `,`
    Input,
    /// `[`
    LoopStart,
    /// `]`
    LoopEnd,
}

impl Instruction {
    /// Decode a source byte; `None` for inert bytes
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'>' => Some(Instruction::MoveRight),
            b'<' => Some(Instruction::MoveLeft),
            b'+' => Some(Instruction::Increment),
            b'-' => Some(Instruction::Decrement),
            b'.' => Some(Instruction::Output),
            b',' => Some(Instruction::Input),
            b'[' => Some(Instruction::LoopStart),
            b']' => Some(Instruction::LoopEnd),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Instruction::MoveRight => b'>',
            Instruction::MoveLeft => b'<',
            Instruction::Increment => b'+',
            Instruction::Decrement => b'-',
            Instruction::Output => b'.',
            Instruction::Input => b',',
            Instruction::LoopStart => b'[',
            Instruction::LoopEnd => b']',
        }
    }

    /// Short description used by the visualizer's status line
    pub fn describe(self) -> &'static str {
        match self {
            Instruction::MoveRight => "move right",
            Instruction::MoveLeft => "move left",
            Instruction::Increment => "increment",
            Instruction::Decrement => "decrement",
            Instruction::Output => "output",
            Instruction::Input => "input",
            Instruction::LoopStart => "loop check",
            Instruction::LoopEnd => "jump back",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_byte() as char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_all_instructions() {
        for byte in b"><+-.,[]" {
            let instr = Instruction::from_byte(*byte).expect("instruction byte");
            assert_eq!(instr.as_byte(), *byte);
        }
    }

    #[test]
    fn test_everything_else_is_inert() {
        let inert = (0u8..=255)
            .filter(|b| Instruction::from_byte(*b).is_none())
            .count();
        assert_eq!(inert, 256 - 8);
        assert_eq!(Instruction::from_byte(b'a'), None);
        assert_eq!(Instruction::from_byte(b'\n'), None);
    }
}
