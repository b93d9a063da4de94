//! Property-based tests for the tape and the engine.
//!
//! Uses proptest to verify invariants across randomly generated programs.
//! Generated programs may loop forever, so engine runs are capped at a fixed
//! number of steps; inert bytes never count as a step.

use std::io::Cursor;

use proptest::prelude::*;
use tapeworm::interpreter::engine::{Engine, Step};
use tapeworm::interpreter::errors::ErrorKind;
use tapeworm::interpreter::instruction::Instruction;
use tapeworm::memory::{tape::Tape, CellWidth};

const STEP_BUDGET: usize = 2_000;

/// Bytes that are never instructions
const INERT: &[char] = &['a', 'z', ' ', '\n', '#', '!', '0', '~'];

/// What a capped run did
#[derive(Debug, PartialEq)]
struct Trace {
    executed: Vec<Instruction>,
    output: Vec<u8>,
    error: Option<ErrorKind>,
}

fn trace(program: &str) -> Trace {
    let mut engine = Engine::new(
        Cursor::new(program.as_bytes().to_vec()),
        Cursor::new(b"hi".to_vec()),
        Vec::new(),
    );
    let mut executed = Vec::new();
    let mut error = None;
    for _ in 0..STEP_BUDGET {
        match engine.step() {
            Ok(Step::Executed { instruction, .. }) => executed.push(instruction),
            Ok(Step::Finished) | Ok(Step::Halted { .. }) => break,
            Err(e) => {
                error = Some(e.kind());
                break;
            }
        }
    }
    Trace {
        executed,
        output: engine.into_output(),
        error,
    }
}

/// Straight-line code: no brackets
fn straight_line() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[-+<>.,]{0,12}").unwrap()
}

/// Programs with balanced brackets
fn balanced_program() -> impl Strategy<Value = String> {
    straight_line().prop_recursive(3, 48, 4, |inner| {
        prop::collection::vec(
            prop_oneof![
                inner.clone(),
                inner.prop_map(|body| format!("[{}]", body)),
            ],
            1..4,
        )
        .prop_map(|parts| parts.concat())
    })
}

fn insert_comments(program: &str, comments: &[(usize, char)]) -> String {
    let mut chars: Vec<char> = program.chars().collect();
    for &(at, c) in comments {
        let at = at % (chars.len() + 1);
        chars.insert(at, c);
    }
    chars.into_iter().collect()
}

// ========================================================================
// Tape Property Tests
// ========================================================================

proptest! {
    /// Any walk stays in bounds and a step out and back is a no-op.
    #[test]
    fn prop_tape_round_trip(ops in prop::collection::vec(0u8..4, 0..200)) {
        let mut tape = Tape::new(CellWidth::Byte);
        for op in ops {
            match op {
                0 => tape.move_right(),
                1 => tape.move_left(),
                2 => tape.increment(),
                _ => tape.decrement(),
            }
        }

        let position = tape.position();
        let value = tape.get();

        tape.move_left();
        tape.move_right();
        prop_assert_eq!(tape.position(), position);
        prop_assert_eq!(tape.get(), value);

        tape.move_right();
        tape.move_left();
        prop_assert_eq!(tape.position(), position);
        prop_assert_eq!(tape.get(), value);

        let (left, right) = tape.extent();
        prop_assert!(left <= position && position <= right);
        prop_assert_eq!(tape.len() as i64, right - left + 1);
    }

    /// Byte cells never leave 0..=255.
    #[test]
    fn prop_byte_cells_stay_in_range(deltas in prop::collection::vec(any::<bool>(), 0..600)) {
        let mut tape = Tape::new(CellWidth::Byte);
        let mut expected: i64 = 0;
        for up in deltas {
            if up {
                tape.increment();
                expected += 1;
            } else {
                tape.decrement();
                expected -= 1;
            }
            prop_assert!((0..=255).contains(&tape.get()));
        }
        prop_assert_eq!(tape.get(), expected.rem_euclid(256));
    }
}

// ========================================================================
// Engine Property Tests
// ========================================================================

proptest! {
    /// A `]` with no open loop fails at its own offset.
    #[test]
    fn prop_unmatched_close(prefix in straight_line(), suffix in straight_line()) {
        let program = format!("{}]{}", prefix, suffix);
        let mut engine = Engine::new(
            Cursor::new(program.into_bytes()),
            Cursor::new(Vec::new()),
            Vec::new(),
        );
        let err = engine.run().unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::UnmatchedClose);
        prop_assert_eq!(err.offset(), prefix.len() as u64);
    }

    /// A `[` never closed fails just past the bracket, entered or skipped.
    #[test]
    fn prop_unmatched_open(prefix in straight_line(), body in straight_line()) {
        let program = format!("{}[{}", prefix, body);
        let mut engine = Engine::new(
            Cursor::new(program.into_bytes()),
            Cursor::new(b"x".to_vec()),
            Vec::new(),
        );
        let err = engine.run().unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::UnmatchedOpen);
        prop_assert_eq!(err.offset(), prefix.len() as u64 + 1);
    }

    /// Inert bytes change neither the instructions run, the output, nor the outcome.
    #[test]
    fn prop_comments_are_inert(
        program in balanced_program(),
        comments in prop::collection::vec((any::<usize>(), prop::sample::select(INERT)), 0..16),
    ) {
        let commented = insert_comments(&program, &comments);
        prop_assert_eq!(trace(&commented), trace(&program));
    }

    /// Balanced programs never report a bracket error.
    #[test]
    fn prop_balanced_programs_match(program in balanced_program()) {
        prop_assert_eq!(trace(&program).error, None);
    }
}
