// Integration tests for the tape interpreter

use std::io::{empty, Cursor};

use tapeworm::interpreter::engine::{run, Engine, EngineConfig, RunStatus, Step};
use tapeworm::interpreter::errors::{EngineError, ErrorKind};
use tapeworm::memory::CellWidth;
use tapeworm::snapshot::{RecordOutcome, Timeline};

/// Run `program` with `input`, returning the result and everything written
fn execute(program: &str, input: &[u8]) -> (Result<(), EngineError>, Vec<u8>) {
    let mut output = Vec::new();
    let result = run(
        Cursor::new(program.as_bytes().to_vec()),
        Cursor::new(input.to_vec()),
        &mut output,
    )
    .map(|_| ());
    (result, output)
}

/// Step a program to the end, returning the deepest loop stack seen
fn max_depth(program: &str) -> usize {
    let mut engine = Engine::new(Cursor::new(program.as_bytes().to_vec()), empty(), Vec::new());
    let mut deepest = 0;
    loop {
        match engine.step().expect("program should run cleanly") {
            Step::Executed { .. } => deepest = deepest.max(engine.loops().depth()),
            Step::Finished | Step::Halted { .. } => break,
        }
    }
    deepest
}

#[test]
fn test_increment_and_output() {
    let (result, output) = execute("+++.", b"");
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(output, vec![3]);
}

#[test]
fn test_clear_loop_produces_no_output() {
    let (result, output) = execute("+[-]", b"");
    assert!(result.is_ok());
    assert!(output.is_empty());
}

#[test]
fn test_loop_on_zero_cell_is_skipped() {
    let mut engine = Engine::new(Cursor::new(b"[-]".to_vec()), empty(), Vec::new());
    let summary = engine.run().expect("Execution failed");

    assert_eq!(engine.tape().get(), 0);
    assert_eq!(engine.tape().len(), 1);
    assert_eq!(summary.stats.loop_skips, 1);
    assert_eq!(summary.stats.loop_entries, 0);
    assert_eq!(engine.status(), RunStatus::Completed);
}

#[test]
fn test_echo_input_byte() {
    let (result, output) = execute(",.", b"A");
    assert!(result.is_ok());
    assert_eq!(output, vec![65]);
}

#[test]
fn test_end_of_input_sentinel() {
    let (result, output) = execute(",.", b"");
    assert!(result.is_ok());
    assert_eq!(output, vec![255]);
}

#[test]
fn test_hello_world() {
    let program = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.\
                   +++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
    let (result, output) = execute(program, b"");
    assert!(result.is_ok(), "Execution failed: {:?}", result);
    assert_eq!(output, b"Hello World!\n");
}

#[test]
fn test_cat_until_end_of_input() {
    // Copy input to output until the 255 sentinel
    let (result, output) = execute(",+[-.,+]", b"tape");
    assert!(result.is_ok());
    assert_eq!(output, b"tape");
}

#[test]
fn test_comments_are_ignored() {
    let (plain, plain_out) = execute("++[>+++<-]>.", b"");
    let (commented, commented_out) = execute(
        "two ++ times [ go right >+++ add three; back <- ] then > print .\n",
        b"",
    );
    assert!(plain.is_ok());
    assert!(commented.is_ok());
    assert_eq!(plain_out, vec![6]);
    assert_eq!(commented_out, plain_out);
}

#[test]
fn test_unmatched_close_location() {
    let (result, _) = execute("ab]", b"");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnmatchedClose);
    assert_eq!(err.offset(), 2);
    assert_eq!(err.to_string(), "Unmatched end loop encountered.");

    // A second `]` after a finished loop has nothing left to close
    let (result, _) = execute("+[-]]", b"");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnmatchedClose);
    assert_eq!(err.offset(), 4);
}

#[test]
fn test_unmatched_open_during_skip() {
    // The skip scan starts just past the `[` and runs off the end
    let (result, _) = execute("[", b"");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnmatchedOpen);
    assert_eq!(err.offset(), 1);
    assert_eq!(err.to_string(), "Unmatched start loop encountered.");

    let (result, _) = execute("..[[-]", b"");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnmatchedOpen);
    assert_eq!(err.offset(), 3);
}

#[test]
fn test_unmatched_open_entered_loop() {
    // The loop is entered, so the source ends with a frame still active
    let (result, output) = execute("+[.", b"");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnmatchedOpen);
    assert_eq!(err.offset(), 2);
    assert_eq!(output, vec![1]);
}

#[test]
fn test_one_frame_per_nesting_depth() {
    assert_eq!(max_depth("[[-]>]"), 0);
    assert_eq!(max_depth("+[[-]>]"), 2);
    assert_eq!(max_depth("++[>++[-]<-]"), 2);
    assert_eq!(max_depth("+++[>+++[>+++[-]<-]<-]"), 3);
}

#[test]
fn test_nested_loop_counts() {
    let mut engine = Engine::new(
        Cursor::new(b"++[>++[-]<-]".to_vec()),
        empty(),
        Vec::new(),
    );
    let summary = engine.run().expect("Execution failed");

    assert_eq!(engine.tape().get(), 0);
    assert_eq!(engine.tape().value_at(1), Some(0));
    // Outer body runs twice, inner body twice per outer pass
    assert_eq!(summary.stats.iterations(3), 2);
    assert_eq!(summary.stats.iterations(7), 4);
    assert_eq!(summary.stats.hottest_loop(), Some((7, 4)));
    assert!(engine.loops().is_empty());
}

#[test]
fn test_byte_cells_wrap() {
    let program = "-.".to_string() + &"+".repeat(256) + ".";
    let (result, output) = execute(&program, b"");
    assert!(result.is_ok());
    assert_eq!(output, vec![255, 255]);
}

#[test]
fn test_native_cells() {
    let config = EngineConfig {
        cell_width: CellWidth::Native,
    };
    let mut engine = Engine::with_config(
        Cursor::new(b"-.>,".to_vec()),
        empty(),
        Vec::new(),
        config,
    );
    engine.run().expect("Execution failed");

    assert_eq!(engine.tape().value_at(0), Some(-1));
    assert_eq!(engine.tape().get(), -1);
    assert_eq!(engine.output(), &vec![255]);
}

#[test]
fn test_tape_extends_left() {
    let mut engine = Engine::new(Cursor::new(b"<<<+>>>+".to_vec()), empty(), Vec::new());
    let summary = engine.run().expect("Execution failed");

    assert_eq!(summary.tape_extent, (-3, 0));
    assert_eq!(engine.tape().value_at(-3), Some(1));
    assert_eq!(engine.tape().value_at(0), Some(1));
}

#[test]
fn test_errored_engine_stays_halted() {
    let mut engine = Engine::new(Cursor::new(b"]+++".to_vec()), empty(), Vec::new());
    assert!(engine.step().is_err());
    assert!(matches!(engine.step().unwrap(), Step::Halted { .. }));
    assert_eq!(engine.tape().get(), 0);
    assert_eq!(
        engine.status(),
        RunStatus::Error {
            kind: ErrorKind::UnmatchedClose,
            offset: 0
        }
    );
}

#[test]
fn test_timeline_replays_run() {
    let mut timeline = Timeline::record(
        Cursor::new(b"+.+.".to_vec()),
        empty(),
        EngineConfig::default(),
        1024 * 1024,
    );
    assert_eq!(*timeline.outcome(), RecordOutcome::Completed);
    // Initial state plus one snapshot per instruction
    assert_eq!(timeline.len(), 5);
    assert!(timeline.output().is_empty());
    assert_eq!(timeline.full_output(), &[1, 2]);

    timeline.jump_to_end().unwrap();
    assert_eq!(timeline.output(), &[1, 2]);

    timeline.step_backward().unwrap();
    assert_eq!(timeline.output(), &[1]);
    assert_eq!(timeline.current().unwrap().tape.get(), 2);
}
