// Execution engine for the tape interpreter

use crate::interpreter::constants::EOF_SENTINEL;
use crate::interpreter::errors::{EngineError, ErrorKind};
use crate::interpreter::instruction::Instruction;
use crate::interpreter::loops::{LoopEntry, LoopStack};
use crate::interpreter::source::{read_one, SourceCursor};
use crate::interpreter::stats::ExecutionStats;
use crate::memory::{tape::Tape, CellWidth};
use std::io::{Read, Seek, Write};
use tracing::{debug, trace};

/// Engine settings chosen by the harness
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub cell_width: CellWidth,
}

/// Lifecycle of a run. `Completed` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Error { kind: ErrorKind, offset: u64 },
}

/// Result of a single [`Engine::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One instruction ran; `offset` is the position of its byte
    Executed {
        instruction: Instruction,
        offset: u64,
    },
    /// The source is exhausted and the run completed
    Finished,
    /// The engine already stopped on an earlier error
    Halted { kind: ErrorKind, offset: u64 },
}

/// What a completed run leaves behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: ExecutionStats,
    /// Leftmost and rightmost tape positions visited
    pub tape_extent: (i64, i64),
}

pub type RunResult = Result<RunSummary, EngineError>;

/// Run a program to completion with the default configuration
pub fn run<S, I, O>(source: S, input: I, output: O) -> RunResult
where
    S: Read + Seek,
    I: Read,
    O: Write,
{
    Engine::new(source, input, output).run()
}

/// The interpreter for one program run.
///
/// The engine reads the source one byte at a time and never builds a jump
/// table: loop starts are remembered on a [`LoopStack`] as they are entered,
/// `]` seeks back onto the `[`, and a loop that must be skipped is scanned
/// forward byte by byte to its matching `]`.
pub struct Engine<S, I, O> {
    /// Seekable program text
    source: SourceCursor<S>,

    /// Program input (`,`)
    input: I,

    /// Program output (`.`)
    output: O,

    tape: Tape,

    /// Active loops, innermost on top
    loops: LoopStack,

    /// Last source byte read (instruction or not)
    last_byte: Option<u8>,

    status: RunStatus,

    stats: ExecutionStats,
}

impl<S, I, O> Engine<S, I, O>
where
    S: Read + Seek,
    I: Read,
    O: Write,
{
    pub fn new(source: S, input: I, output: O) -> Self {
        Self::with_config(source, input, output, EngineConfig::default())
    }

    pub fn with_config(source: S, input: I, output: O, config: EngineConfig) -> Self {
        Engine {
            source: SourceCursor::new(source),
            input,
            output,
            tape: Tape::new(config.cell_width),
            loops: LoopStack::new(),
            last_byte: None,
            status: RunStatus::Running,
            stats: ExecutionStats::new(),
        }
    }

    /// Run until the source is exhausted or a fault stops the engine
    pub fn run(&mut self) -> RunResult {
        loop {
            match self.step()? {
                Step::Executed { .. } => {}
                Step::Finished => return Ok(self.summary()),
                Step::Halted { kind, offset } => return Err(EngineError::halted(kind, offset)),
            }
        }
    }

    /// Execute the next instruction, consuming any inert bytes before it
    pub fn step(&mut self) -> Result<Step, EngineError> {
        match self.status {
            RunStatus::Running => {}
            RunStatus::Completed => return Ok(Step::Finished),
            RunStatus::Error { kind, offset } => return Ok(Step::Halted { kind, offset }),
        }

        loop {
            let Some(byte) = self.read_source()? else {
                return self.finish();
            };
            let Some(instruction) = Instruction::from_byte(byte) else {
                continue;
            };

            let offset = self.source.current_offset() - 1;
            self.stats.instructions += 1;
            self.dispatch(instruction, offset)?;
            return Ok(Step::Executed {
                instruction,
                offset,
            });
        }
    }

    fn dispatch(&mut self, instruction: Instruction, offset: u64) -> Result<(), EngineError> {
        match instruction {
            Instruction::MoveRight => self.tape.move_right(),
            Instruction::MoveLeft => self.tape.move_left(),
            Instruction::Increment => self.tape.increment(),
            Instruction::Decrement => self.tape.decrement(),
            Instruction::Output => {
                if let Err(source) = self.output.write_all(&[self.tape.read()]) {
                    return Err(self.fail(EngineError::Io { offset, source }));
                }
                self.stats.bytes_written += 1;
            }
            Instruction::Input => match read_one(&mut self.input) {
                Ok(Some(byte)) => {
                    self.tape.write(byte);
                    self.stats.bytes_read += 1;
                }
                Ok(None) => self.tape.set(EOF_SENTINEL),
                Err(source) => return Err(self.fail(EngineError::Io { offset, source })),
            },
            Instruction::LoopStart => self.check_loop(offset + 1)?,
            Instruction::LoopEnd => self.close_loop(offset)?,
        }
        Ok(())
    }

    /// Entry check for the loop whose body starts at `start`
    fn check_loop(&mut self, start: u64) -> Result<(), EngineError> {
        if self.tape.get() != 0 {
            if self.loops.enter(start) == LoopEntry::Repeated {
                trace!(start, "loop repeated");
            }
            self.stats.record_entry(start);
            return Ok(());
        }

        self.stats.loop_skips += 1;
        if self.loops.leave(start).is_some() {
            debug!(
                start,
                iterations = self.stats.iterations(start),
                "loop finished"
            );
        }
        self.skip_loop(start)
    }

    /// Scan forward from `start` to just past the matching `]`
    fn skip_loop(&mut self, start: u64) -> Result<(), EngineError> {
        let mut depth: u64 = 0;
        loop {
            match self.read_source()? {
                None => return Err(self.fail(EngineError::UnmatchedOpen { offset: start })),
                Some(b'[') => depth += 1,
                Some(b']') if depth == 0 => {
                    trace!(start, resume = self.source.current_offset(), "loop skipped");
                    return Ok(());
                }
                Some(b']') => depth -= 1,
                Some(_) => {}
            }
        }
    }

    /// Jump back onto the `[` of the innermost active loop
    fn close_loop(&mut self, offset: u64) -> Result<(), EngineError> {
        let Some(top) = self.loops.top().copied() else {
            return Err(self.fail(EngineError::UnmatchedClose { offset }));
        };
        if let Err(source) = self.source.seek_to(top.start.saturating_sub(1)) {
            return Err(self.fail(EngineError::Io { offset, source }));
        }
        Ok(())
    }

    /// End of source: complete, unless a loop was entered and never closed
    fn finish(&mut self) -> Result<Step, EngineError> {
        if let Some(top) = self.loops.top().copied() {
            return Err(self.fail(EngineError::UnmatchedOpen { offset: top.start }));
        }
        if let Err(source) = self.output.flush() {
            let offset = self.source.current_offset();
            return Err(self.fail(EngineError::Io { offset, source }));
        }

        self.status = RunStatus::Completed;
        debug!(
            instructions = self.stats.instructions,
            cells = self.tape.len(),
            "run completed"
        );
        Ok(Step::Finished)
    }

    fn read_source(&mut self) -> Result<Option<u8>, EngineError> {
        match self.source.read_one_byte() {
            Ok(byte) => {
                if byte.is_some() {
                    self.last_byte = byte;
                }
                Ok(byte)
            }
            Err(source) => {
                let offset = self.source.current_offset();
                Err(self.fail(EngineError::Io { offset, source }))
            }
        }
    }

    /// Move to the terminal error state and hand the error back
    fn fail(&mut self, err: EngineError) -> EngineError {
        debug!(offset = err.offset(), kind = ?err.kind(), "run halted: {}", err);
        self.status = RunStatus::Error {
            kind: err.kind(),
            offset: err.offset(),
        };
        err
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            stats: self.stats.clone(),
            tape_extent: self.tape.extent(),
        }
    }

    // ========== Getter methods for UI ==========

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn loops(&self) -> &LoopStack {
        &self.loops
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn stats(&self) -> &ExecutionStats {
        &self.stats
    }

    /// Offset of the next source byte to be read
    pub fn offset(&self) -> u64 {
        self.source.current_offset()
    }

    pub fn last_byte(&self) -> Option<u8> {
        self.last_byte
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }
}
