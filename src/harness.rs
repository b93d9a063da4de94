//! Process-level plumbing around the engine
//!
//! The engine only reports an [`EngineError`] with a byte offset. This module
//! opens the program's streams, turns failures into the fixed-format error
//! banner, and renders the optional execution report. Deciding to exit the
//! process is left to `main`.

use crate::interpreter::engine::RunSummary;
use crate::interpreter::errors::{EngineError, ErrorKind};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const RULE: &str = "------------------";

/// Literal stream argument that selects standard input
pub const STDIN_ARG: &str = "stdin";

/// Literal stream argument that selects standard output
pub const STDOUT_ARG: &str = "stdout";

/// Failures outside the engine, plus engine errors passed through
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Source file doesn't exist.")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Program input file doesn't exist.")]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Program output file can't be opened.")]
    OutputUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O fault: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl LaunchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LaunchError::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            LaunchError::InputUnavailable { .. } => ErrorKind::InputUnavailable,
            LaunchError::OutputUnavailable { .. } | LaunchError::Io(_) => ErrorKind::IoFault,
            LaunchError::Engine(e) => e.kind(),
        }
    }

    /// Source offset reached when the failure happened (0 before execution)
    pub fn offset(&self) -> u64 {
        match self {
            LaunchError::Engine(e) => e.offset(),
            _ => 0,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

/// Where a program stream comes from or goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamTarget {
    Standard,
    File(PathBuf),
}

impl StreamTarget {
    /// Interpret a positional argument; `standard` names the std stream
    pub fn parse(arg: Option<&str>, standard: &str) -> Self {
        match arg {
            None => StreamTarget::Standard,
            Some(a) if a == standard || a.is_empty() => StreamTarget::Standard,
            Some(a) => StreamTarget::File(PathBuf::from(a)),
        }
    }
}

pub fn open_source(path: &Path) -> Result<BufReader<File>, LaunchError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| LaunchError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })
}

pub fn open_input(target: &StreamTarget) -> Result<Box<dyn Read>, LaunchError> {
    match target {
        StreamTarget::Standard => Ok(Box::new(io::stdin().lock())),
        StreamTarget::File(path) => File::open(path)
            .map(|f| Box::new(BufReader::new(f)) as Box<dyn Read>)
            .map_err(|source| LaunchError::InputUnavailable {
                path: path.clone(),
                source,
            }),
    }
}

pub fn open_output(target: &StreamTarget) -> Result<Box<dyn Write>, LaunchError> {
    match target {
        StreamTarget::Standard => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
        StreamTarget::File(path) => File::create(path)
            .map(|f| Box::new(BufWriter::new(f)) as Box<dyn Write>)
            .map_err(|source| LaunchError::OutputUnavailable {
                path: path.clone(),
                source,
            }),
    }
}

/// The boxed error banner printed when a run fails
pub fn error_banner(message: &str, offset: u64) -> String {
    format!(
        "\n\n{RULE}\nERROR : {message}\nLOCATION : Byte {offset}\n{RULE}\n\n"
    )
}

/// The execution report printed when `time` is requested
pub fn execution_report(elapsed: Duration, summary: &RunSummary) -> String {
    let stats = &summary.stats;
    let (left, right) = summary.tape_extent;
    let mut report = format!("\n\n{RULE}\n");
    report.push_str(&format!("Time used : {:.6}\n", elapsed.as_secs_f64()));
    report.push_str(&format!("Instructions : {}\n", stats.instructions));
    report.push_str(&format!(
        "Loops entered / skipped : {} / {}\n",
        stats.loop_entries, stats.loop_skips
    ));
    report.push_str(&format!("Tape extent : [{}, {}]\n", left, right));
    if let Some((start, iterations)) = stats.hottest_loop() {
        report.push_str(&format!(
            "Hottest loop : Byte {} ({} iterations)\n",
            start.saturating_sub(1),
            iterations
        ));
    }
    report.push_str(RULE);
    report.push_str("\n\n");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::engine::run;
    use std::io::{empty, Cursor};

    #[test]
    fn test_stream_target_parse() {
        assert_eq!(StreamTarget::parse(None, STDIN_ARG), StreamTarget::Standard);
        assert_eq!(
            StreamTarget::parse(Some("stdin"), STDIN_ARG),
            StreamTarget::Standard
        );
        assert_eq!(
            StreamTarget::parse(Some("stdin"), STDOUT_ARG),
            StreamTarget::File(PathBuf::from("stdin"))
        );
        assert_eq!(
            StreamTarget::parse(Some("out.txt"), STDOUT_ARG),
            StreamTarget::File(PathBuf::from("out.txt"))
        );
    }

    #[test]
    fn test_missing_source() {
        let err = open_source(Path::new("/definitely/not/here.bf")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceUnavailable);
        assert_eq!(err.exit_code(), 5);
        assert_eq!(err.to_string(), "Source file doesn't exist.");
    }

    #[test]
    fn test_missing_input() {
        let target = StreamTarget::File(PathBuf::from("/definitely/not/here.txt"));
        let err = open_input(&target).err().expect("input should be unavailable");
        assert_eq!(err.kind(), ErrorKind::InputUnavailable);
        assert_eq!(err.offset(), 0);
    }

    #[test]
    fn test_engine_errors_pass_through() {
        let err: LaunchError = EngineError::UnmatchedClose { offset: 7 }.into();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.offset(), 7);
        assert_eq!(err.to_string(), "Unmatched end loop encountered.");
    }

    #[test]
    fn test_error_banner() {
        let banner = error_banner("Unmatched end loop encountered.", 12);
        assert_eq!(
            banner,
            "\n\n------------------\nERROR : Unmatched end loop encountered.\nLOCATION : Byte 12\n------------------\n\n"
        );
    }

    #[test]
    fn test_execution_report() {
        let summary = run(Cursor::new(b"++[>+<-]".to_vec()), empty(), Vec::new()).unwrap();
        let report = execution_report(Duration::from_millis(1500), &summary);
        assert!(report.contains("Time used : 1.500000"));
        assert!(report.contains("Instructions : 15"));
        assert!(report.contains("Loops entered / skipped : 2 / 1"));
        assert!(report.contains("Tape extent : [0, 1]"));
        assert!(report.contains("Hottest loop : Byte 2 (2 iterations)"));
    }
}
