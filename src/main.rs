// tapeworm: re-scanning tape machine interpreter with a time-travel viewer

use std::fs;
use std::io::{self, Cursor, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use tapeworm::harness::{
    error_banner, execution_report, open_input, open_output, open_source, LaunchError,
    StreamTarget, STDIN_ARG, STDOUT_ARG,
};
use tapeworm::interpreter::constants::{DEFAULT_SNAPSHOT_LIMIT, EXIT_SUCCESS, EXIT_USAGE};
use tapeworm::interpreter::engine::{Engine, EngineConfig};
use tapeworm::memory::CellWidth;
use tapeworm::snapshot::{RecordOutcome, Timeline};
use tapeworm::ui::App;

#[derive(Parser, Debug)]
#[command(name = "tapeworm")]
#[command(about = "Run a tape machine program, optionally stepping through it in a TUI")]
struct Cli {
    /// Program source file
    source: PathBuf,

    /// Output file, or `stdout`
    output: Option<String>,

    /// Input file, or `stdin`
    input: Option<String>,

    /// Print an execution report after the run
    report: Option<Report>,

    /// Cell arithmetic width
    #[arg(long, value_enum, default_value = "byte")]
    cells: Cells,

    /// Record the run and browse it in a terminal UI
    #[arg(long)]
    tui: bool,

    /// Snapshot memory budget for --tui, in MiB
    #[arg(long, value_name = "MIB")]
    snapshot_limit: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Report {
    Time,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Cells {
    Byte,
    Native,
}

impl From<Cells> for CellWidth {
    fn from(cells: Cells) -> Self {
        match cells {
            Cells::Byte => CellWidth::Byte,
            Cells::Native => CellWidth::Native,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Exit code for a command line clap refused; `--help` and `--version` succeed
fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        EXIT_USAGE
    } else {
        EXIT_SUCCESS
    }
}

fn main() {
    init_logging();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Printing can only fail if stderr is gone; the exit code still applies
            let _ = e.print();
            std::process::exit(usage_exit_code(&e));
        }
    };

    let result = if cli.tui {
        browse(&cli)
    } else {
        run_plain(&cli).map(|()| EXIT_SUCCESS)
    };
    let code = match result {
        Ok(code) => code,
        Err(e) => {
            debug!(error = ?e, "run failed");
            eprint!("{}", error_banner(&e.to_string(), e.offset()));
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn config(cli: &Cli) -> EngineConfig {
    EngineConfig {
        cell_width: cli.cells.into(),
    }
}

/// Plain run: stream the program straight to its output
fn run_plain(cli: &Cli) -> Result<(), LaunchError> {
    let source = open_source(&cli.source)?;
    let output = open_output(&StreamTarget::parse(cli.output.as_deref(), STDOUT_ARG))?;
    let input = open_input(&StreamTarget::parse(cli.input.as_deref(), STDIN_ARG))?;

    let started = Instant::now();
    let mut engine = Engine::with_config(source, input, output, config(cli));
    let summary = engine.run()?;
    let elapsed = started.elapsed();

    debug!(instructions = summary.stats.instructions, "run completed");
    if let Some(Report::Time) = cli.report {
        eprint!("{}", execution_report(elapsed, &summary));
    }
    Ok(())
}

/// Record the whole run, then open the viewer over the recording.
///
/// Returns the exit code of the recorded run.
fn browse(cli: &Cli) -> Result<i32, LaunchError> {
    let bytes = fs::read(&cli.source).map_err(|source| LaunchError::SourceUnavailable {
        path: cli.source.clone(),
        source,
    })?;
    let output_target = StreamTarget::parse(cli.output.as_deref(), STDOUT_ARG);
    let input = open_input(&StreamTarget::parse(cli.input.as_deref(), STDIN_ARG))?;

    let limit = cli
        .snapshot_limit
        .map(|mib| mib.saturating_mul(1024 * 1024))
        .unwrap_or(DEFAULT_SNAPSHOT_LIMIT);

    // Input is consumed here, before the terminal goes raw
    let timeline = Timeline::record(Cursor::new(bytes.as_slice()), input, config(cli), limit);
    let outcome = timeline.outcome().clone();
    let program_output = timeline.full_output().to_vec();
    debug!(snapshots = timeline.len(), "entering viewer");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(timeline, String::from_utf8_lossy(&bytes).into_owned());
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res?;

    let mut output = open_output(&output_target)?;
    output.write_all(&program_output)?;
    output.flush()?;

    match outcome {
        RecordOutcome::Failed {
            kind,
            offset,
            message,
        } => {
            eprint!("{}", error_banner(&message, offset));
            Ok(kind.exit_code())
        }
        RecordOutcome::Completed => Ok(EXIT_SUCCESS),
    }
}
