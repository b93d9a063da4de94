//! Main TUI application state and logic

use crate::interpreter::errors::ErrorKind;
use crate::snapshot::{RecordOutcome, Timeline};
use crate::ui::panes::{
    render_loops_pane, render_source_pane, render_status_bar, render_tape_pane,
    render_terminal_pane, SourceRenderData, SourceScrollState, StatusRenderData, TapeScrollState,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::Backend,
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Delay between steps in auto-play mode
const PLAY_INTERVAL: Duration = Duration::from_millis(150);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Output,
    Tape,
    Loops,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> output -> tape -> loops)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Tape,
            FocusedPane::Tape => FocusedPane::Loops,
            FocusedPane::Loops => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Loops,
            FocusedPane::Output => FocusedPane::Source,
            FocusedPane::Tape => FocusedPane::Output,
            FocusedPane::Loops => FocusedPane::Tape,
        }
    }
}

/// The main application state
pub struct App {
    /// The recorded run being browsed
    pub timeline: Timeline,

    /// The program text (lossy UTF-8 for display)
    pub source_code: String,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub source_scroll: SourceScrollState,
    pub tape_scroll: TapeScrollState,
    pub loops_scroll: usize,
    pub output_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app over a recorded timeline
    pub fn new(timeline: Timeline, source_code: String) -> Self {
        let status_message = match (timeline.truncated(), timeline.outcome()) {
            (Some(limit), _) => format!(
                "History stopped at the {} MiB snapshot limit",
                limit / (1024 * 1024)
            ),
            (None, RecordOutcome::Completed) => String::from("Ready!"),
            (None, RecordOutcome::Failed { message, .. }) => format!("Run failed: {}", message),
        };

        App {
            timeline,
            source_code,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState {
                offset: 0,
                target_line_row: None, // Will be set to center on first render
            },
            tape_scroll: TapeScrollState::default(),
            loops_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                if self.timeline.step_forward().is_ok() {
                    self.describe_position();
                    self.output_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(30))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Byte to mark as failing when the final snapshot is shown
    fn error_offset(&self) -> Option<u64> {
        // A truncated history never reaches the failing instruction
        if !self.timeline.is_at_end() || self.timeline.truncated().is_some() {
            return None;
        }
        match self.timeline.outcome() {
            RecordOutcome::Completed => None,
            // The offset is just past the `[`; point at the bracket itself
            RecordOutcome::Failed {
                kind: ErrorKind::UnmatchedOpen,
                offset,
                ..
            } => Some(offset.saturating_sub(1)),
            RecordOutcome::Failed { offset, .. } => Some(*offset),
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Tape (top) | Loops (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        let error_offset = self.error_offset();
        let Some(snapshot) = self.timeline.current() else {
            return;
        };

        let current_offset = error_offset.or(snapshot.instruction.map(|_| snapshot.offset));
        render_source_pane(
            frame,
            left_rows[0],
            SourceRenderData {
                source_code: &self.source_code,
                current_offset,
                is_error: error_offset.is_some(),
            },
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        render_terminal_pane(
            frame,
            left_rows[1],
            self.timeline.output(),
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        render_tape_pane(
            frame,
            right_rows[0],
            &snapshot.tape,
            self.focused_pane == FocusedPane::Tape,
            &mut self.tape_scroll,
        );

        render_loops_pane(
            frame,
            right_rows[1],
            &snapshot.loops,
            &self.source_code,
            self.focused_pane == FocusedPane::Loops,
            &mut self.loops_scroll,
        );

        render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                current_step: self.timeline.position(),
                total_steps: self.timeline.len(),
                outcome: self.timeline.outcome(),
                truncated: self.timeline.truncated().is_some(),
                is_playing: self.is_playing,
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = c.to_digit(10).unwrap_or(1);
                let stepped = (0..n)
                    .take_while(|_| self.timeline.step_forward().is_ok())
                    .count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.output_scroll = usize::MAX;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                match self.timeline.step_backward() {
                    Ok(()) => self.describe_position(),
                    Err(e) => self.status_message = format!("Cannot step backward: {}", e),
                }
                self.output_scroll = usize::MAX;
            }
            KeyCode::Right => {
                self.is_playing = false;
                match self.timeline.step_forward() {
                    Ok(()) => self.describe_position(),
                    Err(e) => self.status_message = format!("Cannot step forward: {}", e),
                }
                self.output_scroll = usize::MAX;
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Tape => self.tape_scroll.shift -= 1,
                FocusedPane::Loops => self.loops_scroll = self.loops_scroll.saturating_sub(1),
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling down makes the current line move up visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Tape => self.tape_scroll.shift += 1,
                FocusedPane::Loops => self.loops_scroll = self.loops_scroll.saturating_add(1),
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(PLAY_INTERVAL)
                            .unwrap_or_else(Instant::now);
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                if self.timeline.jump_to_end().is_ok() {
                    self.describe_position();
                }
                self.output_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                if self.timeline.rewind_to_start().is_ok() {
                    self.status_message = "Jumped to start".to_string();
                }
                self.output_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    /// Describe the instruction at the history cursor in the status line
    fn describe_position(&mut self) {
        if self.timeline.is_at_end() && self.timeline.truncated().is_some() {
            self.status_message = "End of recorded history (snapshot limit reached)".to_string();
            return;
        }
        if self.timeline.is_at_end() {
            if let RecordOutcome::Failed {
                message, offset, ..
            } = self.timeline.outcome()
            {
                self.status_message = format!("{} (Byte {})", message, offset);
                return;
            }
        }

        self.status_message = match self.timeline.current() {
            Some(snapshot) => match snapshot.instruction {
                Some(instruction) => format!(
                    "Byte {}: '{}' {}",
                    snapshot.offset,
                    instruction,
                    instruction.describe()
                ),
                None => "Initial state".to_string(),
            },
            None => "No snapshots".to_string(),
        };
    }
}
