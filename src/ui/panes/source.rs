//! Source code pane rendering with instruction highlighting
//!
//! This module renders the program text with each instruction colored by
//! class and the instruction under the history cursor highlighted.
//!
//! # Features
//!
//! - Coloring for movement, arithmetic, I/O and loop instructions
//! - Inert bytes (comments) muted
//! - Current instruction highlighted, or shown in the error color when the
//!   run failed there
//! - Line numbering with the current line kept at a fixed row while stepping

use crate::interpreter::instruction::Instruction;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// 1-based line and column of a byte offset
pub fn locate(source: &str, offset: u64) -> (usize, usize) {
    let offset = (offset as usize).min(source.len());
    let before = &source.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |i| i + 1);
    (line, offset - line_start + 1)
}

fn instruction_style(c: char) -> Style {
    let instruction = u8::try_from(c).ok().and_then(Instruction::from_byte);
    match instruction {
        Some(Instruction::MoveRight | Instruction::MoveLeft) => {
            Style::default().fg(DEFAULT_THEME.movement)
        }
        Some(Instruction::Increment | Instruction::Decrement) => {
            Style::default().fg(DEFAULT_THEME.arithmetic)
        }
        Some(Instruction::Output | Instruction::Input) => Style::default()
            .fg(DEFAULT_THEME.io)
            .add_modifier(Modifier::BOLD),
        Some(Instruction::LoopStart | Instruction::LoopEnd) => Style::default()
            .fg(DEFAULT_THEME.bracket)
            .add_modifier(Modifier::BOLD),
        None => Style::default().fg(DEFAULT_THEME.comment), // Comments
    }
}

/// Color one line, highlighting the byte at `mark` (relative to the line)
fn highlight_line(line: &str, mark: Option<(usize, Style)>) -> Line<'_> {
    let spans: Vec<Span> = line
        .char_indices()
        .filter(|(_, c)| *c != '\r')
        .map(|(idx, c)| {
            let mut style = instruction_style(c);
            if let Some((at, mark_style)) = mark {
                if at == idx {
                    style = style.patch(mark_style);
                }
            }
            Span::styled(c.to_string(), style)
        })
        .collect();
    Line::from(spans)
}

/// Scroll state for the source pane
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Data needed to render the source pane
pub struct SourceRenderData<'a> {
    pub source_code: &'a str,
    /// Byte offset of the instruction to highlight
    pub current_offset: Option<u64>,
    /// Whether the run failed at `current_offset`
    pub is_error: bool,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    data: SourceRenderData,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    // (line text, byte offset of its first character)
    let mut lines: Vec<(&str, usize)> = Vec::new();
    let mut line_start = 0;
    for line in data.source_code.split('\n') {
        lines.push((line, line_start));
        line_start += line.len() + 1;
    }
    let total_lines = lines.len();

    let current = data
        .current_offset
        .map(|offset| (offset, locate(data.source_code, offset).0));
    let current_line = current.map_or(0, |(_, line)| line);

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    // Initialize target_line_row to center if not set
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the current line at the target visual row
    if current_line > 0 && current_line <= total_lines {
        scroll_state.offset = (current_line - 1).saturating_sub(target_row);
    }
    if total_lines > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let mark_style = if data.is_error {
        Style::default()
            .bg(DEFAULT_THEME.error)
            .fg(Color::White) // White text on red for visibility
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .bg(DEFAULT_THEME.secondary)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    };

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, (line, start))| {
            let line_num = idx + 1;
            let is_current = line_num == current_line;

            let mark = current
                .filter(|_| is_current)
                .map(|(offset, _)| (offset as usize - start, mark_style));

            let num_style = if is_current && data.is_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment) // Line numbers
            };

            let mut content_line = highlight_line(line, mark);
            if is_current {
                for span in &mut content_line.spans {
                    if span.style.bg.is_none() {
                        span.style = span.style.bg(DEFAULT_THEME.current_line_bg);
                    }
                }
            }

            let mut final_spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
