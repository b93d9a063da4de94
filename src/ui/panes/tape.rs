//! Tape pane rendering
//!
//! Shows a window of materialized cells centered on the cursor, one cell per
//! row: position, numeric value, and the value as a printable character.
//! Scrolling shifts the window away from the cursor; the shift is kept while
//! stepping so a region of interest can be watched.

use crate::memory::{tape::Tape, Cell};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Scroll state for the tape pane
#[derive(Default)]
pub struct TapeScrollState {
    /// Rows to shift the window relative to the cursor-centered position
    pub shift: i64,
}

/// Printable form of a cell value
fn cell_char(value: Cell) -> String {
    match value {
        0x20..=0x7e => format!("'{}'", value as u8 as char),
        0x0a => "'\\n'".to_string(),
        0x09 => "'\\t'".to_string(),
        _ => String::new(),
    }
}

/// First row of the window for a tape of `len` cells
fn window_start(len: usize, cursor_index: usize, height: usize, shift: i64) -> usize {
    if len <= height {
        return 0;
    }
    let centered = cursor_index as i64 - (height / 2) as i64 + shift;
    centered.clamp(0, (len - height) as i64) as usize
}

/// Render the tape pane
pub fn render_tape_pane(
    frame: &mut Frame,
    area: Rect,
    tape: &Tape,
    is_focused: bool,
    scroll_state: &mut TapeScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let (left, right) = tape.extent();
    let block = Block::default()
        .title(format!(" Tape [{}, {}] ", left, right))
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let cursor = tape.position();
    let cursor_index = (cursor - left) as usize;

    // Clamp the shift so the window never scrolls past either end
    let start = window_start(tape.len(), cursor_index, visible_height, scroll_state.shift);
    let centered = window_start(tape.len(), cursor_index, visible_height, 0);
    scroll_state.shift = start as i64 - centered as i64;

    let items: Vec<ListItem> = tape
        .cells()
        .skip(start)
        .take(visible_height)
        .map(|(position, value)| {
            let is_cursor = position == cursor;
            let marker = if is_cursor { "▸ " } else { "  " };
            let value_style = if is_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(DEFAULT_THEME.cursor_cell)
                    .add_modifier(Modifier::BOLD)
            } else if value == 0 {
                Style::default().fg(DEFAULT_THEME.zero_cell)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };

            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(
                    format!("{:>6} ", position),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled("│ ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(format!("{:>5}", value), value_style),
                Span::raw(" "),
                Span::styled(cell_char(value), Style::default().fg(DEFAULT_THEME.io)),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_centers_on_cursor() {
        assert_eq!(window_start(5, 3, 10, 0), 0);
        assert_eq!(window_start(100, 50, 10, 0), 45);
        assert_eq!(window_start(100, 50, 10, -3), 42);
        // Clamped at both ends
        assert_eq!(window_start(100, 2, 10, 0), 0);
        assert_eq!(window_start(100, 99, 10, 0), 90);
        assert_eq!(window_start(100, 50, 10, 500), 90);
    }

    #[test]
    fn test_cell_char() {
        assert_eq!(cell_char(65), "'A'");
        assert_eq!(cell_char(10), "'\\n'");
        assert_eq!(cell_char(0), "");
        assert_eq!(cell_char(300), "");
    }
}
