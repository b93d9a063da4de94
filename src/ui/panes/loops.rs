//! Loop stack pane: active loops, innermost first

use super::source::locate;
use crate::snapshot::FrameView;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the loop stack pane
pub fn render_loops_pane(
    frame: &mut Frame,
    area: Rect,
    loops: &[FrameView],
    source_code: &str,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Loops ({}) ", loops.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut all_items = Vec::new();
    if loops.is_empty() {
        all_items.push(
            ListItem::new("(no active loops)").style(Style::default().fg(DEFAULT_THEME.comment)),
        );
    } else {
        for (depth, view) in loops.iter().enumerate().rev() {
            // The frame records the offset after the `[`
            let bracket = view.start.saturating_sub(1);
            let (line, column) = locate(source_code, bracket);
            all_items.push(ListItem::new(Line::from(vec![
                Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(
                    format!("Depth {} ", depth + 1),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled("│ ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(
                    format!("[ at {}:{}", line, column),
                    Style::default()
                        .fg(DEFAULT_THEME.bracket)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" (Byte {}) ", bracket),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    format!("×{}", view.iterations),
                    Style::default().fg(DEFAULT_THEME.arithmetic),
                ),
            ])));
        }
    }

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
