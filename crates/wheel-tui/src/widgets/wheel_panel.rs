// Wheel panel: the slices as a vertical reel, centered on the slice under the
// pointer.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use wheel_app::app::EMPTY_POOL_TEXT;
use wheel_core::selector;

use crate::wheel::WheelAnimator;

pub fn render(frame: &mut Frame, area: Rect, wheel: &WheelAnimator) {
    let title = format!("Wheel ({:.0}\u{b0})", selector::normalize(wheel.rotation()));
    let block = Block::default().borders(Borders::ALL).title(title);

    let Some(pointer) = wheel.pointer_index() else {
        let paragraph = Paragraph::new(format!("  {}", EMPTY_POOL_TEXT))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let rows = usize::from(area.height.saturating_sub(2));
    let lines: Vec<Line> = reel_indices(pointer, wheel.labels().len(), rows)
        .into_iter()
        .map(|idx| {
            let label = &wheel.labels()[idx];
            if idx == pointer {
                Line::from(vec![
                    Span::styled(" \u{25b6} ", Style::default().fg(Color::Yellow)),
                    Span::styled(
                        label.clone(),
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(
                    format!("   {}", label),
                    Style::default().fg(slice_color(idx)),
                ))
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Slice indices to show, top to bottom, with `pointer` in the middle row.
/// Each slice appears at most once.
pub fn reel_indices(pointer: usize, len: usize, rows: usize) -> Vec<usize> {
    let visible = rows.min(len);
    if visible == 0 {
        return Vec::new();
    }
    let above = visible / 2;
    (0..visible)
        .map(|row| (pointer + len * visible + row - above) % len)
        .collect()
}

fn slice_color(idx: usize) -> Color {
    const PALETTE: [Color; 4] = [Color::Cyan, Color::Magenta, Color::Blue, Color::Green];
    PALETTE[idx % PALETTE.len()]
}
