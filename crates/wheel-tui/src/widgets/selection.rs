// Selection display: the landed name, or a placeholder.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use wheel_app::protocol::AppSnapshot;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &AppSnapshot) {
    let style = if snapshot.selection.is_some() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = if snapshot.can_accept {
        "Selection (Enter to accept)"
    } else {
        "Selection"
    };

    let paragraph = Paragraph::new(snapshot.selection_text.as_str())
        .style(style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(paragraph, area);
}
