// Available and picked lists.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

use wheel_app::protocol::AppSnapshot;

pub const NO_AVAILABLE_TEXT: &str = "No restaurants left. Add more to spin again.";
pub const NO_PICKED_TEXT: &str = "No picks accepted yet.";

pub fn render_available(frame: &mut Frame, area: Rect, snapshot: &AppSnapshot) {
    let title = format!("Available ({})", snapshot.available.len());
    if snapshot.available.is_empty() {
        render_empty(frame, area, &title, NO_AVAILABLE_TEXT);
        return;
    }

    let items: Vec<ListItem> = snapshot
        .available
        .iter()
        .map(|name| {
            let style = if snapshot.selection.as_deref() == Some(name.as_str()) {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(format!("  {}", name), style)))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

/// Accepted names, numbered in acceptance order.
pub fn render_picked(frame: &mut Frame, area: Rect, snapshot: &AppSnapshot) {
    let title = format!("Picked ({})", snapshot.picked.len());
    if snapshot.picked.is_empty() {
        render_empty(frame, area, &title, NO_PICKED_TEXT);
        return;
    }

    let items: Vec<ListItem> = snapshot
        .picked
        .iter()
        .enumerate()
        .map(|(i, name)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:>2}. ", i + 1), Style::default().fg(Color::Gray)),
                Span::styled(name.clone(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn render_empty(frame: &mut Frame, area: Rect, title: &str, text: &str) {
    let paragraph = Paragraph::new(format!("  {}", text))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    frame.render_widget(paragraph, area);
}
