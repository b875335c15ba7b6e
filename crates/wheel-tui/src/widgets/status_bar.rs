// Status bar widget: pool counts, spin phase, latest notice.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use wheel_core::spin::SpinPhase;

use crate::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [title] [counts] [phase] [notice]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snapshot = &state.snapshot;
    let mut spans = vec![
        Span::styled(
            " Restaurant Wheel ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "{} left, {} picked",
                snapshot.available.len(),
                snapshot.picked.len()
            ),
            Style::default().fg(Color::White),
        ),
    ];

    let (label, color) = phase_indicator(snapshot.phase);
    spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(label, Style::default().fg(color)));

    if let Some(notice) = &state.notice {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(notice.clone(), Style::default().fg(Color::Cyan)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Label and color for the spin phase.
pub fn phase_indicator(phase: SpinPhase) -> (&'static str, Color) {
    match phase {
        SpinPhase::Idle => ("Ready", Color::Green),
        SpinPhase::Spinning => ("Spinning", Color::Yellow),
        SpinPhase::Resting => ("Landed", Color::Magenta),
    }
}
