// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +-------------------------+------------------------+
// | Selection (3 rows)       | Available (60%)        |
// +-------------------------+                        |
// | Wheel (fill)             +------------------------+
// |                          | Picked (40%)           |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Top row: pool counts and the latest notice.
    pub status_bar: Rect,
    /// Current selection or placeholder text.
    pub selection: Rect,
    /// The wheel itself.
    pub wheel: Rect,
    /// Right column top: names still in the pool.
    pub available: Rect,
    /// Right column bottom: accepted names.
    pub picked: Rect,
    /// Bottom row: keyboard shortcut hints.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    // Vertical: status(1) | middle(fill) | help(1)
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    // Horizontal: wheel column (60%) | lists column (40%)
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(middle);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(horizontal[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(horizontal[1]);

    AppLayout {
        status_bar,
        selection: left[0],
        wheel: left[1],
        available: right[0],
        picked: right[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
