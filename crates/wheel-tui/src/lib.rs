// Terminal frontend: view state, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors what the coordinator last reported.
// The coordinator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them, animates the wheel on each render tick, and sends a
// `RestEvent` back when a spin settles.

pub mod input;
pub mod layout;
pub mod wheel;
pub mod widgets;

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use wheel_app::protocol::{AppSnapshot, RestEvent, UiUpdate, UserCommand};

use layout::{build_layout, AppLayout};
use wheel::WheelAnimator;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Which text prompt is open, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a restaurant name to add.
    AddName,
    /// Typing the path of an export file to import.
    ImportPath,
}

/// TUI-local state that mirrors the application state for rendering.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Latest snapshot from the coordinator.
    pub snapshot: AppSnapshot,
    pub wheel: WheelAnimator,
    pub input_mode: InputMode,
    /// Text typed into the open prompt.
    pub input_text: String,
    /// Blocking alert; must be dismissed before anything else.
    pub alert: Option<String>,
    /// Latest status line message.
    pub notice: Option<String>,
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate, now: Instant) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.snapshot = *snapshot;
        }
        UiUpdate::WheelRebuilt { labels } => {
            debug!("Wheel rebuilt with {} labels", labels.len());
            state.wheel.rebuild(labels);
        }
        UiUpdate::SpinTo {
            generation,
            target_angle,
            duration,
        } => {
            state.wheel.spin_to(generation, target_angle, duration, now);
        }
        UiUpdate::Alert(message) => {
            state.alert = Some(message);
        }
        UiUpdate::Notice(message) => {
            state.notice = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame, with any open prompt or alert on top.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::selection::render(frame, layout.selection, &state.snapshot);
    widgets::wheel_panel::render(frame, layout.wheel, &state.wheel);
    widgets::pool_list::render_available(frame, layout.available, &state.snapshot);
    widgets::pool_list::render_picked(frame, layout.picked, &state.snapshot);
    render_help_bar(frame, &layout, state);

    match state.input_mode {
        InputMode::AddName => {
            widgets::dialog::render_prompt(frame, frame.area(), " Add restaurant ", &state.input_text)
        }
        InputMode::ImportPath => {
            widgets::dialog::render_prompt(frame, frame.area(), " Import file ", &state.input_text)
        }
        InputMode::Normal => {}
    }
    if let Some(message) = &state.alert {
        widgets::dialog::render_alert(frame, frame.area(), message);
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let text = match state.input_mode {
        InputMode::Normal => " s:Spin | Enter:Accept | a:Add | i:Import | e:Export | R:Reset | q:Quit",
        _ => " Enter:Confirm | Esc:Cancel",
    };
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal and installs a panic hook that restores it.
/// 2. Selects over UI updates, keyboard input and render ticks.
/// 3. On each tick advances the wheel, forwarding its rest event.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    rest_tx: mpsc::Sender<RestEvent>,
    frame_interval: Duration,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(frame_interval);
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            // UI updates from the coordinator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update, Instant::now());
                    }
                    None => {
                        info!("UI channel closed, leaving TUI");
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        match input::handle_key(key_event, &mut view_state) {
                            Some(UserCommand::Quit) => {
                                let _ = cmd_tx.send(UserCommand::Quit).await;
                                break;
                            }
                            Some(cmd) => {
                                let _ = cmd_tx.send(cmd).await;
                            }
                            None => {}
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        break;
                    }
                    None => break,
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                if let Some(event) = view_state.wheel.tick(Instant::now()) {
                    let _ = rest_tx.send(event).await;
                }
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
