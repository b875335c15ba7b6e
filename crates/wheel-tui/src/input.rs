// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the
// coordinator, or into local ViewState changes (prompt editing, dismissing
// alerts).

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use wheel_app::protocol::UserCommand;

use crate::{InputMode, ViewState};

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// coordinator. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // An alert blocks everything until dismissed
    if view_state.alert.is_some() {
        if matches!(key_event.code, KeyCode::Enter | KeyCode::Esc) {
            view_state.alert = None;
        }
        return None;
    }

    if view_state.input_mode != InputMode::Normal {
        return handle_prompt(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Char('s') | KeyCode::Char(' ') => {
            view_state.snapshot.can_spin.then_some(UserCommand::Spin)
        }
        KeyCode::Enter => view_state.snapshot.can_accept.then_some(UserCommand::Accept),
        KeyCode::Char('a') => {
            open_prompt(view_state, InputMode::AddName);
            None
        }
        KeyCode::Char('i') => {
            open_prompt(view_state, InputMode::ImportPath);
            None
        }
        KeyCode::Char('e') => Some(UserCommand::Export),
        KeyCode::Char('R') => Some(UserCommand::Reset),
        KeyCode::Char('q') => Some(UserCommand::Quit),
        _ => None,
    }
}

fn open_prompt(view_state: &mut ViewState, mode: InputMode) {
    view_state.input_mode = mode;
    view_state.input_text.clear();
}

/// Handle key events while a text prompt is open.
///
/// - Printable characters are appended
/// - Backspace removes the last character
/// - Enter submits, Esc cancels
fn handle_prompt(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.input_mode = InputMode::Normal;
            view_state.input_text.clear();
            None
        }
        KeyCode::Enter => {
            let mode = std::mem::take(&mut view_state.input_mode);
            let text = std::mem::take(&mut view_state.input_text);
            match mode {
                InputMode::AddName => Some(UserCommand::AddName(text)),
                InputMode::ImportPath => {
                    let path = text.trim();
                    (!path.is_empty()).then(|| UserCommand::Import(PathBuf::from(path)))
                }
                InputMode::Normal => None,
            }
        }
        KeyCode::Backspace => {
            view_state.input_text.pop();
            None
        }
        KeyCode::Char(c) => {
            view_state.input_text.push(c);
            None
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
