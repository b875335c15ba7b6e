// Messages between the coordinator and the rendering collaborator.
//
// The frontend sends `UserCommand`s and `RestEvent`s in; the coordinator
// answers with `UiUpdate`s. Nothing in here depends on a particular frontend.

use std::path::PathBuf;
use std::time::Duration;

use wheel_core::spin::SpinPhase;

pub use wheel_core::spin::RestEvent;

/// An action requested by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Spin,
    /// Accept the pending selection.
    Accept,
    /// Add a name typed by the user (trimmed by the pool).
    AddName(String),
    /// Replace the pool from an export file.
    Import(PathBuf),
    /// Write the pool to the configured export file.
    Export,
    /// Restore the default candidate list.
    Reset,
    Quit,
}

/// An instruction for the frontend.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    /// Full presentation state after any change.
    Snapshot(Box<AppSnapshot>),
    /// The wheel's slices changed. Any animation in flight is void.
    WheelRebuilt { labels: Vec<String> },
    /// Animate to `target_angle`, then reply with a `RestEvent` carrying
    /// `generation`.
    SpinTo {
        generation: u64,
        target_angle: f64,
        duration: Duration,
    },
    /// Blocking error message the user must dismiss.
    Alert(String),
    /// Transient status line message.
    Notice(String),
}

/// Everything the frontend needs to draw the lists, the selection display and
/// the enabled state of the controls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppSnapshot {
    pub available: Vec<String>,
    pub picked: Vec<String>,
    /// The pending selection, if any.
    pub selection: Option<String>,
    /// What the selection display shows: the selection or a placeholder.
    pub selection_text: String,
    pub phase: SpinPhase,
    pub can_spin: bool,
    pub can_accept: bool,
}
