// Application state and orchestration logic.
//
// The coordinator owns the pool and the spin session, turns user commands and
// wheel rest events into pool operations, and tells the frontend what to show.
// All mutations happen on the single task running `run`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use wheel_core::config::Config;
use wheel_core::persistence::{self, Persistence, StateStore};
use wheel_core::pool::{PoolChange, PoolManager};
use wheel_core::spin::{RestOutcome, SpinPhase, SpinRequest, SpinSession};

use crate::protocol::{AppSnapshot, RestEvent, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// Presentation texts
// ---------------------------------------------------------------------------

pub const SPIN_PROMPT: &str = "Spin to choose";
pub const SPINNING_TEXT: &str = "Spinning...";
pub const EMPTY_POOL_TEXT: &str = "Add restaurants to spin";
pub const IMPORT_FAILED_ALERT: &str = "Import failed. Please choose a valid JSON export.";

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub pool: PoolManager,
    pub spin: SpinSession,
    rng: StdRng,
}

impl AppState {
    /// Build the state from a store: the saved pool if there is one, the
    /// configured defaults otherwise. The wheel starts with the available list.
    pub fn new(config: Config, store: Box<dyn StateStore + Send>, rng: StdRng) -> Self {
        let pool = PoolManager::load_or_default(store, config.pool.default_names());
        let spin = SpinSession::new(pool.available().to_vec());
        AppState {
            config,
            pool,
            spin,
            rng,
        }
    }

    /// Open the configured SQLite store and build the state on top of it.
    pub fn bootstrap(config: Config) -> anyhow::Result<Self> {
        let store = Persistence::open(&config.storage)?;
        Ok(Self::new(config, Box::new(store), StdRng::from_entropy()))
    }

    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.config.wheel.spin_duration_ms)
    }

    pub fn export_path(&self) -> PathBuf {
        PathBuf::from(&self.config.export.path)
    }

    /// Build an `AppSnapshot` from the current state.
    pub fn build_snapshot(&self) -> AppSnapshot {
        let selection = self.pool.selection().map(str::to_string);
        let phase = self.spin.phase();
        let selection_text = if phase == SpinPhase::Spinning {
            SPINNING_TEXT.to_string()
        } else if let Some(name) = &selection {
            name.clone()
        } else if self.pool.available().is_empty() {
            EMPTY_POOL_TEXT.to_string()
        } else {
            SPIN_PROMPT.to_string()
        };

        AppSnapshot {
            available: self.pool.available().to_vec(),
            picked: self.pool.picked().to_vec(),
            can_spin: !self.pool.available().is_empty() && phase != SpinPhase::Spinning,
            can_accept: selection.is_some(),
            selection,
            selection_text,
            phase,
        }
    }

    /// Updates that bring a freshly started frontend in sync.
    pub fn initial_updates(&self) -> Vec<UiUpdate> {
        vec![
            UiUpdate::WheelRebuilt {
                labels: self.spin.items().to_vec(),
            },
            self.snapshot_update(),
        ]
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Apply one user command. Returns the updates to forward, in order.
    pub fn handle_command(&mut self, cmd: UserCommand) -> Vec<UiUpdate> {
        match cmd {
            UserCommand::Spin => self.spin(),
            UserCommand::Accept => self.accept(),
            UserCommand::AddName(raw) => {
                let change = self.pool.add_name(&raw);
                self.after_change(change)
            }
            UserCommand::Import(path) => self.import(&path),
            UserCommand::Export => self.export(),
            UserCommand::Reset => {
                info!("Resetting pool to defaults");
                let change = self.pool.reset(self.config.pool.default_names());
                self.after_change(change)
            }
            UserCommand::Quit => Vec::new(),
        }
    }

    fn spin(&mut self) -> Vec<UiUpdate> {
        match self.spin.request_spin(&mut self.rng) {
            SpinRequest::Ignored => Vec::new(),
            SpinRequest::Immediate(name) => {
                info!("Single restaurant left, selecting '{}' directly", name);
                self.pool.set_selection(&name);
                vec![self.snapshot_update()]
            }
            SpinRequest::Animate {
                generation,
                target_angle,
            } => {
                self.pool.clear_selection();
                vec![
                    UiUpdate::SpinTo {
                        generation,
                        target_angle,
                        duration: self.spin_duration(),
                    },
                    self.snapshot_update(),
                ]
            }
        }
    }

    fn accept(&mut self) -> Vec<UiUpdate> {
        let Some(name) = self.pool.selection().map(str::to_string) else {
            debug!("Accept with no pending selection; ignored");
            return Vec::new();
        };
        let change = self.pool.accept_selection(&name);
        self.after_change(change)
    }

    fn import(&mut self, path: &Path) -> Vec<UiUpdate> {
        let result = persistence::read_document(path)
            .and_then(|doc| self.pool.import_state(&doc));
        match result {
            Ok(change) => {
                info!("Imported pool from {}", path.display());
                let mut updates = self.after_change(change);
                updates.push(UiUpdate::Notice(format!(
                    "Imported {} restaurants from {}",
                    self.pool.available().len(),
                    path.display()
                )));
                updates
            }
            Err(e) => {
                warn!("Import from {} rejected: {}", path.display(), e);
                vec![UiUpdate::Alert(IMPORT_FAILED_ALERT.to_string())]
            }
        }
    }

    fn export(&self) -> Vec<UiUpdate> {
        let path = self.export_path();
        match persistence::export_to_file(&path, &self.pool.export_state()) {
            Ok(()) => {
                info!("Exported pool to {}", path.display());
                vec![UiUpdate::Notice(format!("Exported to {}", path.display()))]
            }
            Err(e) => {
                warn!("Export to {} failed: {}", path.display(), e);
                vec![UiUpdate::Alert(format!(
                    "Export failed: could not write {}",
                    path.display()
                ))]
            }
        }
    }

    /// Rebuild the wheel after a membership change.
    fn after_change(&mut self, change: PoolChange) -> Vec<UiUpdate> {
        if !change.is_rebuilt() {
            return Vec::new();
        }
        self.spin.rebuild(self.pool.available().to_vec());
        vec![
            UiUpdate::WheelRebuilt {
                labels: self.spin.items().to_vec(),
            },
            self.snapshot_update(),
        ]
    }

    // -----------------------------------------------------------------------
    // Rest events
    // -----------------------------------------------------------------------

    /// Finish a spin. Stale events (from a wheel that has since been
    /// rebuilt, or when no spin is in flight) produce no updates.
    pub fn handle_rest(&mut self, event: RestEvent) -> Vec<UiUpdate> {
        match self.spin.complete(&event) {
            RestOutcome::Stale => return Vec::new(),
            RestOutcome::Landed(name) => {
                if self.pool.set_selection(&name) {
                    info!("Wheel landed on '{}'", name);
                } else {
                    warn!("Wheel reported '{}', which is not in the pool", name);
                    self.spin.settle_idle();
                }
            }
            RestOutcome::Unresolved => {
                warn!("Rest event for spin {} resolved to nothing", event.generation);
            }
        }
        vec![self.snapshot_update()]
    }

    fn snapshot_update(&self) -> UiUpdate {
        UiUpdate::Snapshot(Box::new(self.build_snapshot()))
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the frontend
/// 2. Rest events from the wheel
///
/// Pushes UI updates through `ui_tx`. Returns on `Quit` or when the command
/// channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut rest_rx: mpsc::Receiver<RestEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    for update in state.initial_updates() {
        let _ = ui_tx.send(update).await;
    }

    // Track whether the rest channel is still open. When it closes we stop
    // polling it so tokio::select! never spins on it.
    let mut rest_open = true;

    loop {
        let updates = tokio::select! {
            // --- User commands ---
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        debug!("User command: {:?}", cmd);
                        state.handle_command(cmd)
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            // --- Wheel rest events (only poll when channel is open) ---
            event = rest_rx.recv(), if rest_open => {
                match event {
                    Some(event) => state.handle_rest(event),
                    None => {
                        info!("Rest event channel closed");
                        rest_open = false;
                        Vec::new()
                    }
                }
            }
        };

        for update in updates {
            let _ = ui_tx.send(update).await;
        }
    }

    info!("Application event loop exited");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
