// Pool state: the available and picked lists, plus the pending selection.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::document::{self, ImportError, PoolDocument};
use crate::persistence::StateStore;

/// The two ordered name lists. Every entry is trimmed and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    /// Names eligible for the next spin, in display order. Duplicates are
    /// allowed and count as separate wheel slices.
    pub available: Vec<String>,
    /// Accepted names, in acceptance order.
    pub picked: Vec<String>,
}

/// Outcome of a pool operation.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolChange {
    /// Membership changed: the wheel must be rebuilt and the pool was saved.
    Rebuilt,
    /// Benign no-op; nothing changed and nothing was saved.
    Unchanged,
}

impl PoolChange {
    pub fn is_rebuilt(self) -> bool {
        self == PoolChange::Rebuilt
    }
}

/// Sole owner of the pool. Every membership change goes through here and is
/// written to the store before the method returns.
pub struct PoolManager {
    state: PoolState,
    selection: Option<String>,
    store: Box<dyn StateStore + Send>,
}

impl PoolManager {
    /// Start from the saved pool if one exists, otherwise from `defaults`.
    pub fn load_or_default(store: Box<dyn StateStore + Send>, defaults: Vec<String>) -> Self {
        let state = match store.load() {
            Some(saved) => {
                info!(
                    "Restored saved pool: {} available, {} picked",
                    saved.available.len(),
                    saved.picked.len()
                );
                saved
            }
            None => {
                info!("No saved pool, starting from {} defaults", defaults.len());
                PoolState {
                    available: clean_names(defaults),
                    picked: Vec::new(),
                }
            }
        };
        PoolManager {
            state,
            selection: None,
            store,
        }
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn available(&self) -> &[String] {
        &self.state.available
    }

    pub fn picked(&self) -> &[String] {
        &self.state.picked
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Record the name the wheel landed on. Only names currently in the pool
    /// can become the pending selection.
    pub fn set_selection(&mut self, name: &str) -> bool {
        if !self.state.available.iter().any(|n| n == name) {
            return false;
        }
        self.selection = Some(name.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Append a trimmed name. Blank input is ignored.
    pub fn add_name(&mut self, raw: &str) -> PoolChange {
        let name = raw.trim();
        if name.is_empty() {
            return PoolChange::Unchanged;
        }
        info!("Adding '{}' to the pool", name);
        self.state.available.push(name.to_string());
        self.commit()
    }

    /// Move the first occurrence of `name` from available to picked.
    ///
    /// No-op unless a selection is pending and `name` is still available.
    pub fn accept_selection(&mut self, name: &str) -> PoolChange {
        if self.selection.is_none() {
            return PoolChange::Unchanged;
        }
        let Some(idx) = self.state.available.iter().position(|n| n == name) else {
            return PoolChange::Unchanged;
        };
        let accepted = self.state.available.remove(idx);
        info!("Accepted '{}'", accepted);
        self.state.picked.push(accepted);
        self.commit()
    }

    /// Replace both lists from a loosely-typed document. On error the pool
    /// is left untouched.
    pub fn import_state(&mut self, doc: &Value) -> Result<PoolChange, ImportError> {
        let doc = document::from_value(doc)?;
        Ok(self.replace(doc.into()))
    }

    /// Replace both lists wholesale. Callers pass lists that already hold
    /// only trimmed, non-empty names.
    fn replace(&mut self, state: PoolState) -> PoolChange {
        info!(
            "Replacing pool: {} available, {} picked",
            state.available.len(),
            state.picked.len()
        );
        self.state = state;
        self.commit()
    }

    /// Restore the default list and forget all picks.
    pub fn reset(&mut self, defaults: Vec<String>) -> PoolChange {
        self.replace(PoolState {
            available: clean_names(defaults),
            picked: Vec::new(),
        })
    }

    /// Plain document of the current lists, independent of the store format.
    pub fn export_state(&self) -> PoolDocument {
        PoolDocument::from(&self.state)
    }

    fn commit(&mut self) -> PoolChange {
        self.selection = None;
        self.store.save(&self.state);
        PoolChange::Rebuilt
    }
}

/// Trim every name and drop the blank ones.
fn clean_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .filter_map(|name| {
            let trimmed = name.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}
