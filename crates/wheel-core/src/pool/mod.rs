// Candidate pool: the available/picked lists and their mutations.

pub mod document;
pub mod state;

pub use document::{ImportError, PoolDocument};
pub use state::{PoolChange, PoolManager, PoolState};
