// Library root: the selection-and-state engine behind the restaurant wheel.
//
// Pool membership, spin-target math, angle-to-item resolution, persistence and
// configuration live here. Orchestration lives in `wheel-app`; rendering lives
// in `wheel-tui`.

pub mod config;
pub mod db;
pub mod persistence;
pub mod pool;
pub mod selector;
pub mod spin;
