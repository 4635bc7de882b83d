//! Traffic-priority chat server library.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `tw-e2e-tests`) can access `AppState`, `build_router`, the
//! optimizer gateway and the conversation engines.

pub mod agent;
pub mod assistant;
pub mod config;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod session;
pub mod state;
