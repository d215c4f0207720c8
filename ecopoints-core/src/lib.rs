//! Core types and service wiring for the ecopoints collection point map.

/// Two-tier category resolution.
pub mod classify;
/// GeoJSON feature collection loader.
pub mod loader;
/// Domain models for collection points and categories.
pub mod model;
/// Traits describing the storage collaborators.
pub mod ports;
/// High-level service facade used by clients.
pub mod service;
/// Observable, filterable map state.
pub mod state;

pub use classify::*;
pub use loader::*;
pub use model::*;
pub use ports::*;
pub use service::*;
pub use state::*;
