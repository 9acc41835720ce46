//! `tn-network` — the stop graph and everything loaded alongside it.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`graph`]    | `StopNode`, `StopLink`, `StopGraph`, `StopGraphBuilder`    |
//! | [`loader`]   | `load_graph_json` — JSON network description parsing       |
//! | [`shortest`] | `ShortestPaths` — all-pairs minimum travel-time table      |
//! | [`demand`]   | `OdPair`, `DemandMatrix`, `load_demand_csv`                |
//! | [`error`]    | `NetworkError`, `NetworkResult<T>`                         |
//!
//! The graph is built once at startup and read-only afterwards; every other
//! crate borrows it immutably.

pub mod demand;
pub mod error;
pub mod graph;
pub mod loader;
pub mod shortest;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use demand::{load_demand_csv, DemandMatrix, OdPair};
pub use error::{NetworkError, NetworkResult};
pub use graph::{StopGraph, StopGraphBuilder, StopLink, StopNode};
pub use loader::{graph_from_str, load_graph_json};
pub use shortest::ShortestPaths;
