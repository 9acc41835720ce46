//! `tn-core` — foundational types for the transit network design workspace.
//!
//! This crate is a dependency of every other `tn-*` crate.  It intentionally
//! has no `tn-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                          |
//! |-------------|---------------------------------------------------|
//! | [`ids`]     | `NodeId`                                          |
//! | [`geo`]     | `GeoPoint`                                        |
//! | [`rng`]     | `GaRng` (seeded, explicitly threaded)             |
//! | [`params`]  | `GaParams`, `FitnessParams`                       |
//! | [`error`]   | `CoreError`, `CoreResult`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod geo;
pub mod ids;
pub mod params;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::GeoPoint;
pub use ids::NodeId;
pub use params::{FitnessParams, GaParams};
pub use rng::GaRng;
