//! `tn-ga` — the genetic search over candidate transit networks.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`route`]      | `Route` — one candidate bus line                          |
//! | [`builder`]    | `RouteBuilder` — constrained random-walk generation       |
//! | [`individual`] | `Individual`, `ServiceStats`                              |
//! | [`fitness`]    | `FitnessEvaluator`, `PairService`                         |
//! | [`population`] | `Population` + select / crossover / mutate / reproduce    |
//! | [`evolution`]  | `Evolution`, `EvolutionObserver`, `GenerationStats`       |
//! | [`error`]      | `GaError`, `GaResult<T>`                                  |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                       |
//! |------------|--------------------------------------------------------------|
//! | `parallel` | Rayon-parallel population fitness evaluation.  Results are   |
//! |            | identical: evaluation draws no randomness.                   |

pub mod builder;
pub mod error;
pub mod evolution;
pub mod fitness;
pub mod individual;
pub mod population;
pub mod route;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::RouteBuilder;
pub use error::{GaError, GaResult};
pub use evolution::{Evolution, EvolutionObserver, GenerationStats, NoopObserver};
pub use fitness::{FitnessEvaluator, PairService};
pub use individual::{Individual, ServiceStats};
pub use population::{crossover, mutate, reproduce, Population};
pub use route::Route;
