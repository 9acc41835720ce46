//! `tn-output` — result writers for the transit network design workspace.
//!
//! Two outputs are produced:
//!
//! | Module    | Files created                  | Content                           |
//! |-----------|--------------------------------|-----------------------------------|
//! | [`stats`] | `generation_stats.csv`         | per-recorded-generation fitness   |
//! | [`gtfs`]  | `stops.txt`, `shapes.txt`      | final population in GTFS form     |
//!
//! `StatsObserver` bridges `tn_ga::EvolutionObserver` to the stats writer so
//! a run can stream its history to disk as it goes; `GtfsExporter` walks a
//! finished generation once.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tn_output::{CsvStatsWriter, GtfsExporter, StatsObserver};
//!
//! let writer = CsvStatsWriter::new(Path::new("./output"))?;
//! let mut obs = StatsObserver::new(writer);
//! evolution.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//!
//! GtfsExporter::new(Path::new("./output"))
//!     .export(&graph, evolution.population().individuals())?;
//! ```

pub mod error;
pub mod gtfs;
pub mod stats;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{OutputError, OutputResult};
pub use gtfs::GtfsExporter;
pub use stats::{CsvStatsWriter, StatsObserver};
