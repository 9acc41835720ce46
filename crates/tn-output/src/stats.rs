//! Generation-statistics CSV backend.
//!
//! Creates `generation_stats.csv` in the configured output directory, one
//! row per recorded generation.  A plotting collaborator consumes this file;
//! nothing here feeds back into the optimization.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use tn_ga::{EvolutionObserver, GenerationStats};

use crate::{OutputError, OutputResult};

// ── CsvStatsWriter ────────────────────────────────────────────────────────────

/// Writes recorded generation statistics to a CSV file.
pub struct CsvStatsWriter {
    writer: Writer<File>,
    finished: bool,
}

impl CsvStatsWriter {
    /// Open (or create) `generation_stats.csv` in `dir` and write the
    /// header row.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut writer = Writer::from_path(dir.join("generation_stats.csv"))?;
        writer.write_record(["iteration", "max_fitness", "mean_fitness", "std_dev"])?;
        Ok(Self { writer, finished: false })
    }

    /// Write one statistics row.
    pub fn write_stats(&mut self, stats: &GenerationStats) -> OutputResult<()> {
        self.writer.write_record(&[
            stats.iteration.to_string(),
            stats.max.to_string(),
            stats.mean.to_string(),
            stats.std_dev.to_string(),
        ])?;
        Ok(())
    }

    /// Write a whole recorded history at once.
    pub fn write_history(&mut self, history: &[GenerationStats]) -> OutputResult<()> {
        for stats in history {
            self.write_stats(stats)?;
        }
        Ok(())
    }

    /// Flush and close the underlying file handle.
    ///
    /// Idempotent — safe to call more than once.
    pub fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.writer.flush()?;
        Ok(())
    }
}

// ── StatsObserver ─────────────────────────────────────────────────────────────

/// An [`EvolutionObserver`] that streams statistics records to a
/// [`CsvStatsWriter`].
///
/// Errors are stored internally because observer methods have no return
/// value.  After the run, check for them with [`take_error`][Self::take_error].
pub struct StatsObserver {
    writer: CsvStatsWriter,
    last_error: Option<OutputError>,
}

impl StatsObserver {
    pub fn new(writer: CsvStatsWriter) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after the run returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl EvolutionObserver for StatsObserver {
    fn on_stats(&mut self, stats: &GenerationStats) {
        let result = self.writer.write_stats(stats);
        self.store_err(result);
    }

    fn on_run_end(&mut self, _final_generation: u32, _population: &tn_ga::Population) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
