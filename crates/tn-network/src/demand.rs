//! Origin/destination travel demand.
//!
//! # CSV format
//!
//! The tabular source is a wide matrix: the first row lists destination
//! node IDs, each following row starts with an origin node ID and carries
//! one demand cell per destination.  Cells that are empty, `0`, or the
//! `EOT` end-of-table marker are skipped.
//!
//! ```csv
//! ,0,18,25
//! 0,,50,200
//! 9,30,,EOT
//! ```
//!
//! All IDs are validated against the loaded graph at parse time; an
//! out-of-range ID is a configuration error, not something the optimizer
//! silently tolerates.

use std::io::Read;

use tn_core::NodeId;

use crate::graph::StopGraph;
use crate::{NetworkError, NetworkResult};

// ── OdPair ────────────────────────────────────────────────────────────────────

/// One origin/destination pair with its daily travel demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OdPair {
    pub origin: NodeId,
    pub destination: NodeId,
    pub demand: f64,
}

// ── DemandMatrix ──────────────────────────────────────────────────────────────

/// An ordered, graph-validated list of demand triples.  Read-only input to
/// fitness evaluation.
pub struct DemandMatrix {
    pairs: Vec<OdPair>,
}

impl DemandMatrix {
    /// Build from literal `(origin, destination, demand)` triples.
    pub fn from_triples<I>(triples: I, graph: &StopGraph) -> NetworkResult<Self>
    where
        I: IntoIterator<Item = (u32, u32, f64)>,
    {
        let mut pairs = Vec::new();
        for (origin, destination, demand) in triples {
            pairs.push(validated_pair(graph, origin, destination, demand)?);
        }
        Ok(DemandMatrix { pairs })
    }

    pub fn pairs(&self) -> &[OdPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Sum of demand over all pairs.
    pub fn total_demand(&self) -> f64 {
        self.pairs.iter().map(|p| p.demand).sum()
    }
}

fn validated_pair(
    graph: &StopGraph,
    origin: u32,
    destination: u32,
    demand: f64,
) -> NetworkResult<OdPair> {
    let origin = NodeId(origin);
    let destination = NodeId(destination);
    if !graph.contains(origin) {
        return Err(NetworkError::Config(format!(
            "demand origin {origin} is not a node of the loaded graph"
        )));
    }
    if !graph.contains(destination) {
        return Err(NetworkError::Config(format!(
            "demand destination {destination} is not a node of the loaded graph"
        )));
    }
    if demand < 0.0 || !demand.is_finite() {
        return Err(NetworkError::Config(format!(
            "demand {origin} -> {destination} must be finite and non-negative, got {demand}"
        )));
    }
    Ok(OdPair { origin, destination, demand })
}

// ── CSV loader ────────────────────────────────────────────────────────────────

/// Load a [`DemandMatrix`] from the wide-matrix CSV format.
pub fn load_demand_csv<R: Read>(reader: R, graph: &StopGraph) -> NetworkResult<DemandMatrix> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.records();

    // First row: destination IDs (leading cell is the empty corner).
    let header = match records.next() {
        Some(row) => row?,
        None => return Ok(DemandMatrix { pairs: Vec::new() }),
    };
    let destinations: Vec<Option<u32>> = header
        .iter()
        .map(|cell| {
            let cell = cell.trim();
            if cell.is_empty() {
                Ok(None)
            } else {
                cell.parse::<u32>().map(Some).map_err(|_| {
                    NetworkError::Parse(format!("invalid destination id {cell:?} in header"))
                })
            }
        })
        .collect::<NetworkResult<_>>()?;

    let mut pairs = Vec::new();
    for row in records {
        let row = row?;
        let Some(origin_cell) = row.get(0) else { continue };
        let origin_cell = origin_cell.trim();
        if origin_cell.is_empty() {
            continue;
        }
        let origin: u32 = origin_cell.parse().map_err(|_| {
            NetworkError::Parse(format!("invalid origin id {origin_cell:?}"))
        })?;

        for (col, cell) in row.iter().enumerate().skip(1) {
            let cell = cell.trim();
            if cell.is_empty() || cell == "0" || cell == "EOT" {
                continue;
            }
            let Some(Some(destination)) = destinations.get(col).copied() else {
                return Err(NetworkError::Parse(format!(
                    "demand cell at origin {origin}, column {col} has no destination header"
                )));
            };
            let demand: f64 = cell.parse().map_err(|_| {
                NetworkError::Parse(format!(
                    "invalid demand {cell:?} for pair {origin} -> {destination}"
                ))
            })?;
            pairs.push(validated_pair(graph, origin, destination, demand)?);
        }
    }

    Ok(DemandMatrix { pairs })
}
