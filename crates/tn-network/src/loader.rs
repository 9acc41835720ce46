//! JSON network-description loader.
//!
//! # Description format
//!
//! ```json
//! {
//!   "network": {
//!     "terminals": [
//!       { "id": 0, "label": "Terminal P1", "neighbors": [1],
//!         "distance": [350.0], "latlong": [-23.558, -46.736],
//!         "neighbors_latlong": [[-23.5585, -46.7358, -23.559, -46.7355]] }
//!     ],
//!     "nodes": [
//!       { "id": 1, "label": "Gate 2", "neighbors": [0],
//!         "distance": [350.0], "latlong": [-23.559, -46.735],
//!         "neighbors_latlong": [[]] }
//!     ]
//!   }
//! }
//! ```
//!
//! `neighbors`, `distance`, and `neighbors_latlong` are parallel arrays;
//! `neighbors_latlong[i]` is a flat `[lat, lon, lat, lon, ...]` polyline
//! describing the street geometry toward neighbor `i`.  IDs must be dense
//! (`0..count` over terminals and nodes together): the demand matrix and
//! every downstream component index stops by ID.

use std::io::Read;

use serde::Deserialize;

use tn_core::{GeoPoint, NodeId};

use crate::graph::{StopGraph, StopGraphBuilder};
use crate::{NetworkError, NetworkResult};

// ── JSON records ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NetworkFile {
    network: NetworkSection,
}

#[derive(Deserialize)]
struct NetworkSection {
    #[serde(default)]
    terminals: Vec<NodeRecord>,
    #[serde(default)]
    nodes: Vec<NodeRecord>,
}

#[derive(Deserialize)]
struct NodeRecord {
    id: u32,
    label: String,
    neighbors: Vec<u32>,
    distance: Vec<f32>,
    latlong: [f32; 2],
    #[serde(default)]
    neighbors_latlong: Vec<Vec<f32>>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`StopGraph`] from any `Read` source of the JSON description.
pub fn load_graph_json<R: Read>(reader: R) -> NetworkResult<StopGraph> {
    let file: NetworkFile = serde_json::from_reader(reader)?;
    build_graph(file.network)
}

/// Like [`load_graph_json`] but for an in-memory string.
pub fn graph_from_str(json: &str) -> NetworkResult<StopGraph> {
    let file: NetworkFile = serde_json::from_str(json)?;
    build_graph(file.network)
}

// ── Construction ──────────────────────────────────────────────────────────────

fn build_graph(section: NetworkSection) -> NetworkResult<StopGraph> {
    let total = section.terminals.len() + section.nodes.len();

    // Place every record at the slot its declared ID names; IDs are the
    // stable addressing scheme shared with the demand matrix.
    let mut slots: Vec<Option<(NodeRecord, bool)>> = Vec::new();
    slots.resize_with(total, || None);

    let records = section
        .terminals
        .into_iter()
        .map(|r| (r, true))
        .chain(section.nodes.into_iter().map(|r| (r, false)));

    for (record, is_terminal) in records {
        let idx = record.id as usize;
        if idx >= total {
            return Err(NetworkError::Config(format!(
                "node id {} out of range: description has {} entries, so ids must be 0..{}",
                record.id, total, total
            )));
        }
        if slots[idx].is_some() {
            return Err(NetworkError::Config(format!("duplicate node id {}", record.id)));
        }
        slots[idx] = Some((record, is_terminal));
    }

    let mut builder = StopGraphBuilder::new();
    let mut links: Vec<(NodeId, NodeRecord)> = Vec::with_capacity(total);

    for slot in slots {
        // Dense by construction: total slots, no duplicates, all in range.
        let Some((record, is_terminal)) = slot else {
            return Err(NetworkError::Config("node ids must be dense".into()));
        };
        let pos = GeoPoint::new(record.latlong[0], record.latlong[1]);
        let id = if is_terminal {
            builder.add_terminal(record.label.clone(), pos)
        } else {
            builder.add_stop(record.label.clone(), pos)
        };
        links.push((id, record));
    }

    for (id, record) in links {
        if record.neighbors.len() != record.distance.len() {
            return Err(NetworkError::Config(format!(
                "node {}: {} neighbors but {} distances",
                record.id,
                record.neighbors.len(),
                record.distance.len()
            )));
        }
        if !record.neighbors_latlong.is_empty()
            && record.neighbors_latlong.len() != record.neighbors.len()
        {
            return Err(NetworkError::Config(format!(
                "node {}: {} neighbors but {} shape polylines",
                record.id,
                record.neighbors.len(),
                record.neighbors_latlong.len()
            )));
        }

        for (i, (&neighbor, &distance)) in
            record.neighbors.iter().zip(&record.distance).enumerate()
        {
            let shape = match record.neighbors_latlong.get(i) {
                Some(flat) => parse_polyline(record.id, flat)?,
                None => Vec::new(),
            };
            builder.link_directed_with_shape(id, NodeId(neighbor), distance, shape);
        }
    }

    builder.build()
}

/// Decode a flat `[lat, lon, lat, lon, ...]` polyline.
fn parse_polyline(node_id: u32, flat: &[f32]) -> NetworkResult<Vec<GeoPoint>> {
    if flat.len() % 2 != 0 {
        return Err(NetworkError::Config(format!(
            "node {node_id}: shape polyline has odd coordinate count {}",
            flat.len()
        )));
    }
    Ok(flat
        .chunks_exact(2)
        .map(|pair| GeoPoint::new(pair[0], pair[1]))
        .collect())
}
