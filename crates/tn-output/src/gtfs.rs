//! GTFS export of a finished generation.
//!
//! Two files are written in the GTFS static format, enough for downstream
//! schedule tooling and map rendering:
//!
//! - `stops.txt` — every stop of the graph with its coordinate.
//! - `shapes.txt` — one shape per route of every individual, emitting the
//!   link interpolation points between consecutive stops (no distance
//!   value) and the stops themselves with cumulative
//!   `shape_dist_traveled` in metres.

use std::path::{Path, PathBuf};

use csv::Writer;

use tn_ga::Individual;
use tn_network::{NetworkError, StopGraph};

use crate::OutputResult;

/// Writes a generation's route sets as GTFS `stops.txt` + `shapes.txt`.
pub struct GtfsExporter {
    dir: PathBuf,
}

impl GtfsExporter {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }

    /// Write both files for `generation` over `graph`.
    pub fn export(&self, graph: &StopGraph, generation: &[Individual]) -> OutputResult<()> {
        self.write_stops(graph)?;
        self.write_shapes(graph, generation)
    }

    /// `stops.txt`: one row per graph node.
    pub fn write_stops(&self, graph: &StopGraph) -> OutputResult<()> {
        let mut writer = Writer::from_path(self.dir.join("stops.txt"))?;
        writer.write_record([
            "stop_id",
            "stop_name",
            "stop_desc",
            "stop_lat",
            "stop_lon",
            "stop_url",
            "location_type",
            "parent_station",
        ])?;
        for node in graph.nodes() {
            writer.write_record(&[
                node.id.0.to_string(),
                node.label.clone(),
                String::new(),
                node.pos.lat.to_string(),
                node.pos.lon.to_string(),
                String::new(),
                String::new(),
                String::new(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// `shapes.txt`: one shape per route, shape IDs sequential across the
    /// whole generation.
    pub fn write_shapes(&self, graph: &StopGraph, generation: &[Individual]) -> OutputResult<()> {
        let mut writer = Writer::from_path(self.dir.join("shapes.txt"))?;
        writer.write_record([
            "shape_id",
            "shape_pt_lat",
            "shape_pt_lon",
            "shape_pt_sequence",
            "shape_dist_traveled",
        ])?;

        let mut shape_id = 0u32;
        for individual in generation {
            for route in individual.genes() {
                shape_id += 1;
                let mut sequence = 0u32;
                let mut dist_acc = 0.0f64;
                let mut prev = None;

                for &node_id in route.nodes() {
                    let node = graph.node(node_id)?;

                    if let Some(prev_id) = prev {
                        let link = graph
                            .node(prev_id)?
                            .link_to(node_id)
                            .ok_or(NetworkError::MissingLink { from: prev_id, to: node_id })?;
                        dist_acc += link.distance_m as f64;

                        // Street geometry between the two stops; no
                        // cumulative distance at interpolation points.
                        for point in &link.shape {
                            sequence += 1;
                            writer.write_record(&[
                                shape_id.to_string(),
                                point.lat.to_string(),
                                point.lon.to_string(),
                                sequence.to_string(),
                                String::new(),
                            ])?;
                        }
                    }

                    sequence += 1;
                    writer.write_record(&[
                        shape_id.to_string(),
                        node.pos.lat.to_string(),
                        node.pos.lon.to_string(),
                        sequence.to_string(),
                        dist_acc.to_string(),
                    ])?;
                    prev = Some(node_id);
                }
            }
        }

        writer.flush()?;
        Ok(())
    }
}
