//! campus — end-to-end demo of the transit network design workspace.
//!
//! Optimizes 3 bus routes over a synthetic 12-stop campus street network
//! with 3 terminals, then writes the generation statistics CSV and a GTFS
//! snapshot of the final population.  Swap the embedded JSON/CSV for real
//! survey data to run at city scale.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use tn_core::{FitnessParams, GaParams};
use tn_ga::{Evolution, EvolutionObserver, GenerationStats, Population};
use tn_network::{load_demand_csv, load_graph_json, ShortestPaths};
use tn_output::{CsvStatsWriter, GtfsExporter, StatsObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const POPULATION_SIZE: usize = 20;
const MUTATION_RATE:   f64   = 0.05;
const NUM_ROUTES:      usize = 3;
const MAX_ROUTE_NODES: usize = 15;
const GENERATIONS:     u32   = 20;
const SEED:            u64   = 42;

/// 26 km/h commercial speed.
const AVERAGE_SPEED_MS:  f64 = 7.2;
/// 10-minute transfer penalty.
const TRANSFER_TIME_S:   f64 = 600.0;
/// Excess-time tolerance of the F1 term.
const XM_S:              f64 = 600.0;

// ── Network description ───────────────────────────────────────────────────────

// 12 stops, 3 terminals (0, 6, 11), 15 undirected street segments.
// Link geometry is included for the two terminal approaches.
const NETWORK_JSON: &str = r#"{
  "network": {
    "terminals": [
      { "id": 0,  "label": "Terminal North",  "neighbors": [1],
        "distance": [350.0], "latlong": [-23.5500, -46.7300],
        "neighbors_latlong": [[-23.5510, -46.7301, -23.5518, -46.7303]] },
      { "id": 6,  "label": "Terminal East",   "neighbors": [3],
        "distance": [320.0], "latlong": [-23.5600, -46.7320] },
      { "id": 11, "label": "Terminal South",  "neighbors": [10],
        "distance": [340.0], "latlong": [-23.5585, -46.7395] }
    ],
    "nodes": [
      { "id": 1,  "label": "Main Gate",       "neighbors": [0, 2, 4],
        "distance": [350.0, 280.0, 260.0], "latlong": [-23.5525, -46.7305] },
      { "id": 2,  "label": "Library",         "neighbors": [1, 3, 5],
        "distance": [280.0, 300.0, 260.0], "latlong": [-23.5550, -46.7310] },
      { "id": 3,  "label": "Engineering",     "neighbors": [2, 6, 5],
        "distance": [300.0, 320.0, 270.0], "latlong": [-23.5575, -46.7315] },
      { "id": 4,  "label": "Sports Center",   "neighbors": [1, 5, 7],
        "distance": [260.0, 240.0, 310.0], "latlong": [-23.5530, -46.7330] },
      { "id": 5,  "label": "Central Square",  "neighbors": [4, 3, 8, 2],
        "distance": [240.0, 270.0, 250.0, 260.0], "latlong": [-23.5555, -46.7335] },
      { "id": 7,  "label": "Dormitories",     "neighbors": [4, 8, 10],
        "distance": [310.0, 290.0, 280.0], "latlong": [-23.5535, -46.7360] },
      { "id": 8,  "label": "Cafeteria",       "neighbors": [7, 5, 9],
        "distance": [290.0, 250.0, 330.0], "latlong": [-23.5560, -46.7360] },
      { "id": 9,  "label": "Medical School",  "neighbors": [8, 10],
        "distance": [330.0, 300.0], "latlong": [-23.5585, -46.7365] },
      { "id": 10, "label": "Science Park",    "neighbors": [9, 11, 7],
        "distance": [300.0, 340.0, 280.0], "latlong": [-23.5560, -46.7390],
        "neighbors_latlong": [[], [-23.5572, -46.7392], []] }
    ]
  }
}"#;

// Wide-matrix OD demand: header row lists destination IDs, each data row
// starts with an origin ID.  Empty, "0", and "EOT" cells carry no demand.
const DEMAND_CSV: &str = "\
,0,6,9,11,5\n\
0,,120,80,150,40\n\
6,100,,30,60,\n\
11,90,50,25,,EOT\n\
1,,,20,30,\n\
";

// ── Progress observer ─────────────────────────────────────────────────────────

/// Prints recorded statistics while streaming them to the CSV writer.
struct ProgressObserver {
    inner: StatsObserver,
}

impl EvolutionObserver for ProgressObserver {
    fn on_stats(&mut self, stats: &GenerationStats) {
        println!(
            "  gen {:>3}: max {:>8.3}  mean {:>8.3}  std {:>7.3}",
            stats.iteration, stats.max, stats.mean, stats.std_dev
        );
        self.inner.on_stats(stats);
    }

    fn on_run_end(&mut self, final_generation: u32, population: &Population) {
        self.inner.on_run_end(final_generation, population);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== campus — transit network design by GA ===");
    println!(
        "Population: {POPULATION_SIZE}  |  Routes/ind: {NUM_ROUTES}  |  \
         Generations: {GENERATIONS}  |  Seed: {SEED}"
    );
    println!();

    // 1. Load the street network.
    let graph = load_graph_json(Cursor::new(NETWORK_JSON))?;
    println!(
        "Street network: {} stops ({} terminals)",
        graph.node_count(),
        graph.terminals().len()
    );

    // 2. Load travel demand.
    let demand = load_demand_csv(Cursor::new(DEMAND_CSV), &graph)?;
    println!(
        "Demand matrix: {} OD pairs, {} trips total",
        demand.len(),
        demand.total_demand()
    );

    // 3. Shortest-path reference for the time-quality term.
    let fitness = FitnessParams {
        k1:              100.0,
        k2:              100.0,
        k3:              100.0,
        xm:              XM_S,
        transfer_time_s: TRANSFER_TIME_S,
        average_speed:   AVERAGE_SPEED_MS,
    };
    let shortest = ShortestPaths::build(&graph, fitness.average_speed);

    // 4. GA parameters.
    let params = GaParams {
        population_size:      POPULATION_SIZE,
        mutation_rate:        MUTATION_RATE,
        num_routes:           NUM_ROUTES,
        max_route_nodes:      MAX_ROUTE_NODES,
        only_terminal_ending: true,
        max_route_attempts:   10_000,
        generations:          GENERATIONS,
        seed:                 SEED,
    };

    // 5. Output directory and stats writer.
    std::fs::create_dir_all("output/campus")?;
    let writer = CsvStatsWriter::new(Path::new("output/campus"))?;
    let mut observer = ProgressObserver { inner: StatsObserver::new(writer) };

    // 6. Run the optimization.
    println!();
    let t0 = Instant::now();
    let mut evolution = Evolution::new(&graph, &demand, &shortest, &params, &fitness)?;
    evolution.run(&mut observer)?;
    let elapsed = t0.elapsed();

    if let Some(e) = observer.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 7. GTFS snapshot of the final population.
    GtfsExporter::new(Path::new("output/campus"))
        .export(&graph, evolution.population().individuals())?;

    // 8. Summary.
    println!();
    println!("Optimization complete in {:.3} s", elapsed.as_secs_f64());
    println!("  generation_stats.csv : {} rows", evolution.history().len());
    println!("  stops.txt, shapes.txt: output/campus/");
    println!();

    // 9. Best network found.
    let best = evolution
        .population()
        .best()
        .ok_or_else(|| anyhow::anyhow!("empty final population"))?;
    let stats = best.stats();
    println!("Best network (fitness {:.3}):", best.fitness().unwrap_or(f64::NAN));
    println!(
        "  mean in-vehicle time {:.1} s | direct {:.0}% | transfer {:.0}% | unserved {:.0}%",
        stats.mean_time_s,
        stats.direct_share * 100.0,
        stats.transfer_share * 100.0,
        stats.unattended_share * 100.0
    );
    for route in best.genes() {
        let stops: Vec<&str> = route
            .nodes()
            .iter()
            .map(|&id| graph.node(id).map(|n| n.label.as_str()))
            .collect::<Result<_, _>>()?;
        println!(
            "  route {:>2} ({:>6.0} m): {}",
            route.label(),
            route.length_m(),
            stops.join(" - ")
        );
    }

    Ok(())
}
