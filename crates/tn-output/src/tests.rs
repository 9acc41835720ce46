//! Integration tests for tn-output.

#[cfg(test)]
mod helpers {
    use tn_core::{GeoPoint, NodeId};
    use tn_network::{StopGraph, StopGraphBuilder};

    /// T0 — A1 — T2, with interpolation points on the T0–A1 link.
    pub fn shaped_graph() -> (StopGraph, [NodeId; 3]) {
        let mut b = StopGraphBuilder::new();
        let t0 = b.add_terminal("T0", GeoPoint::new(10.0, 20.0));
        let a1 = b.add_stop("A1", GeoPoint::new(10.1, 20.1));
        let t2 = b.add_terminal("T2", GeoPoint::new(10.2, 20.2));
        b.link_directed_with_shape(
            t0,
            a1,
            300.0,
            vec![GeoPoint::new(10.04, 20.04), GeoPoint::new(10.07, 20.07)],
        );
        b.link_directed(a1, t0, 300.0);
        b.link(a1, t2, 400.0);
        (b.build().unwrap(), [t0, a1, t2])
    }
}

// ── Stats CSV ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stats_csv {
    use tempfile::TempDir;

    use tn_ga::GenerationStats;

    use crate::stats::CsvStatsWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn row(iteration: u32) -> GenerationStats {
        GenerationStats {
            iteration,
            max: 250.0 + iteration as f64,
            mean: 200.0,
            std_dev: 12.5,
        }
    }

    #[test]
    fn file_created_with_header() {
        let dir = tmp();
        let mut w = CsvStatsWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("generation_stats.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["iteration", "max_fitness", "mean_fitness", "std_dev"]);
    }

    #[test]
    fn history_round_trip() {
        let dir = tmp();
        let mut w = CsvStatsWriter::new(dir.path()).unwrap();
        w.write_history(&[row(0), row(2), row(4)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("generation_stats.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[1][0], "2");
        assert_eq!(&rows[2][1], "254"); // 250 + iteration 4
        assert_eq!(&rows[0][3], "12.5");
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvStatsWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap(); // second call should not panic
    }
}

// ── StatsObserver over a real run ─────────────────────────────────────────────

#[cfg(test)]
mod observer {
    use tempfile::TempDir;

    use tn_core::{FitnessParams, GaParams};
    use tn_network::{DemandMatrix, ShortestPaths};
    use tn_ga::Evolution;

    use crate::stats::{CsvStatsWriter, StatsObserver};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn streams_history_during_run() {
        let (graph, _) = super::helpers::shaped_graph();
        let ga = GaParams {
            population_size:      8,
            mutation_rate:        0.25,
            num_routes:           2,
            max_route_nodes:      6,
            only_terminal_ending: true,
            max_route_attempts:   1000,
            generations:          4,
            seed:                 7,
        };
        let fit = FitnessParams {
            k1:              100.0,
            k2:              100.0,
            k3:              100.0,
            xm:              60.0,
            transfer_time_s: 30.0,
            average_speed:   10.0,
        };
        let shortest = ShortestPaths::build(&graph, fit.average_speed);
        let demand = DemandMatrix::from_triples([(0, 2, 100.0)], &graph).unwrap();

        let dir = tmp();
        let writer = CsvStatsWriter::new(dir.path()).unwrap();
        let mut observer = StatsObserver::new(writer);

        let mut evolution = Evolution::new(&graph, &demand, &shortest, &ga, &fit).unwrap();
        evolution.run(&mut observer).unwrap();
        assert!(observer.take_error().is_none(), "no write errors expected");

        let mut rdr = csv::Reader::from_path(dir.path().join("generation_stats.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        // Generations 0 and 2 are the recorded ones for a 4-generation run.
        assert_eq!(rows.len(), evolution.history().len());
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[1][0], "2");
    }
}

// ── GTFS export ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod gtfs {
    use tempfile::TempDir;

    use tn_ga::{Individual, Route};

    use crate::gtfs::GtfsExporter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn stops_file_lists_every_node() {
        let (graph, _) = super::helpers::shaped_graph();
        let dir = tmp();
        GtfsExporter::new(dir.path()).write_stops(&graph).unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("stops.txt")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(
            headers,
            ["stop_id", "stop_name", "stop_desc", "stop_lat", "stop_lon",
             "stop_url", "location_type", "parent_station"]
        );
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[0][1], "T0");
        assert_eq!(&rows[1][1], "A1");
    }

    #[test]
    fn shapes_interleave_geometry_and_cumulative_distance() {
        let (graph, [t0, a1, t2]) = super::helpers::shaped_graph();
        let route = Route::new("1", vec![t0, a1, t2], &graph).unwrap();
        let individual = Individual::new("0", vec![route]);

        let dir = tmp();
        GtfsExporter::new(dir.path())
            .export(&graph, std::slice::from_ref(&individual))
            .unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("shapes.txt")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();

        // T0, two interpolation points, A1, T2 → 5 shape points.
        assert_eq!(rows.len(), 5);
        // Sequence is strictly increasing from 1.
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(&row[0], "1"); // single shape
            assert_eq!(row[3].parse::<u32>().unwrap(), i as u32 + 1);
        }
        // Node rows carry cumulative distance; interpolation rows don't.
        assert_eq!(&rows[0][4], "0");   // T0
        assert_eq!(&rows[1][4], "");    // interpolation
        assert_eq!(&rows[2][4], "");    // interpolation
        assert_eq!(&rows[3][4], "300"); // A1
        assert_eq!(&rows[4][4], "700"); // T2
    }

    #[test]
    fn shape_ids_sequential_across_individuals() {
        let (graph, [t0, a1, t2]) = super::helpers::shaped_graph();
        let r = Route::new("1", vec![t0, a1, t2], &graph).unwrap();
        let generation = vec![
            Individual::new("0", vec![r.clone(), r.clone()]),
            Individual::new("1", vec![r.clone()]),
        ];

        let dir = tmp();
        GtfsExporter::new(dir.path())
            .write_shapes(&graph, &generation)
            .unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("shapes.txt")).unwrap();
        let ids: Vec<String> = rdr.records().map(|r| r.unwrap()[0].to_string()).collect();
        assert!(ids.contains(&"1".to_string()));
        assert!(ids.contains(&"2".to_string()));
        assert!(ids.contains(&"3".to_string()));
        assert!(!ids.contains(&"4".to_string()));
    }
}
