//! Unit tests for swarm-analysis.

use swarm_control::{ControllerKind, ControllerStatus};
use swarm_core::{ObjectKind, Pose, Preset, PuckId, RobotId, ScenarioConfig, Tick, Vec2};
use swarm_field::ScalarField;
use swarm_sim::{PuckView, RobotView, SimBuilder, SimObserver, WorldView};

use crate::{
    Analyzer, ComponentStats, Metric, SeriesCsvWriter, TAU, TimeSeries, average_tau_difference,
    connected_component_stats, number_flashing, number_holding, percentage_completion,
    percentage_completion_sort, second_moment,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn v(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

fn robot(i: u32, flashing: bool, holding: Option<ObjectKind>) -> RobotView {
    RobotView {
        id: RobotId(i),
        pose: Pose::new(v(10.0 * i as f32, 10.0), 0.0),
        radius: 15.0,
        flashing,
        holding,
        text: String::new(),
        text_colour: "green".into(),
        status: ControllerStatus::Good,
    }
}

fn puck(i: u32, kind: ObjectKind, position: Vec2) -> PuckView {
    PuckView { id: PuckId(i), kind, position, held: false }
}

fn view<'a>(
    config: &'a ScenarioConfig,
    step:   u64,
    trial:  u32,
    robots: &'a [RobotView],
    pucks:  &'a [PuckView],
) -> WorldView<'a> {
    WorldView {
        step: Tick(step),
        trial,
        config,
        robots,
        pucks,
        nest: None,
        pheromone: None,
    }
}

// ── Components ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod components {
    use super::*;

    #[test]
    fn three_close_one_far() {
        let points = [v(0.0, 0.0), v(0.5, 0.5), v(1.0, 0.0), v(1000.0, 1000.0)];
        let stats = connected_component_stats(&points, 4.0);
        assert_eq!(stats, ComponentStats { count: 2, largest: 3 });
        assert_eq!(percentage_completion(&points, 4.0), 75.0);
    }

    #[test]
    fn empty_input() {
        assert_eq!(connected_component_stats(&[], 4.0), ComponentStats { count: 0, largest: 0 });
        assert_eq!(percentage_completion(&[], 4.0), 0.0);
    }

    #[test]
    fn mutually_adjacent_points_form_one_component() {
        let points: Vec<Vec2> = (0..8).map(|i| v(i as f32 * 0.3, 0.0)).collect();
        let stats = connected_component_stats(&points, 4.0);
        assert_eq!(stats, ComponentStats { count: 1, largest: 8 });
    }

    #[test]
    fn mutually_distant_points_stay_apart() {
        let points: Vec<Vec2> = (0..6).map(|i| v(i as f32 * 10.0, 0.0)).collect();
        let stats = connected_component_stats(&points, 4.0);
        assert_eq!(stats, ComponentStats { count: 6, largest: 1 });
    }

    #[test]
    fn chains_are_transitive() {
        // Ends are 9 apart but each link is 3.
        let points = [v(0.0, 0.0), v(3.0, 0.0), v(6.0, 0.0), v(9.0, 0.0)];
        assert_eq!(connected_component_stats(&points, 4.0).count, 1);
    }

    #[test]
    fn threshold_distance_is_not_an_edge() {
        let points = [v(0.0, 0.0), v(4.0, 0.0)];
        assert_eq!(connected_component_stats(&points, 4.0).count, 2);
    }
}

// ── Metrics ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod metrics {
    use super::*;

    #[test]
    fn sort_completion_combines_colours() {
        let red = [v(0.0, 0.0), v(1.0, 0.0), v(500.0, 0.0)];
        let green = [v(0.0, 300.0)];
        // (2 + 1) / 4
        assert_eq!(percentage_completion_sort(&red, &green, 4.0), 75.0);
        assert_eq!(percentage_completion_sort(&[], &[], 4.0), 0.0);
    }

    #[test]
    fn robot_counts() {
        let robots = [
            robot(0, true, None),
            robot(1, false, Some(ObjectKind::RedPuck)),
            robot(2, true, Some(ObjectKind::GreenPuck)),
        ];
        assert_eq!(number_flashing(&robots), 2);
        assert_eq!(number_holding(&robots), 2);
    }

    #[test]
    fn second_moment_is_scaled_spread() {
        let points = [v(-2.0, 0.0), v(2.0, 0.0)];
        // Σ d² = 8, 4r² = 4.
        assert!((second_moment(&points, 1.0) - 2.0).abs() < 1e-9);
        assert_eq!(second_moment(&[], 1.0), 0.0);
    }

    #[test]
    fn tau_difference_at_source_cell() {
        let nest = ScalarField::distance_field(5, 5, 10, 10).unwrap();
        let at_source = [v(55.0, 55.0)];
        let d = average_tau_difference(&at_source, &nest, 100.0, 100.0);
        assert!((d - (1.0 - TAU as f64)).abs() < 1e-6);
    }

    #[test]
    fn metric_per_preset() {
        assert_eq!(Metric::for_preset(Preset::SimpleCluster), Metric::PercentageCompletion);
        assert_eq!(Metric::for_preset(Preset::Oc2), Metric::PercentageCompletion);
        assert_eq!(Metric::for_preset(Preset::Sort), Metric::SortCompletion);
        assert_eq!(Metric::for_preset(Preset::Majority), Metric::NumberFlashing);
        assert_eq!(Metric::for_preset(Preset::Pheromone), Metric::GreenPucks);
    }

    #[test]
    fn evaluate_uses_cluster_threshold() {
        let config = ScenarioConfig::for_preset(Preset::SimpleCluster);
        let r = config.puck_radius;
        let pucks = [
            puck(0, ObjectKind::RedPuck, v(100.0, 100.0)),
            puck(1, ObjectKind::RedPuck, v(100.0 + 3.0 * r, 100.0)),
            puck(2, ObjectKind::RedPuck, v(300.0, 300.0)),
            puck(3, ObjectKind::GreenPuck, v(101.0, 100.0)),
        ];
        let w = view(&config, 0, 0, &[], &pucks);
        let pc = Metric::PercentageCompletion.evaluate(&w);
        assert!((pc - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(Metric::GreenPucks.evaluate(&w), 1.0);
    }
}

// ── Series ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod series {
    use super::*;

    #[test]
    fn averages_across_trials_per_step() {
        let mut s = TimeSeries::new();
        assert_eq!(s.record(0, 0, 10.0), 10.0);
        assert_eq!(s.record(0, 100, 20.0), 20.0);
        assert_eq!(s.record(1, 0, 30.0), 20.0);
        assert_eq!(s.values(0), &[10.0, 30.0]);
        assert_eq!(s.average(100), Some(20.0));
        assert_eq!(s.average(200), None);
        assert_eq!(s.trial(1), &[(0, 30.0)]);
        assert_eq!(s.averages(), vec![(0, 20.0), (100, 20.0)]);
    }

    #[test]
    fn start_trial_opens_an_empty_series() {
        let mut s = TimeSeries::new();
        s.start_trial(2);
        assert_eq!(s.trial_count(), 3);
        assert!(s.trial(2).is_empty());
        assert!(s.is_empty());
    }
}

// ── Analyzer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod analyzer {
    use super::*;

    #[test]
    fn samples_feed_the_series() {
        let config = ScenarioConfig::for_preset(Preset::Firefly);
        let robots = [robot(0, true, None), robot(1, false, None)];
        let mut a = Analyzer::for_preset(Preset::Firefly);

        a.on_sample(&view(&config, 0, 0, &robots, &[]));
        a.on_reset(1);
        let none = [robot(0, false, None)];
        a.on_sample(&view(&config, 0, 1, &none, &[]));

        assert_eq!(a.series().values(0), &[1.0, 0.0]);
        let last = a.last_sample().unwrap();
        assert_eq!((last.trial, last.value, last.average), (1, 0.0, 0.5));
    }

    #[test]
    fn runs_alongside_a_sim() {
        let mut config = ScenarioConfig::for_preset(Preset::SimpleCluster);
        config.max_step = 200;
        let mut sim = SimBuilder::headless(config)
            .controller(ControllerKind::Cluster)
            .population_target(3)
            .build()
            .unwrap();
        let mut a = Analyzer::for_preset(Preset::SimpleCluster);
        sim.run(&mut a).unwrap();

        let trial = a.series().trial(0);
        assert_eq!(trial.iter().map(|&(s, _)| s).collect::<Vec<_>>(), vec![0, 100, 200]);
        assert!(trial.iter().all(|&(_, pc)| (0.0..=100.0).contains(&pc)));
        assert!(a.take_error().is_none());
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::*;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn header_and_rows() {
        let dir = tmp();
        let path = dir.path().join("series.csv");
        let mut w = SeriesCsvWriter::new(&path).unwrap();
        w.write_sample(100, 1, 75.0, 50.0).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["step", "trial", "value", "average"]);
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "100");
        assert_eq!(&rows[0][1], "1");
        assert_eq!(&rows[0][2], "75");
    }

    #[test]
    fn analyzer_streams_samples() {
        let dir = tmp();
        let path = dir.path().join("flashes.csv");
        let config = ScenarioConfig::for_preset(Preset::Firefly);
        let robots = [robot(0, true, None)];
        let mut a = Analyzer::for_preset(Preset::Firefly)
            .with_writer(SeriesCsvWriter::new(&path).unwrap());
        a.on_sample(&view(&config, 0, 0, &robots, &[]));
        a.on_sample(&view(&config, 1, 0, &robots, &[]));
        a.on_sim_end(Tick(1));
        assert!(a.take_error().is_none());

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        assert_eq!(rdr.records().count(), 2);
    }

    #[test]
    fn whole_series_dump() {
        let dir = tmp();
        let path = dir.path().join("all.csv");
        let mut s = TimeSeries::new();
        s.record(0, 0, 1.0);
        s.record(1, 0, 3.0);
        let mut w = SeriesCsvWriter::new(&path).unwrap();
        w.write_series(&s).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][3], "2");
        assert_eq!(&rows[1][1], "1");
    }
}
