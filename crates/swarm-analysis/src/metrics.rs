//! Scalar measures of swarm progress.

use std::fmt;

use swarm_core::{ObjectKind, Preset, Vec2};
use swarm_field::ScalarField;
use swarm_sim::{RobotView, WorldView};

use crate::connected_component_stats;

/// Target nest-field value for construction around the nest.
pub const TAU: f32 = 0.725;

/// `100 · largest cluster / n`; zero when there are no points.
pub fn percentage_completion(points: &[Vec2], threshold: f32) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let stats = connected_component_stats(points, threshold);
    100.0 * stats.largest as f64 / points.len() as f64
}

/// Two-colour completion: `100 · (largest red + largest green) / (nR + nG)`.
pub fn percentage_completion_sort(red: &[Vec2], green: &[Vec2], threshold: f32) -> f64 {
    let n = red.len() + green.len();
    if n == 0 {
        return 0.0;
    }
    let r = connected_component_stats(red, threshold).largest;
    let g = connected_component_stats(green, threshold).largest;
    100.0 * (r + g) as f64 / n as f64
}

pub fn number_flashing(robots: &[RobotView]) -> usize {
    robots.iter().filter(|r| r.flashing).count()
}

pub fn number_holding(robots: &[RobotView]) -> usize {
    robots.iter().filter(|r| r.holding.is_some()).count()
}

/// Spread of the points about their centroid, scaled by `4 r²`.
pub fn second_moment(points: &[Vec2], puck_radius: f32) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(x, y), p| (x + p.x as f64, y + p.y as f64));
    let (cx, cy) = (sx / n, sy / n);
    let sum: f64 = points
        .iter()
        .map(|p| {
            let (dx, dy) = (p.x as f64 - cx, p.y as f64 - cy);
            dx * dx + dy * dy
        })
        .sum();
    sum / (4.0 * puck_radius as f64 * puck_radius as f64)
}

/// Mean `|nest(p) − τ|` over the points.
pub fn average_tau_difference(
    points:  &[Vec2],
    nest:    &ScalarField,
    world_w: f32,
    world_h: f32,
) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let sum: f64 = points
        .iter()
        .map(|&p| (nest.sample_world(p, world_w, world_h) - TAU).abs() as f64)
        .sum();
    sum / points.len() as f64
}

// ── Metric ────────────────────────────────────────────────────────────────────

/// What an [`Analyzer`][crate::Analyzer] records at each sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Red puck percentage completion.
    PercentageCompletion,
    /// Red and green percentage completion combined.
    SortCompletion,
    NumberFlashing,
    NumberHolding,
    /// Green pucks still in the arena.
    GreenPucks,
    /// Red puck second moment.
    SecondMoment,
    /// Red puck mean distance from τ on the nest field.
    TauDifference,
}

impl Metric {
    pub fn for_preset(preset: Preset) -> Metric {
        match preset {
            Preset::Sort => Metric::SortCompletion,
            Preset::Firefly | Preset::Majority => Metric::NumberFlashing,
            Preset::Pheromone => Metric::GreenPucks,
            Preset::Tutorial
            | Preset::PreCluster
            | Preset::SimpleCluster
            | Preset::AdvancedCluster
            | Preset::Construct
            | Preset::Oc2
            | Preset::EnlargedRobot => Metric::PercentageCompletion,
        }
    }

    /// Chart title.
    pub fn title(self) -> &'static str {
        match self {
            Metric::PercentageCompletion | Metric::SortCompletion => "Percentage Completion (PC)",
            Metric::NumberFlashing => "Number of Flashes",
            Metric::NumberHolding => "Robots Holding Pucks",
            Metric::GreenPucks => "Food (Green) Pucks",
            Metric::SecondMoment => "Second Moment",
            Metric::TauDifference => "Avg. Puck-Tau Abs. Diff.",
        }
    }

    /// Value of this metric for one world sample.
    pub fn evaluate(self, view: &WorldView<'_>) -> f64 {
        let threshold = view.config.cluster_threshold();
        let red = || view.puck_positions(ObjectKind::RedPuck);
        match self {
            Metric::PercentageCompletion => percentage_completion(&red(), threshold),
            Metric::SortCompletion => percentage_completion_sort(
                &red(),
                &view.puck_positions(ObjectKind::GreenPuck),
                threshold,
            ),
            Metric::NumberFlashing => number_flashing(view.robots) as f64,
            Metric::NumberHolding => number_holding(view.robots) as f64,
            Metric::GreenPucks => view.puck_count(ObjectKind::GreenPuck) as f64,
            Metric::SecondMoment => second_moment(&red(), view.config.puck_radius),
            Metric::TauDifference => match view.nest {
                Some(nest) => {
                    average_tau_difference(&red(), nest, view.config.width, view.config.height)
                }
                None => 0.0,
            },
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
