//! Scenario presets and the immutable per-scenario configuration.
//!
//! A [`Preset`] names one of the fixed scenarios; [`ScenarioConfig::for_preset`]
//! expands it into every parameter the simulation needs (arena size, object
//! counts, speed limits, radii, field settings, static fixtures).  The config
//! is built once, validated, and then passed by reference to every component.

use std::fmt;
use std::str::FromStr;

use crate::time::DEFAULT_TICK_MS;
use crate::{SwarmError, SwarmResult, Vec2};

// ── Preset ────────────────────────────────────────────────────────────────────

/// The enumerated scenario presets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Preset {
    Tutorial,
    PreCluster,
    SimpleCluster,
    AdvancedCluster,
    Sort,
    Firefly,
    Majority,
    Pheromone,
    Construct,
    Oc2,
    EnlargedRobot,
}

impl Preset {
    pub const ALL: [Preset; 11] = [
        Preset::Tutorial,
        Preset::PreCluster,
        Preset::SimpleCluster,
        Preset::AdvancedCluster,
        Preset::Sort,
        Preset::Firefly,
        Preset::Majority,
        Preset::Pheromone,
        Preset::Construct,
        Preset::Oc2,
        Preset::EnlargedRobot,
    ];

    /// Canonical upper-case name, e.g. `"ADVANCED_CLUSTER"`.
    pub const fn name(self) -> &'static str {
        match self {
            Preset::Tutorial        => "TUTORIAL",
            Preset::PreCluster      => "PRE_CLUSTER",
            Preset::SimpleCluster   => "SIMPLE_CLUSTER",
            Preset::AdvancedCluster => "ADVANCED_CLUSTER",
            Preset::Sort            => "SORT",
            Preset::Firefly         => "FIREFLY",
            Preset::Majority        => "MAJORITY",
            Preset::Pheromone       => "PHEROMONE",
            Preset::Construct       => "CONSTRUCT",
            Preset::Oc2             => "OC2",
            Preset::EnlargedRobot   => "ENLARGED_ROBOT",
        }
    }

    /// Presets that carry a nest-scent and a pheromone grid.
    pub const fn has_fields(self) -> bool {
        matches!(
            self,
            Preset::Pheromone | Preset::Construct | Preset::Oc2 | Preset::EnlargedRobot
        )
    }

    /// Only the foraging preset runs diffusion+decay on its pheromone grid.
    pub const fn diffuses(self) -> bool {
        matches!(self, Preset::Pheromone)
    }

    /// Flash-coupled presets spawn new robots only on controller-update ticks
    /// so newcomers are not phase-locked with the existing swarm.
    pub const fn staggers_spawns(self) -> bool {
        matches!(self, Preset::Firefly | Preset::Majority)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = SwarmError;

    /// Accepts `"#SORT"`, `"SORT"`, `"sort"`, `"advanced-cluster"`, …
    fn from_str(s: &str) -> SwarmResult<Preset> {
        let normalized = s
            .trim()
            .trim_start_matches('#')
            .to_ascii_uppercase()
            .replace('-', "_");
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| SwarmError::UnknownPreset(s.to_string()))
    }
}

// ── Fixtures ──────────────────────────────────────────────────────────────────

/// A static circular fixture (nest, goal zone).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CircleSpec {
    pub centre: Vec2,
    pub radius: f32,
}

/// A static obstacle of kind `Wall`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObstacleSpec {
    Rect { centre: Vec2, width: f32, height: f32 },
    Circle(CircleSpec),
}

/// Maximum commanded speeds.  Controllers must stay within these bounds.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeedLimits {
    pub max_forward: f32,
    pub max_angular: f32,
}

impl SpeedLimits {
    /// `true` if both speeds lie within `±max` (inclusive).
    #[inline]
    pub fn permits(&self, linear: f32, angular: f32) -> bool {
        linear.abs() <= self.max_forward && angular.abs() <= self.max_angular
    }

    #[inline]
    pub fn clamp_linear(&self, v: f32) -> f32 {
        v.clamp(-self.max_forward, self.max_forward)
    }

    #[inline]
    pub fn clamp_angular(&self, v: f32) -> f32 {
        v.clamp(-self.max_angular, self.max_angular)
    }
}

impl Default for SpeedLimits {
    fn default() -> Self {
        Self { max_forward: 0.015, max_angular: 0.2 }
    }
}

// ── ScenarioConfig ────────────────────────────────────────────────────────────

/// Complete, immutable description of one scenario.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioConfig {
    pub preset: Preset,

    // ── Arena ─────────────────────────────────────────────────────────────
    pub width:  f32,
    pub height: f32,
    /// Thickness of the visible part of the boundary walls; bodies are
    /// clamped to stay at least this far (plus their radius) from the edge.
    pub visible_wall_thickness: f32,
    /// Full thickness of the boundary wall bodies.
    pub wall_thickness: f32,

    // ── Scalar fields ─────────────────────────────────────────────────────
    pub field_width:    usize,
    pub field_height:   usize,
    pub diffusion_rate: f32,
    pub decay_rate:     f32,

    // ── Population ────────────────────────────────────────────────────────
    pub n_robots:      usize,
    pub n_red_pucks:   usize,
    pub n_green_pucks: usize,

    // ── Bodies and sensors ────────────────────────────────────────────────
    pub robot_radius: f32,
    pub puck_radius:  f32,
    pub puck_mass:    f32,
    /// Obstacle sensor radius as a multiple of the robot radius.
    pub obstacle_sensor_size_factor: f32,
    /// Radius of the circular inner puck sensor.
    pub inner_sensor_radius: f32,
    pub friction_air: f32,

    // ── Control ───────────────────────────────────────────────────────────
    pub speed: SpeedLimits,
    pub steps_between_controller_updates: u64,
    pub allow_movement: bool,
    pub allow_rotation: bool,

    // ── Run ───────────────────────────────────────────────────────────────
    pub max_step: u64,
    pub tick_duration_ms: f64,
    pub physics_substeps: u32,
    pub seed: u64,
    pub do_analysis: bool,
    /// Analysis sampling cadence in steps.
    pub sample_interval: u64,
    pub reset_after_max_step: bool,
    pub max_trials: u32,

    // ── Fixtures ──────────────────────────────────────────────────────────
    /// World point generating the nest-scent distance field, if any.
    pub nest_field_source: Option<Vec2>,
    /// Absorbing nest zone, if any.
    pub nest: Option<CircleSpec>,
    pub goal_zone: Option<CircleSpec>,
    pub obstacles: Vec<ObstacleSpec>,
    /// Cycle of points where green pucks regrow once all are collected.
    pub growth_points: Vec<Vec2>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            preset:                           Preset::Tutorial,
            width:                            100.0,
            height:                           800.0,
            visible_wall_thickness:           3.0,
            wall_thickness:                   1000.0,
            field_width:                      10,
            field_height:                     80,
            diffusion_rate:                   0.01,
            decay_rate:                       0.001,
            n_robots:                         1,
            n_red_pucks:                      0,
            n_green_pucks:                    0,
            robot_radius:                     15.0,
            puck_radius:                      5.0,
            puck_mass:                        0.1,
            obstacle_sensor_size_factor:      0.75,
            inner_sensor_radius:              12.5,
            friction_air:                     1.0,
            speed:                            SpeedLimits::default(),
            steps_between_controller_updates: 1,
            allow_movement:                   true,
            allow_rotation:                   true,
            max_step:                         4000,
            tick_duration_ms:                 DEFAULT_TICK_MS,
            physics_substeps:                 1,
            seed:                             0,
            do_analysis:                      true,
            sample_interval:                  100,
            reset_after_max_step:             false,
            max_trials:                       10,
            nest_field_source:                None,
            nest:                             None,
            goal_zone:                        None,
            obstacles:                        Vec::new(),
            growth_points:                    Vec::new(),
        }
    }
}

impl ScenarioConfig {
    /// Expand a preset into a full configuration.
    pub fn for_preset(preset: Preset) -> Self {
        let mut c = ScenarioConfig { preset, ..Default::default() };

        match preset {
            Preset::Tutorial => {
                c.set_arena(500.0, 500.0);
                c.do_analysis = false;
            }
            Preset::PreCluster | Preset::SimpleCluster | Preset::AdvancedCluster => {
                c.set_arena(500.0, 500.0);
                c.n_red_pucks = 30;
                if preset == Preset::PreCluster {
                    c.do_analysis = false;
                    c.goal_zone = Some(CircleSpec {
                        centre: Vec2::new(250.0, 250.0),
                        radius: 4.0 * c.robot_radius,
                    });
                }
            }
            Preset::Sort => {
                c.set_arena(500.0, 500.0);
                c.n_red_pucks = 30;
                c.n_green_pucks = 30;
            }
            Preset::Firefly => {
                c.set_arena(500.0, 500.0);
                c.n_robots = 16;
                c.sample_interval = 1;
            }
            Preset::Majority => {
                c.set_arena(500.0, 500.0);
                c.n_robots = 16;
                c.do_analysis = false;
            }
            Preset::Pheromone => {
                c.set_arena(500.0, 800.0);
                c.n_green_pucks = 10;
                let nest = Vec2::new(450.0, 450.0);
                c.nest_field_source = Some(nest);
                c.nest = Some(CircleSpec { centre: nest, radius: 2.0 * c.robot_radius });
                c.obstacles = vec![
                    ObstacleSpec::Rect {
                        centre: Vec2::new(250.0, 300.0),
                        width:  300.0,
                        height: 50.0,
                    },
                    ObstacleSpec::Circle(CircleSpec {
                        centre: Vec2::new(525.0, 200.0),
                        radius: 100.0,
                    }),
                ];
                c.growth_points = vec![
                    Vec2::new(75.0, 425.0),
                    Vec2::new(75.0, 75.0),
                    Vec2::new(425.0, 75.0),
                ];
            }
            Preset::Construct => {
                c.set_arena(500.0, 500.0);
                c.robot_radius = 5.0;
                c.puck_radius = 6.0;
                c.obstacle_sensor_size_factor = 0.15;
                c.speed = SpeedLimits { max_forward: 0.015 / 20.0, max_angular: 0.2 / 40.0 };
                c.n_robots = 20;
                c.n_red_pucks = 200;
                c.nest_field_source = Some(Vec2::new(c.width / 2.0, c.height / 2.0));
            }
            Preset::Oc2 => {
                c.set_arena(3840.0 / 4.0, 2160.0 / 4.0);
                c.robot_radius = 15.0;
                c.puck_radius = 6.0;
                c.obstacle_sensor_size_factor = 0.15;
                c.speed = SpeedLimits { max_forward: 0.15 / 20.0, max_angular: 5.0 / 40.0 };
                c.n_robots = 10;
                c.nest_field_source = Some(Vec2::new(c.width / 2.0, c.height / 2.0));
            }
            Preset::EnlargedRobot => {
                c.set_arena(500.0, 500.0);
                c.robot_radius = 20.0;
                c.puck_radius = 24.0;
                c.obstacle_sensor_size_factor = 0.15;
                c.speed = SpeedLimits { max_forward: 0.0, max_angular: 0.0 };
                c.nest_field_source = Some(Vec2::new(c.width / 2.0, c.height / 2.0));
            }
        }
        c
    }

    /// Parse a preset name and expand it.
    pub fn from_preset_name(name: &str) -> SwarmResult<Self> {
        Ok(Self::for_preset(name.parse()?))
    }

    /// Set arena size; the field grid follows at one cell per 10 world units.
    pub fn set_arena(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.field_width = (width / 10.0) as usize;
        self.field_height = (height / 10.0) as usize;
    }

    /// Refuse degenerate configurations.
    pub fn validate(&self) -> SwarmResult<()> {
        if self.field_width == 0 || self.field_height == 0 {
            return Err(SwarmError::EmptyGrid {
                width:  self.field_width,
                height: self.field_height,
            });
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(SwarmError::Config(format!(
                "arena must have positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.robot_radius > 0.0 && self.puck_radius > 0.0) {
            return Err(SwarmError::Config("robot and puck radii must be positive".into()));
        }
        let margin = 2.0 * (self.visible_wall_thickness + self.robot_radius);
        if self.width <= margin || self.height <= margin {
            return Err(SwarmError::Config(format!(
                "arena {}x{} leaves no room for a robot of radius {}",
                self.width, self.height, self.robot_radius
            )));
        }
        if self.speed.max_forward < 0.0 || self.speed.max_angular < 0.0 {
            return Err(SwarmError::Config("speed limits must be non-negative".into()));
        }
        if !(0.0..=1.0).contains(&self.diffusion_rate) || !(0.0..1.0).contains(&self.decay_rate) {
            return Err(SwarmError::Config(format!(
                "diffusion must be in [0,1] and decay in [0,1), got {} and {}",
                self.diffusion_rate, self.decay_rate
            )));
        }
        if self.steps_between_controller_updates == 0 {
            return Err(SwarmError::Config("steps_between_controller_updates must be >= 1".into()));
        }
        if self.physics_substeps == 0 {
            return Err(SwarmError::Config("physics_substeps must be >= 1".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn speed_limits(&self) -> SpeedLimits {
        self.speed
    }

    /// Two pucks closer than this belong to the same cluster.
    #[inline]
    pub fn cluster_threshold(&self) -> f32 {
        4.0 * self.puck_radius
    }

    /// Allowed centre range for a body of `radius` (inclusive bounds).
    pub fn bounds_for(&self, radius: f32) -> (Vec2, Vec2) {
        let m = radius + self.visible_wall_thickness;
        (Vec2::new(m, m), Vec2::new(self.width - m, self.height - m))
    }
}
