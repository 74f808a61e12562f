//! Fluent builder for constructing a [`Sim`].

use std::collections::VecDeque;

use swarm_control::ControllerKind;
use swarm_core::{ScenarioConfig, SimClock, SimRng};
use swarm_physics::{ArenaWorld, PhysicsWorld};
use swarm_robot::SensorLayout;
use tracing::info;

use crate::objects::{ObjectTable, PuckStore};
use crate::{FieldChoice, Sim, SimResult};

/// Fluent builder for [`Sim<P>`].
///
/// # Required inputs
///
/// - [`ScenarioConfig`]: preset, arena, counts, speeds, step budget, …
/// - `P: PhysicsWorld`: the rigid-body world (e.g. [`ArenaWorld`])
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                              |
/// |--------------------------|--------------------------------------|
/// | `.controller(k)`         | `ControllerKind::for_preset(preset)` |
/// | `.population_target(n)`  | `config.n_robots`                    |
/// | `.seed(s)`               | `config.seed`                        |
/// | `.overlay(c)`            | `FieldChoice::None`                  |
///
/// # Example
///
/// ```rust,ignore
/// let config = ScenarioConfig::for_preset(Preset::Sort);
/// let mut sim = SimBuilder::headless(config)
///     .controller(ControllerKind::script(SOURCE))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: PhysicsWorld> {
    config:     ScenarioConfig,
    physics:    P,
    controller: Option<ControllerKind>,
    target:     Option<usize>,
    seed:       Option<u64>,
    overlay:    FieldChoice,
}

impl SimBuilder<ArenaWorld> {
    /// Builder over the built-in [`ArenaWorld`].
    pub fn headless(config: ScenarioConfig) -> Self {
        Self::new(config, ArenaWorld::new())
    }
}

impl<P: PhysicsWorld> SimBuilder<P> {
    pub fn new(config: ScenarioConfig, physics: P) -> Self {
        Self {
            config,
            physics,
            controller: None,
            target:     None,
            seed:       None,
            overlay:    FieldChoice::None,
        }
    }

    /// Controller built for every robot.
    pub fn controller(mut self, kind: ControllerKind) -> Self {
        self.controller = Some(kind);
        self
    }

    /// Number of robots the population phase steers toward.
    pub fn population_target(mut self, n: usize) -> Self {
        self.target = Some(n);
        self
    }

    /// Seed of the first trial.  Later trials use `config.seed + trial`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn overlay(mut self, choice: FieldChoice) -> Self {
        self.overlay = choice;
        self
    }

    /// Validate the config, build the world, and return a ready-to-run
    /// [`Sim`] with no robots yet.
    pub fn build(self) -> SimResult<Sim<P>> {
        self.config.validate()?;

        let controller = self
            .controller
            .unwrap_or_else(|| ControllerKind::for_preset(self.config.preset));
        let seed = self.seed.unwrap_or(self.config.seed);

        let mut sim = Sim {
            clock:           SimClock::new(self.config.tick_duration_ms),
            layout:          SensorLayout::for_config(&self.config),
            target_robots:   self.target.unwrap_or(self.config.n_robots),
            config:          self.config,
            physics:         self.physics,
            controller,
            rng:             SimRng::new(seed),
            seed,
            robots:          Vec::new(),
            pucks:           PuckStore::new(),
            objects:         ObjectTable::new(),
            fixtures:        Vec::new(),
            nest_field:      None,
            pheromone_field: None,
            growth_points:   VecDeque::new(),
            trial:           0,
            finished:        false,
            status:          String::new(),
            overlay:         self.overlay,
            events:          Vec::new(),
        };
        sim.rebuild(seed)?;

        info!(
            preset = %sim.config.preset,
            controller = sim.controller.name(),
            robots = sim.target_robots,
            max_step = sim.config.max_step,
            "simulation built"
        );
        Ok(sim)
    }
}
