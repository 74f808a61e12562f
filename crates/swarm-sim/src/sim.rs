//! The `Sim` struct and its tick loop.

use std::collections::VecDeque;

use swarm_control::{ControllerKind, ControllerStatus};
use swarm_core::{
    ObjectKind, Pose, PuckId, RobotId, ScenarioConfig, SimClock, SimRng, Tick, Vec2,
};
use swarm_field::ScalarField;
use swarm_physics::{ContactEvent, PhysicsWorld};
use swarm_robot::{Robot, SensorLayout};
use tracing::{info, warn};

use crate::objects::{ObjectTable, Puck, PuckStore};
use crate::{
    FieldChoice, FixtureView, PuckView, RenderSnapshot, RobotView, SimObserver, SimResult,
    WorldView,
};

/// The world manager.
///
/// `Sim<P>` owns the physics world and everything in it, and drives the
/// tick:
///
/// 1. **Physics**: `physics_substeps` calls to [`PhysicsWorld::step`].
///    Contacts are dispatched to sensors and the nest, and every robot and
///    puck is clamped inside the walls, after each sub-step.
/// 2. **Population**: spawn at most one robot below target, despawn the last
///    one above it.
/// 3. **Robots** (controller-update steps before `max_step`): reading →
///    controller → speed check → grab/release → flash → pheromone → text →
///    force and torque.
/// 4. **Fields**: pheromone diffusion+decay; green puck regrowth.
/// 5. **Sensors** cleared on every robot.
/// 6. **Observers**: tick end, then a sample at the analysis cadence.
/// 7. **Trials**: rebuild after `max_step` while trials remain, otherwise
///    advance the step counter until `max_step`.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: PhysicsWorld> {
    /// Scenario being run.  Immutable for the life of the `Sim`.
    pub config: ScenarioConfig,

    /// Step counter within the current trial.
    pub clock: SimClock,

    pub(crate) physics:         P,
    pub(crate) controller:      ControllerKind,
    pub(crate) layout:          SensorLayout,
    pub(crate) rng:             SimRng,
    /// Seed of the current trial.
    pub(crate) seed:            u64,
    pub(crate) robots:          Vec<Robot>,
    pub(crate) pucks:           PuckStore,
    pub(crate) objects:         ObjectTable,
    pub(crate) fixtures:        Vec<FixtureView>,
    pub(crate) nest_field:      Option<ScalarField>,
    pub(crate) pheromone_field: Option<ScalarField>,
    pub(crate) growth_points:   VecDeque<Vec2>,
    pub(crate) target_robots:   usize,
    pub(crate) trial:           u32,
    pub(crate) finished:        bool,
    pub(crate) status:          String,
    pub(crate) overlay:         FieldChoice,
    pub(crate) events:          Vec<ContactEvent>,
}

impl<P: PhysicsWorld> std::fmt::Debug for Sim<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sim")
            .field("seed", &self.seed)
            .field("trial", &self.trial)
            .field("robots", &self.robots.len())
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<P: PhysicsWorld> Sim<P> {
    // ── Running ───────────────────────────────────────────────────────────

    /// Tick until the last trial reaches `max_step`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while !self.finished {
            self.tick(observer)?;
        }
        info!(step = %self.clock.current_tick, trials = self.trial + 1, "simulation finished");
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks, whatever the step budget says.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.tick(observer)?;
        }
        Ok(())
    }

    /// Advance the world by one tick.  Atomic from the caller's view.
    pub fn tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let step = self.clock.current_tick;
        let max_step = self.config.max_step;
        observer.on_tick_start(step);

        // ── Physics ───────────────────────────────────────────────────────
        let dt = (self.clock.tick_duration_ms / self.config.physics_substeps as f64) as f32;
        for _ in 0..self.config.physics_substeps {
            let mut events = std::mem::take(&mut self.events);
            events.clear();
            self.physics.step(dt, &mut events);
            let dispatched = self.dispatch_contacts(&events);
            self.events = events;
            dispatched?;
            self.keep_in_bounds()?;
        }
        self.physics.clear_forces();

        // ── Population ────────────────────────────────────────────────────
        self.adjust_population(step)?;

        // ── Robots ────────────────────────────────────────────────────────
        if step.is_multiple_of(self.config.steps_between_controller_updates) && step.0 < max_step {
            for i in 0..self.robots.len() {
                self.update_robot(i, observer)?;
            }
        }

        // ── Fields ────────────────────────────────────────────────────────
        self.update_fields()?;

        for robot in &mut self.robots {
            robot.clear_sensors();
        }

        // ── Observers ─────────────────────────────────────────────────────
        observer.on_tick_end(step);
        if self.config.do_analysis
            && step.0 <= max_step
            && step.is_multiple_of(self.config.sample_interval)
        {
            let robots = self.robot_views();
            let pucks = self.puck_views();
            observer.on_sample(&WorldView {
                step,
                trial:     self.trial,
                config:    &self.config,
                robots:    &robots,
                pucks:     &pucks,
                nest:      self.nest_field.as_ref(),
                pheromone: self.pheromone_field.as_ref(),
            });
        }

        // ── Trials ────────────────────────────────────────────────────────
        if step.0 >= max_step {
            if self.config.reset_after_max_step && self.trial < self.config.max_trials {
                self.trial += 1;
                let seed = self.config.seed.wrapping_add(self.trial as u64);
                self.rebuild(seed)?;
                info!(trial = self.trial, seed, "starting next trial");
                observer.on_reset(self.trial);
            } else {
                self.finished = true;
            }
        } else {
            self.clock.advance();
        }
        Ok(())
    }

    /// Throw the whole world away and build it again from `seed`.
    ///
    /// Only the trial counter, population target, controller choice, and
    /// observers survive.
    pub fn reset<O: SimObserver>(&mut self, seed: u64, observer: &mut O) -> SimResult<()> {
        self.rebuild(seed)?;
        info!(trial = self.trial, seed, "world reset");
        observer.on_reset(self.trial);
        Ok(())
    }

    // ── Robot phase ───────────────────────────────────────────────────────

    fn update_robot<O: SimObserver>(&mut self, i: usize, observer: &mut O) -> SimResult<()> {
        let (w, h) = (self.config.width, self.config.height);
        let limits = self.config.speed;
        let timestamp = self.clock.timestamp_ms();

        let robot = &mut self.robots[i];
        let id = robot.id();
        let body = robot.body();
        let Some(pose) = self.physics.pose(body) else {
            warn!(robot = %id, "robot body missing from physics world");
            return Ok(());
        };

        let reading = robot.reading(
            &pose,
            self.nest_field.as_ref(),
            self.pheromone_field.as_ref(),
            (w, h),
        );
        let mut action = robot.decide(timestamp, &reading);
        let status = robot.controller_status();

        if !limits.permits(action.linear_speed, action.angular_speed) {
            warn!(
                robot = %id,
                linear = action.linear_speed,
                angular = action.angular_speed,
                "commanded speed out of range, clamping"
            );
            action.linear_speed = limits.clamp_linear(action.linear_speed);
            action.angular_speed = limits.clamp_angular(action.angular_speed);
        }

        let held = robot.is_holding();
        robot.show(&action);
        if !held && action.gripper_on {
            self.grab_nearest_puck(id)?;
        } else if held && !action.gripper_on {
            self.release_puck(id)?;
        }

        if action.emit_pheromone > 0.0 {
            if let Some(field) = self.pheromone_field.as_mut() {
                let (ci, cj) = field.cell_of(pose.position, w, h);
                field.deposit(ci, cj, action.emit_pheromone / 10.0);
            }
        }

        if !self.config.allow_movement {
            action.linear_speed = 0.0;
        }
        if !self.config.allow_rotation {
            action.angular_speed = 0.0;
        }
        let force = Vec2::new(action.linear_speed, 0.0).rotate(pose.angle);
        self.physics.apply_force(body, force)?;
        self.physics.set_torque(body, action.angular_speed)?;

        self.report_status(status, observer);
        Ok(())
    }

    fn report_status<O: SimObserver>(&mut self, status: ControllerStatus, observer: &mut O) {
        let message = status.to_string();
        if message != self.status {
            if status.is_fault() {
                warn!(status = %message, "controller fault");
            }
            self.status = message;
            observer.on_status(&self.status);
        }
    }

    // ── Field phase ───────────────────────────────────────────────────────

    fn update_fields(&mut self) -> SimResult<()> {
        if self.config.preset.diffuses() {
            if let Some(field) = self.pheromone_field.as_mut() {
                field.step(self.config.diffusion_rate, self.config.decay_rate);
            }
        }
        if !self.growth_points.is_empty() && self.pucks.count(ObjectKind::GreenPuck) == 0 {
            self.regrow_green_pucks()?;
        }
        Ok(())
    }

    // ── Population ────────────────────────────────────────────────────────

    fn adjust_population(&mut self, step: Tick) -> SimResult<()> {
        if self.robots.len() < self.target_robots {
            let staggered = self.config.preset.staggers_spawns()
                && !step.is_multiple_of(self.config.steps_between_controller_updates);
            if !staggered {
                self.spawn_robot()?;
            }
        }
        if self.robots.len() > self.target_robots {
            self.despawn_last_robot()?;
        }
        Ok(())
    }

    /// Robots are added or removed one per tick until the count matches.
    pub fn set_population_target(&mut self, n: usize) {
        self.target_robots = n;
    }

    pub fn population_target(&self) -> usize {
        self.target_robots
    }

    /// Controller for robots spawned from now on, and a fresh one of the same
    /// kind for every robot already in the arena.
    pub fn set_controller(&mut self, kind: ControllerKind) {
        for robot in &mut self.robots {
            let controller = kind.build(self.config.speed, robot.rng_mut());
            robot.set_controller(controller);
        }
        self.controller = kind;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn step(&self) -> Tick {
        self.clock.current_tick
    }

    #[inline]
    pub fn trial(&self) -> u32 {
        self.trial
    }

    /// `true` once the last trial has run its final tick.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(id.index())
    }

    pub fn robot_mut(&mut self, id: RobotId) -> Option<&mut Robot> {
        self.robots.get_mut(id.index())
    }

    pub fn robot_pose(&self, id: RobotId) -> Option<Pose> {
        self.robot(id).and_then(|r| self.physics.pose(r.body()))
    }

    pub fn puck(&self, id: PuckId) -> Option<&Puck> {
        self.pucks.get(id)
    }

    /// Every live puck of one colour with its current position.
    pub fn pucks(&self, kind: ObjectKind) -> Vec<PuckView> {
        self.pucks
            .ids(kind)
            .iter()
            .filter_map(|&id| self.pucks.get(id))
            .filter_map(|p| self.puck_view(p))
            .collect()
    }

    pub fn puck_count(&self, kind: ObjectKind) -> usize {
        self.pucks.count(kind)
    }

    pub fn nest_field(&self) -> Option<&ScalarField> {
        self.nest_field.as_ref()
    }

    pub fn pheromone_field(&self) -> Option<&ScalarField> {
        self.pheromone_field.as_ref()
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    /// Last controller status line shown to the user.
    pub fn status_message(&self) -> &str {
        &self.status
    }

    pub fn controller_kind(&self) -> &ControllerKind {
        &self.controller
    }

    // ── Views ─────────────────────────────────────────────────────────────

    pub fn set_overlay(&mut self, choice: FieldChoice) {
        self.overlay = choice;
    }

    pub fn render_snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            step:     self.clock.current_tick,
            trial:    self.trial,
            robots:   self.robot_views(),
            pucks:    self.puck_views(),
            fixtures: self.fixtures.clone(),
            overlay:  RenderSnapshot::overlay_of(
                self.overlay,
                self.nest_field.as_ref(),
                self.pheromone_field.as_ref(),
            ),
            status:   self.status.clone(),
        }
    }

    fn robot_views(&self) -> Vec<RobotView> {
        self.robots
            .iter()
            .filter_map(|r| {
                let pose = self.physics.pose(r.body())?;
                Some(RobotView {
                    id:          r.id(),
                    pose,
                    radius:      self.config.robot_radius,
                    flashing:    r.is_flashing(),
                    holding:     r.held_kind(),
                    text:        r.text().to_string(),
                    text_colour: r.text_colour().to_string(),
                    status:      r.controller_status(),
                })
            })
            .collect()
    }

    fn puck_views(&self) -> Vec<PuckView> {
        self.pucks.iter().filter_map(|p| self.puck_view(p)).collect()
    }

    fn puck_view(&self, puck: &Puck) -> Option<PuckView> {
        let pose = self.physics.pose(puck.body)?;
        Some(PuckView {
            id:       puck.id,
            kind:     puck.kind,
            position: pose.position,
            held:     puck.is_held(),
        })
    }
}
