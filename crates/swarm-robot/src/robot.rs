//! The robot entity: physics bodies, sensors, probes, and its controller.

use swarm_control::{
    Action, ControlInput, Controller, ControllerStatus, DEFAULT_TEXT_COLOUR, ProbeRole,
    SensorReading, SensorRole,
};
use swarm_core::{BodyHandle, ConstraintHandle, ObjectKind, Pose, PuckId, RobotId, RobotRng};
use swarm_field::ScalarField;
use swarm_physics::{BodyDesc, PhysicsWorld, Shape};
use tracing::trace;

use crate::{GridProbe, RobotError, RobotResult, Sensor, SensorLayout};

/// A puck pinned in front of a robot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Hold {
    pub puck:       PuckId,
    pub kind:       ObjectKind,
    pub constraint: ConstraintHandle,
}

/// One robot in the arena.
///
/// The robot owns handles into the physics world but never touches the
/// world on its own after [`spawn`][Robot::spawn]; the world manager moves,
/// grabs, and removes on its behalf.
pub struct Robot {
    id:          RobotId,
    body:        BodyHandle,
    parts:       Vec<BodyHandle>,
    sensors:     Vec<Sensor>,
    probes:      Vec<(ProbeRole, GridProbe)>,
    controller:  Box<dyn Controller>,
    rng:         RobotRng,
    hold:        Option<Hold>,
    flashing:    bool,
    text:        String,
    text_colour: String,
}

impl Robot {
    /// Add the robot's body, solid parts, and sensor zones to `world`.
    ///
    /// On failure nothing is left behind in the world.
    pub fn spawn<P: PhysicsWorld>(
        world:      &mut P,
        id:         RobotId,
        pose:       Pose,
        layout:     &SensorLayout,
        controller: Box<dyn Controller>,
        rng:        RobotRng,
    ) -> RobotResult<Robot> {
        if layout.body_radius <= 0.0 {
            return Err(RobotError::EmptyLayout);
        }
        let body = world.add_body(
            BodyDesc::dynamic(Shape::circle(layout.body_radius), pose)
                .friction_air(layout.friction_air),
        )?;

        match attach_layout(world, body, layout) {
            Ok((parts, sensors)) => {
                trace!(robot = %id, sensors = sensors.len(), "robot spawned");
                Ok(Robot {
                    id,
                    body,
                    parts,
                    sensors,
                    probes: layout.probes.clone(),
                    controller,
                    rng,
                    hold: None,
                    flashing: false,
                    text: String::new(),
                    text_colour: DEFAULT_TEXT_COLOUR.to_string(),
                })
            }
            Err(e) => {
                world.remove_body(body)?;
                Err(e)
            }
        }
    }

    /// Remove every body belonging to this robot from `world`.
    ///
    /// The caller must release any held puck first; the hold constraint is
    /// dropped with the body.
    pub fn despawn<P: PhysicsWorld>(self, world: &mut P) -> RobotResult<()> {
        world.remove_body(self.body)?;
        Ok(())
    }

    // ── Identity ──────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> RobotId {
        self.id
    }

    #[inline]
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Extra solid parts (the OC2 plough).
    pub fn parts(&self) -> &[BodyHandle] {
        &self.parts
    }

    // ── Sensors ───────────────────────────────────────────────────────────

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn sensor(&self, role: SensorRole) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.role() == role)
    }

    pub fn sensor_mut(&mut self, role: SensorRole) -> Option<&mut Sensor> {
        self.sensors.iter_mut().find(|s| s.role() == role)
    }

    /// Sensor by its position in [`sensors`][Self::sensors].
    pub fn sensor_at_mut(&mut self, slot: usize) -> Option<&mut Sensor> {
        self.sensors.get_mut(slot)
    }

    pub fn probes(&self) -> &[(ProbeRole, GridProbe)] {
        &self.probes
    }

    /// Zero every sensor count; called once at the end of each tick.
    pub fn clear_sensors(&mut self) {
        for sensor in &mut self.sensors {
            sensor.reset();
        }
    }

    /// Assemble this tick's reading: one count per sensor the robot carries
    /// and one sample per probe.
    pub fn reading(
        &self,
        pose:      &Pose,
        nest:      Option<&ScalarField>,
        pheromone: Option<&ScalarField>,
        world:     (f32, f32),
    ) -> SensorReading {
        let mut reading = SensorReading::new();
        for sensor in &self.sensors {
            reading.set_count(sensor.role(), sensor.count());
        }
        for (role, probe) in &self.probes {
            reading.set_probe(*role, probe.sample(pose, nest, pheromone, world));
        }
        reading
    }

    // ── Control ───────────────────────────────────────────────────────────

    /// Ask the controller for this tick's action.
    pub fn decide(&mut self, timestamp_ms: f64, reading: &SensorReading) -> Action {
        let held = self.held_kind();
        let input = ControlInput {
            timestamp_ms,
            reading,
            red_puck_held:   held == Some(ObjectKind::RedPuck),
            green_puck_held: held == Some(ObjectKind::GreenPuck),
        };
        self.controller.get_action(&input, &mut self.rng)
    }

    pub fn controller_status(&self) -> ControllerStatus {
        self.controller.status()
    }

    pub fn controller_name(&self) -> &'static str {
        self.controller.name()
    }

    pub fn set_controller(&mut self, controller: Box<dyn Controller>) {
        self.controller = controller;
    }

    pub fn rng_mut(&mut self) -> &mut RobotRng {
        &mut self.rng
    }

    // ── Hold ──────────────────────────────────────────────────────────────

    #[inline]
    pub fn hold(&self) -> Option<Hold> {
        self.hold
    }

    #[inline]
    pub fn is_holding(&self) -> bool {
        self.hold.is_some()
    }

    pub fn held_kind(&self) -> Option<ObjectKind> {
        self.hold.map(|h| h.kind)
    }

    /// Record a new hold.  Returns the previous one, which should be `None`.
    pub fn set_hold(&mut self, hold: Hold) -> Option<Hold> {
        self.hold.replace(hold)
    }

    pub fn take_hold(&mut self) -> Option<Hold> {
        self.hold.take()
    }

    // ── Display ───────────────────────────────────────────────────────────

    #[inline]
    pub fn is_flashing(&self) -> bool {
        self.flashing
    }

    pub fn set_flashing(&mut self, on: bool) {
        self.flashing = on;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_colour(&self) -> &str {
        &self.text_colour
    }

    /// Copy the display parts of `action` onto the robot.
    pub fn show(&mut self, action: &Action) {
        self.flashing = action.flash_on;
        self.text.clone_from(&action.text);
        self.text_colour.clone_from(&action.text_colour);
    }
}

impl std::fmt::Debug for Robot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Robot")
            .field("id", &self.id)
            .field("body", &self.body)
            .field("controller", &self.controller.name())
            .field("hold", &self.hold)
            .field("flashing", &self.flashing)
            .finish_non_exhaustive()
    }
}

fn attach_layout<P: PhysicsWorld>(
    world:  &mut P,
    body:   BodyHandle,
    layout: &SensorLayout,
) -> RobotResult<(Vec<BodyHandle>, Vec<Sensor>)> {
    let mut parts = Vec::with_capacity(layout.parts.len());
    for part in &layout.parts {
        let offset = Pose::new(part.offset, 0.0);
        parts.push(world.add_body(BodyDesc::attached(body, part.shape.clone(), offset))?);
    }

    let mut sensors = Vec::with_capacity(layout.sensors.len());
    for spec in &layout.sensors {
        let offset = Pose::new(spec.offset, 0.0);
        let zone = world.add_body(BodyDesc::attached(body, spec.shape.clone(), offset).zone())?;
        sensors.push(Sensor::new(spec.role, zone, spec.filter));
    }
    Ok((parts, sensors))
}
