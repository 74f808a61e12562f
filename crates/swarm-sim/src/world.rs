//! World construction, contact dispatch, and the grab/release/absorb
//! protocol.

use std::f32::consts::TAU;

use swarm_control::SensorRole;
use swarm_core::{
    BodyHandle, ObjectKind, ObstacleSpec, Pose, PuckId, RobotId, RobotRng, SimRng, Vec2,
};
use swarm_field::ScalarField;
use swarm_physics::{BodyDesc, ContactEvent, ContactPhase, PhysicsWorld, Shape};
use swarm_robot::{ContactInfo, Hold, Robot};
use tracing::{debug, trace};

use crate::objects::ObjectRef;
use crate::{FixtureView, Sim, SimResult};

/// Stiffness of the constraint pinning a held puck to its robot.
const HOLD_STIFFNESS: f32 = 0.5;

impl<P: PhysicsWorld> Sim<P> {
    // ── Construction ──────────────────────────────────────────────────────

    /// Empty the physics world and populate it from the config with `seed`.
    ///
    /// Robots are not placed here; the population phase adds them one per
    /// tick.
    pub(crate) fn rebuild(&mut self, seed: u64) -> SimResult<()> {
        self.physics.clear();
        self.objects.clear();
        self.pucks.clear();
        self.robots.clear();
        self.fixtures.clear();
        self.events.clear();

        self.seed = seed;
        self.rng = SimRng::new(seed);
        self.clock.reset();
        self.finished = false;
        self.growth_points = self.config.growth_points.iter().copied().collect();

        self.add_walls()?;
        if let Some(goal) = self.config.goal_zone {
            self.add_fixture(ObjectKind::GoalZone, Shape::circle(goal.radius), goal.centre, true)?;
        }
        if let Some(nest) = self.config.nest {
            self.add_fixture(ObjectKind::Nest, Shape::circle(nest.radius), nest.centre, true)?;
        }
        for obstacle in self.config.obstacles.clone() {
            let (shape, centre) = match obstacle {
                ObstacleSpec::Rect { centre, width, height } => (Shape::rect(width, height), centre),
                ObstacleSpec::Circle(c) => (Shape::circle(c.radius), c.centre),
            };
            self.add_fixture(ObjectKind::Wall, shape, centre, false)?;
        }

        for _ in 0..self.config.n_red_pucks {
            let p = self.random_position(self.config.puck_radius);
            self.add_puck(ObjectKind::RedPuck, p)?;
        }
        if self.growth_points.is_empty() {
            for _ in 0..self.config.n_green_pucks {
                let p = self.random_position(self.config.puck_radius);
                self.add_puck(ObjectKind::GreenPuck, p)?;
            }
        }

        let (fw, fh) = (self.config.field_width, self.config.field_height);
        let (w, h) = (self.config.width, self.config.height);
        self.nest_field = match self.config.nest_field_source {
            Some(source) => Some(ScalarField::distance_field_at(source, fw, fh, w, h)?),
            None => None,
        };
        self.pheromone_field = if self.config.preset.has_fields() {
            Some(ScalarField::zero(fw, fh)?)
        } else {
            None
        };

        debug!(
            seed,
            bodies = self.physics.body_count(),
            pucks = self.pucks.len(),
            "world built"
        );
        Ok(())
    }

    fn add_walls(&mut self) -> SimResult<()> {
        let t = self.config.wall_thickness;
        let vt = self.config.visible_wall_thickness;
        let (w, h) = (self.config.width, self.config.height);
        let walls = [
            (Vec2::new(vt - t / 2.0, h / 2.0), t, h),
            (Vec2::new(w - vt + t / 2.0, h / 2.0), t, h),
            (Vec2::new(w / 2.0, vt - t / 2.0), w, t),
            (Vec2::new(w / 2.0, h - vt + t / 2.0), w, t),
        ];
        for (centre, width, height) in walls {
            self.add_fixture(ObjectKind::Wall, Shape::rect(width, height), centre, false)?;
        }
        Ok(())
    }

    fn add_fixture(
        &mut self,
        kind:   ObjectKind,
        shape:  Shape,
        centre: Vec2,
        zone:   bool,
    ) -> SimResult<BodyHandle> {
        let pose = Pose::new(centre, 0.0);
        let mut desc = BodyDesc::fixed(shape.clone(), pose);
        if zone {
            desc = desc.zone();
        }
        let body = self.physics.add_body(desc)?;
        let object = match kind {
            ObjectKind::Nest => ObjectRef::Nest,
            ObjectKind::GoalZone => ObjectRef::GoalZone,
            _ => ObjectRef::Wall,
        };
        self.objects.insert(body, object);
        self.fixtures.push(FixtureView { kind, shape, pose });
        Ok(body)
    }

    fn add_puck(&mut self, kind: ObjectKind, position: Vec2) -> SimResult<PuckId> {
        let body = self.physics.add_body(
            BodyDesc::dynamic(Shape::circle(self.config.puck_radius), Pose::new(position, 0.0))
                .mass(self.config.puck_mass)
                .friction_air(self.config.friction_air),
        )?;
        let id = self.pucks.insert(kind, body);
        self.objects.insert(body, ObjectRef::Puck(id));
        Ok(id)
    }

    /// Whole-unit position clear of the visible walls for a body of `radius`.
    fn random_position(&mut self, radius: f32) -> Vec2 {
        let t = self.config.visible_wall_thickness;
        let (w, h) = (self.config.width, self.config.height);
        let x = (t + radius + (w - 2.0 * t - 2.0 * radius) * self.rng.unit()).floor();
        let y = (t + radius + (h - 2.0 * t - 2.0 * radius) * self.rng.unit()).floor();
        Vec2::new(x, y)
    }

    /// Drop `n_green_pucks` around the next growth point in the cycle.
    pub(crate) fn regrow_green_pucks(&mut self) -> SimResult<()> {
        let Some(mut point) = self.growth_points.pop_front() else {
            return Ok(());
        };
        self.growth_points.push_back(point);
        for _ in 0..self.config.n_green_pucks {
            point.x += 2.0 * (1.0 - self.rng.unit());
            point.y += 2.0 * (1.0 - self.rng.unit());
            self.add_puck(ObjectKind::GreenPuck, point)?;
        }
        debug!(x = point.x, y = point.y, n = self.config.n_green_pucks, "green pucks regrown");
        Ok(())
    }

    // ── Population ────────────────────────────────────────────────────────

    pub(crate) fn spawn_robot(&mut self) -> SimResult<RobotId> {
        let id = RobotId(self.robots.len() as u32);
        let position = self.random_position(self.config.robot_radius);
        let angle = TAU * self.rng.unit();
        let mut rng = RobotRng::new(self.seed, id);
        let controller = self.controller.build(self.config.speed, &mut rng);

        let robot = Robot::spawn(
            &mut self.physics,
            id,
            Pose::new(position, angle),
            &self.layout,
            controller,
            rng,
        )?;
        self.objects.insert(robot.body(), ObjectRef::Robot(id));
        for &part in robot.parts() {
            self.objects.insert(part, ObjectRef::RobotPart(id));
        }
        for (slot, sensor) in robot.sensors().iter().enumerate() {
            self.objects.insert(sensor.body(), ObjectRef::Sensor { robot: id, slot });
        }
        trace!(robot = %id, x = position.x, y = position.y, "robot added");
        self.robots.push(robot);
        Ok(id)
    }

    pub(crate) fn despawn_last_robot(&mut self) -> SimResult<()> {
        let Some(id) = self.robots.last().map(Robot::id) else {
            return Ok(());
        };
        self.release_puck(id)?;
        if let Some(robot) = self.robots.pop() {
            self.objects.remove_robot(id);
            robot.despawn(&mut self.physics)?;
            trace!(robot = %id, "robot removed");
        }
        Ok(())
    }

    // ── Bounds ────────────────────────────────────────────────────────────

    /// Push every robot and puck back inside the visible walls.
    pub(crate) fn keep_in_bounds(&mut self) -> SimResult<()> {
        let robot_bounds = self.config.bounds_for(self.config.robot_radius);
        let puck_bounds = self.config.bounds_for(self.config.puck_radius);
        let robots = self.robots.iter().map(|r| (r.body(), robot_bounds));
        let pucks = self.pucks.iter().map(|p| (p.body, puck_bounds));
        let bodies: Vec<_> = robots.chain(pucks).collect();

        for (body, (min, max)) in bodies {
            let Some(pose) = self.physics.pose(body) else { continue };
            let clamped = pose.position.clamp(min, max);
            if clamped != pose.position {
                self.physics.set_position(body, clamped)?;
            }
        }
        Ok(())
    }

    // ── Contacts ──────────────────────────────────────────────────────────

    pub(crate) fn dispatch_contacts(&mut self, events: &[ContactEvent]) -> SimResult<()> {
        for event in events {
            match self.objects.get(event.zone) {
                Some(ObjectRef::Sensor { robot, slot }) => self.sensor_contact(robot, slot, event),
                Some(ObjectRef::Nest) => self.nest_contact(event)?,
                Some(_) => {}
                None => trace!(zone = %event.zone, "contact from unknown zone"),
            }
        }
        Ok(())
    }

    fn sensor_contact(&mut self, robot: RobotId, slot: usize, event: &ContactEvent) {
        let info = match self.objects.get(event.other) {
            Some(ObjectRef::Robot(r) | ObjectRef::RobotPart(r)) => {
                let flashing = self.robot(r).is_some_and(Robot::is_flashing);
                ContactInfo::robot(flashing)
            }
            Some(ObjectRef::Puck(id)) => match self.pucks.get(id) {
                Some(puck) => ContactInfo::puck(puck.kind, puck.is_held()),
                None => return,
            },
            Some(ObjectRef::Wall) => ContactInfo::of(ObjectKind::Wall),
            Some(ObjectRef::GoalZone) => ContactInfo::of(ObjectKind::GoalZone),
            Some(ObjectRef::Nest | ObjectRef::Sensor { .. }) => return,
            None => {
                trace!(body = %event.other, "contact with unknown body");
                return;
            }
        };
        let Some(sensor) = self.robots.get_mut(robot.index()).and_then(|r| r.sensor_at_mut(slot))
        else {
            trace!(robot = %robot, slot, "contact for missing sensor");
            return;
        };
        match event.phase {
            ContactPhase::Begin => {
                sensor.on_contact_begin(&info);
            }
            ContactPhase::End => sensor.on_contact_end(),
        }
    }

    fn nest_contact(&mut self, event: &ContactEvent) -> SimResult<()> {
        if event.phase != ContactPhase::Begin {
            return Ok(());
        }
        if let Some(ObjectRef::Puck(id)) = self.objects.get(event.other) {
            self.absorb_puck(id)?;
        }
        Ok(())
    }

    // ── Grab / release / absorb ───────────────────────────────────────────

    /// Attach the unheld puck nearest to the robot's gripper point.
    ///
    /// Succeeds only when the robot holds nothing and one of its inner puck
    /// sensors counted something this tick.  Equal distances go to the puck
    /// found first in `PuckStore::in_creation_order`.  Returns whether a
    /// puck was grabbed.
    pub fn grab_nearest_puck(&mut self, id: RobotId) -> SimResult<bool> {
        let Some(robot) = self.robots.get(id.index()) else {
            debug!(robot = %id, "grab by unknown robot");
            return Ok(false);
        };
        if robot.is_holding() {
            debug!(robot = %id, "grab while already holding");
            return Ok(false);
        }
        let sensed = |role| robot.sensor(role).map_or(0, |s| s.count());
        if sensed(SensorRole::InnerRedPuck) == 0 && sensed(SensorRole::InnerGreenPuck) == 0 {
            return Ok(false);
        }
        let Some(pose) = self.physics.pose(robot.body()) else {
            return Ok(false);
        };

        let anchor_local = Vec2::new(self.config.robot_radius + self.config.puck_radius, 0.0);
        let anchor = pose.transform(anchor_local);
        let mut nearest: Option<(PuckId, f32)> = None;
        for puck in self.pucks.in_creation_order().filter(|p| !p.is_held()) {
            let Some(p) = self.physics.pose(puck.body) else { continue };
            let d = p.position.distance_squared(anchor);
            if nearest.is_none_or(|(_, best)| d < best) {
                nearest = Some((puck.id, d));
            }
        }
        let Some((puck_id, _)) = nearest else {
            return Ok(false);
        };
        let Some(puck) = self.pucks.get_mut(puck_id) else {
            return Ok(false);
        };

        let robot_body = self.robots[id.index()].body();
        let constraint = self.physics.attach(robot_body, anchor_local, puck.body, HOLD_STIFFNESS)?;
        puck.holder = Some(id);
        let kind = puck.kind;

        let robot = &mut self.robots[id.index()];
        robot.set_hold(Hold { puck: puck_id, kind, constraint });
        let inner = match kind {
            ObjectKind::GreenPuck => SensorRole::InnerGreenPuck,
            _ => SensorRole::InnerRedPuck,
        };
        if let Some(sensor) = robot.sensor_mut(inner) {
            sensor.deactivate();
        }
        debug!(robot = %id, puck = %puck_id, ?kind, "puck grabbed");
        Ok(true)
    }

    /// Drop whatever the robot holds.  A no-op when it holds nothing.
    pub fn release_puck(&mut self, id: RobotId) -> SimResult<bool> {
        let Some(hold) = self.robots.get_mut(id.index()).and_then(Robot::take_hold) else {
            debug!(robot = %id, "release with nothing held");
            return Ok(false);
        };
        self.physics.detach(hold.constraint)?;
        if let Some(puck) = self.pucks.get_mut(hold.puck) {
            puck.holder = None;
        }
        debug!(robot = %id, puck = %hold.puck, "puck released");
        Ok(true)
    }

    /// Remove a green puck from the world, clearing its holder's hold first.
    ///
    /// Every effect happens in this one call: the hold constraint, the
    /// robot's hold, the physics body, and the puck record.  Returns whether
    /// a puck was removed.
    pub fn absorb_puck(&mut self, id: PuckId) -> SimResult<bool> {
        let Some(puck) = self.pucks.get(id).copied() else {
            return Ok(false);
        };
        if puck.kind != ObjectKind::GreenPuck {
            return Ok(false);
        }
        if let Some(holder) = puck.holder {
            if let Some(hold) = self.robots.get_mut(holder.index()).and_then(Robot::take_hold) {
                self.physics.detach(hold.constraint)?;
            }
        }
        self.physics.remove_body(puck.body)?;
        self.objects.remove(puck.body);
        self.pucks.remove(id);
        debug!(puck = %id, holder = ?puck.holder, "puck absorbed by nest");
        Ok(true)
    }
}
