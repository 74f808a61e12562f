//! `ArenaWorld` — a small overdamped rigid-body world.
//!
//! Per step:
//!
//! ```text
//!   ① integrate   v = v·(1 - friction_air) + F/m·dt²   (same for ω, τ/I)
//!   ② constraints pull held bodies toward their anchors
//!   ③ overlaps    solid pairs pushed apart along the SAT normal,
//!                 split by inverse mass
//!   ④ contacts    zone overlaps reported as Begin (every step) / End (once)
//! ```
//!
//! Candidate pairs come from an R-tree (`rstar`) over body bounding boxes,
//! rebuilt each phase.

use std::collections::BTreeSet;

use rstar::{RTree, RTreeObject, AABB};
use swarm_core::{BodyHandle, ConstraintHandle, Pose, Vec2};
use tracing::trace;

use crate::body::DEFAULT_DENSITY;
use crate::{
    BodyDesc, ContactEvent, ContactPhase, PhysicsError, PhysicsResult, PhysicsWorld, Placement,
    Shape, WorldShape,
};

/// Matter-style rotational inertia scale applied to `m·r²/2`.
const INERTIA_SCALE: f32 = 4.0;

// ── Internal records ──────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
enum Motion {
    Dynamic,
    Static,
    Attached { parent: BodyHandle, offset: Pose },
}

#[derive(Clone, Debug)]
struct Body {
    shape:            Shape,
    zone:             bool,
    motion:           Motion,
    pose:             Pose,
    velocity:         Vec2,
    angular_velocity: f32,
    force:            Vec2,
    torque:           f32,
    inv_mass:         f32,
    inv_inertia:      f32,
    friction_air:     f32,
    children:         Vec<BodyHandle>,
}

#[derive(Copy, Clone, Debug)]
struct Constraint {
    a:         BodyHandle,
    anchor:    Vec2,
    b:         BodyHandle,
    stiffness: f32,
}

/// Broad-phase entry: a body's bounding box.
#[derive(Clone)]
struct BodyEntry {
    lo:     [f32; 2],
    hi:     [f32; 2],
    handle: BodyHandle,
}

impl RTreeObject for BodyEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.lo, self.hi)
    }
}

// ── ArenaWorld ────────────────────────────────────────────────────────────────

/// Reference [`PhysicsWorld`] for headless runs and tests.
pub struct ArenaWorld {
    bodies:            Vec<Option<Body>>,
    constraints:       Vec<Option<Constraint>>,
    live_bodies:       usize,
    live_constraints:  usize,
    /// `(zone, other)` pairs overlapping after the last step.
    touching:          BTreeSet<(BodyHandle, BodyHandle)>,
    solver_iterations: u32,
}

impl Default for ArenaWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaWorld {
    pub fn new() -> Self {
        Self {
            bodies:            Vec::new(),
            constraints:       Vec::new(),
            live_bodies:       0,
            live_constraints:  0,
            touching:          BTreeSet::new(),
            solver_iterations: 2,
        }
    }

    /// Number of constraint and overlap relaxation passes per step.
    pub fn with_solver_iterations(mut self, n: u32) -> Self {
        self.solver_iterations = n.max(1);
        self
    }

    /// Current linear velocity of a root body (world units per step).
    pub fn velocity(&self, body: BodyHandle) -> Option<Vec2> {
        self.body(body).map(|b| b.velocity)
    }

    /// `(a, b)` of a live constraint.
    pub fn constraint_bodies(&self, c: ConstraintHandle) -> Option<(BodyHandle, BodyHandle)> {
        self.constraints
            .get(c.index())
            .and_then(Option::as_ref)
            .map(|k| (k.a, k.b))
    }

    // ── Lookup helpers ────────────────────────────────────────────────────

    fn body(&self, h: BodyHandle) -> Option<&Body> {
        self.bodies.get(h.index()).and_then(Option::as_ref)
    }

    fn body_mut(&mut self, h: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(h.index()).and_then(Option::as_mut)
    }

    fn root_of(&self, h: BodyHandle) -> BodyHandle {
        match self.body(h).map(|b| b.motion) {
            Some(Motion::Attached { parent, .. }) => parent,
            _ => h,
        }
    }

    fn inv_mass_of_root(&self, h: BodyHandle) -> f32 {
        let root = self.root_of(h);
        self.body(root).map_or(0.0, |b| b.inv_mass)
    }

    fn root_mut(&mut self, h: BodyHandle) -> PhysicsResult<&mut Body> {
        let body = self.body(h).ok_or(PhysicsError::UnknownBody(h))?;
        if matches!(body.motion, Motion::Attached { .. }) {
            return Err(PhysicsError::NotRoot(h));
        }
        self.body_mut(h).ok_or(PhysicsError::UnknownBody(h))
    }

    fn translate_root(&mut self, root: BodyHandle, delta: Vec2) {
        if let Some(b) = self.body_mut(root) {
            b.pose.position += delta;
        }
    }

    /// Recompute world poses of every attached body from its root.
    fn sync_attached(&mut self) {
        for idx in 0..self.bodies.len() {
            let Some(Motion::Attached { parent, offset }) =
                self.bodies[idx].as_ref().map(|b| b.motion)
            else {
                continue;
            };
            let Some(parent_pose) = self.body(parent).map(|p| p.pose) else {
                continue;
            };
            if let Some(b) = self.bodies[idx].as_mut() {
                b.pose = Pose::new(
                    parent_pose.transform(offset.position),
                    parent_pose.angle + offset.angle,
                );
            }
        }
    }

    fn world_shapes(&self) -> Vec<Option<WorldShape>> {
        self.bodies
            .iter()
            .map(|b| b.as_ref().map(|b| b.shape.to_world(&b.pose)))
            .collect()
    }

    fn broad_phase(shapes: &[Option<WorldShape>]) -> RTree<BodyEntry> {
        let entries = shapes
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                s.as_ref().map(|s| {
                    let (lo, hi) = s.aabb();
                    BodyEntry { lo, hi, handle: BodyHandle(i as u32) }
                })
            })
            .collect();
        RTree::bulk_load(entries)
    }

    /// Candidate pairs `(i, j)` with `i < j`, excluding same-root pairs and
    /// pairs where neither side can move.
    fn candidate_pairs(&self, shapes: &[Option<WorldShape>]) -> Vec<(BodyHandle, BodyHandle)> {
        let tree = Self::broad_phase(shapes);
        let mut pairs = Vec::new();
        for (i, shape) in shapes.iter().enumerate() {
            let Some(shape) = shape else { continue };
            let a = BodyHandle(i as u32);
            let (lo, hi) = shape.aabb();
            let root_a = self.root_of(a);
            let mut hits: Vec<BodyHandle> = tree
                .locate_in_envelope_intersecting(&AABB::from_corners(lo, hi))
                .map(|e| e.handle)
                .filter(|&b| b > a && self.root_of(b) != root_a)
                .collect();
            hits.sort_unstable();
            for b in hits {
                if self.is_immobile(a) && self.is_immobile(b) {
                    continue;
                }
                pairs.push((a, b));
            }
        }
        pairs
    }

    fn is_immobile(&self, h: BodyHandle) -> bool {
        let root = self.root_of(h);
        matches!(self.body(root).map(|b| b.motion), Some(Motion::Static) | None)
    }

    // ── Step phases ───────────────────────────────────────────────────────

    fn integrate(&mut self, dt_ms: f32) {
        let dt2 = dt_ms * dt_ms;
        for b in self.bodies.iter_mut().flatten() {
            if b.motion != Motion::Dynamic {
                continue;
            }
            let keep = (1.0 - b.friction_air).clamp(0.0, 1.0);
            b.velocity = b.velocity * keep + b.force * (b.inv_mass * dt2);
            b.angular_velocity = b.angular_velocity * keep + b.torque * b.inv_inertia * dt2;
            b.pose.position += b.velocity;
            b.pose.angle += b.angular_velocity;
        }
    }

    fn solve_constraints(&mut self) {
        let live: Vec<Constraint> = self.constraints.iter().flatten().copied().collect();
        for c in live {
            let (Some(pa), Some(pb)) = (self.pose(c.a), self.pose(c.b)) else {
                continue;
            };
            let delta = pa.transform(c.anchor) - pb.position;
            let (ima, imb) = (self.inv_mass_of_root(c.a), self.inv_mass_of_root(c.b));
            let total = ima + imb;
            if total <= 0.0 {
                continue;
            }
            let correction = delta * c.stiffness;
            let (ra, rb) = (self.root_of(c.a), self.root_of(c.b));
            self.translate_root(rb, correction * (imb / total));
            self.translate_root(ra, -correction * (ima / total));
        }
    }

    fn resolve_overlaps(&mut self) {
        let shapes = self.world_shapes();
        for (a, b) in self.candidate_pairs(&shapes) {
            let (Some(ba), Some(bb)) = (self.body(a), self.body(b)) else { continue };
            if ba.zone || bb.zone {
                continue;
            }
            let (Some(sa), Some(sb)) = (&shapes[a.index()], &shapes[b.index()]) else {
                continue;
            };
            let Some(pen) = sa.penetration(sb) else { continue };
            let (ima, imb) = (self.inv_mass_of_root(a), self.inv_mass_of_root(b));
            let total = ima + imb;
            if total <= 0.0 {
                continue;
            }
            let push = pen.normal * pen.depth;
            let (ra, rb) = (self.root_of(a), self.root_of(b));
            self.translate_root(ra, -push * (ima / total));
            self.translate_root(rb, push * (imb / total));
        }
    }

    fn detect_contacts(&mut self, events: &mut Vec<ContactEvent>) {
        let shapes = self.world_shapes();
        let mut now = BTreeSet::new();
        for (a, b) in self.candidate_pairs(&shapes) {
            let (Some(ba), Some(bb)) = (self.body(a), self.body(b)) else { continue };
            if !ba.zone && !bb.zone {
                continue;
            }
            let (Some(sa), Some(sb)) = (&shapes[a.index()], &shapes[b.index()]) else {
                continue;
            };
            if !sa.overlaps(sb) {
                continue;
            }
            if ba.zone {
                now.insert((a, b));
            }
            if bb.zone {
                now.insert((b, a));
            }
        }

        for &(zone, other) in &now {
            events.push(ContactEvent { zone, other, phase: ContactPhase::Begin });
        }
        for &(zone, other) in self.touching.difference(&now) {
            events.push(ContactEvent { zone, other, phase: ContactPhase::End });
        }
        self.touching = now;
    }
}

impl PhysicsWorld for ArenaWorld {
    fn add_body(&mut self, desc: BodyDesc) -> PhysicsResult<BodyHandle> {
        let area = desc.shape.area();
        if !(area > 0.0) {
            return Err(PhysicsError::DegenerateShape("zero area"));
        }
        let handle = BodyHandle(self.bodies.len() as u32);

        let (motion, pose) = match desc.placement {
            Placement::Dynamic(pose) => (Motion::Dynamic, pose),
            Placement::Static(pose) => (Motion::Static, pose),
            Placement::Attached { parent, offset } => {
                let parent_body = self.body(parent).ok_or(PhysicsError::UnknownBody(parent))?;
                if matches!(parent_body.motion, Motion::Attached { .. }) {
                    return Err(PhysicsError::NotRoot(parent));
                }
                let pp = parent_body.pose;
                let pose = Pose::new(pp.transform(offset.position), pp.angle + offset.angle);
                (Motion::Attached { parent, offset }, pose)
            }
        };

        let (inv_mass, inv_inertia) = if motion == Motion::Dynamic {
            let mass = desc.mass.unwrap_or(area * DEFAULT_DENSITY);
            let r = desc.shape.bounding_radius();
            let inertia = INERTIA_SCALE * mass * r * r / 2.0;
            (
                if mass > 0.0 { 1.0 / mass } else { 0.0 },
                if inertia > 0.0 { 1.0 / inertia } else { 0.0 },
            )
        } else {
            (0.0, 0.0)
        };

        if let Motion::Attached { parent, .. } = motion {
            if let Some(p) = self.body_mut(parent) {
                p.children.push(handle);
            }
        }

        self.bodies.push(Some(Body {
            shape: desc.shape,
            zone: desc.zone,
            motion,
            pose,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            inv_mass,
            inv_inertia,
            friction_air: desc.friction_air,
            children: Vec::new(),
        }));
        self.live_bodies += 1;
        Ok(handle)
    }

    fn remove_body(&mut self, body: BodyHandle) -> PhysicsResult<()> {
        let record = self
            .bodies
            .get_mut(body.index())
            .and_then(Option::take)
            .ok_or(PhysicsError::UnknownBody(body))?;
        self.live_bodies -= 1;

        let mut removed = vec![body];
        if let Motion::Attached { parent, .. } = record.motion {
            if let Some(p) = self.body_mut(parent) {
                p.children.retain(|&c| c != body);
            }
        }
        for child in record.children {
            if self.bodies.get_mut(child.index()).and_then(Option::take).is_some() {
                self.live_bodies -= 1;
                removed.push(child);
            }
        }

        for slot in &mut self.constraints {
            if slot.is_some_and(|c| removed.contains(&c.a) || removed.contains(&c.b)) {
                *slot = None;
                self.live_constraints -= 1;
                trace!(%body, "constraint dropped with removed body");
            }
        }
        self.touching
            .retain(|(z, o)| !removed.contains(z) && !removed.contains(o));
        Ok(())
    }

    fn contains(&self, body: BodyHandle) -> bool {
        self.body(body).is_some()
    }

    fn attach(
        &mut self,
        a:         BodyHandle,
        anchor:    Vec2,
        b:         BodyHandle,
        stiffness: f32,
    ) -> PhysicsResult<ConstraintHandle> {
        for h in [a, b] {
            if !self.contains(h) {
                return Err(PhysicsError::UnknownBody(h));
            }
        }
        let handle = ConstraintHandle(self.constraints.len() as u32);
        self.constraints.push(Some(Constraint {
            a,
            anchor,
            b,
            stiffness: stiffness.clamp(0.0, 1.0),
        }));
        self.live_constraints += 1;
        Ok(handle)
    }

    fn detach(&mut self, constraint: ConstraintHandle) -> PhysicsResult<()> {
        self.constraints
            .get_mut(constraint.index())
            .and_then(Option::take)
            .ok_or(PhysicsError::UnknownConstraint(constraint))?;
        self.live_constraints -= 1;
        Ok(())
    }

    fn apply_force(&mut self, body: BodyHandle, force: Vec2) -> PhysicsResult<()> {
        self.root_mut(body)?.force += force;
        Ok(())
    }

    fn set_torque(&mut self, body: BodyHandle, torque: f32) -> PhysicsResult<()> {
        self.root_mut(body)?.torque = torque;
        Ok(())
    }

    fn clear_forces(&mut self) {
        for b in self.bodies.iter_mut().flatten() {
            b.force = Vec2::ZERO;
            b.torque = 0.0;
        }
    }

    fn pose(&self, body: BodyHandle) -> Option<Pose> {
        self.body(body).map(|b| b.pose)
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) -> PhysicsResult<()> {
        let root = self.root_mut(body)?;
        root.pose.position = position;
        let children = root.children.clone();
        let pose = root.pose;
        for child in children {
            if let Some(c) = self.body_mut(child) {
                if let Motion::Attached { offset, .. } = c.motion {
                    c.pose = Pose::new(pose.transform(offset.position), pose.angle + offset.angle);
                }
            }
        }
        Ok(())
    }

    fn step(&mut self, dt_ms: f32, events: &mut Vec<ContactEvent>) {
        self.integrate(dt_ms);
        self.sync_attached();
        for _ in 0..self.solver_iterations {
            self.solve_constraints();
            self.sync_attached();
            self.resolve_overlaps();
            self.sync_attached();
        }
        self.detect_contacts(events);
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.constraints.clear();
        self.touching.clear();
        self.live_bodies = 0;
        self.live_constraints = 0;
    }

    fn body_count(&self) -> usize {
        self.live_bodies
    }

    fn constraint_count(&self) -> usize {
        self.live_constraints
    }
}
