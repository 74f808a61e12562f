//! The `PhysicsWorld` trait — the boundary to the rigid-body engine.

use swarm_core::{BodyHandle, ConstraintHandle, Pose, Vec2};

use crate::{BodyDesc, ContactEvent, PhysicsResult};

/// Minimal rigid-body world contract.
///
/// Handles are never reused within a world's lifetime; [`clear`][Self::clear]
/// starts a new lifetime.
pub trait PhysicsWorld {
    /// Add a body or zone and return its handle.
    ///
    /// Fails if an attached body names a parent that does not exist or is
    /// itself attached.
    fn add_body(&mut self, desc: BodyDesc) -> PhysicsResult<BodyHandle>;

    /// Remove a body together with everything attached to it and every
    /// constraint touching any of them.  No `End` events are reported.
    fn remove_body(&mut self, body: BodyHandle) -> PhysicsResult<()>;

    fn contains(&self, body: BodyHandle) -> bool;

    /// Pin the origin of `b` to `anchor` (in `a`'s local frame) with the
    /// given stiffness in `(0, 1]`.
    fn attach(
        &mut self,
        a:         BodyHandle,
        anchor:    Vec2,
        b:         BodyHandle,
        stiffness: f32,
    ) -> PhysicsResult<ConstraintHandle>;

    fn detach(&mut self, constraint: ConstraintHandle) -> PhysicsResult<()>;

    /// Accumulate a world-space force on a root body until the next
    /// [`clear_forces`][Self::clear_forces].
    fn apply_force(&mut self, body: BodyHandle, force: Vec2) -> PhysicsResult<()>;

    /// Set the torque on a root body until the next `clear_forces`.
    fn set_torque(&mut self, body: BodyHandle, torque: f32) -> PhysicsResult<()>;

    fn clear_forces(&mut self);

    /// Current world pose of any body (attached bodies follow their root).
    fn pose(&self, body: BodyHandle) -> Option<Pose>;

    /// Teleport a root body, keeping its velocity.
    fn set_position(&mut self, body: BodyHandle, position: Vec2) -> PhysicsResult<()>;

    /// Advance by `dt_ms` and append this step's zone contacts to `events`.
    fn step(&mut self, dt_ms: f32, events: &mut Vec<ContactEvent>);

    /// Remove every body and constraint.
    fn clear(&mut self);

    fn body_count(&self) -> usize;

    fn constraint_count(&self) -> usize;
}
