//! `swarm-physics` — the physics collaborator consumed by the simulation.
//!
//! The simulation never integrates motion or detects overlaps itself.  It
//! talks to a [`PhysicsWorld`]: it adds bodies and sensor zones, pushes
//! forces and torques, attaches hold constraints, and receives
//! [`ContactEvent`]s for zones after each step.
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`shape`]   | `Shape`, world-space shapes, separating-axis overlap test |
//! | [`body`]    | `BodyDesc`, `Placement`, `ContactEvent`, `ContactPhase`   |
//! | [`world`]   | `PhysicsWorld` trait                                      |
//! | [`arena`]   | `ArenaWorld` — overdamped reference implementation        |
//! | [`error`]   | `PhysicsError`, `PhysicsResult`                           |
//!
//! `ArenaWorld` is deliberately simple: positional overlap resolution, no
//! restitution, no friction beyond air drag.  It is adequate for headless
//! runs and tests; swap in a full engine by implementing `PhysicsWorld`.

pub mod arena;
pub mod body;
pub mod error;
pub mod shape;
pub mod world;

#[cfg(test)]
mod tests;

pub use arena::ArenaWorld;
pub use body::{BodyDesc, ContactEvent, ContactPhase, Placement};
pub use error::{PhysicsError, PhysicsResult};
pub use shape::{Shape, WorldShape};
pub use world::PhysicsWorld;
