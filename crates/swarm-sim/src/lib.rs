//! `swarm-sim` — the world manager of the swarm arena simulator.
//!
//! # Tick
//!
//! ```text
//! for each tick:
//!   ① Physics     — sub-steps; contacts → sensors / nest; clamp to walls.
//!   ② Population  — spawn one robot below target, despawn one above it.
//!   ③ Robots      — on controller-update steps, in id order:
//!                     reading → controller → speed check → grab/release
//!                     → flash → pheromone → text → force + torque.
//!   ④ Fields      — pheromone diffusion+decay; green puck regrowth.
//!   ⑤ Sensors     — every count back to zero.
//!   ⑥ Observers   — on_tick_end; on_sample at the analysis cadence.
//!   ⑦ Trials      — rebuild after max_step while trials remain.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`sim`]      | `Sim`: tick loop, population, accessors                |
//! | [`world`]    | world construction, contacts, grab/release/absorb      |
//! | [`builder`]  | `SimBuilder`                                           |
//! | [`objects`]  | `ObjectTable`, `ObjectRef`, `PuckStore`, `Puck`        |
//! | [`snapshot`] | `RenderSnapshot`, `WorldView` and the per-object views |
//! | [`observer`] | `SimObserver`, `NoopObserver`                          |
//! | [`error`]    | `SimError`, `SimResult<T>`                             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use swarm_core::{Preset, ScenarioConfig};
//! use swarm_sim::{NoopObserver, SimBuilder};
//!
//! let config = ScenarioConfig::for_preset(Preset::SimpleCluster);
//! let mut sim = SimBuilder::headless(config).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod objects;
pub mod observer;
pub mod sim;
pub mod snapshot;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use objects::{ObjectRef, ObjectTable, Puck, PuckStore};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use snapshot::{
    FieldChoice, FieldOverlay, FixtureView, PuckView, RenderSnapshot, RobotView, WorldView,
};
