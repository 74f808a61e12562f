//! `swarm-core` — foundational types for the swarm arena simulator.
//!
//! This crate is a dependency of every other `swarm-*` crate.  It has no
//! `swarm-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`ids`]      | `RobotId`, `PuckId`, `BodyHandle`, `ConstraintHandle`     |
//! | [`geo`]      | `Vec2`, `Pose`                                            |
//! | [`kind`]     | `ObjectKind`, `KindMask`                                  |
//! | [`time`]     | `Tick`, `SimClock`                                        |
//! | [`rng`]      | `RobotRng` (per-robot), `SimRng` (global)                 |
//! | [`config`]   | `Preset`, `ScenarioConfig`, `SpeedLimits`                 |
//! | [`error`]    | `SwarmError`, `SwarmResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod kind;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{CircleSpec, ObstacleSpec, Preset, ScenarioConfig, SpeedLimits};
pub use error::{SwarmError, SwarmResult};
pub use geo::{Pose, Vec2};
pub use ids::{BodyHandle, ConstraintHandle, PuckId, RobotId};
pub use kind::{KindMask, ObjectKind};
pub use rng::{RobotRng, SimRng};
pub use time::{SimClock, Tick};
