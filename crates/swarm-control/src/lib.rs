//! `swarm-control` — robot controllers.
//!
//! A controller turns one tick's [`SensorReading`] into an [`Action`].  Every
//! variant is an independent type behind the [`Controller`] trait; none of
//! them touch the world directly.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`reading`]    | `SensorRole`, `ProbeRole`, `ProbeSample`, `SensorReading`       |
//! | [`action`]     | `Action` — one tick's motor, gripper, and signal commands       |
//! | [`controller`] | `Controller` trait, `ControlInput`, `ControllerStatus`, `IdleController` |
//! | [`avoid`]      | obstacle-avoidance helper, `SimpleAvoidController`              |
//! | [`cluster`]    | `ClusterController` (Normal / BackingUp)                        |
//! | [`orbit`]      | `OrbitController`, `OrbitalConstructionController`, `BiColourConstructionController` |
//! | [`script`]     | `Script`, `ScriptController` — sandboxed user programs          |
//! | [`factory`]    | `ControllerKind` — per-preset defaults and construction         |
//! | [`programs`]   | bundled example scripts                                         |
//! | [`error`]      | `ScriptFault`, `ControlError`, `ControlResult<T>`               |
//!
//! # Determinism
//!
//! Controllers receive the owning robot's [`RobotRng`][swarm_core::RobotRng]
//! for every random choice, so two runs with the same seed produce the same
//! actions.

pub mod action;
pub mod avoid;
pub mod cluster;
pub mod controller;
pub mod error;
pub mod factory;
pub mod orbit;
pub mod programs;
pub mod reading;
pub mod script;


pub use action::{Action, DEFAULT_TEXT_COLOUR};
pub use avoid::SimpleAvoidController;
pub use cluster::ClusterController;
pub use controller::{ControlInput, Controller, ControllerStatus, IdleController};
pub use error::{ControlError, ControlResult, ScriptFault};
pub use factory::ControllerKind;
pub use orbit::{BiColourConstructionController, OrbitController, OrbitalConstructionController};
pub use reading::{ProbeRole, ProbeSample, SensorReading, SensorRole};
pub use script::{Script, ScriptController};
