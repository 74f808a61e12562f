//! `swarm-robot` — the robot entity and everything it carries.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                       |
//! |------------|----------------------------------------------------------------|
//! | [`sensor`] | `Sensor`, `SensorFilter`, `ContactInfo` — masked contact counters |
//! | [`probe`]  | `GridProbe` — scalar-field sample points ahead of the robot    |
//! | [`layout`] | `SensorLayout` — body parts, sensors, and probes per preset    |
//! | [`robot`]  | `Robot`, `Hold`                                                |
//! | [`error`]  | `RobotError`, `RobotResult<T>`                                 |
//!
//! # Sensor lifecycle
//!
//! ```text
//!   physics sub-steps ──▶ on_contact_begin / on_contact_end   (count += 1)
//!   robot phase       ──▶ Robot::reading ──▶ controller
//!   end of tick       ──▶ Robot::clear_sensors                (count = 0)
//! ```
//!
//! Counts therefore accumulate over every sub-step of one tick and are read
//! exactly once before being cleared.

pub mod error;
pub mod layout;
pub mod probe;
pub mod robot;
pub mod sensor;


pub use error::{RobotError, RobotResult};
pub use layout::{SensorLayout, SensorSpec, SolidPart};
pub use probe::GridProbe;
pub use robot::{Hold, Robot};
pub use sensor::{ContactInfo, Sensor, SensorFilter};
