//! `swarm-field` — 2-D scalar field grids sampled by robot grid probes.
//!
//! Two fields exist per scenario: a static nest-scent distance field and an
//! evolving pheromone field.  Both are plain [`ScalarField`]s; only their
//! construction and update schedule differ.
//!
//! | Module      | Contents                                        |
//! |-------------|-------------------------------------------------|
//! | [`field`]   | `ScalarField`, `world_to_cell`                  |
//! | [`error`]   | `FieldError`, `FieldResult`                     |

pub mod error;
pub mod field;

#[cfg(test)]
mod tests;

pub use error::{FieldError, FieldResult};
pub use field::{world_to_cell, ScalarField};
