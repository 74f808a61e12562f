use swarm_core::{BodyHandle, ConstraintHandle};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("body {0} does not exist")]
    UnknownBody(BodyHandle),

    #[error("constraint {0} does not exist")]
    UnknownConstraint(ConstraintHandle),

    #[error("body {0} is attached to a parent and cannot be moved on its own")]
    NotRoot(BodyHandle),

    #[error("shape is degenerate: {0}")]
    DegenerateShape(&'static str),
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
