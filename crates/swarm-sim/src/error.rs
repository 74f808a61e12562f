use swarm_core::SwarmError;
use swarm_field::FieldError;
use swarm_physics::PhysicsError;
use swarm_robot::RobotError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("scenario configuration error: {0}")]
    Config(#[from] SwarmError),

    #[error("field error: {0}")]
    Field(#[from] FieldError),

    #[error("physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("robot error: {0}")]
    Robot(#[from] RobotError),
}

pub type SimResult<T> = Result<T, SimError>;
