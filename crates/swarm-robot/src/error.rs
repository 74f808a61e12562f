use swarm_physics::PhysicsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RobotError {
    #[error("physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("layout has no body radius")]
    EmptyLayout,
}

pub type RobotResult<T> = Result<T, RobotError>;
