use thiserror::Error;

/// A user program failed for one tick.
///
/// Faults are recovered inside [`ScriptController`][crate::ScriptController]:
/// the robot gets a zero action and the fault is reported through
/// [`Controller::status`][crate::Controller::status].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScriptFault {
    #[error("syntax error on line {line}: {message}")]
    Parse { line: u32, message: String },

    #[error("`{0}` is not defined")]
    UnknownName(String),

    #[error("this robot has no `{0}` sensor")]
    MissingSensor(&'static str),

    #[error("type error: {0}")]
    Type(String),

    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("program did not finish within {0} steps")]
    StepBudget(u32),

    #[error("Missing final Execute!")]
    MissingCompletion,

    #[error("{name} must be in the range [-{max}, {max}], got {value}")]
    SpeedOutOfRange { name: &'static str, value: f64, max: f32 },
}

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("unknown controller `{0}`")]
    UnknownController(String),

    #[error(transparent)]
    Script(#[from] ScriptFault),
}

pub type ControlResult<T> = Result<T, ControlError>;
