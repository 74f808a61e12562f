use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("field grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("source cell ({i}, {j}) lies outside the {width}x{height} grid")]
    SourceOutOfRange { i: usize, j: usize, width: usize, height: usize },
}

pub type FieldResult<T> = Result<T, FieldError>;
