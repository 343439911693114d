use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Unknown function `{name}`")]
    UnknownFunction { name: String },
    #[error("Variable slot {slot} is not bound")]
    UnboundSlot { slot: usize },
    #[error("Type mismatch: {message}")]
    TypeMismatch { message: String },
    #[error("Cannot take {operation} of an empty list")]
    EmptyList { operation: &'static str },
    #[error("Integer overflow: {message}")]
    Overflow { message: String },
    #[error("Match error: {message}")]
    MatchError { message: String },
    #[error("Call depth exceeded {limit} while evaluating `{name}`")]
    DepthExceeded { name: String, limit: usize },
}
