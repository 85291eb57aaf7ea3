use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("function is not defined at x = {0}")]
    UndefinedAt(f64),

    #[error("derivative does not exist at x = {0}")]
    NoDerivativeAt(f64),
}

impl EngineError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
