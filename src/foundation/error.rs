/// Convenience result type used across symmetra.
pub type SymmetraResult<T> = Result<T, SymmetraError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Undefined coordinate-mapping output is never an error; it is reported as `None` and becomes
/// a sentinel entry in the pixel index map.
#[derive(thiserror::Error, Debug)]
pub enum SymmetraError {
    /// Invalid caller-provided configuration (dimensions, permutations, schedules, parameters).
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid mapping parameters detected while preparing a mapping.
    #[error("mapping error: {0}")]
    Mapping(String),

    /// Errors while rendering stages or evaluating the objective.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SymmetraError {
    /// Build a [`SymmetraError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SymmetraError::Mapping`] value.
    pub fn mapping(msg: impl Into<String>) -> Self {
        Self::Mapping(msg.into())
    }

    /// Build a [`SymmetraError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`SymmetraError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for SymmetraError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
