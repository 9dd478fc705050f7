/// Convenience result type used across the crate.
pub type WavyteResult<T> = Result<T, WavyteError>;

/// Top-level error taxonomy for job configuration and input emission.
#[derive(thiserror::Error, Debug)]
pub enum WavyteError {
    /// Invalid use of an API, e.g. an input option with no input to attach to.
    #[error("validation error: {0}")]
    Validation(String),

    /// A configuration value could not be stored under its canonical key.
    #[error("config error: {0}")]
    Config(String),

    /// A node's media source could not be prepared.
    #[error("readiness error: node '{node}': {message}")]
    Readiness {
        /// Id of the node whose probe rejected.
        node: String,
        /// Probe failure description.
        message: String,
    },

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WavyteError {
    /// Build a [`WavyteError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WavyteError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`WavyteError::Readiness`] value for `node`.
    pub fn readiness(node: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Readiness {
            node: node.into(),
            message: msg.into(),
        }
    }

    /// Build a [`WavyteError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
