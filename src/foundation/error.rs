/// Convenience result type used across tourscope.
pub type TourscopeResult<T> = Result<T, TourscopeError>;

/// Top-level error taxonomy used by the loader, the renderers and the playback engine.
#[derive(thiserror::Error, Debug)]
pub enum TourscopeError {
    /// The trace source could not be read or is not valid JSON.
    #[error("data load error: {0}")]
    DataLoad(String),

    /// The trace parsed, but does not have the expected generation-record shape.
    #[error("data shape error: {0}")]
    DataShape(String),

    /// A tour references a node outside the node ring. Recoverable, per frame.
    #[error("invalid tour index {index} (ring has {num_nodes} nodes)")]
    InvalidTourIndex {
        /// Offending 0-based node index.
        index: usize,
        /// Number of nodes in the ring the tour was drawn against.
        num_nodes: usize,
    },

    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Playback engine contract violation.
    #[error("playback error: {0}")]
    Playback(String),

    /// Errors while writing frames to a sink.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TourscopeError {
    /// Build a [`TourscopeError::DataLoad`] value.
    pub fn data_load(msg: impl Into<String>) -> Self {
        Self::DataLoad(msg.into())
    }

    /// Build a [`TourscopeError::DataShape`] value.
    pub fn data_shape(msg: impl Into<String>) -> Self {
        Self::DataShape(msg.into())
    }

    /// Build a [`TourscopeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TourscopeError::Playback`] value.
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Build a [`TourscopeError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Return `true` for errors that only affect the current frame.
    pub fn is_per_frame(&self) -> bool {
        matches!(self, Self::InvalidTourIndex { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
