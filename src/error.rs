//! Error types for the fallible edges of the engine.
//!
//! The layout math itself is total. Only preset-table construction, config
//! validation and the JSON boundary can fail.

/// Errors raised while building or feeding the layout engine.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("time scale preset table is empty")]
    EmptyPresets,
    #[error("time scale preset {index} does not increase over the previous preset")]
    NonIncreasingPresets { index: usize },
    #[error("time scale preset {index} has a non-positive duration")]
    NonPositiveDuration { index: usize },
    #[error("invalid layout config: {0}")]
    InvalidConfig(String),
    #[error("invalid layout input: {0}")]
    InvalidInput(#[from] serde_json::Error),
}
