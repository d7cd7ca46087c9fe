//! Error types for the streaming deduplication engine.

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by the [`crate::engine::Engine`].
///
/// Per the error taxonomy, the engine has exactly two failure classes: a
/// configuration error raised eagerly from [`crate::engine::Engine::new`],
/// and an invariant violation, which indicates a programming bug and is not
/// recoverable. Transform/classification failures belong to the caller and
/// never surface through this type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected at construction time: bad window size, contradictory
    /// capacities, or similar configuration mistakes.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The engine reached a state its own algorithm guarantees cannot
    /// happen. There is no recovery path; the caller should treat this as
    /// fatal.
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl EngineError {
    /// Builds an [`EngineError::Configuration`] from a displayable reason.
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    /// Builds an [`EngineError::Invariant`] from a displayable reason.
    ///
    /// Callers that hit this should log the surrounding state before
    /// propagating it; see [`crate::engine::Engine`] for call sites.
    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::Invariant(reason.into())
    }
}
