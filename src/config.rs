//! Engine configuration, validated eagerly at construction.

use crate::emitter::DEFAULT_ANNOTATION_TEMPLATE;
use crate::error::{EngineError, Result};

/// Configuration for a single [`crate::engine::Engine`] instance.
///
/// Every field is collaborator-visible per the external interface; there
/// are no hidden defaults baked into the engine itself.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window size `W`. Must be at least 2.
    pub window_size: usize,
    /// History capacity `H`, or `None` for unlimited.
    pub max_history: Option<usize>,
    /// Known-sequence registry capacity `U`.
    pub max_known_sequences: usize,
    /// Invert the emit/skip decision (see the external-interface contract).
    pub inverse_mode: bool,
    /// Whether to interleave annotation lines at confirmed duplicates.
    /// Forced off when `inverse_mode` is set.
    pub annotate: bool,
    /// Template string for annotation lines.
    pub annotation_template: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: 3,
            max_history: Some(1 << 20),
            max_known_sequences: 1 << 16,
            inverse_mode: false,
            annotate: false,
            annotation_template: DEFAULT_ANNOTATION_TEMPLATE.to_string(),
        }
    }
}

impl EngineConfig {
    /// A config with the given window size and otherwise-default bounds.
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            ..Self::default()
        }
    }

    /// No history or registry eviction: suitable for short-lived batch
    /// runs where bounding memory doesn't matter.
    pub fn unbounded(window_size: usize) -> Self {
        Self {
            window_size,
            max_history: None,
            max_known_sequences: usize::MAX,
            ..Self::default()
        }
    }

    /// Small, fixed bounds: suitable for long-running streams where
    /// memory must stay flat regardless of input size.
    pub fn bounded(window_size: usize, max_history: usize, max_known_sequences: usize) -> Self {
        Self {
            window_size,
            max_history: Some(max_history),
            max_known_sequences,
            ..Self::default()
        }
    }

    /// Checks the configuration for the errors the engine is required to
    /// reject eagerly.
    pub fn validate(&self) -> Result<()> {
        if self.window_size < 2 {
            return Err(EngineError::configuration(format!(
                "window_size must be >= 2, got {}",
                self.window_size
            )));
        }
        if let Some(max_history) = self.max_history {
            if max_history < self.window_size {
                return Err(EngineError::configuration(format!(
                    "max_history ({max_history}) must be >= window_size ({})",
                    self.window_size
                )));
            }
        }
        if self.max_known_sequences == 0 {
            return Err(EngineError::configuration(
                "max_known_sequences must be positive",
            ));
        }
        Ok(())
    }
}
