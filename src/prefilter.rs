//! Normalization applied to a record's hashed view before it reaches the
//! hasher. Never touches the output view: whatever the caller supplied as
//! `output_view` to [`crate::engine::Engine::push`] is emitted unchanged.

/// A pure, deterministic transform from one hashed view to another.
///
/// Boxed so collaborators can plug in whatever they need — including one
/// backed by an external subprocess — without the core knowing; the core's
/// only contract with it is one output view per input view.
pub type TransformFn = Box<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>;

/// Composes the two pre-filter steps: drop a fixed prefix, then run an
/// optional transform.
#[derive(Default)]
pub struct PreFilter {
    skip_chars: usize,
    transform: Option<TransformFn>,
}

impl PreFilter {
    /// A pre-filter that drops the first `skip_chars` bytes of the hashed
    /// view and otherwise passes it through unchanged.
    pub fn new(skip_chars: usize) -> Self {
        Self {
            skip_chars,
            transform: None,
        }
    }

    /// Attaches a transform run after the prefix skip.
    pub fn with_transform(mut self, transform: TransformFn) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Produces the hashed view for one record: drop the prefix, then run
    /// the transform if one is configured.
    pub fn apply(&self, view: &[u8]) -> Vec<u8> {
        let skipped = if self.skip_chars >= view.len() {
            &[][..]
        } else {
            &view[self.skip_chars..]
        };
        match &self.transform {
            Some(transform) => transform(skipped),
            None => skipped.to_vec(),
        }
    }
}

impl std::fmt::Debug for PreFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreFilter")
            .field("skip_chars", &self.skip_chars)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}
