use std::error::Error;

/// Errors that can occur during rendering.
///
/// Malformed *input* never errors: unknown node kinds, unbalanced inline
/// tags and empty images all degrade gracefully. The only failures
/// surfaced to the caller come from collaborators. A syntax highlighter
/// or tag handler returning an error indicates a misconfigured
/// collaborator rather than bad input, and is propagated unmodified.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("{collaborator} collaborator failed: {source}")]
    Collaborator {
        collaborator: &'static str,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl RenderError {
    /// Wrap a failure reported by the named collaborator.
    pub fn collaborator(
        collaborator: &'static str,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        RenderError::Collaborator {
            collaborator,
            source: source.into(),
        }
    }
}
