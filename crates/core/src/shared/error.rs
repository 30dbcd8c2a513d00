use thiserror::Error;

/// Failures reported by the compositing core.
///
/// Each error is scoped to the single call that produced it; subsequent
/// frames are unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BokehError {
    /// Zero or mismatched dimensions, unsupported channel counts, or buffers
    /// whose length disagrees with their declared shape.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The segmentation collaborator produced no mask for this frame.
    #[error("segmentation unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl BokehError {
    pub fn invalid(message: impl Into<String>) -> Self {
        BokehError::InvalidInput(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        BokehError::UpstreamUnavailable(message.into())
    }
}
