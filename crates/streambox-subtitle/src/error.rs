//! Subtitle engine error type.

use thiserror::Error;

/// Failures surfaced by [`SubtitleEngine`](crate::SubtitleEngine).
#[derive(Debug, Error)]
pub enum SubtitleError {
    /// The speech model could not be loaded.
    #[error("speech model unavailable: {source}")]
    ModelUnavailable {
        /// Underlying loader failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SubtitleError {
    /// Wrap a model loader failure.
    #[must_use]
    pub fn model_unavailable(source: anyhow::Error) -> Self {
        Self::ModelUnavailable {
            source: source.into(),
        }
    }
}
