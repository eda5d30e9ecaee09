//! Error types for download engine operations.

use std::error::Error;

use thiserror::Error;

use crate::model::EngineFault;

/// Primary error type for download engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller-supplied input failed validation before reaching a backend.
    #[error("invalid input: {detail}")]
    InvalidInput {
        /// Human-readable description of the rejected input.
        detail: String,
    },
    /// Metadata resolution or transfer failed inside the backend.
    #[error("metadata resolution failed")]
    ResolutionFailed {
        /// Underlying backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The backend session could not be opened or has gone away.
    #[error("session backend unavailable")]
    ResourceUnavailable {
        /// Underlying backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl EngineError {
    /// Build an [`EngineError::InvalidInput`] from a detail message.
    pub fn invalid_input(detail: impl Into<String>) -> Self {
        Self::InvalidInput {
            detail: detail.into(),
        }
    }

    /// Wrap a backend failure as [`EngineError::ResolutionFailed`].
    #[must_use]
    pub fn resolution_failed(source: anyhow::Error) -> Self {
        Self::ResolutionFailed {
            source: source.into(),
        }
    }

    /// Wrap a backend failure as [`EngineError::ResourceUnavailable`].
    #[must_use]
    pub fn resource_unavailable(source: anyhow::Error) -> Self {
        Self::ResourceUnavailable {
            source: source.into(),
        }
    }

    /// Flattened fault code published through the status snapshot.
    #[must_use]
    pub const fn fault(&self) -> EngineFault {
        match self {
            Self::InvalidInput { .. } => EngineFault::InvalidInput,
            Self::ResolutionFailed { .. } => EngineFault::ResolutionFailed,
            Self::ResourceUnavailable { .. } => EngineFault::ResourceUnavailable,
        }
    }
}

/// Convenience alias for download engine results.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faults_match_variants() {
        assert_eq!(
            EngineError::invalid_input("bad magnet").fault(),
            EngineFault::InvalidInput
        );
        assert_eq!(
            EngineError::resolution_failed(anyhow::anyhow!("no metadata")).fault(),
            EngineFault::ResolutionFailed
        );
        assert_eq!(
            EngineError::resource_unavailable(anyhow::anyhow!("session gone")).fault(),
            EngineFault::ResourceUnavailable
        );
    }
}
