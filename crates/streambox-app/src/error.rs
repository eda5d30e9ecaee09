//! Application-level errors for bootstrap and the progress loop.

use streambox_torrent_core::EngineFault;
use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// The command line was not usable.
    #[error("usage: streambox <magnet-uri> [save-dir]")]
    Usage,
    /// Telemetry could not be installed.
    #[error("telemetry init failed")]
    Telemetry {
        /// Source telemetry error.
        #[source]
        source: anyhow::Error,
    },
    /// The streaming job ended in a fault.
    #[error("stream failed: {fault:?}")]
    Stream {
        /// Fault reported by the download engine.
        fault: EngineFault,
    },
}
