//! Argument parsing, engine wiring, and the progress loop.

use std::path::PathBuf;
use std::sync::Arc;

use streambox_telemetry::{LoggingConfig, init_logging};
use streambox_torrent::{DownloadEngine, POLL_INTERVAL};
use streambox_torrent_core::{DownloadState, EngineFault, SessionFactory};
use tracing::info;

use crate::error::{AppError, AppResult};

const DEFAULT_SAVE_DIR: &str = "downloads";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Magnet URI to stream.
    pub magnet_uri: String,
    /// Directory payload data is written into.
    pub save_dir: PathBuf,
}

impl Invocation {
    /// Parse positional arguments: `<magnet-uri> [save-dir]`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Usage`] when no magnet is given.
    pub fn parse(args: &[String]) -> AppResult<Self> {
        let magnet_uri = args.first().ok_or(AppError::Usage)?.clone();
        let save_dir = args
            .get(1)
            .map_or_else(|| PathBuf::from(DEFAULT_SAVE_DIR), PathBuf::from);
        Ok(Self {
            magnet_uri,
            save_dir,
        })
    }
}

#[cfg(feature = "rqbit")]
fn session_factory() -> Arc<dyn SessionFactory> {
    Arc::new(streambox_torrent::rqbit::RqbitSessionFactory)
}

#[cfg(not(feature = "rqbit"))]
fn session_factory() -> Arc<dyn SessionFactory> {
    Arc::new(streambox_torrent::SimSessionFactory::default())
}

/// Run the streaming demo until the job completes or faults.
///
/// # Errors
///
/// Returns [`AppError::Usage`] on a bad command line,
/// [`AppError::Telemetry`] when logging cannot be installed, and
/// [`AppError::Stream`] when the download engine reports a fault.
pub async fn run_app() -> AppResult<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = Invocation::parse(&args)?;
    init_logging(&LoggingConfig::default()).map_err(|source| AppError::Telemetry { source })?;

    let engine = DownloadEngine::new(session_factory());
    engine
        .start(&invocation.magnet_uri, &invocation.save_dir)
        .await;

    let mut last_state = DownloadState::Idle;
    loop {
        tokio::time::sleep(POLL_INTERVAL).await;
        let status = engine.status();

        if status.state != last_state {
            info!(
                state = ?status.state,
                progress = status.progress,
                video_path = status.video_path.as_deref().unwrap_or("-"),
                "download state changed"
            );
            last_state = status.state;
        }

        match status.state {
            DownloadState::Error => {
                engine.stop().await;
                return Err(AppError::Stream {
                    fault: status.last_error.unwrap_or(EngineFault::ResolutionFailed),
                });
            }
            DownloadState::Ready if status.progress >= 100 => break,
            _ => {}
        }
    }

    info!("download complete");
    engine.stop().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_requires_a_magnet() {
        assert!(matches!(Invocation::parse(&[]), Err(AppError::Usage)));
    }

    #[test]
    fn parse_defaults_the_save_dir() {
        let args = vec!["magnet:?xt=urn:btih:abc".to_string()];
        let invocation = Invocation::parse(&args).unwrap();
        assert_eq!(invocation.magnet_uri, "magnet:?xt=urn:btih:abc");
        assert_eq!(invocation.save_dir, PathBuf::from(DEFAULT_SAVE_DIR));
    }

    #[test]
    fn parse_honours_an_explicit_save_dir() {
        let args = vec![
            "magnet:?xt=urn:btih:abc".to_string(),
            "/media/downloads".to_string(),
        ];
        let invocation = Invocation::parse(&args).unwrap();
        assert_eq!(invocation.save_dir, PathBuf::from("/media/downloads"));
    }
}
