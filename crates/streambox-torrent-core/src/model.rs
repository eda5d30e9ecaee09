//! Core download engine domain types shared across the workspace.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states reported for the active streaming job.
///
/// The numeric codes form the closed contract consumed by the host
/// marshalling layer and must stay stable.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadState {
    /// No job is active.
    #[default]
    Idle = 0,
    /// Magnet accepted; waiting for torrent metadata.
    Preparing = 1,
    /// Metadata resolved and payload transfer in progress.
    Downloading = 2,
    /// Enough of the stream target is buffered for playback to begin.
    /// Latched: the state never drops back to `Downloading`.
    Ready = 3,
    /// The job failed; cleared only by the next `start`.
    Error = 4,
}

impl DownloadState {
    /// Numeric code exposed to the host.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Flattened failure code published alongside the status snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineFault {
    /// The caller-supplied input (magnet URI, model path) was rejected.
    InvalidInput,
    /// Metadata never resolved or the transfer failed mid-job.
    ResolutionFailed,
    /// The backend session could not be opened.
    ResourceUnavailable,
}

/// Copy-out status snapshot for the download engine.
///
/// Mutated only by the worker under the status lock; readers always
/// receive a clone, never a live reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Whole-job completion percentage, 0–100.
    pub progress: u8,
    /// Payload download rate in bytes per second.
    pub speed_bps: u64,
    /// Connected seed count.
    pub seeds: u32,
    /// Connected peer count.
    pub peers: u32,
    /// Current lifecycle state.
    pub state: DownloadState,
    /// Absolute path of the selected media file once metadata resolved.
    ///
    /// Invariant: `Some` exactly while `state` is `Downloading` or
    /// `Ready`.
    pub video_path: Option<String>,
    /// Most recent fault, if the job reached [`DownloadState::Error`].
    pub last_error: Option<EngineFault>,
    /// When the worker last committed this snapshot.
    pub last_updated: DateTime<Utc>,
}

impl EngineStatus {
    /// Zeroed Idle snapshot used at construction and after `stop`.
    #[must_use]
    pub fn idle() -> Self {
        Self {
            progress: 0,
            speed_bps: 0,
            seeds: 0,
            peers: 0,
            state: DownloadState::Idle,
            video_path: None,
            last_error: None,
            last_updated: Utc::now(),
        }
    }
}

impl Default for EngineStatus {
    fn default() -> Self {
        Self::idle()
    }
}

/// Immutable descriptor for one streaming job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRequest {
    /// Unique identifier assigned when the job is accepted.
    pub id: Uuid,
    /// Magnet URI to resolve, including any appended trackers.
    pub magnet_uri: String,
    /// Directory the backend writes payload data into.
    pub save_dir: PathBuf,
}

impl StreamRequest {
    /// Build a request with a fresh job identifier.
    pub fn new(magnet_uri: impl Into<String>, save_dir: impl Into<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            magnet_uri: magnet_uri.into(),
            save_dir: save_dir.into(),
        }
    }
}

/// A file advertised by torrent metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    /// Path relative to the job's save directory.
    pub path: String,
    /// File size in bytes.
    pub size_bytes: u64,
}

/// Transfer statistics polled from the backend session.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionStats {
    /// Bytes of the whole job downloaded and verified.
    pub bytes_downloaded: u64,
    /// Total byte size of the whole job, zero until metadata resolved.
    pub bytes_total: u64,
    /// Current payload download rate in bytes per second.
    pub download_bps: u64,
    /// Connected seed count.
    pub seeds: u32,
    /// Connected peer count.
    pub peers: u32,
}

impl SessionStats {
    /// Whole-job completion as an integer percentage, clamped to 100.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.bytes_total == 0 {
            return 0;
        }
        let scaled = self
            .bytes_downloaded
            .saturating_mul(100)
            .checked_div(self.bytes_total)
            .unwrap_or(0);
        u8::try_from(scaled.min(100)).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_codes_are_stable() {
        assert_eq!(DownloadState::Idle.code(), 0);
        assert_eq!(DownloadState::Preparing.code(), 1);
        assert_eq!(DownloadState::Downloading.code(), 2);
        assert_eq!(DownloadState::Ready.code(), 3);
        assert_eq!(DownloadState::Error.code(), 4);
    }

    #[test]
    fn idle_snapshot_is_zeroed() {
        let status = EngineStatus::idle();
        assert_eq!(status.progress, 0);
        assert_eq!(status.speed_bps, 0);
        assert_eq!(status.seeds, 0);
        assert_eq!(status.peers, 0);
        assert_eq!(status.state, DownloadState::Idle);
        assert!(status.video_path.is_none());
        assert!(status.last_error.is_none());
    }

    #[test]
    fn percent_floors_and_clamps() {
        let stats = SessionStats {
            bytes_downloaded: 333,
            bytes_total: 1_000,
            ..SessionStats::default()
        };
        assert_eq!(stats.percent(), 33);

        let empty = SessionStats::default();
        assert_eq!(empty.percent(), 0);

        let over = SessionStats {
            bytes_downloaded: 2_000,
            bytes_total: 1_000,
            ..SessionStats::default()
        };
        assert_eq!(over.percent(), 100);
    }
}
