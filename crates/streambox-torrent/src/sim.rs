//! Deterministic in-process backend.
//!
//! Emits a fixed three-file listing after a configurable number of
//! polls, then advances the transfer by a fixed step per poll. Used by
//! the demo binary and by tests that need a real worker loop without
//! network access.

use anyhow::bail;
use async_trait::async_trait;
use streambox_torrent_core::{
    RemoteFile, SessionBackend, SessionEvent, SessionFactory, SessionStats, StreamRequest,
};
use uuid::Uuid;

const NFO_BYTES: u64 = 4_096;
const SAMPLE_BYTES: u64 = 30_000_000;
const SIM_SEEDS: u32 = 25;
const SIM_PEERS: u32 = 10;

/// Factory producing [`SimSession`] backends with shared tuning.
#[derive(Debug, Clone, Copy)]
pub struct SimSessionFactory {
    /// Polls before the metadata listing is announced.
    pub metadata_after_polls: u32,
    /// Total byte size of the simulated job.
    pub total_bytes: u64,
    /// Bytes transferred per poll once the job is focused.
    pub step_bytes: u64,
}

impl Default for SimSessionFactory {
    fn default() -> Self {
        Self {
            metadata_after_polls: 2,
            total_bytes: 2_000_000_000,
            step_bytes: 200_000_000,
        }
    }
}

#[async_trait]
impl SessionFactory for SimSessionFactory {
    async fn open(&self, _request: &StreamRequest) -> anyhow::Result<Box<dyn SessionBackend>> {
        Ok(Box::new(SimSession {
            config: *self,
            job: None,
            polls: 0,
            downloaded: 0,
            announced: false,
            focused: None,
            sequential: false,
        }))
    }
}

/// One simulated torrent session.
pub struct SimSession {
    config: SimSessionFactory,
    job: Option<Uuid>,
    polls: u32,
    downloaded: u64,
    announced: bool,
    focused: Option<usize>,
    sequential: bool,
}

impl SimSession {
    fn listing(&self) -> Vec<RemoteFile> {
        vec![
            RemoteFile {
                path: "release.nfo".to_string(),
                size_bytes: NFO_BYTES,
            },
            RemoteFile {
                path: "movie.mkv".to_string(),
                size_bytes: self
                    .config
                    .total_bytes
                    .saturating_sub(NFO_BYTES + SAMPLE_BYTES),
            },
            RemoteFile {
                path: "sample/sample.mkv".to_string(),
                size_bytes: SAMPLE_BYTES,
            },
        ]
    }
}

#[async_trait]
impl SessionBackend for SimSession {
    async fn add_job(&mut self, request: &StreamRequest) -> anyhow::Result<()> {
        self.job = Some(request.id);
        Ok(())
    }

    async fn set_sequential(&mut self, sequential: bool) -> anyhow::Result<()> {
        self.sequential = sequential;
        Ok(())
    }

    async fn focus_file(&mut self, index: usize) -> anyhow::Result<()> {
        self.focused = Some(index);
        Ok(())
    }

    async fn remove_job(&mut self) -> anyhow::Result<()> {
        self.job = None;
        Ok(())
    }

    async fn poll_events(&mut self) -> anyhow::Result<Vec<SessionEvent>> {
        if self.job.is_none() {
            bail!("no job admitted to simulated session");
        }
        self.polls = self.polls.saturating_add(1);

        if !self.announced {
            if self.polls >= self.config.metadata_after_polls {
                self.announced = true;
                return Ok(vec![SessionEvent::MetadataResolved {
                    files: self.listing(),
                }]);
            }
            return Ok(vec![]);
        }

        // Transfer only advances once a target is focused and piece
        // order is sequential, mirroring the real backend contract.
        if self.focused.is_none() || !self.sequential {
            return Ok(vec![]);
        }
        self.downloaded = self
            .downloaded
            .saturating_add(self.config.step_bytes)
            .min(self.config.total_bytes);
        Ok(vec![SessionEvent::Stats(SessionStats {
            bytes_downloaded: self.downloaded,
            bytes_total: self.config.total_bytes,
            download_bps: self.config.step_bytes,
            seeds: SIM_SEEDS,
            peers: SIM_PEERS,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> StreamRequest {
        StreamRequest::new(
            "magnet:?xt=urn:btih:c12fe1c06bde254a46ab2b2b228dd669bcd0b3dc",
            "/tmp/streambox",
        )
    }

    #[tokio::test]
    async fn announces_metadata_after_configured_polls() {
        let factory = SimSessionFactory::default();
        let mut session = factory.open(&request()).await.unwrap();
        session.add_job(&request()).await.unwrap();

        assert!(session.poll_events().await.unwrap().is_empty());
        let events = session.poll_events().await.unwrap();
        match events.as_slice() {
            [SessionEvent::MetadataResolved { files }] => {
                assert_eq!(files.len(), 3);
                let largest = files.iter().max_by_key(|f| f.size_bytes).unwrap();
                assert_eq!(largest.path, "movie.mkv");
            }
            other => panic!("expected metadata event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transfer_waits_for_focus_and_sequential_order() {
        let factory = SimSessionFactory {
            metadata_after_polls: 1,
            ..SimSessionFactory::default()
        };
        let mut session = factory.open(&request()).await.unwrap();
        session.add_job(&request()).await.unwrap();
        session.poll_events().await.unwrap();

        assert!(session.poll_events().await.unwrap().is_empty());

        session.focus_file(1).await.unwrap();
        session.set_sequential(true).await.unwrap();
        let events = session.poll_events().await.unwrap();
        match events.as_slice() {
            [SessionEvent::Stats(stats)] => {
                assert_eq!(stats.bytes_downloaded, factory.step_bytes);
                assert_eq!(stats.bytes_total, factory.total_bytes);
            }
            other => panic!("expected stats event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn progress_saturates_at_total() {
        let factory = SimSessionFactory {
            metadata_after_polls: 1,
            total_bytes: 100,
            step_bytes: 60,
        };
        let mut session = factory.open(&request()).await.unwrap();
        session.add_job(&request()).await.unwrap();
        session.set_sequential(true).await.unwrap();
        session.poll_events().await.unwrap();
        session.focus_file(1).await.unwrap();

        session.poll_events().await.unwrap();
        let events = session.poll_events().await.unwrap();
        match events.as_slice() {
            [SessionEvent::Stats(stats)] => assert_eq!(stats.bytes_downloaded, 100),
            other => panic!("expected stats event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn polling_without_a_job_is_rejected() {
        let factory = SimSessionFactory::default();
        let mut session = factory.open(&request()).await.unwrap();
        assert!(session.poll_events().await.is_err());
    }
}
