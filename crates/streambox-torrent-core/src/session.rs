//! Backend seam abstracting the underlying download engine.

use anyhow::Result;
use async_trait::async_trait;

use crate::model::{RemoteFile, SessionStats, StreamRequest};

/// Events surfaced by a backend session when polled.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Torrent metadata became available; files are listed in torrent
    /// order so indices are stable for [`SessionBackend::focus_file`].
    MetadataResolved {
        /// Files advertised by the torrent.
        files: Vec<RemoteFile>,
    },
    /// Fresh transfer statistics for the whole job.
    Stats(SessionStats),
    /// The session hit an unrecoverable fault; the job is dead.
    Faulted {
        /// Backend-supplied failure description.
        message: String,
    },
}

/// One torrent session owned by the worker for the duration of a job.
///
/// Implementations manage exactly one job; the engine opens a fresh
/// backend through [`SessionFactory::open`] on every `start`.
#[async_trait]
pub trait SessionBackend: Send {
    /// Hand the job to the backend and begin metadata resolution.
    async fn add_job(&mut self, request: &StreamRequest) -> Result<()>;

    /// Switch piece acquisition to sequential (file byte) order.
    async fn set_sequential(&mut self, sequential: bool) -> Result<()>;

    /// Concentrate bandwidth on one file: raise its priority and drop
    /// every sibling. `index` refers to the metadata file listing.
    async fn focus_file(&mut self, index: usize) -> Result<()>;

    /// Remove the job and its bookkeeping from the backend.
    async fn remove_job(&mut self) -> Result<()>;

    /// Drain pending session events. Never blocks beyond the backend's
    /// own alert retrieval.
    async fn poll_events(&mut self) -> Result<Vec<SessionEvent>>;
}

/// Factory producing one [`SessionBackend`] per accepted job.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// Open a backend session rooted at the request's save directory.
    async fn open(&self, request: &StreamRequest) -> Result<Box<dyn SessionBackend>>;
}
