//! Lifecycle facade over the background download worker.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use streambox_torrent_core::{
    DownloadState, EngineStatus, SessionFactory, StreamRequest,
};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::magnet;
use crate::worker;

/// Progressive streaming download engine.
///
/// Owns at most one background worker at a time. A new [`start`] call
/// replaces the previous job: the old worker is signalled and joined
/// before the new one is spawned. Status reads never block on the
/// worker; they copy the latest snapshot out of a shared cell.
///
/// [`start`]: DownloadEngine::start
pub struct DownloadEngine {
    factory: Arc<dyn SessionFactory>,
    status: Arc<Mutex<EngineStatus>>,
    active: tokio::sync::Mutex<Option<ActiveJob>>,
}

struct ActiveJob {
    id: Uuid,
    stop: Arc<AtomicBool>,
    worker: JoinHandle<()>,
}

impl DownloadEngine {
    /// Create an idle engine backed by the given session factory.
    #[must_use]
    pub fn new(factory: Arc<dyn SessionFactory>) -> Self {
        Self {
            factory,
            status: Arc::new(Mutex::new(EngineStatus::idle())),
            active: tokio::sync::Mutex::new(None),
        }
    }

    /// Begin streaming the given magnet into `save_dir`.
    ///
    /// Any job already running is stopped first. An invalid magnet
    /// never spawns a worker: the status moves straight to `Error`
    /// with [`EngineFault::InvalidInput`] recorded.
    ///
    /// [`EngineFault::InvalidInput`]: streambox_torrent_core::EngineFault::InvalidInput
    pub async fn start(&self, magnet_uri: &str, save_dir: impl Into<PathBuf>) {
        let mut active = self.active.lock().await;
        Self::shutdown(&self.status, active.take()).await;

        if let Err(err) = magnet::validate(magnet_uri) {
            warn!(error = %err, "rejected stream request");
            let mut guard = worker::lock_status(&self.status);
            *guard = EngineStatus::idle();
            guard.state = DownloadState::Error;
            guard.last_error = Some(err.fault());
            return;
        }

        let request = StreamRequest::new(magnet::with_default_trackers(magnet_uri), save_dir);
        let job_id = request.id;
        {
            let mut guard = worker::lock_status(&self.status);
            *guard = EngineStatus::idle();
            guard.state = DownloadState::Preparing;
        }
        info!(job_id = %job_id, "starting stream download");

        let stop = Arc::new(AtomicBool::new(false));
        let handle = tokio::spawn(worker::run(
            Arc::clone(&self.factory),
            request,
            Arc::clone(&self.status),
            Arc::clone(&stop),
        ));
        *active = Some(ActiveJob {
            id: job_id,
            stop,
            worker: handle,
        });
    }

    /// Stop the running job, join its worker, and reset to `Idle`.
    ///
    /// Safe to call when nothing is running.
    pub async fn stop(&self) {
        let mut active = self.active.lock().await;
        Self::shutdown(&self.status, active.take()).await;
    }

    /// Copy of the most recent status snapshot.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        worker::lock_status(&self.status).clone()
    }

    /// Absolute path of the selected media file, once metadata has
    /// resolved. `None` until then.
    #[must_use]
    pub fn file_path(&self) -> Option<String> {
        worker::lock_status(&self.status).video_path.clone()
    }

    async fn shutdown(status: &Mutex<EngineStatus>, job: Option<ActiveJob>) {
        if let Some(job) = job {
            job.stop.store(true, Ordering::Release);
            info!(job_id = %job.id, "stopping download worker");
            if let Err(err) = job.worker.await {
                warn!(job_id = %job.id, error = %err, "download worker aborted abnormally");
            }
        }
        // Reset even when no worker exists so a latched Error from a
        // rejected start is cleared by stop.
        let mut guard = worker::lock_status(status);
        *guard = EngineStatus::idle();
    }
}
