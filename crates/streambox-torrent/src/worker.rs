//! Background worker driving one backend session per job.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use streambox_torrent_core::{
    DownloadState, EngineError, EngineFault, EngineStatus, SessionBackend, SessionEvent,
    SessionFactory, StreamRequest,
};
use tracing::{debug, info, warn};

/// Cadence of the status refresh loop.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Whole-job progress required before the stream latches `Ready`.
/// Fixed design constant balancing rebuffer risk against time to
/// first frame.
pub const READY_THRESHOLD_PERCENT: u8 = 5;

enum Flow {
    Continue,
    Faulted,
}

pub(crate) fn lock_status(status: &Mutex<EngineStatus>) -> MutexGuard<'_, EngineStatus> {
    status.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn publish_fault(status: &Mutex<EngineStatus>, fault: EngineFault) {
    let mut guard = lock_status(status);
    guard.state = DownloadState::Error;
    guard.last_error = Some(fault);
    guard.video_path = None;
    guard.last_updated = Utc::now();
}

pub(crate) async fn run(
    factory: Arc<dyn SessionFactory>,
    request: StreamRequest,
    status: Arc<Mutex<EngineStatus>>,
    stop: Arc<AtomicBool>,
) {
    let mut session = match factory.open(&request).await {
        Ok(session) => session,
        Err(err) => {
            let err = EngineError::resource_unavailable(err);
            warn!(job_id = %request.id, error = %err, "failed to open backend session");
            publish_fault(&status, err.fault());
            return;
        }
    };

    if let Err(err) = admit(session.as_mut(), &request).await {
        let err = EngineError::resolution_failed(err);
        warn!(job_id = %request.id, error = %err, "backend rejected job");
        publish_fault(&status, err.fault());
        release(session.as_mut(), &request).await;
        return;
    }

    let mut tracker = StreamTracker::new(&request);
    'poll: while !stop.load(Ordering::Acquire) {
        let events = match session.poll_events().await {
            Ok(events) => events,
            Err(err) => {
                let err = EngineError::resolution_failed(err);
                warn!(job_id = %request.id, error = %err, "backend poll failed");
                publish_fault(&status, err.fault());
                break 'poll;
            }
        };

        for event in events {
            match tracker.apply(event, session.as_mut(), &status).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Faulted) => break 'poll,
                Err(err) => {
                    let err = EngineError::resolution_failed(err);
                    warn!(job_id = %request.id, error = %err, "failed to apply session event");
                    publish_fault(&status, err.fault());
                    break 'poll;
                }
            }
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }

    release(session.as_mut(), &request).await;
    debug!(job_id = %request.id, "download worker exited");
}

async fn admit(session: &mut dyn SessionBackend, request: &StreamRequest) -> anyhow::Result<()> {
    session.add_job(request).await?;
    session.set_sequential(true).await?;
    Ok(())
}

async fn release(session: &mut dyn SessionBackend, request: &StreamRequest) {
    if let Err(err) = session.remove_job().await {
        warn!(job_id = %request.id, error = %err, "failed to remove job from backend");
    }
}

/// Per-job progression kept outside the status lock: which file was
/// chosen and whether the readiness latch already fired.
struct StreamTracker<'a> {
    request: &'a StreamRequest,
    selected: bool,
    ready: bool,
}

impl<'a> StreamTracker<'a> {
    const fn new(request: &'a StreamRequest) -> Self {
        Self {
            request,
            selected: false,
            ready: false,
        }
    }

    async fn apply(
        &mut self,
        event: SessionEvent,
        session: &mut dyn SessionBackend,
        status: &Mutex<EngineStatus>,
    ) -> anyhow::Result<Flow> {
        match event {
            SessionEvent::MetadataResolved { files } => {
                if self.selected {
                    return Ok(Flow::Continue);
                }
                let Some((index, file)) = files
                    .iter()
                    .enumerate()
                    .max_by_key(|(_, file)| file.size_bytes)
                else {
                    // Empty listing: keep waiting in Preparing.
                    return Ok(Flow::Continue);
                };
                session.focus_file(index).await?;
                let path = self.request.save_dir.join(&file.path);
                {
                    let mut guard = lock_status(status);
                    guard.video_path = Some(path.to_string_lossy().into_owned());
                    if guard.state == DownloadState::Preparing {
                        guard.state = DownloadState::Downloading;
                    }
                    guard.last_updated = Utc::now();
                }
                self.selected = true;
                info!(
                    job_id = %self.request.id,
                    target = %file.path,
                    size_bytes = file.size_bytes,
                    "selected stream target"
                );
                Ok(Flow::Continue)
            }
            SessionEvent::Stats(stats) => {
                let mut latched = false;
                {
                    let mut guard = lock_status(status);
                    guard.progress = stats.percent();
                    guard.speed_bps = stats.download_bps;
                    guard.seeds = stats.seeds;
                    guard.peers = stats.peers;
                    if self.selected
                        && !self.ready
                        && guard.state == DownloadState::Downloading
                        && guard.progress >= READY_THRESHOLD_PERCENT
                    {
                        guard.state = DownloadState::Ready;
                        self.ready = true;
                        latched = true;
                    }
                    guard.last_updated = Utc::now();
                }
                if latched {
                    info!(
                        job_id = %self.request.id,
                        "buffer threshold reached; stream is playable"
                    );
                }
                Ok(Flow::Continue)
            }
            SessionEvent::Faulted { message } => {
                warn!(job_id = %self.request.id, message = %message, "backend session fault");
                publish_fault(status, EngineFault::ResolutionFailed);
                Ok(Flow::Faulted)
            }
        }
    }
}
