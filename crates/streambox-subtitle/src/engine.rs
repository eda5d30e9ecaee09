//! Lifecycle facade owning the inference thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{info, warn};

use crate::buffer::AudioWindow;
use crate::error::SubtitleError;
use crate::speech::SpeechModel;
use crate::worker;

/// Cadence of the inference loop.
pub const INFERENCE_INTERVAL: Duration = Duration::from_millis(200);

/// Live transcription engine.
///
/// Constructed idle; [`init`] loads a model and starts the inference
/// thread, and is restart-safe: calling it again tears down the old
/// thread first. Audio pushed while the engine is stopped is dropped.
///
/// [`init`]: SubtitleEngine::init
pub struct SubtitleEngine {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

pub(crate) struct Shared {
    pub(crate) window: Mutex<AudioWindow>,
    pub(crate) transcript: Mutex<String>,
    pub(crate) stop: AtomicBool,
    pub(crate) running: AtomicBool,
}

pub(crate) fn lock<'a, T>(cell: &'a Mutex<T>) -> MutexGuard<'a, T> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SubtitleEngine {
    /// Idle engine with no model loaded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                window: Mutex::new(AudioWindow::new()),
                transcript: Mutex::new(String::new()),
                stop: AtomicBool::new(false),
                running: AtomicBool::new(false),
            }),
            worker: Mutex::new(None),
        }
    }

    /// Load a model and start transcribing.
    ///
    /// Any previous inference thread is stopped and joined first, and
    /// the window and transcript start empty.
    ///
    /// # Errors
    ///
    /// Returns [`SubtitleError::ModelUnavailable`] when the loader
    /// fails; the engine stays stopped.
    pub fn init(
        &self,
        loader: impl FnOnce() -> anyhow::Result<Box<dyn SpeechModel>>,
    ) -> Result<(), SubtitleError> {
        self.stop();
        let model = loader().map_err(SubtitleError::model_unavailable)?;

        lock(&self.shared.window).clear();
        lock(&self.shared.transcript).clear();
        self.shared.stop.store(false, Ordering::Release);

        let shared = Arc::clone(&self.shared);
        let handle = std::thread::Builder::new()
            .name("subtitle-inference".to_string())
            .spawn(move || worker::run(model, &shared))
            .map_err(|err| SubtitleError::model_unavailable(err.into()))?;
        // Only flip `running` once the thread exists; a failed spawn
        // must leave the engine inert.
        self.shared.running.store(true, Ordering::Release);
        *lock(&self.worker) = Some(handle);
        info!("subtitle engine started");
        Ok(())
    }

    /// Feed 16 kHz mono `f32` PCM. Dropped unless the engine is
    /// running.
    pub fn push_audio(&self, pcm: &[f32]) {
        if !self.shared.running.load(Ordering::Acquire) {
            return;
        }
        lock(&self.shared.window).push(pcm);
    }

    /// Latest full transcript; empty until the first inference lands.
    #[must_use]
    pub fn subtitle(&self) -> String {
        lock(&self.shared.transcript).clone()
    }

    /// Whether the inference thread is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Stop the inference thread, join it, and clear the window and
    /// transcript. Safe to call when already stopped.
    pub fn stop(&self) {
        let handle = lock(&self.worker).take();
        let Some(handle) = handle else {
            return;
        };
        self.shared.stop.store(true, Ordering::Release);
        self.shared.running.store(false, Ordering::Release);
        if handle.join().is_err() {
            warn!("subtitle inference thread panicked");
        }
        lock(&self.shared.window).clear();
        lock(&self.shared.transcript).clear();
        info!("subtitle engine stopped");
    }
}

impl Default for SubtitleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SubtitleEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
