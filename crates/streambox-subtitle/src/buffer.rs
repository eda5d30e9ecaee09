//! Bounded sliding window over recent PCM audio.

/// Expected sample rate of all pushed audio, in hertz.
pub const SAMPLE_RATE_HZ: usize = 16_000;

/// Window capacity: thirty seconds of audio. Older samples are evicted
/// from the front when new audio would exceed this.
pub const MAX_WINDOW_SAMPLES: usize = 30 * SAMPLE_RATE_HZ;

/// Minimum window before inference is worthwhile: three seconds.
/// Shorter windows produce unstable partial transcripts.
pub const MIN_WINDOW_SAMPLES: usize = 3 * SAMPLE_RATE_HZ;

/// Sliding window of mono `f32` samples.
///
/// Inference reads a snapshot; nothing ever drains the window except
/// capacity eviction and [`AudioWindow::clear`].
#[derive(Debug, Default)]
pub struct AudioWindow {
    samples: Vec<f32>,
}

impl AudioWindow {
    /// Empty window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    /// Append PCM, evicting the oldest samples past capacity.
    pub fn push(&mut self, pcm: &[f32]) {
        self.samples.extend_from_slice(pcm);
        if self.samples.len() > MAX_WINDOW_SAMPLES {
            let excess = self.samples.len() - MAX_WINDOW_SAMPLES;
            self.samples.drain(..excess);
        }
    }

    /// Copy of the current window, or `None` below the inference
    /// minimum.
    #[must_use]
    pub fn snapshot(&self) -> Option<Vec<f32>> {
        (self.samples.len() >= MIN_WINDOW_SAMPLES).then(|| self.samples.clone())
    }

    /// Number of buffered samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop all buffered samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
