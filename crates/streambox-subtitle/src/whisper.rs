//! Whisper-backed speech model.

use std::path::Path;

use anyhow::Context;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, WhisperState};

use crate::speech::SpeechModel;

/// [`SpeechModel`] backed by a whisper GGML model file.
pub struct WhisperModel {
    state: WhisperState,
}

impl WhisperModel {
    /// Load a GGML model from disk and prepare an inference state.
    ///
    /// # Errors
    ///
    /// Returns an error when the model file cannot be loaded or the
    /// inference state cannot be created.
    pub fn load(model_path: &Path) -> anyhow::Result<Self> {
        let context = WhisperContext::new_with_params(
            &model_path.to_string_lossy(),
            WhisperContextParameters::default(),
        )
        .context("failed to load whisper model")?;
        let state = context
            .create_state()
            .context("failed to create whisper state")?;
        Ok(Self { state })
    }
}

impl SpeechModel for WhisperModel {
    fn transcribe(&mut self, audio: &[f32]) -> anyhow::Result<String> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_special(false);
        params.set_print_timestamps(false);
        params.set_no_context(true);
        params.set_language(Some("auto"));

        self.state
            .full(params, audio)
            .context("whisper inference failed")?;

        let segments = self
            .state
            .full_n_segments()
            .context("failed to count whisper segments")?;
        let mut transcript = String::new();
        for segment in 0..segments {
            let text = self
                .state
                .full_get_segment_text_lossy(segment)
                .context("failed to read whisper segment")?;
            transcript.push_str(&text);
        }
        Ok(transcript.trim().to_string())
    }
}
