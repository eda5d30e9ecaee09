//! Model seam decoupling the engine from any inference runtime.

/// A speech-to-text model invoked by the inference thread.
///
/// `transcribe` receives the full current audio window and returns the
/// complete transcript for it; the engine replaces its published text
/// wholesale with the result.
pub trait SpeechModel: Send {
    /// Transcribe 16 kHz mono `f32` PCM.
    ///
    /// # Errors
    ///
    /// Returns any inference failure; the engine logs it and keeps the
    /// previous transcript.
    fn transcribe(&mut self, audio: &[f32]) -> anyhow::Result<String>;
}
