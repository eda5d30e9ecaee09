#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Live speech-to-text engine for subtitle overlays.
//!
//! The host feeds 16 kHz mono `f32` PCM into a bounded sliding window;
//! a dedicated inference thread transcribes the whole window on a
//! fixed cadence and replaces the published transcript wholesale. The
//! window is never drained by inference, so successive transcripts
//! refine earlier text as more context arrives.

/// Bounded sliding window over recent PCM audio.
pub mod buffer;
/// Lifecycle facade owning the inference thread.
pub mod engine;
/// Engine error type.
pub mod error;
/// Model seam decoupling the engine from any inference runtime.
pub mod speech;
#[cfg(feature = "whisper")]
/// Whisper-backed speech model.
pub mod whisper;
mod worker;

pub use buffer::{AudioWindow, MAX_WINDOW_SAMPLES, MIN_WINDOW_SAMPLES, SAMPLE_RATE_HZ};
pub use engine::{INFERENCE_INTERVAL, SubtitleEngine};
pub use error::SubtitleError;
pub use speech::SpeechModel;
