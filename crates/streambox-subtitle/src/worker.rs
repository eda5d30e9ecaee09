//! Inference thread body.

use std::sync::atomic::Ordering;

use tracing::{debug, warn};

use crate::engine::{INFERENCE_INTERVAL, Shared, lock};
use crate::speech::SpeechModel;

pub(crate) fn run(mut model: Box<dyn SpeechModel>, shared: &Shared) {
    while !shared.stop.load(Ordering::Acquire) {
        let snapshot = lock(&shared.window).snapshot();
        if let Some(audio) = snapshot {
            match model.transcribe(&audio) {
                Ok(text) => {
                    *lock(&shared.transcript) = text;
                }
                Err(err) => {
                    // Keep the previous transcript; the next pass gets
                    // a longer window anyway.
                    warn!(error = %err, "inference pass failed");
                }
            }
        }
        std::thread::sleep(INFERENCE_INTERVAL);
    }
    debug!("subtitle inference thread exited");
}
