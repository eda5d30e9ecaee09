//! Deterministic audio and torrent fixtures.

use streambox_torrent_core::RemoteFile;

/// Well-formed magnet link with a valid btih topic and no trackers.
pub const SAMPLE_MAGNET: &str =
    "magnet:?xt=urn:btih:c12fe1c06bde254a46ab2b2b228dd669bcd0b3dc&dn=fixture";

/// Mono silence at the engine sample rate.
#[must_use]
pub fn silence(samples: usize) -> Vec<f32> {
    vec![0.0; samples]
}

/// 440 Hz sine at the engine sample rate, low amplitude.
#[must_use]
pub fn tone(samples: usize) -> Vec<f32> {
    let step = 2.0 * std::f32::consts::PI * 440.0 / 16_000.0;
    (0..samples).map(|i| (i as f32 * step).sin() * 0.3).collect()
}

/// Three-file listing whose largest entry is the media payload.
#[must_use]
pub fn media_listing() -> Vec<RemoteFile> {
    vec![
        RemoteFile {
            path: "release.nfo".to_string(),
            size_bytes: 4_096,
        },
        RemoteFile {
            path: "feature/feature.mkv".to_string(),
            size_bytes: 1_400_000_000,
        },
        RemoteFile {
            path: "sample/sample.mkv".to_string(),
            size_bytes: 30_000_000,
        },
    ]
}
