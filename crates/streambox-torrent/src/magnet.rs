//! Magnet URI validation and tracker augmentation.

use streambox_torrent_core::{EngineError, EngineResult};

/// Public trackers appended to magnets that carry none of their own.
/// Bare magnets (info-hash only) otherwise depend entirely on DHT
/// bootstrap and resolve slowly on cold sessions.
pub const DEFAULT_TRACKERS: &[&str] = &[
    "udp://tracker.opentrackr.org:1337/announce",
    "udp://tracker.openbittorrent.com:80/announce",
    "udp://opentracker.i2p.rocks:6969/announce",
    "http://tracker.openbittorrent.com:80/announce",
    "udp://open.demonii.com:1337/announce",
];

/// Syntactic magnet check performed before any worker is spawned.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] when the URI is not a magnet
/// or lacks a BitTorrent info-hash topic.
pub fn validate(uri: &str) -> EngineResult<()> {
    let trimmed = uri.trim();
    if !trimmed.starts_with("magnet:") {
        return Err(EngineError::invalid_input("uri is not a magnet link"));
    }
    if !trimmed.contains("xt=urn:btih:") {
        return Err(EngineError::invalid_input("magnet has no btih topic"));
    }
    Ok(())
}

/// Append [`DEFAULT_TRACKERS`] to a magnet that names no tracker.
/// Magnets that already carry a `tr=` parameter pass through untouched.
#[must_use]
pub fn with_default_trackers(uri: &str) -> String {
    let trimmed = uri.trim();
    if trimmed.contains("tr=") {
        return trimmed.to_string();
    }
    let mut augmented = String::from(trimmed);
    for tracker in DEFAULT_TRACKERS {
        augmented.push_str("&tr=");
        augmented.push_str(tracker);
    }
    augmented
}

#[cfg(test)]
mod tests {
    use super::*;
    use streambox_torrent_core::EngineFault;

    const BARE_MAGNET: &str = "magnet:?xt=urn:btih:c12fe1c06bde254a46ab2b2b228dd669bcd0b3dc";

    #[test]
    fn accepts_btih_magnets() {
        assert!(validate(BARE_MAGNET).is_ok());
    }

    #[test]
    fn rejects_non_magnet_uris() {
        let err = validate("https://example.com/movie.torrent").unwrap_err();
        assert_eq!(err.fault(), EngineFault::InvalidInput);
    }

    #[test]
    fn rejects_magnets_without_topic() {
        let err = validate("magnet:?dn=just-a-name").unwrap_err();
        assert_eq!(err.fault(), EngineFault::InvalidInput);
    }

    #[test]
    fn appends_trackers_to_bare_magnets() {
        let augmented = with_default_trackers(BARE_MAGNET);
        assert!(augmented.starts_with(BARE_MAGNET));
        for tracker in DEFAULT_TRACKERS {
            assert!(augmented.contains(tracker));
        }
    }

    #[test]
    fn keeps_existing_trackers_untouched() {
        let magnet = format!("{BARE_MAGNET}&tr=udp://tracker.example:80/announce");
        assert_eq!(with_default_trackers(&magnet), magnet);
    }
}
