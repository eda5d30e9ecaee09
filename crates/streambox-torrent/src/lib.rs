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

//! Progressive streaming download engine.
//!
//! One background worker per job drives a [`SessionBackend`] from
//! `streambox-torrent-core`: it resolves magnet metadata, picks the
//! largest file as the stream target, forces sequential piece order,
//! and publishes a copy-out status snapshot the host polls. The engine
//! guarantees at most one live worker and joins it on `stop`.
//!
//! [`SessionBackend`]: streambox_torrent_core::SessionBackend

/// Lifecycle facade owning the worker and status snapshot.
pub mod engine;
/// Magnet URI validation and tracker augmentation.
pub mod magnet;
#[cfg(feature = "rqbit")]
/// Real BitTorrent backend built on `librqbit`.
pub mod rqbit;
/// Deterministic simulation backend for demos and smoke tests.
pub mod sim;
mod worker;

pub use engine::DownloadEngine;
#[cfg(feature = "rqbit")]
pub use rqbit::RqbitSessionFactory;
pub use sim::SimSessionFactory;
pub use worker::{POLL_INTERVAL, READY_THRESHOLD_PERCENT};
