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

//! Shared fixtures and scripted doubles for workspace tests.

/// Deterministic audio and torrent fixtures.
pub mod fixtures;
/// Scripted session backends and speech models.
pub mod mocks;

pub use fixtures::{SAMPLE_MAGNET, media_listing, silence, tone};
pub use mocks::{
    FailingModel, ModelWitness, ScriptedModel, ScriptedSessionFactory, SessionLog,
};
