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

//! Engine-agnostic torrent session interfaces and status DTOs.
//!
//! The download engine never talks to a concrete BitTorrent
//! implementation directly; it drives a [`SessionBackend`] obtained from
//! a [`SessionFactory`] and flattens the events it polls into the status
//! snapshot the host reads.

/// Error taxonomy for engine operations.
pub mod error;
/// Status snapshot and job descriptor DTOs.
pub mod model;
/// Backend seam abstracting the underlying download engine.
pub mod session;

pub use error::{EngineError, EngineResult};
pub use model::{
    DownloadState, EngineFault, EngineStatus, RemoteFile, SessionStats, StreamRequest,
};
pub use session::{SessionBackend, SessionEvent, SessionFactory};
