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

//! Streambox demo application wiring.
//!
//! Layout: `bootstrap.rs` (argument parsing and the progress loop),
//! `error.rs` (application error type).

/// Application bootstrap and progress loop.
pub mod bootstrap;
/// Application error type.
pub mod error;

pub use bootstrap::{Invocation, run_app};
pub use error::{AppError, AppResult};
