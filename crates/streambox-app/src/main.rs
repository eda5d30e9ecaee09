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

//! Binary entrypoint standing in for the host media player: streams a
//! magnet to disk and reports progress until playback-complete.

use streambox_app::{AppResult, run_app};

/// Bootstraps the streaming demo and blocks until the job finishes.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app().await
}
