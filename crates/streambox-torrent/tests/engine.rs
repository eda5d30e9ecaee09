//! End-to-end engine tests against scripted and simulated backends.

use std::sync::Arc;
use std::time::Duration;

use streambox_test_support::{SAMPLE_MAGNET, ScriptedSessionFactory, media_listing};
use streambox_torrent::{DownloadEngine, READY_THRESHOLD_PERCENT, SimSessionFactory};
use streambox_torrent_core::{
    DownloadState, EngineFault, EngineStatus, SessionEvent, SessionStats,
};

const SAVE_DIR: &str = "/tmp/streambox-it";

fn stats(percent: u64) -> SessionEvent {
    SessionEvent::Stats(SessionStats {
        bytes_downloaded: percent * 10,
        bytes_total: 1_000,
        download_bps: 500_000,
        seeds: 4,
        peers: 9,
    })
}

async fn wait_for(
    engine: &DownloadEngine,
    pred: impl Fn(&EngineStatus) -> bool,
) -> EngineStatus {
    for _ in 0..300 {
        let status = engine.status();
        if pred(&status) {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("condition never reached; last status: {:?}", engine.status());
}

#[tokio::test(start_paused = true)]
async fn invalid_magnet_faults_without_spawning_a_worker() {
    let factory = Arc::new(ScriptedSessionFactory::new(vec![]));
    let engine = DownloadEngine::new(factory.clone());

    engine.start("https://example.com/movie.torrent", SAVE_DIR).await;

    let status = engine.status();
    assert_eq!(status.state, DownloadState::Error);
    assert_eq!(status.last_error, Some(EngineFault::InvalidInput));
    assert!(factory.log().jobs.is_empty());
}

#[tokio::test(start_paused = true)]
async fn streams_largest_file_sequentially_until_ready() {
    let factory = Arc::new(ScriptedSessionFactory::new(vec![
        vec![SessionEvent::MetadataResolved {
            files: media_listing(),
        }],
        vec![stats(2)],
        vec![stats(6)],
    ]));
    let engine = DownloadEngine::new(factory.clone());

    engine.start(SAMPLE_MAGNET, SAVE_DIR).await;
    let status = wait_for(&engine, |s| s.state == DownloadState::Ready).await;

    assert!(status.progress >= READY_THRESHOLD_PERCENT);
    assert_eq!(status.seeds, 4);
    assert_eq!(status.peers, 9);
    let path = status.video_path.as_deref().unwrap();
    assert!(path.starts_with(SAVE_DIR));
    assert!(path.ends_with("feature.mkv"));

    let log = factory.log();
    assert_eq!(log.jobs.len(), 1);
    assert_eq!(log.focused, vec![1], "largest file must be focused");
    assert_eq!(log.sequential, vec![true]);
}

#[tokio::test(start_paused = true)]
async fn stays_downloading_below_ready_threshold() {
    let factory = Arc::new(ScriptedSessionFactory::new(vec![
        vec![SessionEvent::MetadataResolved {
            files: media_listing(),
        }],
        vec![stats(2)],
    ]));
    let engine = DownloadEngine::new(factory);

    engine.start(SAMPLE_MAGNET, SAVE_DIR).await;
    let status = wait_for(&engine, |s| s.progress == 2).await;

    assert_eq!(status.state, DownloadState::Downloading);
}

#[tokio::test(start_paused = true)]
async fn ready_never_reverts_to_downloading() {
    let factory = Arc::new(ScriptedSessionFactory::new(vec![
        vec![SessionEvent::MetadataResolved {
            files: media_listing(),
        }],
        vec![stats(6)],
        vec![stats(2)],
    ]));
    let engine = DownloadEngine::new(factory);

    engine.start(SAMPLE_MAGNET, SAVE_DIR).await;
    wait_for(&engine, |s| s.state == DownloadState::Ready).await;
    let status = wait_for(&engine, |s| s.progress == 2).await;

    assert_eq!(status.state, DownloadState::Ready, "ready latch is one-way");
    assert!(status.video_path.is_some());
}

#[tokio::test(start_paused = true)]
async fn backend_fault_publishes_error_and_releases_job() {
    let factory = Arc::new(ScriptedSessionFactory::new(vec![
        vec![SessionEvent::MetadataResolved {
            files: media_listing(),
        }],
        vec![SessionEvent::Faulted {
            message: "tracker timeout".to_string(),
        }],
    ]));
    let engine = DownloadEngine::new(factory.clone());

    engine.start(SAMPLE_MAGNET, SAVE_DIR).await;
    let status = wait_for(&engine, |s| s.state == DownloadState::Error).await;

    assert_eq!(status.last_error, Some(EngineFault::ResolutionFailed));
    assert!(status.video_path.is_none());
    assert_eq!(factory.log().removed, 1);
}

#[tokio::test(start_paused = true)]
async fn open_failure_reports_resource_unavailable() {
    let factory = Arc::new(ScriptedSessionFactory::new(vec![]).with_fail_open());
    let engine = DownloadEngine::new(factory);

    engine.start(SAMPLE_MAGNET, SAVE_DIR).await;
    let status = wait_for(&engine, |s| s.state == DownloadState::Error).await;

    assert_eq!(status.last_error, Some(EngineFault::ResourceUnavailable));
}

#[tokio::test(start_paused = true)]
async fn rejected_add_reports_resolution_failure() {
    let factory = Arc::new(ScriptedSessionFactory::new(vec![]).with_fail_add());
    let engine = DownloadEngine::new(factory.clone());

    engine.start(SAMPLE_MAGNET, SAVE_DIR).await;
    let status = wait_for(&engine, |s| s.state == DownloadState::Error).await;

    assert_eq!(status.last_error, Some(EngineFault::ResolutionFailed));
    let log = factory.log();
    assert!(log.jobs.is_empty());
    assert_eq!(log.removed, 1, "backend must still be released");
}

#[tokio::test(start_paused = true)]
async fn stop_joins_the_worker_and_resets_to_idle() {
    let dir = tempfile::tempdir().unwrap();
    let engine = DownloadEngine::new(Arc::new(SimSessionFactory::default()));

    engine.start(SAMPLE_MAGNET, dir.path()).await;
    wait_for(&engine, |s| s.state == DownloadState::Ready).await;
    assert!(engine.file_path().is_some());

    engine.stop().await;
    let status = engine.status();
    assert_eq!(status.state, DownloadState::Idle);
    assert_eq!(status.progress, 0);
    assert!(status.video_path.is_none());
    assert!(engine.file_path().is_none());
}

#[tokio::test(start_paused = true)]
async fn restart_replaces_the_previous_job() {
    let factory = Arc::new(ScriptedSessionFactory::new(vec![
        vec![SessionEvent::MetadataResolved {
            files: media_listing(),
        }],
        vec![stats(6)],
    ]));
    let engine = DownloadEngine::new(factory.clone());

    engine.start(SAMPLE_MAGNET, SAVE_DIR).await;
    wait_for(&engine, |s| s.state == DownloadState::Ready).await;

    engine.start(SAMPLE_MAGNET, SAVE_DIR).await;
    wait_for(&engine, |s| s.state == DownloadState::Ready).await;
    engine.stop().await;

    let log = factory.log();
    assert_eq!(log.jobs.len(), 2);
    assert_eq!(log.removed, 2);
}

#[tokio::test(start_paused = true)]
async fn stop_clears_a_latched_invalid_magnet_error() {
    let factory = Arc::new(ScriptedSessionFactory::new(vec![]));
    let engine = DownloadEngine::new(factory);

    engine.start("not-a-magnet", SAVE_DIR).await;
    assert_eq!(engine.status().state, DownloadState::Error);

    engine.stop().await;
    let status = engine.status();
    assert_eq!(status.state, DownloadState::Idle);
    assert!(status.last_error.is_none());
}

#[tokio::test(start_paused = true)]
async fn stop_without_a_job_is_a_no_op() {
    let engine = DownloadEngine::new(Arc::new(SimSessionFactory::default()));
    engine.stop().await;
    assert_eq!(engine.status().state, DownloadState::Idle);
}
