//! Scripted session backends and speech models.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::bail;
use async_trait::async_trait;
use streambox_subtitle::SpeechModel;
use streambox_torrent_core::{
    SessionBackend, SessionEvent, SessionFactory, StreamRequest,
};
use uuid::Uuid;

fn lock<T>(cell: &Mutex<T>) -> MutexGuard<'_, T> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything a scripted session observed, for assertions.
#[derive(Debug, Default, Clone)]
pub struct SessionLog {
    /// Job ids admitted via `add_job`.
    pub jobs: Vec<Uuid>,
    /// File indices passed to `focus_file`.
    pub focused: Vec<usize>,
    /// Values passed to `set_sequential`.
    pub sequential: Vec<bool>,
    /// Number of `remove_job` calls.
    pub removed: u32,
}

/// Factory producing sessions that replay a fixed event script.
///
/// Each `poll_events` call pops one batch from the script; once the
/// script is exhausted the session reports no events until stopped.
pub struct ScriptedSessionFactory {
    script: Vec<Vec<SessionEvent>>,
    fail_open: bool,
    fail_add: bool,
    log: Arc<Mutex<SessionLog>>,
}

impl ScriptedSessionFactory {
    /// Factory replaying the given poll batches.
    #[must_use]
    pub fn new(script: Vec<Vec<SessionEvent>>) -> Self {
        Self {
            script,
            fail_open: false,
            fail_add: false,
            log: Arc::new(Mutex::new(SessionLog::default())),
        }
    }

    /// Make `open` fail.
    #[must_use]
    pub fn with_fail_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Make `add_job` fail.
    #[must_use]
    pub fn with_fail_add(mut self) -> Self {
        self.fail_add = true;
        self
    }

    /// Snapshot of everything sessions from this factory observed.
    #[must_use]
    pub fn log(&self) -> SessionLog {
        lock(&self.log).clone()
    }
}

#[async_trait]
impl SessionFactory for ScriptedSessionFactory {
    async fn open(&self, _request: &StreamRequest) -> anyhow::Result<Box<dyn SessionBackend>> {
        if self.fail_open {
            bail!("scripted open failure");
        }
        Ok(Box::new(ScriptedSession {
            script: self.script.clone().into(),
            fail_add: self.fail_add,
            log: Arc::clone(&self.log),
        }))
    }
}

struct ScriptedSession {
    script: VecDeque<Vec<SessionEvent>>,
    fail_add: bool,
    log: Arc<Mutex<SessionLog>>,
}

#[async_trait]
impl SessionBackend for ScriptedSession {
    async fn add_job(&mut self, request: &StreamRequest) -> anyhow::Result<()> {
        if self.fail_add {
            bail!("scripted add failure");
        }
        lock(&self.log).jobs.push(request.id);
        Ok(())
    }

    async fn set_sequential(&mut self, sequential: bool) -> anyhow::Result<()> {
        lock(&self.log).sequential.push(sequential);
        Ok(())
    }

    async fn focus_file(&mut self, index: usize) -> anyhow::Result<()> {
        lock(&self.log).focused.push(index);
        Ok(())
    }

    async fn remove_job(&mut self) -> anyhow::Result<()> {
        lock(&self.log).removed += 1;
        Ok(())
    }

    async fn poll_events(&mut self) -> anyhow::Result<Vec<SessionEvent>> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

/// Handle for asserting what a [`ScriptedModel`] was asked to do.
#[derive(Debug, Clone)]
pub struct ModelWitness {
    windows: Arc<Mutex<Vec<usize>>>,
}

impl ModelWitness {
    /// Sample counts of every window passed to `transcribe`, in order.
    #[must_use]
    pub fn window_lengths(&self) -> Vec<usize> {
        lock(&self.windows).clone()
    }
}

/// Speech model replaying canned transcripts.
///
/// Pops one line per `transcribe` call; once exhausted it keeps
/// returning the last line, mirroring a model that has settled.
pub struct ScriptedModel {
    lines: VecDeque<String>,
    last: String,
    windows: Arc<Mutex<Vec<usize>>>,
}

impl ScriptedModel {
    /// Model replaying the given transcripts.
    #[must_use]
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            last: String::new(),
            windows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Witness for asserting observed windows after the fact.
    #[must_use]
    pub fn witness(&self) -> ModelWitness {
        ModelWitness {
            windows: Arc::clone(&self.windows),
        }
    }
}

impl SpeechModel for ScriptedModel {
    fn transcribe(&mut self, audio: &[f32]) -> anyhow::Result<String> {
        lock(&self.windows).push(audio.len());
        if let Some(line) = self.lines.pop_front() {
            self.last = line;
        }
        Ok(self.last.clone())
    }
}

/// Speech model whose every inference fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingModel;

impl SpeechModel for FailingModel {
    fn transcribe(&mut self, _audio: &[f32]) -> anyhow::Result<String> {
        bail!("scripted inference failure")
    }
}
