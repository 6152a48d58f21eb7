//! The engine coordinator: lifecycle, event handling, and flushes.
//!
//! [`SearchEngine`] ties the pieces together for a host. It owns the index,
//! the debounced reindex queue, and the initial-build state machine
//! `Uninitialized → Initializing → Ready` (no way back short of a process
//! restart). The host drives it cooperatively: one event, build step, tick,
//! or query at a time, each call bounded in the work it does.
//!
//! Per-note failures never escape an operation. An unreadable note is
//! logged and left out of the index until the next notification touches
//! it; only systemic failures (enumeration, index invariants) surface as
//! errors.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Receiver;
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::{NotReadyBehavior, SearchConfig};
use crate::error::{MagpieError, Result};
use crate::index::{IndexEngine, IndexStats};
use crate::reindex::ReindexQueue;
use crate::search::{SearchHit, SearchScope, Searcher};
use crate::vault::{NoteSource, SourceError, VaultEvent, VaultSignal};

/// Lifecycle state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexState {
    /// No build started; events are ignored and queries fail.
    Uninitialized,

    /// Initial build in progress; events apply, queries depend on config.
    Initializing,

    /// Fully built; all operations live.
    Ready,
}

impl IndexState {
    fn as_str(self) -> &'static str {
        match self {
            IndexState::Uninitialized => "uninitialized",
            IndexState::Initializing => "initializing",
            IndexState::Ready => "ready",
        }
    }
}

impl std::fmt::Display for IndexState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of the initial build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildProgress {
    /// Notes indexed so far.
    pub indexed: usize,

    /// Notes skipped (unreadable or vanished during the build).
    pub skipped: usize,

    /// Notes still queued.
    pub remaining: usize,

    /// State after this step.
    pub state: IndexState,
}

/// Outcome of flushing pending reindex entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Entries reindexed successfully.
    pub reindexed: usize,

    /// Entries that failed transiently and stay pending.
    pub failed: usize,

    /// Entries dropped because the note no longer exists.
    pub dropped: usize,
}

impl FlushReport {
    fn merge(&mut self, other: FlushReport) {
        self.reindexed += other.reindexed;
        self.failed += other.failed;
        self.dropped += other.dropped;
    }
}

/// Summary of one pass over the host signal channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpSummary {
    /// Signals processed.
    pub signals: usize,

    /// Combined flush outcome of any focus-lost signals.
    pub flush: FlushReport,
}

#[derive(Debug)]
struct Lifecycle {
    state: IndexState,
    build_queue: VecDeque<String>,
    indexed: usize,
    skipped: usize,
}

impl Lifecycle {
    fn progress(&self) -> BuildProgress {
        BuildProgress {
            indexed: self.indexed,
            skipped: self.skipped,
            remaining: self.build_queue.len(),
            state: self.state,
        }
    }
}

/// Coordinates the index, the reindex queue, and the note source.
pub struct SearchEngine {
    source: Arc<dyn NoteSource>,
    index: IndexEngine,
    queue: ReindexQueue,
    lifecycle: Mutex<Lifecycle>,
}

impl SearchEngine {
    /// Create an engine over a note source. No build is started yet.
    pub fn new(source: Arc<dyn NoteSource>) -> Self {
        SearchEngine {
            source,
            index: IndexEngine::new(),
            queue: ReindexQueue::new(),
            lifecycle: Mutex::new(Lifecycle {
                state: IndexState::Uninitialized,
                build_queue: VecDeque::new(),
                indexed: 0,
                skipped: 0,
            }),
        }
    }

    /// Current lifecycle state.
    pub fn readiness(&self) -> IndexState {
        self.lifecycle.lock().state
    }

    /// Aggregate index statistics.
    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    /// Number of modifications waiting in the reindex queue.
    pub fn pending_reindex(&self) -> usize {
        self.queue.len()
    }

    /// Snapshot the vault enumeration and enter `Initializing`.
    ///
    /// Only paths with an indexable extension are queued. Calling again
    /// after a build has started is a no-op returning the remaining count.
    ///
    /// # Errors
    ///
    /// Fails only if the source cannot enumerate the vault at all.
    pub fn start_build(&self, config: &SearchConfig) -> Result<usize> {
        let mut lifecycle = self.lifecycle.lock();
        if lifecycle.state != IndexState::Uninitialized {
            debug!("build already started, {} notes remaining", lifecycle.build_queue.len());
            return Ok(lifecycle.build_queue.len());
        }

        let paths = self
            .source
            .list_notes()
            .map_err(|err| MagpieError::index(format!("vault enumeration failed: {err}")))?;
        let queued: VecDeque<String> = paths
            .into_iter()
            .filter(|path| config.is_indexable(path))
            .collect();

        info!("initial build started over {} notes", queued.len());
        lifecycle.build_queue = queued;
        lifecycle.state = if lifecycle.build_queue.is_empty() {
            info!("initial build complete, index ready");
            IndexState::Ready
        } else {
            IndexState::Initializing
        };
        Ok(lifecycle.build_queue.len())
    }

    /// Index up to `config.build_chunk_size` queued notes.
    ///
    /// Unreadable or vanished notes are logged and skipped; they do not
    /// abort the build. Transitions to `Ready` when the queue empties.
    pub fn build_step(&self, config: &SearchConfig) -> Result<BuildProgress> {
        let mut lifecycle = self.lifecycle.lock();
        match lifecycle.state {
            IndexState::Uninitialized => {
                return Err(MagpieError::index("build_step called before start_build"));
            }
            IndexState::Ready => return Ok(lifecycle.progress()),
            IndexState::Initializing => {}
        }

        let chunk = config.build_chunk_size.max(1);
        for _ in 0..chunk {
            let Some(path) = lifecycle.build_queue.pop_front() else {
                break;
            };
            match self.read_and_index(&path, config) {
                DocOutcome::Indexed => lifecycle.indexed += 1,
                DocOutcome::Missing | DocOutcome::Unreadable => lifecycle.skipped += 1,
            }
        }

        if lifecycle.build_queue.is_empty() {
            lifecycle.state = IndexState::Ready;
            info!(
                "initial build complete: {} indexed, {} skipped",
                lifecycle.indexed, lifecycle.skipped
            );
        }
        Ok(lifecycle.progress())
    }

    /// Drive the initial build to completion.
    pub fn build_until_ready(&self, config: &SearchConfig) -> Result<BuildProgress> {
        loop {
            let progress = self.build_step(config)?;
            if progress.state == IndexState::Ready {
                return Ok(progress);
            }
        }
    }

    /// Apply one vault change notification.
    ///
    /// `now` anchors debounce timestamps. Events arriving before
    /// `start_build` are ignored; during `Initializing` they apply
    /// immediately and the build queue is pruned to match.
    pub fn handle_event(&self, event: VaultEvent, config: &SearchConfig, now: Instant) {
        if self.readiness() == IndexState::Uninitialized {
            debug!("ignoring {event:?} before initial build");
            return;
        }

        match event {
            VaultEvent::Created(path) => {
                if !config.is_indexable(&path) {
                    debug!("ignoring created non-indexable file {path}");
                    return;
                }
                self.prune_build_queue(&path);
                self.read_and_index(&path, config);
            }
            VaultEvent::Deleted(path) => {
                self.queue.cancel(&path);
                self.prune_build_queue(&path);
                if self.index.remove(&path) {
                    debug!("removed deleted note {path}");
                }
            }
            VaultEvent::Modified(path) => {
                if !config.is_indexable(&path) {
                    return;
                }
                if config.reindex_in_real_time {
                    self.prune_build_queue(&path);
                    if let DocOutcome::Missing = self.read_and_index(&path, config) {
                        // Modified arrived after the file went away; make
                        // sure nothing resurrects it.
                        self.index.remove(&path);
                    }
                } else {
                    self.queue.schedule(&path, now);
                }
            }
            VaultEvent::Renamed { old, new } => {
                self.queue.cancel(&old);
                self.prune_build_queue(&old);
                self.index.remove(&old);
                if config.is_indexable(&new) {
                    self.prune_build_queue(&new);
                    self.read_and_index(&new, config);
                } else {
                    debug!("renamed note {new} is not indexable, dropped {old}");
                }
            }
        }
    }

    /// Flush every pending modification, ignoring settling windows.
    ///
    /// This is the focus-loss trigger: the user looked away, catch up now.
    pub fn notify_focus_lost(&self, config: &SearchConfig, now: Instant) -> FlushReport {
        let pending = self.queue.drain_all();
        if !pending.is_empty() {
            debug!("focus lost, flushing {} pending notes", pending.len());
        }
        self.flush(pending, config, now)
    }

    /// Flush pending modifications whose settling window has elapsed.
    pub fn tick(&self, config: &SearchConfig, now: Instant) -> FlushReport {
        let ready = self.queue.drain_ready(now, config.debounce_window);
        self.flush(ready, config, now)
    }

    /// Drain the host signal channel, handling each signal in order.
    pub fn drain_signals(
        &self,
        receiver: &Receiver<VaultSignal>,
        config: &SearchConfig,
        now: Instant,
    ) -> PumpSummary {
        let mut summary = PumpSummary::default();
        while let Ok(signal) = receiver.try_recv() {
            summary.signals += 1;
            match signal {
                VaultSignal::Event(event) => self.handle_event(event, config, now),
                VaultSignal::FocusLost => summary.flush.merge(self.notify_focus_lost(config, now)),
            }
        }
        summary
    }

    /// Run a query against the index.
    ///
    /// Before the initial build completes this either fails with
    /// `IndexNotReady` or finishes the build first, per
    /// `config.not_ready`. Results are never partial.
    pub fn search(
        &self,
        query: &str,
        scope: &SearchScope,
        config: &SearchConfig,
    ) -> Result<Vec<SearchHit>> {
        match self.readiness() {
            IndexState::Ready => {}
            IndexState::Uninitialized => {
                return Err(MagpieError::not_ready(IndexState::Uninitialized.as_str()));
            }
            IndexState::Initializing => match config.not_ready {
                NotReadyBehavior::Error => {
                    return Err(MagpieError::not_ready(IndexState::Initializing.as_str()));
                }
                NotReadyBehavior::CatchUp => {
                    self.build_until_ready(config)?;
                }
            },
        }
        Searcher::new(&self.index).search(query, scope, config)
    }

    /// The underlying index engine.
    pub fn index(&self) -> &IndexEngine {
        &self.index
    }

    fn prune_build_queue(&self, path: &str) {
        let mut lifecycle = self.lifecycle.lock();
        lifecycle.build_queue.retain(|queued| queued != path);
    }

    /// Read one note and index it, isolating per-note failures.
    fn read_and_index(&self, path: &str, config: &SearchConfig) -> DocOutcome {
        match self.source.read_note(path) {
            Ok(content) => match self.index.add_or_update(path, &content, config) {
                Ok(()) => DocOutcome::Indexed,
                Err(err) => {
                    warn!("failed to index {path}: {err}");
                    DocOutcome::Unreadable
                }
            },
            Err(SourceError::NotFound { .. }) => {
                debug!("note {path} vanished before indexing");
                DocOutcome::Missing
            }
            Err(SourceError::Unreadable { reason, .. }) => {
                warn!("note {path} unreadable: {reason}");
                DocOutcome::Unreadable
            }
        }
    }

    /// Reindex a drained batch of pending paths.
    ///
    /// A vanished note is dropped from queue and index alike; a transient
    /// read failure is re-scheduled so the next flush retries it.
    fn flush(&self, paths: Vec<String>, config: &SearchConfig, now: Instant) -> FlushReport {
        let mut report = FlushReport::default();
        for path in paths {
            match self.source.read_note(&path) {
                Ok(content) => match self.index.add_or_update(&path, &content, config) {
                    Ok(()) => report.reindexed += 1,
                    Err(err) => {
                        warn!("flush failed to index {path}: {err}");
                        report.failed += 1;
                    }
                },
                Err(SourceError::NotFound { .. }) => {
                    debug!("dropping pending reindex of vanished note {path}");
                    self.index.remove(&path);
                    report.dropped += 1;
                }
                Err(SourceError::Unreadable { reason, .. }) => {
                    warn!("flush could not read {path}: {reason}, keeping it pending");
                    self.queue.schedule(&path, now);
                    report.failed += 1;
                }
            }
        }
        report
    }
}

enum DocOutcome {
    Indexed,
    Missing,
    Unreadable,
}
