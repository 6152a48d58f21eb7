//! Debounced reindex scheduling for modified notes.
//!
//! When real-time reindexing is off, modifications land here instead of in
//! the index. Each pending path carries the timestamp of its most recent
//! modification; scheduling again re-arms the timer, so a burst of edits
//! coalesces into a single reindex of the final content once the settling
//! window has passed.
//!
//! The queue has its own lock, separate from the index lock, so new entries
//! can arrive while a flush is mid-run. Those entries are simply not part
//! of that flush's drained snapshot.

use std::time::{Duration, Instant};

use ahash::AHashMap;
use parking_lot::Mutex;

/// Pending modifications keyed by path, each with its re-armed timestamp.
#[derive(Debug, Default)]
pub struct ReindexQueue {
    pending: Mutex<AHashMap<String, Instant>>,
}

impl ReindexQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        ReindexQueue::default()
    }

    /// Schedule a path for reindexing, re-arming its settling timer.
    ///
    /// A path already pending keeps a single entry; only the timestamp
    /// moves forward.
    pub fn schedule(&self, path: &str, now: Instant) {
        self.pending.lock().insert(path.to_string(), now);
    }

    /// Drop a pending entry. Returns whether one existed.
    pub fn cancel(&self, path: &str) -> bool {
        self.pending.lock().remove(path).is_some()
    }

    /// Whether a path is pending.
    pub fn contains(&self, path: &str) -> bool {
        self.pending.lock().contains_key(path)
    }

    /// Number of pending paths.
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    /// Remove and return the paths whose settling window has elapsed.
    ///
    /// Paths scheduled less than `window` ago stay pending. The result is
    /// sorted so flush order is deterministic.
    pub fn drain_ready(&self, now: Instant, window: Duration) -> Vec<String> {
        let mut pending = self.pending.lock();
        let mut ready: Vec<String> = pending
            .iter()
            .filter(|&(_, &scheduled)| now.saturating_duration_since(scheduled) >= window)
            .map(|(path, _)| path.clone())
            .collect();
        for path in &ready {
            pending.remove(path);
        }
        ready.sort();
        ready
    }

    /// Remove and return every pending path, ignoring settling windows.
    pub fn drain_all(&self) -> Vec<String> {
        let mut pending = self.pending.lock();
        let mut all: Vec<String> = pending.drain().map(|(path, _)| path).collect();
        all.sort();
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(2);

    #[test]
    fn test_not_ready_before_window() {
        let queue = ReindexQueue::new();
        let t0 = Instant::now();
        queue.schedule("a.md", t0);

        assert!(queue.drain_ready(t0 + Duration::from_secs(1), WINDOW).is_empty());
        assert!(queue.contains("a.md"));
    }

    #[test]
    fn test_ready_after_window() {
        let queue = ReindexQueue::new();
        let t0 = Instant::now();
        queue.schedule("a.md", t0);

        let ready = queue.drain_ready(t0 + WINDOW, WINDOW);
        assert_eq!(ready, vec!["a.md"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_reschedule_rearms_timer() {
        let queue = ReindexQueue::new();
        let t0 = Instant::now();
        queue.schedule("a.md", t0);
        queue.schedule("a.md", t0 + Duration::from_secs(1));
        assert_eq!(queue.len(), 1);

        // Two seconds after the first edit, only one second has passed
        // since the re-arm.
        assert!(queue.drain_ready(t0 + Duration::from_secs(2), WINDOW).is_empty());

        let ready = queue.drain_ready(t0 + Duration::from_secs(3), WINDOW);
        assert_eq!(ready, vec!["a.md"]);
    }

    #[test]
    fn test_cancel_drops_entry() {
        let queue = ReindexQueue::new();
        let t0 = Instant::now();
        queue.schedule("a.md", t0);

        assert!(queue.cancel("a.md"));
        assert!(!queue.cancel("a.md"));
        assert!(queue.drain_ready(t0 + WINDOW, WINDOW).is_empty());
    }

    #[test]
    fn test_drain_ready_leaves_young_entries() {
        let queue = ReindexQueue::new();
        let t0 = Instant::now();
        queue.schedule("old.md", t0);
        queue.schedule("young.md", t0 + Duration::from_secs(1));

        let ready = queue.drain_ready(t0 + WINDOW, WINDOW);
        assert_eq!(ready, vec!["old.md"]);
        assert!(queue.contains("young.md"));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_drain_all_ignores_window() {
        let queue = ReindexQueue::new();
        let t0 = Instant::now();
        queue.schedule("b.md", t0);
        queue.schedule("a.md", t0);

        assert_eq!(queue.drain_all(), vec!["a.md", "b.md"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_schedule_in_future_is_not_ready_now() {
        let queue = ReindexQueue::new();
        let t0 = Instant::now();
        queue.schedule("a.md", t0 + Duration::from_secs(5));

        // saturating_duration_since keeps a future timestamp pending
        // instead of panicking.
        assert!(queue.drain_ready(t0, WINDOW).is_empty());
    }
}
