//! Per-session event counters shared with the host.

use std::collections::BTreeMap;

use parking_lot::Mutex;

/// Counters for one logger instance.
#[derive(Debug, Default)]
pub struct SessionStats {
    inner: Mutex<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    by_event: BTreeMap<String, u64>,
    live: u64,
    replayed: u64,
}

impl SessionStats {
    /// Creates empty counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one event.
    pub fn record(&self, event_name: &str, replayed: bool) {
        let mut counters = self.inner.lock();
        *counters.by_event.entry(event_name.to_string()).or_default() += 1;
        if replayed {
            counters.replayed += 1;
        } else {
            counters.live += 1;
        }
    }

    /// How many times `event_name` was seen.
    pub fn count(&self, event_name: &str) -> u64 {
        self.inner.lock().by_event.get(event_name).copied().unwrap_or(0)
    }

    /// Events received through dispatch.
    pub fn live(&self) -> u64 {
        self.inner.lock().live
    }

    /// Events recovered from the journal during `init`.
    pub fn replayed(&self) -> u64 {
        self.inner.lock().replayed
    }

    /// All counts keyed by event name.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.inner.lock().by_event.clone()
    }
}
