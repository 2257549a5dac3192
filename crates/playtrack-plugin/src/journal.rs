//! Bounded, append-only journal of published events.
//!
//! Late-joining plugins pull this journal during `init` to replay what they
//! missed. When the journal fills up it stops recording instead of growing
//! or failing.

use playtrack_core::events::RecordedEvent;

/// Whether the journal accepts new entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// New events are appended.
    Recording,
    /// New events are ignored until recording is restarted.
    Stopped,
}

/// What happened to one event offered to the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The event was appended.
    Appended,
    /// The journal was full; recording moved to [`RecordingState::Stopped`]
    /// and the event was not appended.
    CapacityReached,
    /// Recording was already stopped.
    Ignored,
}

/// The event journal of one engine instance.
#[derive(Debug)]
pub struct EventJournal {
    entries: Vec<RecordedEvent>,
    capacity: usize,
    state: RecordingState,
}

impl EventJournal {
    /// Create an empty journal.
    pub fn new(capacity: usize, record_on_start: bool) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
            state: if record_on_start {
                RecordingState::Recording
            } else {
                RecordingState::Stopped
            },
        }
    }

    /// Offer an event to the journal.
    pub fn record(&mut self, event: RecordedEvent) -> RecordOutcome {
        match self.state {
            RecordingState::Stopped => RecordOutcome::Ignored,
            RecordingState::Recording if self.entries.len() >= self.capacity => {
                self.state = RecordingState::Stopped;
                RecordOutcome::CapacityReached
            }
            RecordingState::Recording => {
                self.entries.push(event);
                RecordOutcome::Appended
            }
        }
    }

    /// Resume recording. Existing entries are kept.
    pub fn start(&mut self) {
        self.state = RecordingState::Recording;
    }

    /// Stop recording. Existing entries are kept.
    pub fn stop(&mut self) {
        self.state = RecordingState::Stopped;
    }

    /// Drop every entry. The recording state is unchanged.
    pub fn flush(&mut self) {
        self.entries.clear();
    }

    /// Current recording state.
    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Copy of all entries in insertion order.
    pub fn snapshot(&self) -> Vec<RecordedEvent> {
        self.entries.clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
