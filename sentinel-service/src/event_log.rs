//! Bounded, most-recent-first log of pipeline stage outcomes
//!
//! Entries are prepended; once the log holds more than its capacity the
//! oldest entry is dropped from the tail. The dashboard reads it through
//! `GET /events`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::ids::EventId;

/// Default number of retained entries
pub const DEFAULT_CAPACITY: usize = 20;

/// Pipeline stage that produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Risk analysis
    Detective,
    /// Verdict classification
    Judge,
    /// Account lockdown
    Enforcer,
    /// Compliance reporting
    Clerk,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Detective => "DETECTIVE",
            Self::Judge => "JUDGE",
            Self::Enforcer => "ENFORCER",
            Self::Clerk => "CLERK",
        };
        f.write_str(name)
    }
}

/// A recorded stage outcome
#[derive(Debug, Clone, Serialize)]
pub struct EventEntry {
    pub id: EventId,
    pub stage: Stage,
    /// Opaque result payload, exactly as returned to the caller
    pub result: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl EventEntry {
    pub fn new(stage: Stage, result: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            stage,
            result,
            timestamp: Utc::now(),
        }
    }
}

/// Shared bounded event log
///
/// Cloning is cheap and every clone appends to the same buffer. The lock
/// is never held across an `.await`.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: Arc<Mutex<VecDeque<EventEntry>>>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl EventLog {
    /// Create a log retaining at most `capacity` entries (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity + 1))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prepend an entry, evicting the oldest one if the bound is exceeded
    pub fn record(&self, entry: EventEntry) {
        let mut entries = self.lock();
        entries.push_front(entry);
        if entries.len() > self.capacity {
            if let Some(evicted) = entries.pop_back() {
                tracing::trace!(event_id = %evicted.id, stage = %evicted.stage, "Evicted oldest event");
            }
        }
    }

    /// Convenience wrapper around [`record`](Self::record)
    pub fn append(&self, stage: Stage, result: serde_json::Value) -> EventId {
        let entry = EventEntry::new(stage, result);
        let id = entry.id.clone();
        self.record(entry);
        id
    }

    /// Snapshot of all entries, most recent first
    pub fn recent(&self) -> Vec<EventEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the deque half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<EventEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
