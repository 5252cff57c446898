// THEORY:
// The `history` module gives the session a short memory of what it has seen.
// It is a fixed-capacity FIFO: every successful detection is pushed to the
// back, and once the capacity is exceeded the oldest label falls off the front.

use crate::core_modules::emotion::Emotion;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// The most recent labels, oldest first.
#[derive(Debug, Clone)]
pub struct HistoryTracker {
    entries: VecDeque<Emotion>,
    capacity: usize,
}

impl HistoryTracker {
    /// Creates an empty tracker. A capacity of zero retains nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Appends a label, returning the one evicted to stay within capacity.
    pub fn append(&mut self, emotion: Emotion) -> Option<Emotion> {
        self.entries.push_back(emotion);
        if self.entries.len() > self.capacity {
            self.entries.pop_front()
        } else {
            None
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<Emotion> {
        self.entries.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Emotion> + '_ {
        self.entries.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Emotion> {
        self.iter().collect()
    }
}

impl Default for HistoryTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
