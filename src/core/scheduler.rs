//! Deferred actions ordered by fire time.
//!
//! Everything that happens "a little later" (the second barrel of a twin
//! weapon, boss volleys, charge strikes, weapon drops, respawns) goes through
//! a [`Scheduler`]. It is drained once at the start of every simulation tick.
//! Tasks carry identifiers, never references, so the receiver must check the
//! target still exists before acting on it.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

struct Scheduled<T> {
    fire_at: f64,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Scheduled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Scheduled<T> {}

impl<T> PartialOrd for Scheduled<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Scheduled<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fire_at
            .total_cmp(&other.fire_at)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Min-heap of `(fire_time, sequence, task)`.
///
/// Tasks with equal fire times come out in the order they were scheduled.
pub struct Scheduler<T> {
    heap: BinaryHeap<Reverse<Scheduled<T>>>,
    next_seq: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Queue `task` to fire `delay` seconds after `now`. Negative delays fire on the next drain.
    pub fn schedule(&mut self, now: f64, delay: f32, task: T) {
        let fire_at = now + f64::from(delay.max(0.0));
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Scheduled { fire_at, seq, task }));
    }

    /// Remove and return every task due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: f64) -> Vec<T> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.heap.peek() {
            if next.fire_at > now {
                break;
            }
            if let Some(Reverse(entry)) = self.heap.pop() {
                due.push(entry.task);
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
