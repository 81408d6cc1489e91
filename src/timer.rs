//! Delayed events owned by a single game session.
//!
//! There are no threads and no closures: a game schedules plain event values
//! and later pulls whatever has come due with [`TimerQueue::pop_due`]. Dropping
//! or clearing the queue is therefore enough to guarantee that nothing fires
//! into a session after it has been torn down.

use crate::clock::Millis;

/// Handle returned by [`TimerQueue::schedule`], used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Scheduled<E> {
    id: TimerId,
    deadline: Millis,
    event: E,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    next_id: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Schedule `event` to come due `delay` ms after `now`.
    pub fn schedule(&mut self, now: Millis, delay: Millis, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Scheduled {
            id,
            deadline: now + delay,
            event,
        });
        id
    }

    /// Returns true if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|s| s.id == id)
    }

    /// Remove and return the earliest event due at or before `now`,
    /// together with its deadline. Equal deadlines pop in scheduling order.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, E)> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, s)| s.deadline <= now)
            .min_by_key(|(_, s)| (s.deadline, s.id.0))
            .map(|(i, _)| i)?;
        let due = self.pending.swap_remove(idx);
        Some((due.deadline, due.event))
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.pending.iter().map(|s| s.deadline).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
