//! Tracked one-shot timers for delayed admission.

use crate::data::{AnimationDescriptor, AnimationGroup};
use crate::ids::TimerId;

/// What a timer does when it fires.
#[derive(Clone, Debug)]
pub enum TimerAction {
    Animate(AnimationDescriptor),
    AnimateGroup(AnimationGroup),
}

#[derive(Debug)]
struct Timer {
    id: TimerId,
    due: f64,
    action: TimerAction,
}

/// Pending timers ordered by due time, then by scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, id: TimerId, due: f64, action: TimerAction) {
        let at = self
            .pending
            .partition_point(|t| t.due < due || (t.due == due && t.id < id));
        self.pending.insert(at, Timer { id, due, action });
    }

    /// Remove a pending timer. False if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending.iter().position(|t| t.id == id) {
            Some(pos) => {
                self.pending.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Pop up to `max` timers due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: f64, max: usize) -> Vec<(TimerId, TimerAction)> {
        let due = self.pending.partition_point(|t| t.due <= now).min(max);
        self.pending
            .drain(..due)
            .map(|t| (t.id, t.action))
            .collect()
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
