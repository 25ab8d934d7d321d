//! One-shot timer queue
//!
//! Deferred work (debounced hover exits, synthetic trigger releases) is
//! expressed as a [`TimerTask`] value rather than a closure, so the runtime
//! can apply it against its own widget arena when it fires. The queue never
//! spawns threads: the host advances it, and tasks whose deadline has passed
//! are returned in deadline order.

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::widget::WidgetId;

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

/// Deferred work scheduled on behalf of a widget
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTask {
    /// Debounced hover exit: write `outside` without signalling again
    HoverExit(WidgetId),
    /// End of a synthetic `trigger_action`: write `outside` and signal `exited`
    TriggerRelease(WidgetId),
}

impl TimerTask {
    pub fn widget(&self) -> WidgetId {
        match *self {
            TimerTask::HoverExit(widget) | TimerTask::TriggerRelease(widget) => widget,
        }
    }
}

/// Timer scheduling service consumed by the hover detector
pub trait Scheduler {
    /// Schedule `task` to fire once, `delay` after the scheduler's current time
    fn schedule_once(&mut self, task: TimerTask, delay: Duration) -> TimerId;

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;
}

struct TimerEntry {
    deadline: Duration,
    /// Scheduling order, breaks deadline ties
    seq: u64,
    task: TimerTask,
}

/// Host-driven timer queue keyed by generation-checked [`TimerId`]s
pub struct TimerQueue {
    timers: SlotMap<TimerId, TimerEntry>,
    now: Duration,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now: Duration::ZERO,
            next_seq: 0,
        }
    }

    /// The queue's current time (the latest time it was advanced to)
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward and take every task due at or before `now`
    ///
    /// Time never moves backwards: an earlier `now` than the last one is
    /// ignored for clock purposes.
    pub fn advance(&mut self, now: Duration) -> Vec<(TimerId, TimerTask)> {
        if now > self.now {
            self.now = now;
        }

        let mut due: Vec<(Duration, u64, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, entry)| entry.deadline <= self.now)
            .map(|(id, entry)| (entry.deadline, entry.seq, id))
            .collect();
        due.sort_by_key(|&(deadline, seq, _)| (deadline, seq));

        due.into_iter()
            .filter_map(|(_, _, id)| self.timers.remove(id).map(|entry| (id, entry.task)))
            .collect()
    }

    /// Whether `id` is still pending
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Deadline of a pending timer
    pub fn deadline(&self, id: TimerId) -> Option<Duration> {
        self.timers.get(id).map(|entry| entry.deadline)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Number of pending timers scheduled for `widget`
    pub fn pending_for(&self, widget: WidgetId) -> usize {
        self.timers
            .values()
            .filter(|entry| entry.task.widget() == widget)
            .count()
    }
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for TimerQueue {
    fn schedule_once(&mut self, task: TimerTask, delay: Duration) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(TimerEntry {
            deadline: self.now.saturating_add(delay),
            seq,
            task,
        })
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }
}
