//! Hover detection with debounced exit
//!
//! [`HoverTracker`] holds one widget's hover state. It is fed the result of
//! the widget's hit test for every pointer move and reports which signal (if
//! any) the move produced:
//!
//! ```text
//!              hit (signal entered)
//!   Outside ─────────────────────────► Inside
//!      ▲                                 │
//!      │ write outside                   │ miss (signal exited)
//!      │                                 ▼
//!      └──── now, or after the remainder of min_state_time
//! ```
//!
//! The `exited` signal is emitted on the miss itself; only the stored state
//! write is deferred. A hit while the deferred write is pending cancels it and
//! the widget stays inside without a second `entered`.

use std::time::Duration;

use crate::geometry::Point;
use crate::timer::{Scheduler, TimerId, TimerTask};
use crate::widget::WidgetId;

/// Stored hover state of a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HoverState {
    #[default]
    Outside,
    Inside,
}

impl HoverState {
    pub fn is_inside(&self) -> bool {
        matches!(self, HoverState::Inside)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HoverState::Outside => "outside",
            HoverState::Inside => "inside",
        }
    }
}

/// What a single hover step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverStep {
    /// No signal; the stored state is unchanged
    Unchanged,
    /// Stored state became inside; signal `entered`
    Entered,
    /// Signal `exited`. `deferred` is true when the write to outside is
    /// pending on the debounce timer rather than already applied.
    Exited { deferred: bool },
}

impl HoverStep {
    /// Whether the stored state was written by this step
    pub fn wrote_state(&self) -> bool {
        matches!(
            self,
            HoverStep::Entered | HoverStep::Exited { deferred: false }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    /// Debounced exit; `exited` has already been signalled
    Exit,
    /// Synthetic release from `trigger_action`; `exited` not yet signalled
    TriggerRelease,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    timer: TimerId,
    kind: PendingKind,
}

/// Per-widget hover state machine
#[derive(Debug, Clone)]
pub struct HoverTracker {
    state: HoverState,
    last_position: Point,
    hover_start: Option<Duration>,
    min_state_time: Duration,
    pending: Option<Pending>,
}

impl HoverTracker {
    pub fn new(min_state_time: Duration) -> Self {
        Self {
            state: HoverState::Outside,
            last_position: Point::ZERO,
            hover_start: None,
            min_state_time,
            pending: None,
        }
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    /// Last local position at which hover was evaluated
    pub fn last_position(&self) -> Point {
        self.last_position
    }

    /// Time at which the widget last entered `inside`, if it is inside
    pub fn hover_start_time(&self) -> Option<Duration> {
        self.hover_start
    }

    pub fn min_state_time(&self) -> Duration {
        self.min_state_time
    }

    pub fn set_min_state_time(&mut self, min_state_time: Duration) {
        self.min_state_time = min_state_time;
    }

    /// The pending debounce/trigger timer, if any
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending.map(|pending| pending.timer)
    }

    /// Whether an `exited` signal was emitted for a write that has not landed yet
    pub fn exit_pending(&self) -> bool {
        matches!(
            self.pending,
            Some(Pending {
                kind: PendingKind::Exit,
                ..
            })
        )
    }

    /// Cancel the pending timer, if any
    pub fn cancel(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(pending) = self.pending.take() {
            scheduler.cancel(pending.timer);
        }
    }

    /// Feed one pointer move whose hit test produced `hit` at local `position`
    pub fn on_move(
        &mut self,
        hit: bool,
        position: Point,
        now: Duration,
        scheduler: &mut impl Scheduler,
        owner: WidgetId,
    ) -> HoverStep {
        if hit {
            self.last_position = position;
            self.cancel(scheduler);
            return match self.state {
                HoverState::Outside => {
                    self.write(HoverState::Inside, now);
                    HoverStep::Entered
                }
                HoverState::Inside => HoverStep::Unchanged,
            };
        }

        if !self.state.is_inside() {
            return HoverStep::Unchanged;
        }

        self.last_position = position;

        // A debounced exit is already on its way and signalled
        if self.exit_pending() {
            return HoverStep::Unchanged;
        }

        self.cancel(scheduler);
        let elapsed = self
            .hover_start
            .map(|start| now.saturating_sub(start))
            .unwrap_or(Duration::ZERO);

        if elapsed < self.min_state_time {
            let timer = scheduler.schedule_once(
                TimerTask::HoverExit(owner),
                self.min_state_time - elapsed,
            );
            self.pending = Some(Pending {
                timer,
                kind: PendingKind::Exit,
            });
            HoverStep::Exited { deferred: true }
        } else {
            self.write(HoverState::Outside, now);
            HoverStep::Exited { deferred: false }
        }
    }

    /// First half of a synthetic hover: cancel any pending timer and write
    /// `inside`
    pub fn trigger_enter(&mut self, now: Duration, scheduler: &mut impl Scheduler) -> HoverStep {
        self.cancel(scheduler);
        self.write(HoverState::Inside, now);
        HoverStep::Entered
    }

    /// Second half of a synthetic hover
    ///
    /// A zero `duration` writes `outside` now and returns the exit step.
    /// Otherwise a release is scheduled, `None` is returned and the exit
    /// arrives through [`HoverTracker::fire`].
    pub fn trigger_release(
        &mut self,
        duration: Duration,
        now: Duration,
        scheduler: &mut impl Scheduler,
        owner: WidgetId,
    ) -> Option<HoverStep> {
        if duration.is_zero() {
            self.write(HoverState::Outside, now);
            return Some(HoverStep::Exited { deferred: false });
        }

        let timer = scheduler.schedule_once(TimerTask::TriggerRelease(owner), duration);
        self.pending = Some(Pending {
            timer,
            kind: PendingKind::TriggerRelease,
        });
        None
    }

    /// Apply a fired timer
    ///
    /// Returns `None` if `timer` is not this tracker's pending timer. A
    /// debounced exit writes `outside` silently (`exited` was signalled on
    /// the miss); a trigger release writes `outside` and signals `exited`.
    pub fn fire(&mut self, timer: TimerId, now: Duration) -> Option<HoverStep> {
        let pending = self.pending.filter(|pending| pending.timer == timer)?;
        self.pending = None;
        self.write(HoverState::Outside, now);

        Some(match pending.kind {
            PendingKind::Exit => HoverStep::Unchanged,
            PendingKind::TriggerRelease => HoverStep::Exited { deferred: false },
        })
    }

    /// Apply a pending debounced exit now instead of at its deadline
    ///
    /// Returns true if the stored state was written.
    pub fn flush_exit(&mut self, now: Duration, scheduler: &mut impl Scheduler) -> bool {
        if !self.exit_pending() {
            return false;
        }
        self.cancel(scheduler);
        self.write(HoverState::Outside, now);
        true
    }

    /// Leave `inside` immediately (widget disabled or detached)
    ///
    /// Returns `Exited` only if an `exited` signal is still owed to listeners.
    pub fn force_outside(&mut self, now: Duration, scheduler: &mut impl Scheduler) -> HoverStep {
        let already_signalled = self.exit_pending();
        self.cancel(scheduler);

        if !self.state.is_inside() {
            return HoverStep::Unchanged;
        }

        self.write(HoverState::Outside, now);
        if already_signalled {
            HoverStep::Unchanged
        } else {
            HoverStep::Exited { deferred: false }
        }
    }

    fn write(&mut self, state: HoverState, now: Duration) {
        self.state = state;
        self.hover_start = match state {
            HoverState::Inside => Some(now),
            HoverState::Outside => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerQueue;
    use slotmap::SlotMap;

    fn owner() -> WidgetId {
        let mut arena: SlotMap<WidgetId, ()> = SlotMap::with_key();
        arena.insert(())
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_enter_records_start_time_and_position() {
        let id = owner();
        let mut timers = TimerQueue::new();
        let mut hover = HoverTracker::new(ms(35));

        let step = hover.on_move(true, Point::new(3.0, 4.0), ms(10), &mut timers, id);

        assert_eq!(step, HoverStep::Entered);
        assert_eq!(hover.state(), HoverState::Inside);
        assert_eq!(hover.hover_start_time(), Some(ms(10)));
        assert_eq!(hover.last_position(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_moving_inside_is_silent() {
        let id = owner();
        let mut timers = TimerQueue::new();
        let mut hover = HoverTracker::new(ms(35));

        hover.on_move(true, Point::new(1.0, 1.0), ms(0), &mut timers, id);
        let step = hover.on_move(true, Point::new(2.0, 2.0), ms(5), &mut timers, id);

        assert_eq!(step, HoverStep::Unchanged);
        assert_eq!(hover.last_position(), Point::new(2.0, 2.0));
        assert_eq!(hover.hover_start_time(), Some(ms(0)));
    }

    #[test]
    fn test_exit_after_min_state_time_is_immediate() {
        let id = owner();
        let mut timers = TimerQueue::new();
        let mut hover = HoverTracker::new(ms(35));

        hover.on_move(true, Point::new(1.0, 1.0), ms(0), &mut timers, id);
        timers.advance(ms(100));
        let step = hover.on_move(false, Point::new(50.0, 1.0), ms(100), &mut timers, id);

        assert_eq!(step, HoverStep::Exited { deferred: false });
        assert_eq!(hover.state(), HoverState::Outside);
        assert_eq!(hover.hover_start_time(), None);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_early_exit_is_debounced() {
        let id = owner();
        let mut timers = TimerQueue::new();
        let mut hover = HoverTracker::new(ms(200));

        hover.on_move(true, Point::new(1.0, 1.0), ms(0), &mut timers, id);
        timers.advance(ms(100));
        let step = hover.on_move(false, Point::new(50.0, 1.0), ms(100), &mut timers, id);

        assert_eq!(step, HoverStep::Exited { deferred: true });
        assert_eq!(hover.state(), HoverState::Inside);

        let timer = hover.pending_timer().unwrap();
        assert_eq!(timers.deadline(timer), Some(ms(200)));

        let fired = timers.advance(ms(200));
        assert_eq!(fired.len(), 1);
        assert_eq!(hover.fire(fired[0].0, ms(200)), Some(HoverStep::Unchanged));
        assert_eq!(hover.state(), HoverState::Outside);
        assert!(hover.pending_timer().is_none());
    }

    #[test]
    fn test_repeated_miss_keeps_single_pending_exit() {
        let id = owner();
        let mut timers = TimerQueue::new();
        let mut hover = HoverTracker::new(ms(200));

        hover.on_move(true, Point::new(1.0, 1.0), ms(0), &mut timers, id);
        timers.advance(ms(100));
        hover.on_move(false, Point::new(50.0, 1.0), ms(100), &mut timers, id);
        let first = hover.pending_timer();

        timers.advance(ms(120));
        let step = hover.on_move(false, Point::new(60.0, 1.0), ms(120), &mut timers, id);

        assert_eq!(step, HoverStep::Unchanged);
        assert_eq!(hover.pending_timer(), first);
        assert_eq!(hover.last_position(), Point::new(60.0, 1.0));
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_reentry_cancels_debounced_exit() {
        let id = owner();
        let mut timers = TimerQueue::new();
        let mut hover = HoverTracker::new(ms(200));

        hover.on_move(true, Point::new(1.0, 1.0), ms(0), &mut timers, id);
        timers.advance(ms(100));
        hover.on_move(false, Point::new(50.0, 1.0), ms(100), &mut timers, id);
        timers.advance(ms(150));
        let step = hover.on_move(true, Point::new(2.0, 1.0), ms(150), &mut timers, id);

        assert_eq!(step, HoverStep::Unchanged);
        assert_eq!(hover.state(), HoverState::Inside);
        assert!(timers.is_empty());
        assert!(timers.advance(ms(400)).is_empty());
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let id = owner();
        let mut timers = TimerQueue::new();
        let mut hover = HoverTracker::new(ms(200));

        hover.on_move(true, Point::new(1.0, 1.0), ms(0), &mut timers, id);
        hover.on_move(false, Point::new(50.0, 1.0), ms(10), &mut timers, id);
        let old = hover.pending_timer().unwrap();
        hover.on_move(true, Point::new(1.0, 1.0), ms(20), &mut timers, id);

        assert_eq!(hover.fire(old, ms(300)), None);
        assert_eq!(hover.state(), HoverState::Inside);
    }

    #[test]
    fn test_trigger_with_zero_duration() {
        let id = owner();
        let mut timers = TimerQueue::new();
        let mut hover = HoverTracker::new(ms(35));

        assert_eq!(hover.trigger_enter(ms(0), &mut timers), HoverStep::Entered);
        assert_eq!(hover.state(), HoverState::Inside);

        let step = hover.trigger_release(Duration::ZERO, ms(0), &mut timers, id);
        assert_eq!(step, Some(HoverStep::Exited { deferred: false }));
        assert_eq!(hover.state(), HoverState::Outside);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_trigger_schedules_release() {
        let id = owner();
        let mut timers = TimerQueue::new();
        let mut hover = HoverTracker::new(ms(35));

        assert_eq!(hover.trigger_enter(ms(0), &mut timers), HoverStep::Entered);
        assert_eq!(hover.trigger_release(ms(100), ms(0), &mut timers, id), None);
        assert_eq!(hover.state(), HoverState::Inside);

        let fired = timers.advance(ms(100));
        assert_eq!(fired[0].1, TimerTask::TriggerRelease(id));
        assert_eq!(
            hover.fire(fired[0].0, ms(100)),
            Some(HoverStep::Exited { deferred: false })
        );
        assert_eq!(hover.state(), HoverState::Outside);
    }

    #[test]
    fn test_force_outside_does_not_signal_twice() {
        let id = owner();
        let mut timers = TimerQueue::new();
        let mut hover = HoverTracker::new(ms(200));

        hover.on_move(true, Point::new(1.0, 1.0), ms(0), &mut timers, id);
        hover.on_move(false, Point::new(50.0, 1.0), ms(10), &mut timers, id);

        assert_eq!(hover.force_outside(ms(20), &mut timers), HoverStep::Unchanged);
        assert_eq!(hover.state(), HoverState::Outside);
        assert!(timers.is_empty());

        hover.on_move(true, Point::new(1.0, 1.0), ms(30), &mut timers, id);
        assert_eq!(
            hover.force_outside(ms(40), &mut timers),
            HoverStep::Exited { deferred: false }
        );
    }
}
