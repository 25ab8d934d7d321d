//! Interaction runtime
//!
//! [`Interactions`] owns every widget record together with the services the
//! behaviors need and routes host pointer events through them:
//!
//! ```text
//! pointer move ──► layer dispatch order ──► to_local ──► HitTest
//!                                                           │
//!                    signals ◄── button re-sync ◄── hover write
//!
//! pointer down ──► first hit button ──► group arbitration ──► press
//! ```
//!
//! Every entry point first fires the timers that are due at `now`, then
//! processes its input, delivers the resulting events to listeners and
//! returns them.

use std::hash::Hash;
use std::time::Duration;

use slotmap::SlotMap;

use crate::button::{ButtonKind, ButtonState};
use crate::config::InteractionConfig;
use crate::events::{InteractionEvent, ListenerId, SignalKind, Signals};
use crate::geometry::{CoordinateSpace, HoverRegion, Point, Size};
use crate::group::{Arbitration, GroupMembers, ToggleGroups};
use crate::hit_test::HitTest;
use crate::hover::{HoverState, HoverStep};
use crate::layers::HoverLayers;
use crate::timer::TimerQueue;
use crate::widget::{Widget, WidgetId};

/// Statistics about the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionStats {
    pub widgets: usize,
    pub buttons: usize,
    pub groups: usize,
    pub subscribed: usize,
    pub pending_timers: usize,
    pub listeners: usize,
}

/// Widget arena plus the timer, group, layer and signal services
pub struct Interactions<K = String> {
    widgets: SlotMap<WidgetId, Widget<K>>,
    groups: ToggleGroups<K>,
    layers: HoverLayers,
    timers: TimerQueue,
    signals: Signals,
    /// Widget that received the current press
    pressed: Option<WidgetId>,
    config: InteractionConfig,
}

impl<K: Hash + Eq + Clone> Interactions<K> {
    pub fn new() -> Self {
        Self::with_config(InteractionConfig::default())
    }

    pub fn with_config(config: InteractionConfig) -> Self {
        Self {
            widgets: SlotMap::with_key(),
            groups: ToggleGroups::new(),
            layers: HoverLayers::new(),
            timers: TimerQueue::new(),
            signals: Signals::new(),
            pressed: None,
            config,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a widget and subscribe it to hover dispatch
    pub fn insert(&mut self, mut widget: Widget<K>) -> WidgetId {
        widget.apply_defaults(&self.config);
        let layer = widget.layer;
        let group = widget.toggle_group().cloned();

        let id = self.widgets.insert(widget);
        self.layers.subscribe(id, layer);
        if let Some(key) = group {
            self.groups.join(id, key, None);
        }

        tracing::trace!("Registered widget {:?} at layer {}", id, layer);
        id
    }

    /// Detach a widget: cancel its timer, leave its group and layer, and drop
    /// the pointer grab if it holds it
    pub fn remove(&mut self, id: WidgetId) -> Option<Widget<K>> {
        let mut widget = self.widgets.remove(id)?;

        widget.hover.cancel(&mut self.timers);
        if let Some(key) = widget.toggle_group() {
            self.groups.leave(id, key);
        }
        self.layers.unsubscribe(id, widget.layer);
        if self.pressed == Some(id) {
            self.pressed = None;
        }

        tracing::trace!("Removed widget {:?}", id);
        Some(widget)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.widgets.contains_key(id)
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget<K>> {
        self.widgets.get(id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    pub fn on<F>(&mut self, kind: SignalKind, listener: F) -> ListenerId
    where
        F: FnMut(&InteractionEvent) + 'static,
    {
        self.signals.on(kind, listener)
    }

    pub fn on_any<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&InteractionEvent) + 'static,
    {
        self.signals.on_any(listener)
    }

    pub fn off(&mut self, listener: ListenerId) -> bool {
        self.signals.off(listener)
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Fire due timers without other input
    pub fn tick(&mut self, now: Duration) -> Vec<InteractionEvent> {
        let events = self.fire_due(now);
        self.dispatch(events)
    }

    /// Route a pointer move (root coordinates) to every subscribed widget
    pub fn pointer_move(&mut self, position: impl Into<Point>, now: Duration) -> Vec<InteractionEvent> {
        let position = position.into();
        let mut events = self.fire_due(now);
        let mut stale = false;

        for id in self.layers.dispatch_order() {
            let Some(widget) = self.widgets.get_mut(id) else {
                stale = true;
                continue;
            };
            if widget.disabled {
                continue;
            }

            let (hit, local) = widget.hit(position);
            let step = widget.hover.on_move(hit, local, now, &mut self.timers, id);
            record_step(id, widget, step, &mut events);
        }

        if stale {
            let widgets = &self.widgets;
            let purged = self.layers.purge(|id| widgets.contains_key(id));
            tracing::trace!("Purged {} stale layer subscriptions", purged);
        }

        self.dispatch(events)
    }

    /// Route a press to the first enabled button under the pointer
    ///
    /// The receiving widget grabs the pointer until [`pointer_up`]. A press
    /// rejected by group arbitration is still consumed.
    ///
    /// [`pointer_up`]: Interactions::pointer_up
    pub fn pointer_down(&mut self, position: impl Into<Point>, now: Duration) -> Vec<InteractionEvent> {
        let position = position.into();
        let mut events = self.fire_due(now);

        if let Some(held) = self.pressed {
            tracing::trace!("Ignoring press while {:?} holds the pointer", held);
            return self.dispatch(events);
        }

        let target = self.layers.dispatch_order().into_iter().find(|id| {
            self.widgets
                .get(*id)
                .is_some_and(|widget| !widget.disabled && widget.is_button() && widget.hit(position).0)
        });
        let Some(id) = target else {
            return self.dispatch(events);
        };
        self.pressed = Some(id);

        let Some(widget) = self.widgets.get(id) else {
            return self.dispatch(events);
        };
        let group = widget.toggle_group().cloned();
        let allow_no_selection = widget.allows_no_selection();

        if let Some(key) = group {
            let mut access = MemberAccess {
                widgets: &mut self.widgets,
                events: &mut events,
            };
            let arbitration = self
                .groups
                .arbitrate_press(id, &key, allow_no_selection, &mut access);
            if arbitration == Arbitration::Rejected {
                tracing::debug!("Press on {:?} rejected: group may not be left empty", id);
                return self.dispatch(events);
            }
        }

        if let Some(button) = self.widgets.get_mut(id).and_then(|w| w.button.as_mut()) {
            if let Some((from, to)) = button.press() {
                push_state_change(id, from, to, &mut events);
            }
        }

        self.dispatch(events)
    }

    /// Deliver a release to the widget holding the pointer grab
    pub fn pointer_up(&mut self, now: Duration) -> Vec<InteractionEvent> {
        let mut events = self.fire_due(now);

        if let Some(id) = self.pressed.take() {
            if let Some(button) = self.widgets.get_mut(id).and_then(|w| w.button.as_mut()) {
                if let Some((from, to)) = button.release() {
                    push_state_change(id, from, to, &mut events);
                }
            }
        }

        self.dispatch(events)
    }

    /// Synthesize a hover enter followed by an exit after `duration`
    /// (immediately when `duration` is zero)
    pub fn trigger_action(
        &mut self,
        id: WidgetId,
        duration: Duration,
        now: Duration,
    ) -> Vec<InteractionEvent> {
        let mut events = self.fire_due(now);

        if let Some(widget) = self.widgets.get_mut(id) {
            let step = widget.hover.trigger_enter(now, &mut self.timers);
            record_step(id, widget, step, &mut events);
            if let Some(step) = widget.hover.trigger_release(duration, now, &mut self.timers, id) {
                record_step(id, widget, step, &mut events);
            }
        }

        self.dispatch(events)
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Move a widget to another toggle group, or out of any group
    ///
    /// The key is recorded on any widget but only toggle buttons join.
    pub fn set_group(&mut self, id: WidgetId, key: Option<K>) -> bool {
        let Some(widget) = self.widgets.get_mut(id) else {
            return false;
        };
        let is_toggle = widget.is_toggle();
        let previous = widget.group.take();

        match key {
            Some(key) if is_toggle => {
                self.groups.join(id, key.clone(), previous.as_ref());
                widget.group = Some(key);
            }
            key => {
                if let Some(previous) = previous.filter(|_| is_toggle) {
                    self.groups.leave(id, &previous);
                }
                widget.group = key;
            }
        }
        true
    }

    /// Resubscribe a widget at another layer
    ///
    /// A debounced exit still pending is applied immediately.
    pub fn set_layer(&mut self, id: WidgetId, layer: i32, now: Duration) -> Vec<InteractionEvent> {
        let mut events = self.fire_due(now);

        if let Some(widget) = self.widgets.get_mut(id) {
            if widget.layer != layer {
                self.layers.change_layer(id, widget.layer, layer);
                widget.layer = layer;
                if widget.hover.flush_exit(now, &mut self.timers) {
                    hover_written(id, widget, &mut events);
                }
            }
        }

        self.dispatch(events)
    }

    /// Enable or disable pointer input
    ///
    /// Disabling a hovered widget moves it outside immediately; disabling the
    /// widget holding the pointer grab releases a momentary press.
    pub fn set_disabled(&mut self, id: WidgetId, disabled: bool, now: Duration) -> Vec<InteractionEvent> {
        let mut events = self.fire_due(now);

        if let Some(widget) = self.widgets.get_mut(id) {
            widget.disabled = disabled;

            if disabled {
                let was_inside = widget.hover.state().is_inside();
                let step = widget.hover.force_outside(now, &mut self.timers);
                if was_inside {
                    hover_written(id, widget, &mut events);
                }
                if let HoverStep::Exited { .. } = step {
                    events.push(InteractionEvent::Exited {
                        widget: id,
                        position: widget.hover.last_position(),
                    });
                }

                if self.pressed == Some(id) {
                    self.pressed = None;
                    if let Some(button) = widget.button.as_mut() {
                        if button.kind() == ButtonKind::Momentary {
                            if let Some((from, to)) = button.force_up() {
                                push_state_change(id, from, to, &mut events);
                            }
                        }
                    }
                }
            }
        }

        self.dispatch(events)
    }

    /// Set a button's down axis programmatically
    ///
    /// Going down releases the other members of its group.
    pub fn set_toggled(&mut self, id: WidgetId, down: bool, now: Duration) -> Vec<InteractionEvent> {
        let mut events = self.fire_due(now);

        let group = match self.widgets.get(id) {
            Some(widget) if widget.is_button() => widget.toggle_group().cloned(),
            _ => return self.dispatch(events),
        };

        if down {
            if let Some(key) = group {
                let mut access = MemberAccess {
                    widgets: &mut self.widgets,
                    events: &mut events,
                };
                self.groups.release_others(id, &key, &mut access);
            }
        }

        if let Some(button) = self.widgets.get_mut(id).and_then(|w| w.button.as_mut()) {
            if let Some((from, to)) = button.set_down(down) {
                push_state_change(id, from, to, &mut events);
            }
        }

        self.dispatch(events)
    }

    pub fn set_region(&mut self, id: WidgetId, region: HoverRegion) -> bool {
        self.update(id, |widget| widget.region = region)
    }

    pub fn set_size(&mut self, id: WidgetId, size: Size) -> bool {
        self.update(id, |widget| widget.size = size)
    }

    pub fn set_space(&mut self, id: WidgetId, space: impl CoordinateSpace + 'static) -> bool {
        self.update(id, |widget| widget.space = Box::new(space))
    }

    pub fn set_hit_test(&mut self, id: WidgetId, hit_test: impl HitTest) -> bool {
        self.update(id, |widget| widget.hit_test = Box::new(hit_test))
    }

    /// Reconfigure a widget's hit tester in place
    pub fn hit_test_mut<T: HitTest>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.widgets.get_mut(id)?.hit_test.downcast_mut::<T>()
    }

    pub fn set_min_state_time(&mut self, id: WidgetId, min_state_time: Duration) -> bool {
        self.update(id, |widget| widget.hover.set_min_state_time(min_state_time))
    }

    pub fn set_allow_no_selection(&mut self, id: WidgetId, allow: bool) -> bool {
        self.update(id, |widget| widget.set_allow_no_selection(allow))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn hover_state(&self, id: WidgetId) -> Option<HoverState> {
        self.widgets.get(id).map(|widget| widget.hover.state())
    }

    pub fn button_state(&self, id: WidgetId) -> Option<ButtonState> {
        self.widgets.get(id).and_then(|widget| widget.button_state())
    }

    pub fn last_position(&self, id: WidgetId) -> Option<Point> {
        self.widgets.get(id).map(|widget| widget.hover.last_position())
    }

    pub fn hover_start_time(&self, id: WidgetId) -> Option<Duration> {
        self.widgets
            .get(id)
            .and_then(|widget| widget.hover.hover_start_time())
    }

    pub fn has_pending_timer(&self, id: WidgetId) -> bool {
        self.widgets
            .get(id)
            .and_then(|widget| widget.hover.pending_timer())
            .is_some_and(|timer| self.timers.is_pending(timer))
    }

    /// Number of queued timers owned by `id`
    pub fn pending_timers(&self, id: WidgetId) -> usize {
        self.timers.pending_for(id)
    }

    /// Widget holding the pointer grab
    pub fn pressed(&self) -> Option<WidgetId> {
        self.pressed
    }

    /// Live members of a group, in join order
    pub fn group_members(&mut self, key: &K) -> Vec<WidgetId> {
        let widgets = &self.widgets;
        self.groups.members(key, |id| widgets.contains_key(id))
    }

    pub fn stats(&self) -> InteractionStats {
        InteractionStats {
            widgets: self.widgets.len(),
            buttons: self.widgets.values().filter(|w| w.is_button()).count(),
            groups: self.groups.len(),
            subscribed: self.layers.len(),
            pending_timers: self.timers.len(),
            listeners: self.signals.len(),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn update(&mut self, id: WidgetId, f: impl FnOnce(&mut Widget<K>)) -> bool {
        match self.widgets.get_mut(id) {
            Some(widget) => {
                f(widget);
                true
            }
            None => false,
        }
    }

    fn fire_due(&mut self, now: Duration) -> Vec<InteractionEvent> {
        let mut events = Vec::new();

        for (timer, task) in self.timers.advance(now) {
            let id = task.widget();
            let Some(widget) = self.widgets.get_mut(id) else {
                tracing::trace!("Dropping timer for removed widget {:?}", id);
                continue;
            };
            let Some(step) = widget.hover.fire(timer, now) else {
                continue;
            };

            tracing::trace!("Timer {:?} fired for {:?}", task, id);
            hover_written(id, widget, &mut events);
            if let HoverStep::Exited { .. } = step {
                events.push(InteractionEvent::Exited {
                    widget: id,
                    position: widget.hover.last_position(),
                });
            }
        }

        events
    }

    fn dispatch(&mut self, events: Vec<InteractionEvent>) -> Vec<InteractionEvent> {
        self.signals.emit(&events);
        events
    }
}

impl<K: Hash + Eq + Clone> Default for Interactions<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for Interactions<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interactions")
            .field("widgets", &self.widgets.len())
            .field("pressed", &self.pressed)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Group arbitration view over the widget arena
struct MemberAccess<'a, K> {
    widgets: &'a mut SlotMap<WidgetId, Widget<K>>,
    events: &'a mut Vec<InteractionEvent>,
}

impl<K> GroupMembers for MemberAccess<'_, K> {
    fn is_down(&self, id: WidgetId) -> Option<bool> {
        self.widgets
            .get(id)
            .map(|widget| widget.button.is_some_and(|button| button.is_down()))
    }

    fn force_up(&mut self, id: WidgetId) {
        if let Some(button) = self.widgets.get_mut(id).and_then(|w| w.button.as_mut()) {
            if let Some((from, to)) = button.force_up() {
                push_state_change(id, from, to, self.events);
            }
        }
    }
}

/// Translate a hover step into events, re-syncing the button after writes
fn record_step<K>(
    id: WidgetId,
    widget: &mut Widget<K>,
    step: HoverStep,
    events: &mut Vec<InteractionEvent>,
) {
    let position = widget.hover.last_position();
    match step {
        HoverStep::Unchanged => {}
        HoverStep::Entered => {
            hover_written(id, widget, events);
            events.push(InteractionEvent::Entered {
                widget: id,
                position,
            });
        }
        HoverStep::Exited { deferred } => {
            if !deferred {
                hover_written(id, widget, events);
            }
            events.push(InteractionEvent::Exited {
                widget: id,
                position,
            });
        }
    }
}

fn hover_written<K>(id: WidgetId, widget: &mut Widget<K>, events: &mut Vec<InteractionEvent>) {
    let state = widget.hover.state();
    tracing::debug!("Widget {:?} hover -> {}", id, state.as_str());
    events.push(InteractionEvent::HoverChanged { widget: id, state });

    if let Some(button) = widget.button.as_mut() {
        if let Some((from, to)) = button.sync_hover(state.is_inside()) {
            push_state_change(id, from, to, events);
        }
    }
}

fn push_state_change(
    id: WidgetId,
    from: ButtonState,
    to: ButtonState,
    events: &mut Vec<InteractionEvent>,
) {
    tracing::debug!("Widget {:?} state {} -> {}", id, from, to);
    events.push(InteractionEvent::StateChanged {
        widget: id,
        from,
        to,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_insert_subscribes_and_joins_group() {
        let mut ui: Interactions = Interactions::new();
        let a = ui.insert(Widget::new(Size::new(10.0, 10.0)).toggle().group("g".to_string()));
        let b = ui.insert(Widget::new(Size::new(10.0, 10.0)));

        let stats = ui.stats();
        assert_eq!(stats.widgets, 2);
        assert_eq!(stats.buttons, 1);
        assert_eq!(stats.groups, 1);
        assert_eq!(stats.subscribed, 2);
        assert_eq!(ui.group_members(&"g".to_string()), vec![a]);
        assert_eq!(ui.button_state(b), None);
    }

    #[test]
    fn test_move_emits_hover_then_state_then_entered() {
        let mut ui: Interactions = Interactions::new();
        let id = ui.insert(Widget::new(Size::new(10.0, 10.0)).momentary());

        let events = ui.pointer_move((5.0, 5.0), ms(0));

        assert_eq!(
            events,
            vec![
                InteractionEvent::HoverChanged {
                    widget: id,
                    state: HoverState::Inside
                },
                InteractionEvent::StateChanged {
                    widget: id,
                    from: ButtonState::Normal,
                    to: ButtonState::HoverNormal
                },
                InteractionEvent::Entered {
                    widget: id,
                    position: Point::new(5.0, 5.0)
                },
            ]
        );
    }

    #[test]
    fn test_release_goes_to_grabbing_widget() {
        let mut ui: Interactions = Interactions::new();
        let id = ui.insert(Widget::new(Size::new(10.0, 10.0)).momentary());

        ui.pointer_move((5.0, 5.0), ms(0));
        ui.pointer_down((5.0, 5.0), ms(10));
        assert_eq!(ui.button_state(id), Some(ButtonState::HoverDown));
        assert_eq!(ui.pressed(), Some(id));

        ui.pointer_move((50.0, 50.0), ms(100));
        assert_eq!(ui.button_state(id), Some(ButtonState::Down));

        ui.pointer_up(ms(120));
        assert_eq!(ui.button_state(id), Some(ButtonState::Normal));
        assert_eq!(ui.pressed(), None);
    }

    #[test]
    fn test_press_targets_topmost_button() {
        let mut ui: Interactions = Interactions::new();
        let below = ui.insert(Widget::new(Size::new(10.0, 10.0)).momentary());
        let hover_only = ui.insert(Widget::new(Size::new(10.0, 10.0)).layer(2));
        let above = ui.insert(Widget::new(Size::new(10.0, 10.0)).momentary().layer(1));

        ui.pointer_down((5.0, 5.0), ms(0));

        assert_eq!(ui.pressed(), Some(above));
        assert_eq!(ui.button_state(below), Some(ButtonState::Normal));
        assert_eq!(ui.button_state(hover_only), None);
    }

    #[test]
    fn test_listeners_receive_returned_events() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut ui: Interactions = Interactions::new();
        let seen: Rc<RefCell<Vec<InteractionEvent>>> = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        ui.on(SignalKind::Entered, move |event| seen_clone.borrow_mut().push(*event));

        let id = ui.insert(Widget::new(Size::new(10.0, 10.0)));
        ui.pointer_move((1.0, 1.0), ms(0));

        assert_eq!(
            *seen.borrow(),
            vec![InteractionEvent::Entered {
                widget: id,
                position: Point::new(1.0, 1.0)
            }]
        );
    }

    #[test]
    fn test_set_layer_changes_dispatch_order() {
        let mut ui: Interactions = Interactions::new();
        let a = ui.insert(Widget::new(Size::new(10.0, 10.0)).momentary());
        let b = ui.insert(Widget::new(Size::new(10.0, 10.0)).momentary());

        ui.set_layer(a, 3, ms(0));
        ui.pointer_down((5.0, 5.0), ms(0));

        assert_eq!(ui.pressed(), Some(a));
        assert_eq!(ui.button_state(b), Some(ButtonState::Normal));
    }

    #[test]
    fn test_set_group_moves_membership() {
        let mut ui: Interactions<&'static str> = Interactions::new();
        let id = ui.insert(Widget::new(Size::new(10.0, 10.0)).toggle().group("a"));

        assert!(ui.set_group(id, Some("b")));
        assert!(ui.group_members(&"a").is_empty());
        assert_eq!(ui.group_members(&"b"), vec![id]);

        assert!(ui.set_group(id, None));
        assert!(ui.group_members(&"b").is_empty());
        assert!(ui.get(id).unwrap().group_key().is_none());
    }

    #[test]
    fn test_hit_test_mut_downcasts() {
        use crate::hit_test::RectHitTest;

        let mut ui: Interactions = Interactions::new();
        let id = ui.insert(Widget::new(Size::new(10.0, 10.0)));

        assert!(ui.hit_test_mut::<RectHitTest>(id).is_some());
    }
}
