//! Widget records
//!
//! A [`Widget`] composes the interaction behaviors a host widget opts into:
//! hover tracking (always), an optional button state machine, an optional
//! toggle group, and the hit tester and coordinate space used to evaluate
//! pointer positions. Widgets are built with a fluent builder and handed to
//! [`Interactions::insert`](crate::Interactions::insert), which fills
//! unspecified settings from the runtime's
//! [`InteractionConfig`](crate::InteractionConfig).

use std::time::Duration;

use slotmap::new_key_type;

use crate::button::{ButtonKind, ButtonMachine, ButtonState};
use crate::config::InteractionConfig;
use crate::geometry::{CoordinateSpace, HoverRegion, Point, Size, Translation};
use crate::hit_test::{HitGeometry, HitTest, RectHitTest};
use crate::hover::{HoverState, HoverTracker};

new_key_type! {
    /// Handle to a registered widget
    ///
    /// Handles are generation checked: a handle to a removed widget never
    /// resolves, even after its slot is reused.
    pub struct WidgetId;
}

/// Interaction record for one widget
pub struct Widget<K = String> {
    pub(crate) size: Size,
    pub(crate) space: Box<dyn CoordinateSpace>,
    pub(crate) region: HoverRegion,
    pub(crate) hit_test: Box<dyn HitTest>,
    pub(crate) button: Option<ButtonMachine>,
    pub(crate) group: Option<K>,
    allow_no_selection: Option<bool>,
    pub(crate) layer: i32,
    min_state_time: Option<Duration>,
    pub(crate) disabled: bool,
    pub(crate) hover: HoverTracker,
}

impl<K> Widget<K> {
    /// A hover-only widget of the given size, with its local origin at the
    /// parent's origin
    pub fn new(size: Size) -> Self {
        Self {
            size,
            space: Box::new(Translation::default()),
            region: HoverRegion::UNSET,
            hit_test: Box::new(RectHitTest),
            button: None,
            group: None,
            allow_no_selection: None,
            layer: 0,
            min_state_time: None,
            disabled: false,
            hover: HoverTracker::new(Duration::ZERO),
        }
    }

    /// Place the local origin at `(x, y)` in root coordinates
    pub fn at(self, x: f32, y: f32) -> Self {
        self.space(Translation::new(x, y))
    }

    /// Use a custom root-to-local conversion
    pub fn space(mut self, space: impl CoordinateSpace + 'static) -> Self {
        self.space = Box::new(space);
        self
    }

    /// Explicit hit rectangle in local coordinates
    pub fn region(mut self, region: HoverRegion) -> Self {
        self.region = region;
        self
    }

    /// Replace the default bounds test
    pub fn hit_test(mut self, hit_test: impl HitTest) -> Self {
        self.hit_test = Box::new(hit_test);
        self
    }

    /// Make the widget a button that is down while held
    pub fn momentary(mut self) -> Self {
        self.button = Some(ButtonMachine::new(ButtonKind::Momentary));
        self
    }

    /// Make the widget a button that flips on every press
    pub fn toggle(mut self) -> Self {
        self.button = Some(ButtonMachine::new(ButtonKind::Toggle));
        self
    }

    /// Join a toggle group. Ignored unless the widget is a toggle button.
    pub fn group(mut self, key: K) -> Self {
        self.group = Some(key);
        self
    }

    pub fn allow_no_selection(mut self, allow: bool) -> Self {
        self.allow_no_selection = Some(allow);
        self
    }

    /// Hover dispatch layer; higher layers are evaluated first
    pub fn layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    pub fn min_state_time(mut self, min_state_time: Duration) -> Self {
        self.min_state_time = Some(min_state_time);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn hover_region(&self) -> HoverRegion {
        self.region
    }

    pub fn group_key(&self) -> Option<&K> {
        self.group.as_ref()
    }

    pub fn layer_index(&self) -> i32 {
        self.layer
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_button(&self) -> bool {
        self.button.is_some()
    }

    pub fn is_toggle(&self) -> bool {
        self.button
            .as_ref()
            .is_some_and(|button| button.kind() == ButtonKind::Toggle)
    }

    /// The group this widget takes part in: its key, if it is a toggle
    pub(crate) fn toggle_group(&self) -> Option<&K> {
        self.group.as_ref().filter(|_| self.is_toggle())
    }

    pub fn hover_state(&self) -> HoverState {
        self.hover.state()
    }

    pub fn button_state(&self) -> Option<ButtonState> {
        self.button.map(|button| button.state())
    }

    /// Whether pressing the selected member of this widget's group may
    /// leave the group empty
    pub fn allows_no_selection(&self) -> bool {
        self.allow_no_selection.unwrap_or(true)
    }

    pub(crate) fn set_allow_no_selection(&mut self, allow: bool) {
        self.allow_no_selection = Some(allow);
    }

    pub fn geometry(&self) -> HitGeometry {
        HitGeometry::new(self.size, self.region)
    }

    /// Convert a root position to local space and run the hit test
    pub fn hit(&self, root: Point) -> (bool, Point) {
        let local = self.space.to_local(root);
        (self.hit_test.hit_test(local, &self.geometry()), local)
    }

    /// Fill settings left unspecified by the builder
    pub(crate) fn apply_defaults(&mut self, config: &InteractionConfig) {
        let min_state_time = *self.min_state_time.get_or_insert(config.min_state_time);
        self.hover.set_min_state_time(min_state_time);
        self.allow_no_selection.get_or_insert(config.allow_no_selection);
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for Widget<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("size", &self.size)
            .field("region", &self.region)
            .field("button", &self.button)
            .field("group", &self.group)
            .field("layer", &self.layer)
            .field("disabled", &self.disabled)
            .field("hover", &self.hover)
            .finish_non_exhaustive()
    }
}
