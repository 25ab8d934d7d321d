//! Interaction events and signal listeners
//!
//! Every state change produced by the runtime is reported as an
//! [`InteractionEvent`]. Events are returned from each runtime entry point and
//! also delivered synchronously to listeners registered on [`Signals`].

use slotmap::{new_key_type, SlotMap};

use crate::button::ButtonState;
use crate::geometry::Point;
use crate::hover::HoverState;
use crate::widget::WidgetId;

new_key_type! {
    /// Handle to a registered listener
    pub struct ListenerId;
}

/// An observable interaction change
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    /// The pointer entered the widget (local position)
    Entered { widget: WidgetId, position: Point },
    /// The pointer left the widget. The stored hover state may still read
    /// `inside` until the debounce delay elapses.
    Exited { widget: WidgetId, position: Point },
    /// The stored hover state was written
    HoverChanged { widget: WidgetId, state: HoverState },
    /// The derived button state changed
    StateChanged {
        widget: WidgetId,
        from: ButtonState,
        to: ButtonState,
    },
}

impl InteractionEvent {
    pub fn kind(&self) -> SignalKind {
        match self {
            InteractionEvent::Entered { .. } => SignalKind::Entered,
            InteractionEvent::Exited { .. } => SignalKind::Exited,
            InteractionEvent::HoverChanged { .. } => SignalKind::HoverChanged,
            InteractionEvent::StateChanged { .. } => SignalKind::StateChanged,
        }
    }

    pub fn widget(&self) -> WidgetId {
        match *self {
            InteractionEvent::Entered { widget, .. }
            | InteractionEvent::Exited { widget, .. }
            | InteractionEvent::HoverChanged { widget, .. }
            | InteractionEvent::StateChanged { widget, .. } => widget,
        }
    }
}

/// Event kinds a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Entered,
    Exited,
    HoverChanged,
    StateChanged,
}

/// Listener callback
pub type Listener = Box<dyn FnMut(&InteractionEvent)>;

struct Registration {
    /// `None` receives every kind
    kind: Option<SignalKind>,
    callback: Listener,
}

/// Synchronous listener registry
///
/// Listeners run in registration order on the caller's thread.
#[derive(Default)]
pub struct Signals {
    listeners: SlotMap<ListenerId, Registration>,
    order: Vec<ListenerId>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event kind
    pub fn on<F>(&mut self, kind: SignalKind, callback: F) -> ListenerId
    where
        F: FnMut(&InteractionEvent) + 'static,
    {
        self.register(Some(kind), Box::new(callback))
    }

    /// Register a listener for every event kind
    pub fn on_any<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&InteractionEvent) + 'static,
    {
        self.register(None, Box::new(callback))
    }

    /// Remove a listener. Returns false if it was already removed.
    pub fn off(&mut self, id: ListenerId) -> bool {
        if self.listeners.remove(id).is_none() {
            return false;
        }
        self.order.retain(|listener| *listener != id);
        true
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver events, in order, to every matching listener
    pub fn emit(&mut self, events: &[InteractionEvent]) {
        if self.order.is_empty() {
            return;
        }
        for event in events {
            let kind = event.kind();
            for id in &self.order {
                if let Some(registration) = self.listeners.get_mut(*id) {
                    if registration.kind.map_or(true, |wanted| wanted == kind) {
                        (registration.callback)(event);
                    }
                }
            }
        }
    }

    fn register(&mut self, kind: Option<SignalKind>, callback: Listener) -> ListenerId {
        let id = self.listeners.insert(Registration { kind, callback });
        self.order.push(id);
        id
    }
}

impl std::fmt::Debug for Signals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signals")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
