//! Tactile Core
//!
//! Pointer interaction behaviors for retained widget trees:
//!
//! - **Hover Detection**: inside/outside tracking with a debounced exit
//! - **Button States**: press and hover combined into one four-value state
//! - **Toggle Groups**: mutually exclusive selection with stale-handle purging
//! - **Hit Testing**: pluggable per-widget hit tests in local coordinates
//!
//! Time is supplied by the host: every entry point takes `now` as a
//! [`Duration`](std::time::Duration) since an arbitrary epoch.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use tactile_core::{ButtonState, Interactions, Size, Widget};
//!
//! let mut ui: Interactions = Interactions::new();
//! let a = ui.insert(Widget::new(Size::new(40.0, 20.0)).toggle().group("tabs".to_string()));
//! let b = ui.insert(Widget::new(Size::new(40.0, 20.0)).at(50.0, 0.0).toggle().group("tabs".to_string()));
//!
//! ui.pointer_down((10.0, 10.0), Duration::ZERO);
//! ui.pointer_up(Duration::ZERO);
//! assert_eq!(ui.button_state(a), Some(ButtonState::Down));
//!
//! ui.pointer_down((60.0, 10.0), Duration::from_millis(100));
//! ui.pointer_up(Duration::from_millis(100));
//! assert_eq!(ui.button_state(a), Some(ButtonState::Normal));
//! assert_eq!(ui.button_state(b), Some(ButtonState::Down));
//! ```

pub mod button;
pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod group;
pub mod hover;
pub mod layers;
pub mod runtime;
pub mod timer;
pub mod widget;


pub use button::{ButtonEvent, ButtonKind, ButtonMachine, ButtonState};
pub use config::InteractionConfig;
pub use error::{ConfigError, Result};
pub use events::{InteractionEvent, ListenerId, SignalKind, Signals};
pub use geometry::{CoordinateSpace, HoverRegion, Nested, Point, Rect, ScaleTranslate, Size, Translation};
pub use group::{Arbitration, GroupMembers, ToggleGroups};
pub use hit_test::{HitGeometry, HitTest, RectHitTest};
pub use hover::{HoverState, HoverStep, HoverTracker};
pub use layers::HoverLayers;
pub use runtime::{InteractionStats, Interactions};
pub use timer::{Scheduler, TimerId, TimerQueue, TimerTask};
pub use widget::{Widget, WidgetId};
