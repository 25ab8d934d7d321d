//! Combined hover + press button state
//!
//! A button's visual state is derived from two independent axes: whether it
//! is held down and whether the pointer hovers it. The `hovered` axis mirrors
//! the widget's [`HoverState`](crate::hover::HoverState) and is re-synced
//! after every hover write; the `down` axis changes on press/release,
//! programmatic toggling and group arbitration.
//!
//! ```text
//!             enter                      press
//!   Normal ◄─────────► HoverNormal ◄──────────────► HoverDown
//!     ▲        exit                 release             ▲
//!     │ release                                          │ enter
//!     │                                                  │
//!     └──────────────────── Down ◄───────────────────────┘
//!              press (no hover)           exit
//! ```

/// Derived four-value button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    #[default]
    Normal,
    Down,
    HoverNormal,
    HoverDown,
}

impl ButtonState {
    pub fn from_axes(down: bool, hovered: bool) -> Self {
        match (down, hovered) {
            (false, false) => ButtonState::Normal,
            (true, false) => ButtonState::Down,
            (false, true) => ButtonState::HoverNormal,
            (true, true) => ButtonState::HoverDown,
        }
    }

    /// Returns true for `Down` and `HoverDown`
    pub fn is_down(&self) -> bool {
        matches!(self, ButtonState::Down | ButtonState::HoverDown)
    }

    /// Returns true for `HoverNormal` and `HoverDown`
    pub fn is_hovered(&self) -> bool {
        matches!(self, ButtonState::HoverNormal | ButtonState::HoverDown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonState::Normal => "normal",
            ButtonState::Down => "down",
            ButtonState::HoverNormal => "hover_normal",
            ButtonState::HoverDown => "hover_down",
        }
    }

    /// Momentary transition table
    pub fn on_event(&self, event: ButtonEvent) -> Option<Self> {
        match (self, event) {
            // Hover
            (ButtonState::Normal, ButtonEvent::Enter) => Some(ButtonState::HoverNormal),
            (ButtonState::HoverNormal, ButtonEvent::Exit) => Some(ButtonState::Normal),
            (ButtonState::Down, ButtonEvent::Enter) => Some(ButtonState::HoverDown),
            (ButtonState::HoverDown, ButtonEvent::Exit) => Some(ButtonState::Down),

            // Press
            (ButtonState::Normal, ButtonEvent::Press) => Some(ButtonState::Down),
            (ButtonState::HoverNormal, ButtonEvent::Press) => Some(ButtonState::HoverDown),

            // Release
            (ButtonState::HoverDown, ButtonEvent::Release) => Some(ButtonState::HoverNormal),
            (ButtonState::Down, ButtonEvent::Release) => Some(ButtonState::Normal),

            _ => None,
        }
    }
}

impl std::fmt::Display for ButtonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to the button state table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonEvent {
    Enter,
    Exit,
    Press,
    Release,
}

/// How press and release drive the `down` axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonKind {
    /// Down while held
    #[default]
    Momentary,
    /// Each press flips between down and normal; release does nothing
    Toggle,
}

/// A state change `(from, to)`
pub type Transition = (ButtonState, ButtonState);

/// Two-axis button state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonMachine {
    kind: ButtonKind,
    down: bool,
    hovered: bool,
}

impl ButtonMachine {
    pub fn new(kind: ButtonKind) -> Self {
        Self {
            kind,
            down: false,
            hovered: false,
        }
    }

    pub fn kind(&self) -> ButtonKind {
        self.kind
    }

    pub fn state(&self) -> ButtonState {
        ButtonState::from_axes(self.down, self.hovered)
    }

    pub fn is_down(&self) -> bool {
        self.down
    }

    /// Apply a pointer press (after group arbitration allowed it)
    pub fn press(&mut self) -> Option<Transition> {
        match self.kind {
            ButtonKind::Momentary => self.apply(ButtonEvent::Press),
            ButtonKind::Toggle => self.set_down(!self.down),
        }
    }

    /// Apply a pointer release
    pub fn release(&mut self) -> Option<Transition> {
        match self.kind {
            ButtonKind::Momentary => self.apply(ButtonEvent::Release),
            ButtonKind::Toggle => None,
        }
    }

    /// Re-sync the hovered axis with the widget's stored hover state
    pub fn sync_hover(&mut self, inside: bool) -> Option<Transition> {
        let event = if inside {
            ButtonEvent::Enter
        } else {
            ButtonEvent::Exit
        };
        self.apply(event)
    }

    /// Move to the normal family, preserving hover
    pub fn force_up(&mut self) -> Option<Transition> {
        self.set_down(false)
    }

    pub fn set_down(&mut self, down: bool) -> Option<Transition> {
        let from = self.state();
        self.down = down;
        changed(from, self.state())
    }

    fn apply(&mut self, event: ButtonEvent) -> Option<Transition> {
        let from = self.state();
        let to = from.on_event(event)?;
        self.down = to.is_down();
        self.hovered = to.is_hovered();
        Some((from, to))
    }
}

fn changed(from: ButtonState, to: ButtonState) -> Option<Transition> {
    (from != to).then_some((from, to))
}
