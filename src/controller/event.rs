//! The minimal view of host input the manipulator works with, and the [`ActionAdapter`] it reports
//! back through.

use bevy_input::keyboard::KeyCode;
use bevy_math::DVec2;
use bevy_reflect::prelude::*;
use bitflags::bitflags;

bitflags! {
    /// A set of mouse buttons held while an event happened.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
    #[reflect(opaque)]
    #[reflect(Hash, PartialEq, Debug)]
    pub struct MouseButtons: u32 {
        /// No buttons held.
        const NONE = 0;
        /// The primary button.
        const LEFT = 1 << 0;
        /// The wheel button.
        const MIDDLE = 1 << 1;
        /// The secondary button.
        const RIGHT = 1 << 2;
    }
}

impl Default for MouseButtons {
    fn default() -> Self {
        Self::empty()
    }
}

bitflags! {
    /// A set of modifier keys held while an event happened. Left and right variants are not
    /// distinguished.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
    #[reflect(opaque)]
    #[reflect(Hash, PartialEq, Debug)]
    pub struct Modifiers: u32 {
        /// No modifiers held.
        const NONE = 0;
        /// Either shift key.
        const SHIFT = 1 << 0;
        /// Either control key.
        const CONTROL = 1 << 1;
        /// Either alt/option key.
        const ALT = 1 << 2;
        /// Either super/command/windows key.
        const SUPER = 1 << 3;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

/// The direction a scroll wheel or trackpad moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ScrollMotion {
    /// Wheel rolled away from the user.
    Up,
    /// Wheel rolled toward the user.
    Down,
    /// Horizontal scroll to the left.
    Left,
    /// Horizontal scroll to the right.
    Right,
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum EventKind {
    /// Once per rendered frame. Drives throw continuation and the active task.
    Frame,
    /// A mouse button went down.
    Press,
    /// A mouse button went up.
    Release,
    /// The pointer moved with no button held.
    Move,
    /// The pointer moved with at least one button held.
    Drag,
    /// A key went down.
    KeyDown(KeyCode),
    /// A key went up.
    KeyUp(KeyCode),
    /// The scroll wheel moved.
    Scroll(ScrollMotion),
}

/// A snapshot of one host input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    /// The event type.
    pub kind: EventKind,
    /// Pointer position in normalized device coordinates, `[-1, 1]` on both axes with +Y up.
    pub position: DVec2,
    /// Seconds on the host's monotonic clock.
    pub time: f64,
    /// Mouse buttons held.
    pub buttons: MouseButtons,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Set when an earlier handler in the host's chain already consumed this event.
    pub handled: bool,
}

impl InputEvent {
    /// An event of the given kind at `time`, with the pointer centered and nothing held.
    pub fn new(kind: EventKind, time: f64) -> Self {
        Self {
            kind,
            position: DVec2::ZERO,
            time,
            buttons: MouseButtons::NONE,
            modifiers: Modifiers::NONE,
            handled: false,
        }
    }

    /// A frame tick at `time`.
    pub fn frame(time: f64) -> Self {
        Self::new(EventKind::Frame, time)
    }

    /// Set the normalized pointer position.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = DVec2::new(x, y);
        self
    }

    /// Set the held mouse buttons.
    #[must_use]
    pub fn with_buttons(mut self, buttons: MouseButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Set the held modifier keys.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Requests the manipulator makes of the host's render loop.
pub trait ActionAdapter {
    /// Render one more frame.
    fn request_redraw(&mut self);
    /// Keep rendering every frame (`true`), or go back to rendering on demand (`false`).
    fn request_continuous_update(&mut self, needed: bool);
}

/// An [`ActionAdapter`] that just remembers what was asked of it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActionRequests {
    /// A redraw was requested since the last [`ActionRequests::take`].
    pub redraw: bool,
    /// The most recent continuous update request, if any.
    pub continuous_update: Option<bool>,
}

impl ActionRequests {
    /// Return the collected requests and reset.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

impl ActionAdapter for ActionRequests {
    fn request_redraw(&mut self) {
        self.redraw = true;
    }

    fn request_continuous_update(&mut self, needed: bool) {
        self.continuous_update = Some(needed);
    }
}
