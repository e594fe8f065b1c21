//! Provides [`Settings`], the manipulator's bindings and tuning knobs.

use bevy_input::keyboard::KeyCode;
use bevy_reflect::prelude::*;

use super::{
    bindings::{Action, Bindings, InputSpec, Trigger},
    event::{Modifiers, MouseButtons, ScrollMotion},
};

/// Bindings plus sensitivities and limits.
///
/// The manipulator holds this as an immutable value. To change settings at runtime build a new one
/// and hand it to [`EarthManipulator::apply_settings`](super::manipulator::EarthManipulator::apply_settings),
/// which also cancels whatever task was running.
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct Settings {
    /// Ordered input to action table.
    pub bindings: Bindings,
    /// Keep moving after a drag is released while the pointer was still moving.
    pub throwing: bool,
    /// Restrict rotation to one axis at a time. Stored for hosts; the manipulator does not read it.
    pub single_axis_rotation: bool,
    /// Keep north up. Stored for hosts; the manipulator does not read it.
    pub force_north_up: bool,
    /// Multiplier on drag deltas.
    pub mouse_sensitivity: f64,
    /// Multiplier on key press steps.
    pub keyboard_sensitivity: f64,
    /// Multiplier on scroll steps.
    pub scroll_sensitivity: f64,
    /// Lowest allowed local pitch, in degrees.
    pub min_pitch: f64,
    /// Highest allowed local pitch, in degrees.
    pub max_pitch: f64,
}

impl Settings {
    /// Settings with no bindings at all.
    pub fn unbound() -> Self {
        Self {
            bindings: Bindings::default(),
            throwing: false,
            single_axis_rotation: false,
            force_north_up: false,
            mouse_sensitivity: 1.0,
            keyboard_sensitivity: 1.0,
            scroll_sensitivity: 1.0,
            min_pitch: -90.0,
            max_pitch: -10.0,
        }
    }

    /// Append a binding.
    pub fn bind(&mut self, trigger: Trigger, modifiers: Modifiers, action: Action) {
        self.bindings.bind(InputSpec::new(trigger, modifiers), action);
    }

    /// Append a binding, builder style.
    #[must_use = "with_binding returns modified Settings"]
    pub fn with_binding(mut self, trigger: Trigger, modifiers: Modifiers, action: Action) -> Self {
        self.bind(trigger, modifiers, action);
        self
    }

    /// Enable or disable throwing.
    #[must_use = "with_throwing returns modified Settings"]
    pub fn with_throwing(self, throwing: bool) -> Self {
        Self { throwing, ..self }
    }

    /// Set the pitch limits in degrees. The values are stored as given.
    #[must_use = "with_pitch_range returns modified Settings"]
    pub fn with_pitch_range(self, min_pitch: f64, max_pitch: f64) -> Self {
        Self {
            min_pitch,
            max_pitch,
            ..self
        }
    }

    /// Set the drag sensitivity.
    #[must_use = "with_mouse_sensitivity returns modified Settings"]
    pub fn with_mouse_sensitivity(self, mouse_sensitivity: f64) -> Self {
        Self {
            mouse_sensitivity,
            ..self
        }
    }

    /// Set the key press sensitivity.
    #[must_use = "with_keyboard_sensitivity returns modified Settings"]
    pub fn with_keyboard_sensitivity(self, keyboard_sensitivity: f64) -> Self {
        Self {
            keyboard_sensitivity,
            ..self
        }
    }

    /// Set the scroll sensitivity.
    #[must_use = "with_scroll_sensitivity returns modified Settings"]
    pub fn with_scroll_sensitivity(self, scroll_sensitivity: f64) -> Self {
        Self {
            scroll_sensitivity,
            ..self
        }
    }

    /// The action bound to a trigger and modifier set.
    pub fn action(&self, trigger: Trigger, modifiers: Modifiers) -> Action {
        self.bindings.resolve(&InputSpec::new(trigger, modifiers))
    }

    /// Pitch limits converted to radians, `(min, max)`.
    pub fn pitch_range_radians(&self) -> (f64, f64) {
        (self.min_pitch.to_radians(), self.max_pitch.to_radians())
    }
}

impl Default for Settings {
    /// Space goes home, left drag pans, right drag zooms, middle or left+right drag orbits, the
    /// wheel zooms, and the arrow keys pan.
    fn default() -> Self {
        let none = Modifiers::NONE;
        Self::unbound()
            .with_binding(Trigger::KeyDown(KeyCode::Space), none, Action::Home)
            .with_binding(Trigger::Drag(MouseButtons::LEFT), none, Action::Pan)
            .with_binding(Trigger::Drag(MouseButtons::RIGHT), none, Action::Zoom)
            .with_binding(Trigger::Drag(MouseButtons::MIDDLE), none, Action::Rotate)
            .with_binding(
                Trigger::Drag(MouseButtons::LEFT | MouseButtons::RIGHT),
                none,
                Action::Rotate,
            )
            .with_binding(Trigger::Scroll(ScrollMotion::Up), none, Action::ZoomIn)
            .with_binding(Trigger::Scroll(ScrollMotion::Down), none, Action::ZoomOut)
            .with_scroll_sensitivity(1.5)
            .with_binding(Trigger::KeyDown(KeyCode::ArrowLeft), none, Action::PanLeft)
            .with_binding(Trigger::KeyDown(KeyCode::ArrowRight), none, Action::PanRight)
            .with_binding(Trigger::KeyDown(KeyCode::ArrowUp), none, Action::PanUp)
            .with_binding(Trigger::KeyDown(KeyCode::ArrowDown), none, Action::PanDown)
            .with_throwing(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings() {
        let settings = Settings::default();
        let none = Modifiers::NONE;
        let cases = [
            (Trigger::KeyDown(KeyCode::Space), Action::Home),
            (Trigger::Drag(MouseButtons::LEFT), Action::Pan),
            (Trigger::Drag(MouseButtons::RIGHT), Action::Zoom),
            (Trigger::Drag(MouseButtons::MIDDLE), Action::Rotate),
            (
                Trigger::Drag(MouseButtons::LEFT | MouseButtons::RIGHT),
                Action::Rotate,
            ),
            (Trigger::Scroll(ScrollMotion::Up), Action::ZoomIn),
            (Trigger::Scroll(ScrollMotion::Down), Action::ZoomOut),
            (Trigger::KeyDown(KeyCode::ArrowLeft), Action::PanLeft),
            (Trigger::KeyDown(KeyCode::ArrowRight), Action::PanRight),
            (Trigger::KeyDown(KeyCode::ArrowUp), Action::PanUp),
            (Trigger::KeyDown(KeyCode::ArrowDown), Action::PanDown),
        ];
        for (trigger, action) in cases {
            assert_eq!(settings.action(trigger, none), action, "{trigger:?}");
        }
        assert_eq!(
            settings.action(Trigger::Drag(MouseButtons::LEFT), Modifiers::CONTROL),
            Action::Null
        );
        assert_eq!(settings.scroll_sensitivity, 1.5);
        assert_eq!(settings.mouse_sensitivity, 1.0);
        assert!(!settings.throwing);
    }

    #[test]
    fn unbound_has_no_bindings() {
        let settings = Settings::unbound();
        assert!(settings.bindings.is_empty());
        assert_eq!((settings.min_pitch, settings.max_pitch), (-90.0, -10.0));
    }

    #[test]
    fn pitch_range_is_stored_unclamped() {
        let settings = Settings::unbound().with_pitch_range(10.0, -10.0);
        assert_eq!((settings.min_pitch, settings.max_pitch), (10.0, -10.0));
        let (min, max) = settings.pitch_range_radians();
        assert!((min - 10f64.to_radians()).abs() < 1e-12);
        assert!((max + 10f64.to_radians()).abs() < 1e-12);
    }
}
