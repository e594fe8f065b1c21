//! Maps input to [`Action`]s through an ordered table of [`ActionBinding`]s.

use bevy_input::keyboard::KeyCode;
use bevy_reflect::prelude::*;

use super::event::{EventKind, InputEvent, Modifiers, MouseButtons, ScrollMotion};

/// Everything the manipulator knows how to do.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Action {
    /// Nothing bound.
    #[default]
    Null,
    /// Return to the home pose.
    Home,
    /// Pan by the drag delta.
    Pan,
    /// Pan toward screen left.
    PanLeft,
    /// Pan toward screen right.
    PanRight,
    /// Pan toward screen top.
    PanUp,
    /// Pan toward screen bottom.
    PanDown,
    /// Orbit by the drag delta.
    Rotate,
    /// Orbit azimuth left.
    RotateLeft,
    /// Orbit azimuth right.
    RotateRight,
    /// Tilt up.
    RotateUp,
    /// Tilt down.
    RotateDown,
    /// Zoom by the drag delta.
    Zoom,
    /// Move toward the center.
    ZoomIn,
    /// Move away from the center.
    ZoomOut,
}

/// The axis and sign a discrete [`Action`] moves along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Direction {
    /// Negative screen X.
    Left,
    /// Positive screen X.
    Right,
    /// Positive screen Y.
    Up,
    /// Negative screen Y.
    Down,
    /// Not a directional action.
    NotApplicable,
}

impl Action {
    /// The direction of a discrete action. Total over all actions; continuous ones map to
    /// [`Direction::NotApplicable`].
    pub fn direction(self) -> Direction {
        match self {
            Action::PanLeft | Action::RotateLeft => Direction::Left,
            Action::PanRight | Action::RotateRight => Direction::Right,
            Action::PanUp | Action::RotateUp | Action::ZoomIn => Direction::Up,
            Action::PanDown | Action::RotateDown | Action::ZoomOut => Direction::Down,
            Action::Null | Action::Home | Action::Pan | Action::Rotate | Action::Zoom => {
                Direction::NotApplicable
            }
        }
    }
}

/// The part of an input that selects a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Trigger {
    /// Pointer motion with exactly these buttons held.
    Drag(MouseButtons),
    /// A key going down.
    KeyDown(KeyCode),
    /// The scroll wheel moving in this direction.
    Scroll(ScrollMotion),
}

impl Trigger {
    /// The trigger an event would match, if its kind is bindable at all.
    pub fn from_event(event: &InputEvent) -> Option<Self> {
        match event.kind {
            EventKind::Drag => Some(Trigger::Drag(event.buttons)),
            EventKind::KeyDown(key) => Some(Trigger::KeyDown(key)),
            EventKind::Scroll(motion) => Some(Trigger::Scroll(motion)),
            EventKind::Frame
            | EventKind::Press
            | EventKind::Release
            | EventKind::Move
            | EventKind::KeyUp(_) => None,
        }
    }
}

/// A fully specified input: trigger plus the exact set of modifiers held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub struct InputSpec {
    /// What was pressed, dragged, or scrolled.
    pub trigger: Trigger,
    /// Modifiers held. Matching is exact, not a subset test.
    pub modifiers: Modifiers,
}

impl InputSpec {
    /// Create a new input spec.
    pub fn new(trigger: Trigger, modifiers: Modifiers) -> Self {
        Self { trigger, modifiers }
    }

    /// The spec of an event, if its kind is bindable.
    pub fn from_event(event: &InputEvent) -> Option<Self> {
        Trigger::from_event(event).map(|trigger| Self::new(trigger, event.modifiers))
    }
}

/// One row of the binding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct ActionBinding {
    /// The input that triggers the action.
    pub spec: InputSpec,
    /// The action to take.
    pub action: Action,
}

/// An ordered binding table. The earliest inserted binding that matches wins, so later duplicates
/// are shadowed rather than replaced.
#[derive(Debug, Default, Clone, PartialEq, Reflect)]
pub struct Bindings(Vec<ActionBinding>);

impl Bindings {
    /// Append a binding. Duplicates are kept.
    pub fn bind(&mut self, spec: InputSpec, action: Action) {
        self.0.push(ActionBinding { spec, action });
    }

    /// The action of the first binding whose spec equals `spec`, or [`Action::Null`].
    pub fn resolve(&self, spec: &InputSpec) -> Action {
        self.0
            .iter()
            .find(|binding| binding.spec == *spec)
            .map(|binding| binding.action)
            .unwrap_or(Action::Null)
    }

    /// Resolve the action bound to an event. Unbindable event kinds resolve to [`Action::Null`].
    pub fn resolve_event(&self, event: &InputEvent) -> Action {
        InputSpec::from_event(event)
            .map(|spec| self.resolve(&spec))
            .unwrap_or(Action::Null)
    }

    /// Number of bindings, including shadowed ones.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is the table empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(buttons: MouseButtons) -> InputSpec {
        InputSpec::new(Trigger::Drag(buttons), Modifiers::NONE)
    }

    #[test]
    fn first_match_wins() {
        let mut bindings = Bindings::default();
        bindings.bind(drag(MouseButtons::LEFT), Action::Pan);
        bindings.bind(drag(MouseButtons::LEFT), Action::Rotate);
        bindings.bind(drag(MouseButtons::RIGHT), Action::Zoom);

        assert_eq!(bindings.resolve(&drag(MouseButtons::LEFT)), Action::Pan);
        assert_eq!(bindings.resolve(&drag(MouseButtons::RIGHT)), Action::Zoom);
        assert_eq!(bindings.len(), 3);
    }

    #[test]
    fn unmatched_is_null() {
        let mut bindings = Bindings::default();
        assert_eq!(bindings.resolve(&drag(MouseButtons::LEFT)), Action::Null);

        bindings.bind(drag(MouseButtons::LEFT), Action::Pan);
        // Modifiers and button sets must match exactly.
        let shifted = InputSpec::new(Trigger::Drag(MouseButtons::LEFT), Modifiers::SHIFT);
        assert_eq!(bindings.resolve(&shifted), Action::Null);
        assert_eq!(
            bindings.resolve(&drag(MouseButtons::LEFT | MouseButtons::RIGHT)),
            Action::Null
        );
    }

    #[test]
    fn unbindable_events_resolve_to_null() {
        let mut bindings = Bindings::default();
        bindings.bind(drag(MouseButtons::NONE), Action::Pan);
        let moved = InputEvent::new(EventKind::Move, 0.0);
        assert_eq!(bindings.resolve_event(&moved), Action::Null);
        let dragged = InputEvent::new(EventKind::Drag, 0.0);
        assert_eq!(bindings.resolve_event(&dragged), Action::Pan);
    }

    #[test]
    fn directions() {
        assert_eq!(Action::PanLeft.direction(), Direction::Left);
        assert_eq!(Action::RotateRight.direction(), Direction::Right);
        assert_eq!(Action::ZoomIn.direction(), Direction::Up);
        assert_eq!(Action::ZoomOut.direction(), Direction::Down);
        assert_eq!(Action::RotateDown.direction(), Direction::Down);
        assert_eq!(Action::Zoom.direction(), Direction::NotApplicable);
        assert_eq!(Action::Home.direction(), Direction::NotApplicable);
    }
}
