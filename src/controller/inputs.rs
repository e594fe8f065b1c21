//! Turns Bevy window input into [`InputEvent`]s for the manipulator.

use bevy_ecs::prelude::*;
use bevy_input::{
    keyboard::{KeyCode, KeyboardInput},
    mouse::{MouseButton, MouseButtonInput, MouseWheel},
    ButtonState,
};
use bevy_math::{DVec2, Vec2};
use bevy_time::prelude::*;
use bevy_window::{Window, WindowEvent};

use super::event::{EventKind, InputEvent, Modifiers, MouseButtons, ScrollMotion};

/// Buttons, modifiers, and pointer position, tracked from the window event stream so every
/// converted event carries the state that held when it happened.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// Last normalized pointer position.
    pub position: DVec2,
    /// Mouse buttons held.
    pub buttons: MouseButtons,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

/// Events converted this update, oldest first. The last one is always a frame tick.
#[derive(Resource, Debug, Default, Clone)]
pub struct PendingInputs(pub Vec<InputEvent>);

/// Map a pixel position in a window of `size` logical pixels to `[-1, 1]` on both axes, +Y up.
pub fn normalize_cursor(position: Vec2, size: Vec2) -> Option<DVec2> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return None;
    }
    let position = position.as_dvec2();
    let size = size.as_dvec2();
    Some(DVec2::new(
        2.0 * position.x / size.x - 1.0,
        1.0 - 2.0 * position.y / size.y,
    ))
}

/// The mask bit for a mouse button, if the manipulator knows about it.
pub fn button_mask(button: MouseButton) -> Option<MouseButtons> {
    match button {
        MouseButton::Left => Some(MouseButtons::LEFT),
        MouseButton::Middle => Some(MouseButtons::MIDDLE),
        MouseButton::Right => Some(MouseButtons::RIGHT),
        _ => None,
    }
}

/// The modifier bit for a key, if it is a modifier.
pub fn modifier_mask(key: KeyCode) -> Option<Modifiers> {
    match key {
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Modifiers::SHIFT),
        KeyCode::ControlLeft | KeyCode::ControlRight => Some(Modifiers::CONTROL),
        KeyCode::AltLeft | KeyCode::AltRight => Some(Modifiers::ALT),
        KeyCode::SuperLeft | KeyCode::SuperRight => Some(Modifiers::SUPER),
        _ => None,
    }
}

/// One scroll motion per axis that moved. Positive `y` scrolls up, positive `x` scrolls right.
pub fn scroll_motions(x: f32, y: f32) -> impl Iterator<Item = ScrollMotion> {
    let vertical = if y > 0.0 {
        Some(ScrollMotion::Up)
    } else if y < 0.0 {
        Some(ScrollMotion::Down)
    } else {
        None
    };
    let horizontal = if x > 0.0 {
        Some(ScrollMotion::Right)
    } else if x < 0.0 {
        Some(ScrollMotion::Left)
    } else {
        None
    };
    vertical.into_iter().chain(horizontal)
}

impl PointerState {
    fn event(&self, kind: EventKind, time: f64) -> InputEvent {
        InputEvent {
            kind,
            position: self.position,
            time,
            buttons: self.buttons,
            modifiers: self.modifiers,
            handled: false,
        }
    }

    /// Track `event` and append what it converts to onto `out`. `window_size` looks up the logical
    /// size of the window a cursor event came from.
    pub fn convert(
        &mut self,
        event: &WindowEvent,
        time: f64,
        window_size: impl Fn(Entity) -> Option<Vec2>,
        out: &mut Vec<InputEvent>,
    ) {
        match event {
            WindowEvent::MouseButtonInput(MouseButtonInput { button, state, .. }) => {
                let Some(bit) = button_mask(*button) else {
                    return;
                };
                match state {
                    ButtonState::Pressed => {
                        self.buttons.insert(bit);
                        out.push(self.event(EventKind::Press, time));
                    }
                    ButtonState::Released => {
                        self.buttons.remove(bit);
                        out.push(self.event(EventKind::Release, time));
                    }
                }
            }
            WindowEvent::CursorMoved(moved) => {
                let Some(position) =
                    window_size(moved.window).and_then(|size| normalize_cursor(moved.position, size))
                else {
                    return;
                };
                self.position = position;
                let kind = if self.buttons.is_empty() {
                    EventKind::Move
                } else {
                    EventKind::Drag
                };
                out.push(self.event(kind, time));
            }
            WindowEvent::MouseWheel(MouseWheel { x, y, .. }) => {
                out.extend(
                    scroll_motions(*x, *y).map(|motion| self.event(EventKind::Scroll(motion), time)),
                );
            }
            WindowEvent::KeyboardInput(KeyboardInput {
                key_code,
                state,
                repeat,
                ..
            }) => {
                if let Some(bit) = modifier_mask(*key_code) {
                    match state {
                        ButtonState::Pressed => self.modifiers.insert(bit),
                        ButtonState::Released => self.modifiers.remove(bit),
                    }
                }
                match state {
                    ButtonState::Pressed if *repeat => {}
                    ButtonState::Pressed => out.push(self.event(EventKind::KeyDown(*key_code), time)),
                    ButtonState::Released => out.push(self.event(EventKind::KeyUp(*key_code), time)),
                }
            }
            _ => {}
        }
    }

    /// Convert this update's window events into [`PendingInputs`], followed by a frame tick.
    pub fn collect(
        mut window_events: EventReader<WindowEvent>,
        windows: Query<&Window>,
        time: Res<Time>,
        mut state: ResMut<PointerState>,
        mut pending: ResMut<PendingInputs>,
    ) {
        let now = time.elapsed_secs_f64();
        let window_size = |entity| windows.get(entity).ok().map(|w| Vec2::new(w.width(), w.height()));
        for event in window_events.read() {
            state.convert(event, now, window_size, &mut pending.0);
        }
        pending.0.push(InputEvent::frame(now));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy_ecs::{event::Events, system::RunSystemOnce};
    use bevy_input::{keyboard::Key, mouse::MouseScrollUnit};
    use bevy_window::CursorMoved;

    use super::*;

    fn window() -> Entity {
        Entity::from_raw(7)
    }

    fn size(_: Entity) -> Option<Vec2> {
        Some(Vec2::new(800.0, 600.0))
    }

    fn button(button: MouseButton, state: ButtonState) -> WindowEvent {
        WindowEvent::MouseButtonInput(MouseButtonInput {
            button,
            state,
            window: window(),
        })
    }

    fn cursor(x: f32, y: f32) -> WindowEvent {
        WindowEvent::CursorMoved(CursorMoved {
            window: window(),
            position: Vec2::new(x, y),
            delta: None,
        })
    }

    fn key(key_code: KeyCode, state: ButtonState, repeat: bool) -> WindowEvent {
        WindowEvent::KeyboardInput(KeyboardInput {
            key_code,
            logical_key: Key::Unidentified(bevy_input::keyboard::NativeKey::Unidentified),
            state,
            text: None,
            repeat,
            window: window(),
        })
    }

    #[test]
    fn cursor_is_normalized_with_y_up() {
        let size = Vec2::new(800.0, 600.0);
        assert_eq!(normalize_cursor(Vec2::ZERO, size), Some(DVec2::new(-1.0, 1.0)));
        assert_eq!(normalize_cursor(size, size), Some(DVec2::new(1.0, -1.0)));
        assert_eq!(normalize_cursor(size / 2.0, size), Some(DVec2::ZERO));
        assert_eq!(normalize_cursor(Vec2::ONE, Vec2::ZERO), None);
    }

    #[test]
    fn motion_with_a_button_held_is_a_drag() {
        let mut state = PointerState::default();
        let mut out = Vec::new();
        state.convert(&cursor(400.0, 300.0), 0.0, size, &mut out);
        state.convert(&button(MouseButton::Left, ButtonState::Pressed), 0.1, size, &mut out);
        state.convert(&cursor(600.0, 300.0), 0.2, size, &mut out);
        state.convert(&button(MouseButton::Left, ButtonState::Released), 0.3, size, &mut out);
        state.convert(&cursor(400.0, 300.0), 0.4, size, &mut out);

        let kinds: Vec<_> = out.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [
                EventKind::Move,
                EventKind::Press,
                EventKind::Drag,
                EventKind::Release,
                EventKind::Move
            ]
        );
        assert_eq!(out[1].buttons, MouseButtons::LEFT);
        assert_eq!(out[2].buttons, MouseButtons::LEFT);
        assert_eq!(out[2].position, DVec2::new(0.5, 0.0));
        assert_eq!(out[2].time, 0.2);
        assert!(out[3].buttons.is_empty());
        // Release keeps the last pointer position.
        assert_eq!(out[3].position, DVec2::new(0.5, 0.0));
    }

    #[test]
    fn unknown_buttons_and_windows_are_ignored() {
        let mut state = PointerState::default();
        let mut out = Vec::new();
        state.convert(&button(MouseButton::Back, ButtonState::Pressed), 0.0, size, &mut out);
        state.convert(&cursor(10.0, 10.0), 0.0, |_| None, &mut out);
        assert!(out.is_empty());
        assert_eq!(state, PointerState::default());
    }

    #[test]
    fn modifiers_are_tracked_in_order() {
        let mut state = PointerState::default();
        let mut out = Vec::new();
        state.convert(&key(KeyCode::ShiftLeft, ButtonState::Pressed, false), 0.0, size, &mut out);
        state.convert(&key(KeyCode::ArrowUp, ButtonState::Pressed, false), 0.0, size, &mut out);
        state.convert(&key(KeyCode::ShiftLeft, ButtonState::Released, false), 0.0, size, &mut out);
        state.convert(&key(KeyCode::ArrowUp, ButtonState::Released, false), 0.0, size, &mut out);

        assert_eq!(out.len(), 4);
        assert_eq!(out[1].kind, EventKind::KeyDown(KeyCode::ArrowUp));
        assert_eq!(out[1].modifiers, Modifiers::SHIFT);
        assert_eq!(out[3].kind, EventKind::KeyUp(KeyCode::ArrowUp));
        assert_eq!(out[3].modifiers, Modifiers::NONE);
    }

    #[test]
    fn key_repeat_is_dropped() {
        let mut state = PointerState::default();
        let mut out = Vec::new();
        state.convert(&key(KeyCode::ArrowLeft, ButtonState::Pressed, false), 0.0, size, &mut out);
        state.convert(&key(KeyCode::ArrowLeft, ButtonState::Pressed, true), 0.1, size, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn wheel_scrolls_per_axis() {
        let mut state = PointerState::default();
        let mut out = Vec::new();
        let wheel = |x, y| {
            WindowEvent::MouseWheel(MouseWheel {
                unit: MouseScrollUnit::Line,
                x,
                y,
                window: window(),
            })
        };
        state.convert(&wheel(0.0, 1.0), 0.0, size, &mut out);
        state.convert(&wheel(-2.0, -3.0), 0.0, size, &mut out);
        state.convert(&wheel(0.0, 0.0), 0.0, size, &mut out);
        let kinds: Vec<_> = out.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [
                EventKind::Scroll(ScrollMotion::Up),
                EventKind::Scroll(ScrollMotion::Down),
                EventKind::Scroll(ScrollMotion::Left),
            ]
        );
    }

    #[test]
    fn events_in_one_update_share_its_time() {
        let mut world = World::new();
        world.init_resource::<Events<WindowEvent>>();
        world.init_resource::<PointerState>();
        world.init_resource::<PendingInputs>();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(1500));
        world.insert_resource(time);

        world.send_event(button(MouseButton::Left, ButtonState::Pressed));
        world.send_event(key(KeyCode::ArrowUp, ButtonState::Pressed, false));
        world.run_system_once(PointerState::collect).unwrap();

        let pending = &world.resource::<PendingInputs>().0;
        let kinds: Vec<_> = pending.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [
                EventKind::Press,
                EventKind::KeyDown(KeyCode::ArrowUp),
                EventKind::Frame
            ]
        );
        // Window events carry no timestamps of their own.
        assert!(pending.iter().all(|e| e.time == 1.5));
    }
}
