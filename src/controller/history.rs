//! The two most recent pointer events, used to measure drag deltas and release velocity.

use bevy_math::DVec2;

use super::event::InputEvent;

/// Normalized screen distance per second a release must exceed to count as a throw.
const THROW_VELOCITY: f64 = 0.1;

/// Holds `t0`, the newest event, and `t1`, the one before it.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct InputHistory {
    t0: Option<InputEvent>,
    t1: Option<InputEvent>,
}

impl InputHistory {
    /// Record a new event, shifting the previous newest into the older slot.
    pub fn push(&mut self, event: InputEvent) {
        self.t1 = self.t0.take();
        self.t0 = Some(event);
    }

    /// Forget both events.
    pub fn flush(&mut self) {
        self.t0 = None;
        self.t1 = None;
    }

    /// The newest event.
    pub fn latest(&self) -> Option<&InputEvent> {
        self.t0.as_ref()
    }

    /// The event before the newest.
    pub fn previous(&self) -> Option<&InputEvent> {
        self.t1.as_ref()
    }

    /// Both events, newest first, if both are present.
    fn pair(&self) -> Option<(&InputEvent, &InputEvent)> {
        Some((self.t0.as_ref()?, self.t1.as_ref()?))
    }

    /// Pointer motion from `t1` to `t0` in normalized device coordinates. Zero unless two events
    /// are held.
    pub fn delta(&self) -> DVec2 {
        self.pair()
            .map(|(t0, t1)| t0.position - t1.position)
            .unwrap_or(DVec2::ZERO)
    }

    /// Seconds between `t1` and `t0`. Zero unless two events are held.
    pub fn elapsed(&self) -> f64 {
        self.pair().map(|(t0, t1)| t0.time - t1.time).unwrap_or(0.0)
    }

    /// Was the pointer still moving fast enough at the last event to throw?
    ///
    /// Compares distance against `elapsed * 0.1` instead of dividing, so two events with the same
    /// timestamp count as moving whenever they differ in position at all.
    pub fn is_moving(&self) -> bool {
        if self.pair().is_none() {
            return false;
        }
        self.delta().length() > self.elapsed() * THROW_VELOCITY
    }
}
