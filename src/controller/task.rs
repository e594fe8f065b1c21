//! The single continuous operation the manipulator may have in flight.

use bevy_math::DVec2;

/// Which gesture a [`Task`] repeats.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Idle.
    #[default]
    None,
    /// Repeat [`pan`](super::pan::pan).
    Pan,
    /// Repeat [`rotate`](super::orbit::rotate).
    Rotate,
    /// Repeat [`zoom`](super::zoom::zoom).
    Zoom,
}

/// A gesture applied at a constant rate until its duration runs out or it is cancelled.
///
/// Only one task exists; [`Task::set`] overwrites whatever was running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Task {
    kind: TaskKind,
    /// Gesture units per second.
    rate: DVec2,
    /// Seconds left, possibly infinite.
    remaining: f64,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            kind: TaskKind::None,
            rate: DVec2::ZERO,
            remaining: 0.0,
        }
    }
}

/// One serviced tick of a task: the gesture to run and the delta to run it with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskStep {
    /// The gesture.
    pub kind: TaskKind,
    /// `dt * rate`.
    pub delta: DVec2,
}

impl Task {
    /// Arm the task, replacing whatever was running. Pass [`f64::INFINITY`] for a task that only
    /// ends when cancelled.
    pub fn set(&mut self, kind: TaskKind, dx: f64, dy: f64, duration: f64) {
        *self = Self {
            kind,
            rate: DVec2::new(dx, dy),
            remaining: duration,
        };
    }

    /// Stop immediately.
    pub fn cancel(&mut self) {
        self.kind = TaskKind::None;
    }

    /// The current gesture.
    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Is a gesture in flight?
    pub fn is_active(&self) -> bool {
        self.kind != TaskKind::None
    }

    /// Per second rates.
    pub fn rate(&self) -> DVec2 {
        self.rate
    }

    /// Seconds left.
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    /// Advance by `dt` seconds, returning the step to apply. The task goes idle once its remaining
    /// time reaches zero; the returned step still applies for the tick that got it there.
    pub fn tick(&mut self, dt: f64) -> Option<TaskStep> {
        if !self.is_active() {
            return None;
        }
        let step = TaskStep {
            kind: self.kind,
            delta: self.rate * dt,
        };
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.kind = TaskKind::None;
        }
        Some(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_does_nothing() {
        let mut task = Task::default();
        assert!(!task.is_active());
        assert_eq!(task.tick(0.5), None);
    }

    #[test]
    fn expires_once_duration_is_spent() {
        let mut task = Task::default();
        task.set(TaskKind::Zoom, 0.0, -1.5, 0.2);

        let step = task.tick(0.0625).unwrap();
        assert_eq!(step.kind, TaskKind::Zoom);
        assert_eq!(step.delta, DVec2::new(0.0, -1.5 * 0.0625));
        assert!((task.remaining() - 0.1375).abs() < 1e-12);

        assert!(task.tick(0.0625).is_some());
        assert!(task.tick(0.0625).is_some());
        assert!(task.is_active());
        // Cumulative 0.25 >= 0.2, so this is the last step.
        assert!(task.tick(0.0625).is_some());
        assert!(!task.is_active());
        assert_eq!(task.tick(0.0625), None);
    }

    #[test]
    fn remaining_decreases_by_dt() {
        let mut task = Task::default();
        task.set(TaskKind::Pan, 1.0, 0.0, 1.0);
        let mut expected = 1.0;
        for dt in [0.1, 0.25, 0.05, 0.3] {
            task.tick(dt);
            expected -= dt;
            assert!((task.remaining() - expected).abs() < 1e-12);
        }
        assert!(task.is_active());
    }

    #[test]
    fn infinite_never_expires() {
        let mut task = Task::default();
        task.set(TaskKind::Pan, 1.0, 0.0, f64::INFINITY);
        for _ in 0..10_000 {
            task.tick(1.0e6);
        }
        assert!(task.is_active());
        task.cancel();
        assert!(!task.is_active());
    }

    #[test]
    fn set_overwrites() {
        let mut task = Task::default();
        task.set(TaskKind::Pan, 1.0, 0.0, f64::INFINITY);
        task.set(TaskKind::Rotate, 0.0, 2.0, 0.5);
        assert_eq!(task.kind(), TaskKind::Rotate);
        assert_eq!(task.rate(), DVec2::new(0.0, 2.0));
        assert_eq!(task.remaining(), 0.5);
    }
}
