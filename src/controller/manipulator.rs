//! [`EarthManipulator`], the state machine turning input events into camera motion.

use std::sync::Arc;

use bevy_log::prelude::*;
use bevy_math::{DMat4, DVec2, DVec3};

use super::{
    bindings::{Action, Direction},
    event::{ActionAdapter, EventKind, InputEvent},
    history::InputHistory,
    orbit::rotate,
    pan::pan,
    pose::{self, HomePose, Pose, HOME_PITCH_DEGREES},
    probe::TerrainProbe,
    settings::Settings,
    task::{Task, TaskKind},
    terrain::Terrain,
    zoom::{self, zoom, MINIMUM_DISTANCE_FLOOR},
};

/// How long a single scroll step keeps zooming, in seconds.
pub const SCROLL_DURATION: f64 = 0.2;

/// Gesture units of one key press or scroll step, before sensitivity.
const DISCRETE_DELTA: f64 = 1.0;

/// A camera manipulator for globes and other curved terrain.
///
/// Feed it every input event and one [`EventKind::Frame`] per rendered frame with
/// [`EarthManipulator::handle`], then read the camera transform back with
/// [`EarthManipulator::matrix`]. All state changes happen synchronously inside those calls.
///
/// Drags move the camera immediately. Keys and the scroll wheel arm a [`Task`] instead, which is
/// advanced by elapsed time on each frame: keys until they are released, scroll steps for
/// [`SCROLL_DURATION`]. With throwing enabled, releasing a drag while the pointer is still moving
/// keeps repeating the last drag step every frame until the next input.
pub struct EarthManipulator {
    settings: Arc<Settings>,
    history: InputHistory,
    task: Task,
    pose: Pose,
    node: Option<Arc<dyn Terrain>>,
    home: HomePose,
    auto_compute_home: bool,
    minimum_distance: f64,
    thrown: bool,
    last_action: Action,
    last_frame_time: Option<f64>,
}

impl Default for EarthManipulator {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl std::fmt::Debug for EarthManipulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EarthManipulator")
            .field("settings", &self.settings)
            .field("history", &self.history)
            .field("task", &self.task)
            .field("pose", &self.pose)
            .field("node", &self.node.as_ref().map(|node| node.bound()))
            .field("home", &self.home)
            .field("auto_compute_home", &self.auto_compute_home)
            .field("minimum_distance", &self.minimum_distance)
            .field("thrown", &self.thrown)
            .field("last_action", &self.last_action)
            .field("last_frame_time", &self.last_frame_time)
            .finish()
    }
}

/// Borrow the attached terrain for probing.
fn probe_of(node: Option<&Arc<dyn Terrain>>) -> Option<TerrainProbe<'_>> {
    node.map(|terrain| TerrainProbe::new(&**terrain))
}

impl EarthManipulator {
    /// A manipulator with the given settings and no terrain.
    pub fn new(settings: impl Into<Arc<Settings>>) -> Self {
        Self {
            settings: settings.into(),
            history: InputHistory::default(),
            task: Task::default(),
            pose: Pose::default(),
            node: None,
            home: HomePose::default(),
            auto_compute_home: true,
            minimum_distance: MINIMUM_DISTANCE_FLOOR,
            thrown: false,
            last_action: Action::Null,
            last_frame_time: None,
        }
    }

    /// Attach terrain, builder style. See [`EarthManipulator::set_node`].
    #[must_use = "with_node returns a modified EarthManipulator"]
    pub fn with_node(mut self, node: Arc<dyn Terrain>) -> Self {
        self.set_node(Some(node));
        self
    }

    /// The active settings.
    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    /// Replace the settings. Cancels the running task and forgets input history, since both were
    /// produced under the old bindings.
    pub fn apply_settings(&mut self, settings: impl Into<Arc<Settings>>) {
        self.settings = settings.into();
        self.task.cancel();
        self.history.flush();
    }

    /// Attach terrain to follow, or detach with `None`. Updates the minimum distance from the
    /// terrain bounds and, if enabled, the home pose.
    pub fn set_node(&mut self, node: Option<Arc<dyn Terrain>>) {
        self.node = node;
        if let Some(node) = &self.node {
            self.minimum_distance = zoom::minimum_distance(&node.bound());
        }
        if self.auto_compute_home {
            self.compute_home_position();
        }
    }

    /// The attached terrain.
    pub fn node(&self) -> Option<&Arc<dyn Terrain>> {
        self.node.as_ref()
    }

    /// Reset input tracking. Call when the manipulator becomes the active one.
    pub fn init(&mut self) {
        self.history.flush();
    }

    /// Recompute the home pose from the terrain bounds. Does nothing without terrain.
    pub fn compute_home_position(&mut self) {
        if let Some(node) = &self.node {
            self.home = HomePose::from_bound(&node.bound());
        }
    }

    /// Set the home pose. It is only used as given while auto-compute is off.
    pub fn set_home_position(&mut self, home: HomePose) {
        self.home = home;
    }

    /// The home pose.
    pub fn home_position(&self) -> &HomePose {
        &self.home
    }

    /// Should the home pose follow the terrain bounds?
    pub fn set_auto_compute_home_position(&mut self, auto_compute: bool) {
        self.auto_compute_home = auto_compute;
    }

    /// Does the home pose follow the terrain bounds?
    pub fn auto_compute_home_position(&self) -> bool {
        self.auto_compute_home
    }

    /// Jump to the home pose, looking straight down.
    pub fn home<A: ActionAdapter + ?Sized>(&mut self, actions: &mut A) {
        self.go_home();
        self.pose.local_pitch = HOME_PITCH_DEGREES.to_radians();
        actions.request_redraw();
    }

    fn go_home(&mut self) {
        if self.auto_compute_home {
            self.compute_home_position();
        }
        let HomePose { eye, center, up } = self.home;
        self.set_by_look_at(eye, center, up);
    }

    /// The camera's world transform.
    pub fn matrix(&self) -> DMat4 {
        self.pose.matrix()
    }

    /// The view matrix.
    pub fn inverse_matrix(&self) -> DMat4 {
        self.pose.inverse_matrix()
    }

    /// Set the pose from a camera world transform. See [`pose::set_by_matrix`].
    pub fn set_by_matrix(&mut self, matrix: &DMat4) {
        let probe = probe_of(self.node.as_ref());
        self.pose = pose::set_by_matrix(&self.pose, matrix, probe.as_ref());
    }

    /// Look from `eye` toward `center`. Does nothing without terrain. See
    /// [`pose::set_by_look_at`].
    pub fn set_by_look_at(&mut self, eye: DVec3, center: DVec3, up: DVec3) {
        let Some(probe) = probe_of(self.node.as_ref()) else {
            return;
        };
        self.pose = pose::set_by_look_at(&self.pose, eye, center, up, &probe);
    }

    /// The current pose.
    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    /// The task in flight, if any.
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// The input history.
    pub fn history(&self) -> &InputHistory {
        &self.history
    }

    /// The last non-null action an event resolved to.
    pub fn last_action(&self) -> Action {
        self.last_action
    }

    /// Is a released drag still being continued?
    pub fn is_thrown(&self) -> bool {
        self.thrown
    }

    /// The closest the camera may get to its center.
    pub fn minimum_distance(&self) -> f64 {
        self.minimum_distance
    }

    /// Process one event. Returns whether the event was consumed; frame events never are.
    pub fn handle<A: ActionAdapter + ?Sized>(&mut self, event: &InputEvent, actions: &mut A) -> bool {
        let (handled, action) = match event.kind {
            EventKind::Frame => {
                self.handle_frame(event.time, actions);
                return false;
            }
            _ if event.handled => return false,
            EventKind::Press => {
                self.reset_mouse(actions);
                self.history.push(*event);
                (true, Action::Null)
            }
            EventKind::Release => {
                let mut action = Action::Null;
                if self.settings.throwing && self.history.is_moving() {
                    action = self.last_action;
                    if self.handle_mouse_action(action) {
                        actions.request_redraw();
                        actions.request_continuous_update(true);
                        self.thrown = true;
                    }
                } else {
                    self.reset_mouse(actions);
                    self.history.push(*event);
                }
                (true, action)
            }
            EventKind::Move => (false, Action::Null),
            EventKind::Drag => {
                let action = self.settings.bindings.resolve_event(event);
                self.history.push(*event);
                if self.handle_mouse_action(action) {
                    actions.request_redraw();
                }
                actions.request_continuous_update(false);
                self.thrown = false;
                (true, action)
            }
            EventKind::KeyDown(_) => {
                self.reset_mouse(actions);
                let action = self.settings.bindings.resolve_event(event);
                let sensitivity = self.settings.keyboard_sensitivity;
                if self.handle_discrete_action(action, sensitivity, f64::INFINITY) {
                    actions.request_redraw();
                }
                (true, action)
            }
            EventKind::KeyUp(_) => {
                self.reset_mouse(actions);
                self.task.cancel();
                (true, Action::Null)
            }
            EventKind::Scroll(_) => {
                self.reset_mouse(actions);
                self.history.push(*event);
                let action = self.settings.bindings.resolve_event(event);
                let sensitivity = self.settings.scroll_sensitivity;
                if self.handle_discrete_action(action, sensitivity, SCROLL_DURATION) {
                    actions.request_redraw();
                }
                (true, action)
            }
        };

        if handled && action != Action::Null {
            self.last_action = action;
        }
        handled
    }

    fn handle_frame<A: ActionAdapter + ?Sized>(&mut self, now: f64, actions: &mut A) {
        if self.thrown {
            if self.handle_mouse_action(self.last_action) {
                actions.request_redraw();
            }
            debug!("Throwing, action = {:?}", self.last_action);
        }
        if self.service_task(now) {
            actions.request_redraw();
        }
    }

    /// Advance the task to `now` (seconds) and apply its step. Returns whether the camera moved.
    ///
    /// The elapsed time is always measured from the previous call, whether or not a task was
    /// running then. The very first call sees no elapsed time.
    pub fn service_task(&mut self, now: f64) -> bool {
        let dt = self.last_frame_time.map_or(0.0, |last| now - last);
        let moved = match self.task.tick(dt) {
            Some(step) => {
                self.apply_gesture(step.kind, step.delta);
                true
            }
            None => false,
        };
        self.last_frame_time = Some(now);
        moved
    }

    fn reset_mouse<A: ActionAdapter + ?Sized>(&mut self, actions: &mut A) {
        self.history.flush();
        actions.request_continuous_update(false);
        self.thrown = false;
    }

    /// Apply the latest drag step for `action`. Continuous actions move the camera right away,
    /// anything else arms the task with the step as its rate.
    fn handle_mouse_action(&mut self, action: Action) -> bool {
        let delta = self.history.delta();
        if delta == DVec2::ZERO {
            return false;
        }
        let delta = delta * self.settings.mouse_sensitivity;

        match action {
            Action::Pan => self.apply_gesture(TaskKind::Pan, delta),
            Action::Rotate => self.apply_gesture(TaskKind::Rotate, delta),
            Action::Zoom => self.apply_gesture(TaskKind::Zoom, delta),
            _ => return self.handle_action(action, delta, f64::INFINITY),
        }
        true
    }

    /// Turn a key press or scroll step into a fixed step along the action's direction.
    fn handle_discrete_action(&mut self, action: Action, sensitivity: f64, duration: f64) -> bool {
        let step = match action.direction() {
            Direction::Left => DVec2::new(DISCRETE_DELTA, 0.0),
            Direction::Right => DVec2::new(-DISCRETE_DELTA, 0.0),
            Direction::Up => DVec2::new(0.0, -DISCRETE_DELTA),
            Direction::Down => DVec2::new(0.0, DISCRETE_DELTA),
            Direction::NotApplicable => DVec2::ZERO,
        };
        self.handle_action(action, step * sensitivity, duration)
    }

    fn handle_action(&mut self, action: Action, delta: DVec2, duration: f64) -> bool {
        let kind = match action {
            Action::Null => return false,
            Action::Home => {
                self.go_home();
                return true;
            }
            Action::Pan
            | Action::PanLeft
            | Action::PanRight
            | Action::PanUp
            | Action::PanDown => TaskKind::Pan,
            Action::Rotate
            | Action::RotateLeft
            | Action::RotateRight
            | Action::RotateUp
            | Action::RotateDown => TaskKind::Rotate,
            Action::Zoom | Action::ZoomIn | Action::ZoomOut => TaskKind::Zoom,
        };
        self.task.set(kind, delta.x, delta.y, duration);
        true
    }

    fn apply_gesture(&mut self, kind: TaskKind, delta: DVec2) {
        let probe = probe_of(self.node.as_ref());
        self.pose = match kind {
            TaskKind::None => self.pose,
            TaskKind::Pan => pan(&self.pose, delta, probe.as_ref()),
            TaskKind::Rotate => rotate(
                &self.pose,
                delta,
                self.settings.pitch_range_radians(),
                probe.as_ref(),
            ),
            TaskKind::Zoom => zoom(&self.pose, delta, self.minimum_distance),
        };
    }
}
