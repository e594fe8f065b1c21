//! The primary [`Component`] of the controller, [`EarthCam`], and the terrain it follows.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use bevy_log::prelude::*;
use bevy_transform::prelude::*;
use bevy_window::RequestRedraw;

use super::{
    event::{ActionRequests, InputEvent},
    inputs::PendingInputs,
    manipulator::EarthManipulator,
    settings::Settings,
    terrain::Terrain,
};

/// The terrain an [`EarthCam`] on the same entity follows.
///
/// Adding or replacing this retargets the camera and sends it home. Removing it detaches the
/// camera, which then pans in the plane of its last up vector.
///
/// ```rust,ignore
/// commands.spawn((
///     Camera3d::default(),
///     EarthCam::default(),
///     GlobeTerrain::new(Ellipsoid::WGS84),
/// ));
/// ```
#[derive(Component, Clone)]
pub struct GlobeTerrain(pub Arc<dyn Terrain>);

impl GlobeTerrain {
    /// Wrap a terrain.
    pub fn new(terrain: impl Terrain + 'static) -> Self {
        Self(Arc::new(terrain))
    }
}

impl std::fmt::Debug for GlobeTerrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("GlobeTerrain").field(&self.0.bound()).finish()
    }
}

/// Drives a camera's [`Transform`] with an [`EarthManipulator`].
#[derive(Component, Debug, Default)]
#[require(Transform)]
pub struct EarthCam {
    /// The manipulator turning input into motion.
    pub manipulator: EarthManipulator,
    continuous_update: bool,
}

impl EarthCam {
    /// A camera controller with the given settings.
    pub fn new(settings: impl Into<Arc<Settings>>) -> Self {
        Self {
            manipulator: EarthManipulator::new(settings),
            continuous_update: false,
        }
    }

    /// Has the manipulator asked to be redrawn every frame, for example while a drag is thrown?
    pub fn is_continuous(&self) -> bool {
        self.continuous_update
    }

    /// Feed one event to the manipulator and return what it asked of the render loop.
    pub fn handle(&mut self, event: &InputEvent) -> ActionRequests {
        let mut requests = ActionRequests::default();
        self.manipulator.handle(event, &mut requests);
        if let Some(continuous) = requests.continuous_update {
            self.continuous_update = continuous;
        }
        requests
    }

    /// Point cameras at new terrain when their [`GlobeTerrain`] is added, replaced, or removed.
    pub fn sync_terrain(
        mut cameras: Query<(&mut EarthCam, Option<Ref<GlobeTerrain>>)>,
        mut removed: RemovedComponents<GlobeTerrain>,
        mut redraw: EventWriter<RequestRedraw>,
    ) {
        for entity in removed.read() {
            let Ok((mut camera, None)) = cameras.get_mut(entity) else {
                continue;
            };
            debug!("Terrain removed from camera {entity}");
            camera.manipulator.set_node(None);
        }

        for (mut camera, terrain) in &mut cameras {
            let Some(terrain) = terrain.filter(|terrain| terrain.is_changed()) else {
                continue;
            };
            let bound = terrain.0.bound();
            info!(
                "Camera following terrain bounded by radius {} at {}",
                bound.radius, bound.center
            );
            let mut requests = ActionRequests::default();
            camera.manipulator.set_node(Some(terrain.0.clone()));
            camera.manipulator.home(&mut requests);
            if requests.redraw {
                redraw.write(RequestRedraw);
            }
        }
    }

    /// Hand this update's converted input to every camera.
    pub fn dispatch_inputs(
        mut cameras: Query<&mut EarthCam>,
        mut pending: ResMut<PendingInputs>,
        mut redraw: EventWriter<RequestRedraw>,
    ) {
        let mut needs_redraw = false;
        for mut camera in &mut cameras {
            for event in &pending.0 {
                needs_redraw |= camera.handle(event).redraw;
            }
            needs_redraw |= camera.continuous_update;
        }
        if needs_redraw {
            redraw.write(RequestRedraw);
        }
        pending.0.clear();
    }

    /// Copy each manipulator's pose into its camera's [`Transform`]. Called once per frame.
    pub fn update_camera_positions(mut cameras: Query<(&EarthCam, &mut Transform)>) {
        for (camera, mut transform) in &mut cameras {
            let matrix = camera.manipulator.matrix();
            if !matrix.is_finite() {
                warn_once!("Skipping non-finite camera transform: {matrix}");
                continue;
            }
            transform.set_if_neq(Transform::from_matrix(matrix.as_mat4()));
        }
    }
}
