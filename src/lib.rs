//! A camera controller for globes and other curved terrain.
//!
//! The camera orbits a center point that stays glued to the terrain surface:
//!
//! - **Pan** slides the center across the surface and turns the camera with it, so you can pan all
//!   the way around a planet and the view stays level.
//! - **Rotate** orbits about the local up vector at the center, with pitch limits.
//! - **Zoom** scales the distance to the center, down to a floor derived from the terrain size.
//!
//! Drags act immediately. Keys and the scroll wheel arm a timed task that keeps moving the camera
//! on every frame until the key is released or, for scroll steps, a short time has passed. With
//! throwing enabled, a drag released while moving keeps going.
//!
//! The core, [`controller::manipulator::EarthManipulator`], knows nothing about Bevy: it takes
//! [`controller::event::InputEvent`]s and terrain queries through the
//! [`controller::terrain::Terrain`] trait. The [`controller::component::EarthCam`] component and
//! [`DefaultEarthCamPlugins`] wire it to Bevy input and a camera [`Transform`](bevy_transform::components::Transform).
//!
//! ```rust,ignore
//! app.add_plugins(DefaultEarthCamPlugins);
//! commands.spawn((
//!     Camera3d::default(),
//!     EarthCam::default(),
//!     GlobeTerrain::new(Ellipsoid::WGS84),
//! ));
//! ```

pub mod controller;

use bevy_app::{PluginGroup, PluginGroupBuilder};

/// Adds all the plugins needed for [`controller::component::EarthCam`] cameras.
pub struct DefaultEarthCamPlugins;

impl PluginGroup for DefaultEarthCamPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>().add(controller::EarthCamPlugin)
    }
}

/// Common imports.
pub mod prelude {
    pub use crate::{
        controller::{
            bindings::{Action, Trigger},
            component::{EarthCam, GlobeTerrain},
            event::{Modifiers, MouseButtons, ScrollMotion},
            manipulator::EarthManipulator,
            pose::HomePose,
            settings::Settings,
            terrain::{BoundingSphere, Ellipsoid, Terrain},
            EarthCamPlugin,
        },
        DefaultEarthCamPlugins,
    };
}
