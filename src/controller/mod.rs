//! A globe camera controller: a host-agnostic [`manipulator`] plus the Bevy plumbing that feeds it.

pub mod bindings;
pub mod component;
pub mod event;
pub mod history;
pub mod inputs;
pub mod manipulator;
pub mod orbit;
pub mod pan;
pub mod pose;
pub mod probe;
pub mod settings;
pub mod task;
pub mod terrain;
pub mod zoom;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use bevy_window::{RequestRedraw, WindowEvent};

use self::{
    component::EarthCam,
    inputs::{PendingInputs, PointerState},
};

/// Adds [`EarthCam`] input handling and camera updates.
pub struct EarthCamPlugin;

impl Plugin for EarthCamPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>()
            .init_resource::<PendingInputs>()
            .add_event::<WindowEvent>()
            .add_event::<RequestRedraw>()
            .add_systems(
                PreUpdate,
                (
                    PointerState::collect,
                    EarthCam::sync_terrain,
                    EarthCam::dispatch_inputs,
                    EarthCam::update_camera_positions,
                )
                    .chain()
                    .after(bevy_input::InputSystem),
            )
            .register_type::<settings::Settings>()
            .register_type::<bindings::Bindings>()
            .register_type::<bindings::ActionBinding>()
            .register_type::<bindings::InputSpec>()
            .register_type::<bindings::Trigger>()
            .register_type::<bindings::Action>()
            .register_type::<event::MouseButtons>()
            .register_type::<event::Modifiers>()
            .register_type::<event::ScrollMotion>()
            .register_type::<event::EventKind>();
    }
}
