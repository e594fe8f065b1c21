//! A sphere you can pan around, orbit, and zoom into.

use bevy::prelude::*;
use bevy_earth_cam::prelude::{DefaultEarthCamPlugins, EarthCam, Ellipsoid, GlobeTerrain, Settings};

const RADIUS: f32 = 1000.0;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            DefaultEarthCamPlugins, // Step 1: Add camera controller plugin
        ))
        .add_systems(Startup, (setup_camera, setup_scene))
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            near: 0.1,
            far: 100.0 * RADIUS,
            ..default()
        }),
        // Step 2: add the controller and the terrain it should follow
        EarthCam::new(Settings::default().with_throwing(true)),
        GlobeTerrain::new(Ellipsoid::sphere(RADIUS as f64)),
    ));
}

//
// --- The below code is not important for the example ---
//

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(RADIUS).mesh().uv(128, 64))),
        MeshMaterial3d(materials.add(Color::srgb(0.25, 0.45, 0.3))),
    ));
    commands.spawn((
        DirectionalLight::default(),
        Transform::from_xyz(1.0, -1.0, 1.0).looking_at(Vec3::ZERO, Vec3::Z),
    ));

    let text = "Left Mouse - Pan\nMiddle Mouse - Orbit\nRight Mouse - Zoom\nScroll, Arrows - Zoom, Pan\nSpace - Home";
    commands.spawn((
        Text::new(text),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        Node {
            margin: UiRect::all(Val::Px(20.0)),
            ..default()
        },
    ));
}
