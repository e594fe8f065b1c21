//! Panning that slides the orbit center across a curved surface.

use bevy_log::prelude::*;
use bevy_math::DVec2;

use super::{
    pose::{is_zero_rotation, rotation_between, Pose},
    probe::TerrainProbe,
};

/// Center displacement per gesture unit, as a fraction of the current distance. Negative so that
/// dragging moves the ground with the pointer.
const PAN_SPEED: f64 = -0.3;

/// How far above and below the moved center to look for the surface, as a fraction of the terrain
/// bound radius.
const SNAP_REACH: f64 = 0.25;

/// Move the center across the surface by `delta` gesture units.
///
/// Motion happens in the tangent plane of the last known up vector, scaled by distance so that
/// panning feels the same at every zoom level. Afterward the center is dropped back onto the
/// terrain and the camera is turned by however much the up vector changed, which keeps the view
/// attached to the surface as the center travels around the globe.
pub fn pan(pose: &Pose, delta: DVec2, probe: Option<&TerrainProbe<'_>>) -> Pose {
    let scale = PAN_SPEED * pose.distance;
    let local_up = pose.previous_up;

    // Re-orthogonalize against the cached up so drift in the rotation never tilts the pan plane.
    let forward = local_up
        .cross(pose.side())
        .try_normalize()
        .unwrap_or_else(|| pose.front());
    let side = forward.cross(local_up).normalize_or_zero();

    let mut next = *pose;
    next.center += forward * (delta.y * scale) + side * (delta.x * scale);

    let Some(probe) = probe else {
        return next;
    };

    let reach = probe.bound().radius * SNAP_REACH;
    match probe.snap_vertical(next.center, reach) {
        Some(hit) => next.center = hit,
        None => debug!("Pan could not find the terrain under {:?}", next.center),
    }

    let new_up = probe.up(next.center);
    let pan_rotation = rotation_between(local_up, new_up);
    if is_zero_rotation(pan_rotation) {
        debug!("Up vector unchanged by pan");
    } else {
        next.rotation = (pan_rotation * next.rotation).normalize();
        next.previous_up = new_up;
    }
    next
}

#[cfg(test)]
mod tests {
    use bevy_math::{DQuat, DVec3};

    use super::*;
    use crate::controller::{
        pose::set_by_look_at,
        terrain::{Ellipsoid, Terrain},
    };

    const EPS: f64 = 1e-9;

    #[test]
    fn flat_pan_without_terrain() {
        // Looking straight down with screen-up along +Y.
        let pose = Pose {
            distance: 10.0,
            ..Pose::default()
        };
        let moved = pan(&pose, DVec2::new(1.0, 0.0), None);
        assert!((moved.center - DVec3::new(-3.0, 0.0, 0.0)).length() < EPS);

        let moved = pan(&pose, DVec2::new(0.0, 0.5), None);
        assert!((moved.center - DVec3::new(0.0, -1.5, 0.0)).length() < EPS);
        assert_eq!(moved.rotation, pose.rotation);
        assert_eq!(moved.distance, pose.distance);
    }

    #[test]
    fn screen_right_along_up_pans_along_front() {
        // Looking along +X, rolled so screen-right points along +Z, the cached up.
        let pose = Pose {
            distance: 10.0,
            rotation: DQuat::from_rotation_y(-std::f64::consts::FRAC_PI_2),
            ..Pose::default()
        };
        assert!((pose.side() - DVec3::Z).length() < EPS);

        let moved = pan(&pose, DVec2::new(0.0, 1.0), None);
        assert!(moved.center.is_finite());
        assert!((moved.center - pose.front() * -3.0).length() < EPS);

        let moved = pan(&pose, DVec2::new(1.0, 0.0), None);
        assert!((moved.center - DVec3::new(-3.0, 0.0, 0.0)).length() < EPS);
        assert_eq!(moved.rotation, pose.rotation);
    }

    #[test]
    fn speed_scales_with_distance() {
        let near = Pose {
            distance: 2.0,
            ..Pose::default()
        };
        let far = Pose {
            distance: 20.0,
            ..Pose::default()
        };
        let delta = DVec2::new(0.25, -0.5);
        let near_step = pan(&near, delta, None).center.length();
        let far_step = pan(&far, delta, None).center.length();
        assert!((far_step / near_step - 10.0).abs() < EPS);
    }

    #[test]
    fn stays_on_a_sphere_and_follows_its_up() {
        let sphere = Ellipsoid::sphere(1000.0);
        let probe = TerrainProbe::new(&sphere);
        let mut pose = set_by_look_at(
            &Pose::default(),
            DVec3::new(0.0, 0.0, 1100.0),
            DVec3::ZERO,
            DVec3::Y,
            &probe,
        );
        assert!((pose.center - DVec3::new(0.0, 0.0, 1000.0)).length() < EPS);

        for _ in 0..20 {
            pose = pan(&pose, DVec2::new(0.3, 0.2), Some(&probe));
            assert!((pose.center.length() - 1000.0).abs() < 1e-6);
            let up = sphere.coordinate_frame(pose.center).z_axis;
            assert!((pose.previous_up - up).length() < 1e-9);
            // Still looking straight down at the surface.
            assert!(pose.look().dot(-up) > 1.0 - 1e-9);
        }
        assert!(pose.center.z < 1000.0);
    }

    #[test]
    fn unsnapped_when_terrain_is_out_of_reach() {
        let sphere = Ellipsoid::sphere(10.0);
        let probe = TerrainProbe::new(&sphere);
        // Far above a small sphere, a big pan lands outside the snap reach.
        let pose = Pose {
            center: DVec3::new(0.0, 0.0, 10.0),
            distance: 1000.0,
            rotation: DQuat::IDENTITY,
            ..Pose::default()
        };
        let moved = pan(&pose, DVec2::new(1.0, 0.0), Some(&probe));
        assert!((moved.center - DVec3::new(-300.0, 0.0, 10.0)).length() < EPS);
    }
}
