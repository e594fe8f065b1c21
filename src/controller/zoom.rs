//! Zooming, and the minimum distance that bounds it.

use bevy_math::DVec2;

use super::{pose::Pose, terrain::BoundingSphere};

/// The minimum distance as a fraction of the terrain bound radius.
const MINIMUM_DISTANCE_SCALE: f64 = 0.001;

/// Smallest minimum distance, used for tiny scenes and before any terrain is attached. Any closer
/// and depth precision falls apart.
pub const MINIMUM_DISTANCE_FLOOR: f64 = 1e-5;

/// Largest minimum distance, so very large scenes still let you get close to the ground.
pub const MINIMUM_DISTANCE_CEILING: f64 = 1.0;

/// How close the camera may get to its center when looking at a scene with these bounds.
pub fn minimum_distance(bound: &BoundingSphere) -> f64 {
    (bound.radius * MINIMUM_DISTANCE_SCALE).clamp(MINIMUM_DISTANCE_FLOOR, MINIMUM_DISTANCE_CEILING)
}

/// Scale the distance by `1 + delta.y`. `delta.x` is ignored.
///
/// A step that would end at or inside `minimum_distance` stops exactly on it instead.
pub fn zoom(pose: &Pose, delta: DVec2, minimum_distance: f64) -> Pose {
    let scale = 1.0 + delta.y;
    let distance = if pose.distance * scale > minimum_distance {
        pose.distance * scale
    } else {
        minimum_distance
    };
    Pose { distance, ..*pose }
}
