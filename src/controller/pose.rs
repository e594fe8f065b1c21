//! The camera pose: an orbit center on the surface, a distance from it, and an orientation.

use bevy_log::prelude::*;
use bevy_math::{DMat4, DQuat, DVec3};

use super::{
    orbit::clamp_orientation,
    probe::TerrainProbe,
    terrain::BoundingSphere,
};

/// Quaternions whose vector part is shorter than this are treated as no rotation at all.
const ZERO_ROTATION_EPSILON: f64 = 1e-12;

/// `1 + cos(angle)` below this means the two directions are opposite.
const OPPOSITE_EPSILON: f64 = 1e-7;

/// How far from the bound the default home eye sits, in bound radii.
const HOME_DISTANCE_RADII: f64 = 3.5;

/// Where the camera is and how it is turned.
///
/// The camera sits `distance` units from `center` along the rotated +Z axis and looks back at it:
/// its world transform is `T(center) * R(rotation) * T(0, 0, distance)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// The point being orbited, normally on the surface.
    pub center: DVec3,
    /// Distance from `center` to the eye.
    pub distance: f64,
    /// Camera orientation.
    pub rotation: DQuat,
    /// Local up at `center` as of the last terrain probe.
    pub previous_up: DVec3,
    /// Accumulated elevation, in radians.
    pub local_pitch: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            center: DVec3::ZERO,
            distance: 1.0,
            rotation: DQuat::IDENTITY,
            previous_up: DVec3::Z,
            local_pitch: HOME_PITCH_DEGREES.to_radians(),
        }
    }
}

/// The pitch `home` leaves the camera at, in degrees.
pub const HOME_PITCH_DEGREES: f64 = -90.0;

impl Pose {
    /// The camera's world transform.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_translation(self.center)
            * DMat4::from_quat(self.rotation)
            * DMat4::from_translation(DVec3::new(0.0, 0.0, self.distance))
    }

    /// The view matrix, the inverse of [`Pose::matrix`].
    pub fn inverse_matrix(&self) -> DMat4 {
        DMat4::from_translation(DVec3::new(0.0, 0.0, -self.distance))
            * DMat4::from_quat(self.rotation.inverse())
            * DMat4::from_translation(-self.center)
    }

    /// Eye position in world space.
    pub fn eye(&self) -> DVec3 {
        self.center + self.rotation * DVec3::new(0.0, 0.0, self.distance)
    }

    /// Unit view direction.
    pub fn look(&self) -> DVec3 {
        -(self.rotation * DVec3::Z)
    }

    /// Camera right.
    pub fn side(&self) -> DVec3 {
        self.rotation * DVec3::X
    }

    /// Camera up, the top of the screen.
    pub fn front(&self) -> DVec3 {
        self.rotation * DVec3::Y
    }
}

/// The pose the HOME action returns to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomePose {
    /// Eye position.
    pub eye: DVec3,
    /// Point looked at.
    pub center: DVec3,
    /// Up hint.
    pub up: DVec3,
}

impl Default for HomePose {
    fn default() -> Self {
        Self {
            eye: DVec3::new(0.0, -1.0, 0.0),
            center: DVec3::ZERO,
            up: DVec3::Z,
        }
    }
}

impl HomePose {
    /// Look at the center of `bound` from its -Y side, far enough back to see all of it.
    pub fn from_bound(bound: &BoundingSphere) -> Self {
        Self {
            eye: bound.center + DVec3::new(0.0, -HOME_DISTANCE_RADII * bound.radius, 0.0),
            center: bound.center,
            up: DVec3::Z,
        }
    }
}

/// Is `rotation` close enough to the identity to skip applying it?
pub(crate) fn is_zero_rotation(rotation: DQuat) -> bool {
    rotation.xyz().length() <= ZERO_ROTATION_EPSILON
}

/// The shortest rotation taking direction `from` to direction `to`.
///
/// Unlike [`DQuat::from_rotation_arc`] this does not snap small angles to the identity, so tiny
/// changes of up vector during a slow pan are still applied.
pub(crate) fn rotation_between(from: DVec3, to: DVec3) -> DQuat {
    let (Some(from), Some(to)) = (from.try_normalize(), to.try_normalize()) else {
        return DQuat::IDENTITY;
    };
    let w = 1.0 + from.dot(to);
    if w < OPPOSITE_EPSILON {
        return DQuat::from_rotation_arc(from, to);
    }
    let axis = from.cross(to);
    DQuat::from_xyzw(axis.x, axis.y, axis.z, w).normalize()
}

/// Place the camera at `eye` looking at `center`, then slide `center` onto the surface along the
/// same line of sight.
///
/// Tries the segment from `eye` to `center` first, then one extending well past the terrain. If
/// neither hits, `center` is kept as given.
pub fn set_by_look_at(
    pose: &Pose,
    eye: DVec3,
    center: DVec3,
    up: DVec3,
    probe: &TerrainProbe<'_>,
) -> Pose {
    let line_of_sight = center - eye;
    let distance = line_of_sight.length();
    if !distance.is_finite() || distance <= 0.0 {
        warn!("Ignoring look-at with coincident eye and center {center:?}");
        return *pose;
    }

    let mut next = Pose {
        center,
        distance,
        ..*pose
    };

    let max_distance = distance + 2.0 * eye.distance(probe.bound().center);
    let far = eye + line_of_sight * (max_distance / distance);
    match probe
        .probe(eye, center)
        .or_else(|| probe.probe(eye, far))
    {
        Some(hit) => {
            next.center = hit;
            next.distance = hit.distance(eye);
        }
        None => debug!("Look-at line of sight does not meet the terrain"),
    }

    let up = match line_of_sight.cross(up).try_normalize() {
        Some(_) => up.normalize(),
        None => (line_of_sight / distance).any_orthonormal_vector(),
    };
    let view = DMat4::look_at_rh(eye, center, up);
    next.rotation = DQuat::from_mat4(&view).inverse().normalize();
    next.previous_up = probe.up(next.center);

    clamp_orientation(&next, Some(probe))
}

/// Set the pose from a camera world transform, the inverse of [`Pose::matrix`].
///
/// Without terrain the current distance is kept and the center placed that far along the view
/// direction, so `set_by_matrix(pose.matrix())` gives `pose` back. With terrain the center is found
/// by casting along the view direction, falling back to a vertical probe under the eye.
pub fn set_by_matrix(pose: &Pose, matrix: &DMat4, probe: Option<&TerrainProbe<'_>>) -> Pose {
    let (_, rotation, eye) = matrix.to_scale_rotation_translation();
    let look = (-matrix.z_axis.truncate())
        .try_normalize()
        .unwrap_or(DVec3::NEG_Z);

    let Some(probe) = probe else {
        return Pose {
            center: eye + look * pose.distance,
            rotation,
            ..*pose
        };
    };

    let bound = probe.bound();
    let reach = eye.distance(bound.center) + bound.radius;
    let mut next = *pose;

    if let Some(hit) = probe.probe(eye, eye + look * reach) {
        next.center = hit;
        next.distance = eye.distance(hit);
        next.rotation = rotation;
    } else {
        let up = probe.up(eye);
        match probe.probe(eye + up * reach, eye - up * reach) {
            Some(hit) => {
                next.center = hit;
                next.distance = eye.distance(hit);
                next.rotation = DQuat::IDENTITY;
            }
            None => debug!("Camera transform does not see the terrain"),
        }
    }

    next.previous_up = probe.up(next.center);
    clamp_orientation(&next, Some(probe))
}
