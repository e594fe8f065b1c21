//! Orbiting about the center, and the roll correction that keeps the horizon level.

use bevy_log::prelude::*;
use bevy_math::{DQuat, DVec2};

use super::{
    pose::{is_zero_rotation, rotation_between, Pose},
    probe::{up_at, TerrainProbe},
};

/// Side vectors shorter than this mean the camera is looking nearly straight along local up.
const DEGENERATE_SIDE_LENGTH: f64 = 0.1;

/// Orbit the camera about its center: `delta.x` turns about the local up (azimuth), `delta.y`
/// tilts about the camera's horizontal axis (elevation).
///
/// `pitch_range` is `(min, max)` in radians. An elevation step that would leave that range is
/// dropped for this call entirely; azimuth is never limited.
pub fn rotate(
    pose: &Pose,
    delta: DVec2,
    pitch_range: (f64, f64),
    probe: Option<&TerrainProbe<'_>>,
) -> Pose {
    let (min_pitch, max_pitch) = pitch_range;
    let pitch = pose.local_pitch + delta.y;
    let dy = if pitch > max_pitch || pitch < min_pitch {
        0.0
    } else {
        delta.y
    };

    let local_up = up_at(probe, pose.center);
    let forward = local_up.cross(pose.side());
    let side = forward.cross(local_up).normalize_or_zero();

    let elevation = if side == bevy_math::DVec3::ZERO {
        DQuat::IDENTITY
    } else {
        DQuat::from_axis_angle(side, dy)
    };
    let azimuth = DQuat::from_axis_angle(local_up, -delta.x);

    Pose {
        rotation: (azimuth * elevation * pose.rotation).normalize(),
        local_pitch: pose.local_pitch + dy,
        ..*pose
    }
}

/// Remove roll so the top of the screen points as far toward local up as the view direction
/// allows.
///
/// When looking almost straight down or up, the horizontal axis is taken from the camera's
/// current screen-up instead of the view direction.
pub fn clamp_orientation(pose: &Pose, probe: Option<&TerrainProbe<'_>>) -> Pose {
    let look = pose.look();
    let up = pose.front();
    let local_up = up_at(probe, pose.center);

    let mut side = look.cross(local_up);
    if side.length() < DEGENERATE_SIDE_LENGTH {
        debug!("Side vector short: {}", side.length());
        side = up.cross(local_up).normalize_or_zero();
    }

    let Some(new_up) = side.cross(look).try_normalize() else {
        return *pose;
    };

    let roll = rotation_between(up, new_up);
    if is_zero_rotation(roll) {
        return *pose;
    }
    Pose {
        rotation: (roll * pose.rotation).normalize(),
        ..*pose
    }
}
