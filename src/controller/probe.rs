//! Hit testing and local frames on top of a [`Terrain`].

use bevy_math::{DMat3, DVec3};

use super::terrain::{BoundingSphere, Terrain};

/// Borrowed view of the attached terrain used by gestures and pose setters.
#[derive(Clone, Copy)]
pub struct TerrainProbe<'a> {
    terrain: &'a dyn Terrain,
}

impl<'a> TerrainProbe<'a> {
    /// Probe `terrain`.
    pub fn new(terrain: &'a dyn Terrain) -> Self {
        Self { terrain }
    }

    /// Bounds of the terrain.
    pub fn bound(&self) -> BoundingSphere {
        self.terrain.bound()
    }

    /// The closest surface point on the segment from `start` to `end`.
    pub fn probe(&self, start: DVec3, end: DVec3) -> Option<DVec3> {
        self.terrain.intersect(start, end)
    }

    /// The surface frame at `point`.
    pub fn coordinate_frame(&self, point: DVec3) -> DMat3 {
        self.terrain.coordinate_frame(point)
    }

    /// The local up direction at `point`.
    pub fn up(&self, point: DVec3) -> DVec3 {
        self.coordinate_frame(point)
            .z_axis
            .try_normalize()
            .unwrap_or(DVec3::Z)
    }

    /// Search up and down the local vertical through `point`, `reach` units each way, and return
    /// whichever hit is nearer.
    pub fn snap_vertical(&self, point: DVec3, reach: f64) -> Option<DVec3> {
        let up = self.up(point);
        let above = self.probe(point, point + up * reach);
        let below = self.probe(point, point - up * reach);
        match (above, below) {
            (Some(above), Some(below)) => {
                if point.distance_squared(above) < point.distance_squared(below) {
                    Some(above)
                } else {
                    Some(below)
                }
            }
            (hit @ Some(_), None) | (None, hit @ Some(_)) => hit,
            (None, None) => None,
        }
    }
}

impl std::fmt::Debug for TerrainProbe<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerrainProbe")
            .field("bound", &self.bound())
            .finish()
    }
}

/// Local up at `point`, or world +Z when there is no terrain to ask.
pub fn up_at(probe: Option<&TerrainProbe<'_>>, point: DVec3) -> DVec3 {
    probe.map(|probe| probe.up(point)).unwrap_or(DVec3::Z)
}
