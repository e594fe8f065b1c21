//! The scene the camera is glued to, seen only through bounds, ray hits, and local frames.

use bevy_math::{DMat3, DVec3};

/// A sphere enclosing the whole scene.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Center in world space.
    pub center: DVec3,
    /// Radius in world units.
    pub radius: f64,
}

impl BoundingSphere {
    /// Create a new bounding sphere.
    pub fn new(center: DVec3, radius: f64) -> Self {
        Self { center, radius }
    }
}

/// What the manipulator needs from the scene.
///
/// Implement this over whatever does hit testing in your app. The manipulator only ever asks for
/// the closest hit along a finite segment, so a raycast backend, a heightfield sampler, or an
/// analytic surface all work.
pub trait Terrain: Send + Sync {
    /// Bounds of everything [`Terrain::intersect`] can hit.
    fn bound(&self) -> BoundingSphere;

    /// The hit closest to `start` on the segment from `start` to `end`.
    fn intersect(&self, start: DVec3, end: DVec3) -> Option<DVec3>;

    /// Orientation of the surface at `point`. The Z column is the local up direction.
    ///
    /// Defaults to the world axes, which suits flat, Z-up scenes.
    fn coordinate_frame(&self, point: DVec3) -> DMat3 {
        let _ = point;
        DMat3::IDENTITY
    }
}

/// An ellipsoid of revolution about Z, centered at the origin. Good enough as a globe when no
/// elevation data is around, and exact for testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Equatorial radius.
    pub semi_major_axis: f64,
    /// Polar radius.
    pub semi_minor_axis: f64,
}

impl Ellipsoid {
    /// The WGS84 reference ellipsoid, in meters.
    pub const WGS84: Self = Self {
        semi_major_axis: 6_378_137.0,
        semi_minor_axis: 6_356_752.314_245,
    };

    /// A perfect sphere.
    pub fn sphere(radius: f64) -> Self {
        Self {
            semi_major_axis: radius,
            semi_minor_axis: radius,
        }
    }

    /// Scale world space so the ellipsoid becomes the unit sphere.
    fn to_unit(&self, point: DVec3) -> DVec3 {
        DVec3::new(
            point.x / self.semi_major_axis,
            point.y / self.semi_major_axis,
            point.z / self.semi_minor_axis,
        )
    }

    /// The geodetic surface normal through `point`.
    pub fn geodetic_up(&self, point: DVec3) -> DVec3 {
        let a2 = self.semi_major_axis * self.semi_major_axis;
        let b2 = self.semi_minor_axis * self.semi_minor_axis;
        DVec3::new(point.x / a2, point.y / a2, point.z / b2)
            .try_normalize()
            .unwrap_or(DVec3::Z)
    }
}

impl Terrain for Ellipsoid {
    fn bound(&self) -> BoundingSphere {
        BoundingSphere::new(
            DVec3::ZERO,
            self.semi_major_axis.max(self.semi_minor_axis),
        )
    }

    fn intersect(&self, start: DVec3, end: DVec3) -> Option<DVec3> {
        // Scaling is linear, so the segment parameter of a hit is the same in both spaces.
        let s = self.to_unit(start);
        let d = self.to_unit(end) - s;
        let a = d.length_squared();
        if a <= f64::EPSILON * f64::EPSILON {
            return None;
        }
        let b = 2.0 * s.dot(d);
        let c = s.length_squared() - 1.0;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let near = (-b - root) / (2.0 * a);
        let far = (-b + root) / (2.0 * a);
        [near, far]
            .into_iter()
            .find(|t| (0.0..=1.0).contains(t))
            .map(|t| start + (end - start) * t)
    }

    fn coordinate_frame(&self, point: DVec3) -> DMat3 {
        let up = self.geodetic_up(point);
        let east = DVec3::Z.cross(up).try_normalize().unwrap_or(DVec3::X);
        let north = up.cross(east);
        DMat3::from_cols(east, north, up)
    }
}
