// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Oriented planes used to lift plan-view facets into model space

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};

/// Planes whose normal has a smaller vertical component cannot be used as
/// a height field.
const MIN_VERTICAL_COMPONENT: f64 = 1e-9;

/// Infinite oriented plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3D {
    /// Point on the plane
    pub point: Point3<f64>,
    /// Unit normal
    pub normal: Vector3<f64>,
}

impl Plane3D {
    /// Create a new plane, normalizing the normal
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Horizontal plane at the given model-space height
    pub fn horizontal(height: f64) -> Self {
        Self {
            point: Point3::new(0.0, height, 0.0),
            normal: Vector3::y(),
        }
    }

    /// Signed distance from point to plane
    /// Positive = in front, Negative = behind
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.point).dot(&self.normal)
    }

    /// Height (Y) of the plane above model-space `(x, z)`
    pub fn height_at(&self, x: f64, z: f64) -> Result<f64> {
        let n = &self.normal;
        if n.y.abs() < MIN_VERTICAL_COMPONENT {
            return Err(Error::VerticalPlane([n.x, n.y, n.z]));
        }
        Ok(self.point.y - (n.x * (x - self.point.x) + n.z * (z - self.point.z)) / n.y)
    }

    /// Model-space point on the plane vertically above plan-view `(x, y)`
    pub fn lift(&self, x: f64, y: f64) -> Result<Point3<f64>> {
        let z = -y;
        Ok(Point3::new(x, self.height_at(x, z)?, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_horizontal_lift() {
        let plane = Plane3D::horizontal(2.0);
        let p = plane.lift(3.0, 4.0).unwrap();
        assert_eq!(p, Point3::new(3.0, 2.0, -4.0));
    }

    #[test]
    fn test_sloped_plane() {
        // rises one unit per unit of plan-view +y (model -z)
        let plane = Plane3D::new(Point3::origin(), Vector3::new(0.0, 1.0, 1.0));
        let p = plane.lift(7.0, 2.0).unwrap();
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(plane.signed_distance(&p), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vertical_plane_rejected() {
        let plane = Plane3D::new(Point3::origin(), Vector3::x());
        assert!(matches!(plane.lift(1.0, 1.0), Err(Error::VerticalPlane(_))));
    }
}
