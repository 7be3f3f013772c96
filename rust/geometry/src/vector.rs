// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D vector helpers and line segments
//!
//! The left-hand orthogonal `(-y, x)` is used for every normal derivation:
//! walking a counter-clockwise ring, `orthogonal_left` of an edge points
//! into the polygon.

use nalgebra::{Point2, Vector2};

/// Below this length a vector is treated as zero
pub const EPSILON: f64 = 1e-10;

/// Vector from `from` to `to`
#[inline]
pub fn from_to(from: &Point2<f64>, to: &Point2<f64>) -> Vector2<f64> {
    to - from
}

/// Rotate by +90 degrees
#[inline]
pub fn orthogonal_left(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

/// Rotate by -90 degrees
#[inline]
pub fn orthogonal_right(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(v.y, -v.x)
}

/// Z component of the 3D cross product
#[inline]
pub fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Normalized copy, `None` for (near) zero vectors
#[inline]
pub fn try_normalize(v: &Vector2<f64>) -> Option<Vector2<f64>> {
    let len = v.norm();
    if len > EPSILON {
        Some(v / len)
    } else {
        None
    }
}

/// Normalized angular bisector of two unit vectors.
///
/// Anti-parallel inputs fall back to `orthogonal_left(n1)`.
pub fn bisector_normalized(n1: &Vector2<f64>, n2: &Vector2<f64>) -> Vector2<f64> {
    match try_normalize(&(n1 + n2)) {
        Some(b) => b,
        None => {
            tracing::debug!(
                n1x = n1.x,
                n1y = n1.y,
                "anti-parallel bisector input, using left orthogonal"
            );
            orthogonal_left(n1)
        }
    }
}

/// Projection of `v` onto the line spanned by `onto`
///
/// Projecting onto a zero vector yields zero.
#[inline]
pub fn orthogonal_projection(onto: &Vector2<f64>, v: &Vector2<f64>) -> Vector2<f64> {
    let len_sq = onto.norm_squared();
    if len_sq < EPSILON * EPSILON {
        return Vector2::zeros();
    }
    onto * (onto.dot(v) / len_sq)
}

/// Directed 2D line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment2D {
    pub begin: Point2<f64>,
    pub end: Point2<f64>,
}

impl LineSegment2D {
    #[inline]
    pub fn new(begin: Point2<f64>, end: Point2<f64>) -> Self {
        Self { begin, end }
    }

    /// Vector from begin to end
    #[inline]
    pub fn vector(&self) -> Vector2<f64> {
        self.end - self.begin
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    /// Unit direction, `None` for zero-length segments
    #[inline]
    pub fn direction(&self) -> Option<Vector2<f64>> {
        try_normalize(&self.vector())
    }

    /// Unit normal on the left side of the segment
    #[inline]
    pub fn left_normal(&self) -> Option<Vector2<f64>> {
        self.direction().map(|d| orthogonal_left(&d))
    }

    /// Distance from `p` to the infinite line through the segment
    pub fn distance_to_line(&self, p: &Point2<f64>) -> f64 {
        let edge = self.vector();
        let to_point = p - self.begin;
        let on_line = orthogonal_projection(&edge, &to_point);
        (to_point - on_line).norm()
    }

    /// Signed distance (positive on the left side) to the infinite line
    pub fn signed_distance(&self, p: &Point2<f64>) -> f64 {
        match self.left_normal() {
            Some(n) => (p - self.begin).dot(&n),
            None => (p - self.begin).norm(),
        }
    }

    /// Same segment walked the other way
    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.begin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orthogonal_left_points_inside_ccw() {
        // bottom edge of a CCW square walks +x, inside is +y
        let d = Vector2::new(1.0, 0.0);
        assert_eq!(orthogonal_left(&d), Vector2::new(0.0, 1.0));
        assert_eq!(from_to(&Point2::new(1.0, 1.0), &Point2::new(3.0, 1.0)), d * 2.0);
        assert_eq!(orthogonal_right(&d), Vector2::new(0.0, -1.0));
    }

    #[test]
    fn test_bisector() {
        let b = bisector_normalized(&Vector2::new(1.0, 0.0), &Vector2::new(0.0, 1.0));
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(b, Vector2::new(h, h), epsilon = 1e-12);
    }

    #[test]
    fn test_bisector_anti_parallel_fallback() {
        let n1 = Vector2::new(1.0, 0.0);
        let b = bisector_normalized(&n1, &Vector2::new(-1.0, 0.0));
        assert_eq!(b, Vector2::new(0.0, 1.0));
    }

    #[test]
    fn test_projection_and_distance() {
        let p = orthogonal_projection(&Vector2::new(2.0, 0.0), &Vector2::new(3.0, 4.0));
        assert_relative_eq!(p, Vector2::new(3.0, 0.0));

        let seg = LineSegment2D::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        assert_relative_eq!(seg.distance_to_line(&Point2::new(25.0, 4.0)), 4.0);
        assert_relative_eq!(seg.signed_distance(&Point2::new(5.0, -2.0)), -2.0);
    }

    #[test]
    fn test_zero_segment_direction() {
        let seg = LineSegment2D::new(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0));
        assert!(seg.direction().is_none());
    }
}
