// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Affine transform helpers
//!
//! Matrices act on column vectors, so `a * b` applies `b` first and then `a`.
//! The rotary sweep relies on this: `translation_matrix(..) * rotation_y(..)`
//! rotates a profile around its local Y axis and only then moves it to the
//! sweep centre. Swapping the factors moves the centre around the origin
//! instead.

use nalgebra::{Matrix3, Matrix4, Point2, Point3, Rotation3, Unit, Vector3};

/// 3D translation matrix
#[inline]
pub fn translation_matrix(dx: f64, dy: f64, dz: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(dx, dy, dz))
}

/// 2D (homogeneous 3x3) translation matrix
#[inline]
pub fn translation_matrix_2d(dx: f64, dy: f64) -> Matrix3<f64> {
    Matrix3::new(
        1.0, 0.0, dx,
        0.0, 1.0, dy,
        0.0, 0.0, 1.0,
    )
}

/// Rotation around an arbitrary axis (right-handed, radians)
///
/// A zero-length axis yields the identity.
pub fn rotation_matrix(axis: &Vector3<f64>, angle: f64) -> Matrix4<f64> {
    match Unit::try_new(*axis, 1e-12) {
        Some(axis) => Rotation3::from_axis_angle(&axis, angle).to_homogeneous(),
        None => Matrix4::identity(),
    }
}

/// Rotation around the Y axis (radians)
#[inline]
pub fn rotation_y(angle: f64) -> Matrix4<f64> {
    rotation_matrix(&Vector3::y(), angle)
}

/// Apply an affine transform to a vector.
///
/// With `is_point` the translation column is applied (positions); without it
/// only the linear part is used (directions and normals).
#[inline]
pub fn transform(v: &Vector3<f64>, matrix: &Matrix4<f64>, is_point: bool) -> Vector3<f64> {
    let w = if is_point { 1.0 } else { 0.0 };
    let r = matrix * nalgebra::Vector4::new(v.x, v.y, v.z, w);
    Vector3::new(r.x, r.y, r.z)
}

/// Transform a position
#[inline]
pub fn transform_point(p: &Point3<f64>, matrix: &Matrix4<f64>) -> Point3<f64> {
    Point3::from(transform(&p.coords, matrix, true))
}

/// Transform a 2D position with a homogeneous 3x3 matrix
#[inline]
pub fn transform_point_2d(p: &Point2<f64>, matrix: &Matrix3<f64>) -> Point2<f64> {
    matrix.transform_point(p)
}

/// Map a footprint point (plan view) to the Y-up model space used by roof meshes.
///
/// Plan `(x, y)` at height `h` becomes `(x, h, -y)`.
#[inline]
pub fn plan_to_model(p: &Point2<f64>, height: f64) -> Point3<f64> {
    Point3::new(p.x, height, -p.y)
}

/// Map a plan-view direction to model space (no height component)
#[inline]
pub fn plan_dir_to_model(x: f64, y: f64) -> Vector3<f64> {
    Vector3::new(x, 0.0, -y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_point_vs_direction() {
        let m = translation_matrix(1.0, 2.0, 3.0);
        let v = Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(transform(&v, &m, true), Vector3::new(2.0, 2.0, 3.0));
        assert_eq!(transform(&v, &m, false), v);
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let m = rotation_y(FRAC_PI_2);
        let r = transform(&Vector3::new(1.0, 0.0, 0.0), &m, true);
        assert_relative_eq!(r, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_axis_is_normalized() {
        let m = rotation_matrix(&Vector3::new(0.0, 0.0, 2.0), FRAC_PI_2);
        let r = transform(&Vector3::x(), &m, false);
        assert_relative_eq!(r, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_composition_order_matters() {
        let t = translation_matrix(10.0, 0.0, 0.0);
        let r = rotation_y(FRAC_PI_2);
        let p = Vector3::new(1.0, 0.0, 0.0);

        // rotate first, then translate
        let a = transform(&p, &(t * r), true);
        assert_relative_eq!(a, Vector3::new(10.0, 0.0, -1.0), epsilon = 1e-12);

        // translate first, then rotate
        let b = transform(&p, &(r * t), true);
        assert_relative_eq!(b, Vector3::new(0.0, 0.0, -11.0), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_angle_rotation_is_exact() {
        let m = translation_matrix(3.0, 0.0, -4.0) * rotation_y(0.0);
        let r = transform(&Vector3::new(2.5, 1.25, 0.0), &m, true);
        assert_eq!(r, Vector3::new(5.5, 1.25, -4.0));
    }

    #[test]
    fn test_degenerate_axis_is_identity() {
        assert_eq!(rotation_matrix(&Vector3::zeros(), 1.0), Matrix4::identity());
    }

    #[test]
    fn test_translation_2d() {
        let m = translation_matrix_2d(-5.0, 2.0);
        let p = transform_point_2d(&Point2::new(5.0, 5.0), &m);
        assert_eq!(p, Point2::new(0.0, 7.0));
    }

    #[test]
    fn test_plan_to_model() {
        let p = plan_to_model(&Point2::new(1.0, 2.0), 3.0);
        assert_eq!(p, Point3::new(1.0, 3.0, -2.0));
    }
}
