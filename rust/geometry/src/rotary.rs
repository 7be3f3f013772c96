// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surfaces of revolution
//!
//! A 2D cross-section `(radius, height)` is swept around a vertical axis in
//! `section_count` equal steps. Section `i` is the profile rotated by
//! `360° / section_count * i` about the local Y axis and then moved to the
//! centre. Quads join section `i` to section `i + 1`, the last one wraps
//! back to section 0.

use crate::circle::Circle;
use crate::error::{Error, Result};
use crate::factory::{FaceType, MeshFactory, TextCoord};
use crate::transform::{rotation_y, transform, translation_matrix};
use crate::vector::{bisector_normalized, orthogonal_left, try_normalize};
use nalgebra::{Point2, Point3, Vector2, Vector3};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Texture coordinate indices of one quad: left/right, down/top
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureQuadIndex {
    pub ld: usize,
    pub rd: usize,
    pub rt: usize,
    pub lt: usize,
}

/// `splits + 1` points on a quarter circle from `(radius, 0)` to `(0, radius)`
pub fn quarter_circle_profile(radius: f64, splits: usize) -> Vec<Point2<f64>> {
    let splits = splits.max(1);
    (0..=splits)
        .map(|i| {
            let a = FRAC_PI_2 / splits as f64 * i as f64;
            Point2::new(a.cos() * radius, a.sin() * radius)
        })
        .collect()
}

/// Per-point normals of a cross-section, pointing away from the axis side.
///
/// Inner points take the bisector of the two adjacent segment normals, the
/// two end points the normal of their only segment.
pub fn soft_normals(cross_section: &[Point2<f64>]) -> Vec<Vector2<f64>> {
    let n = cross_section.len();
    if n < 2 {
        return Vec::new();
    }
    let segment_normals: Vec<Vector2<f64>> = cross_section
        .windows(2)
        .map(|w| {
            let d = try_normalize(&(w[1] - w[0])).unwrap_or_else(Vector2::x);
            orthogonal_left(&d)
        })
        .collect();

    let mut normals = Vec::with_capacity(n);
    normals.push(segment_normals[0]);
    for pair in segment_normals.windows(2) {
        normals.push(bisector_normalized(&pair[0], &pair[1]));
    }
    normals.push(segment_normals[segment_normals.len() - 1]);

    normals.into_iter().map(|v| -v).collect()
}

/// Flat normal of the quad corner `p1, p2, p3`
fn hard_normal(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> Vector3<f64> {
    let n = (p2 - p1).cross(&(p3 - p2));
    n.try_normalize(1e-12).unwrap_or_else(Vector3::y)
}

/// Sweep the profile into `sections[i][j]` positions
fn sweep(center: &Point2<f64>, cross_section: &[Point2<f64>], section_count: usize) -> Vec<Vec<Point3<f64>>> {
    (0..section_count)
        .map(|i| {
            let a = TAU / section_count as f64 * i as f64;
            let m = translation_matrix(center.x, 0.0, -center.y) * rotation_y(a);
            cross_section
                .iter()
                .map(|c| Point3::from(transform(&Vector3::new(c.x, c.y, 0.0), &m, true)))
                .collect()
        })
        .collect()
}

/// Texture coordinates for the quads between section `i` and `i + 1`.
/// Widths are measured from the quad's middle line, heights accumulate
/// along the profile.
fn texture_mapping(mesh: &mut MeshFactory, sections: &[Vec<Point3<f64>>], i: usize) -> Vec<TextureQuadIndex> {
    let c1 = &sections[i];
    let c2 = &sections[(i + 1) % sections.len()];

    let mut middle_down = nalgebra::center(&c1[0], &c2[0]);
    let mut width_down = (c2[0] - middle_down).norm();
    let mut height_down = 0.0;

    (1..c1.len())
        .map(|j| {
            let middle_top = nalgebra::center(&c1[j], &c2[j]);
            let width_top = (c2[j] - middle_top).norm();
            let height_top = height_down + (middle_top - middle_down).norm();

            let quad = TextureQuadIndex {
                ld: mesh.add_text_coord(TextCoord::new(-width_down, height_down)),
                rd: mesh.add_text_coord(TextCoord::new(width_down, height_down)),
                rt: mesh.add_text_coord(TextCoord::new(width_top, height_top)),
                lt: mesh.add_text_coord(TextCoord::new(-width_top, height_top)),
            };

            middle_down = middle_top;
            width_down = width_top;
            height_down = height_top;
            quad
        })
        .collect()
}

/// Sweep `cross_section` around `center` (plan coordinates, model height 0)
/// and append the quads to `mesh`.
///
/// With `soft` the profile normals are computed once and rotated into each
/// section; otherwise every quad gets its own flat normal. Texture mapping is
/// computed for section 0 and reused for all others.
pub fn build_rotary_shape(
    mesh: &mut MeshFactory,
    center: &Point2<f64>,
    section_count: usize,
    cross_section: &[Point2<f64>],
    soft: bool,
) -> Result<()> {
    let cross_count = cross_section.len();
    if cross_count < 2 {
        return Err(Error::InvalidProfile(format!(
            "cross-section needs at least 2 points, got {}",
            cross_count
        )));
    }
    if section_count < 3 {
        return Err(Error::InvalidProfile(format!(
            "rotary shape needs at least 3 sections, got {}",
            section_count
        )));
    }

    let sections = sweep(center, cross_section, section_count);
    let tex = texture_mapping(mesh, &sections, 0);

    let points: Vec<Vec<usize>> = sections
        .iter()
        .map(|s| s.iter().map(|p| mesh.add_vertex(*p)).collect())
        .collect();

    // one normal per (section, profile point), shared by the adjacent quads
    let soft_index: Vec<Vec<usize>> = if soft {
        let profile = soft_normals(cross_section);
        (0..section_count)
            .map(|i| {
                let rot = rotation_y(TAU / section_count as f64 * i as f64);
                profile
                    .iter()
                    .map(|n| mesh.add_normal(transform(&Vector3::new(n.x, n.y, 0.0), &rot, false)))
                    .collect()
            })
            .collect()
    } else {
        Vec::new()
    };

    let mut corners = Vec::with_capacity(section_count * (cross_count - 1) * 4);
    for i in 0..section_count {
        let i2 = (i + 1) % section_count;
        for j in 0..cross_count - 1 {
            let normals = if soft {
                [
                    soft_index[i][j],
                    soft_index[i2][j],
                    soft_index[i2][j + 1],
                    soft_index[i][j + 1],
                ]
            } else {
                let n = hard_normal(&sections[i][j], &sections[i2][j], &sections[i][j + 1]);
                let n = mesh.add_normal(n);
                [n; 4]
            };
            let tq = tex[j];
            corners.push((points[i][j], tq.ld, normals[0]));
            corners.push((points[i2][j], tq.rd, normals[1]));
            corners.push((points[i2][j + 1], tq.rt, normals[2]));
            corners.push((points[i][j + 1], tq.lt, normals[3]));
        }
    }

    let mut face = mesh.add_face(FaceType::Quads);
    for (vertex, text_coord, normal) in corners {
        face.add_vert(vertex, Some(text_coord), normal);
    }
    Ok(())
}

/// Quarter-circle dome on `circle`, `cross_splits` segments high and swept
/// in `sections` steps
pub fn build_dome(
    mesh: &mut MeshFactory,
    circle: &Circle,
    cross_splits: usize,
    sections: usize,
    soft: bool,
) -> Result<()> {
    let profile = quarter_circle_profile(circle.radius, cross_splits);
    build_rotary_shape(mesh, &circle.center, sections, &profile, soft)
}
