// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar facets and vertical walls appended to a [`MeshFactory`]
//!
//! All inputs are plan-view footprints; output positions use the Y-up model
//! convention of [`crate::transform::plan_to_model`].

use crate::error::{Error, Result};
use crate::factory::{FaceType, MeshFactory, TextCoord, TextureData};
use crate::plane::Plane3D;
use crate::polygon::Shape2D;
use crate::transform::{plan_dir_to_model, plan_to_model};
use crate::triangulation::triangulate_polygon_with_holes;
use crate::vector::{orthogonal_right, LineSegment2D, EPSILON};
use nalgebra::{Point2, Point3, Vector3};

/// Smallest texture tile accepted, guards the UV division
const MIN_TEXTURE_SIZE: f64 = 1e-9;

fn tile(size: f64) -> f64 {
    if size > MIN_TEXTURE_SIZE {
        size
    } else {
        1.0
    }
}

/// UV basis of a plane: `u` follows the texture line, `v = normal × u`
fn plane_basis(normal: &Vector3<f64>, line: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let projected = line - normal * normal.dot(line);
    let u = projected
        .try_normalize(EPSILON)
        .or_else(|| normal.cross(&Vector3::z()).try_normalize(EPSILON))
        .unwrap_or_else(Vector3::x);
    (u, normal.cross(&u))
}

/// Project a plan-view facet onto `plane` and append it as triangles.
///
/// Every part of `shape` is triangulated (holes included) and lifted
/// vertically onto the plane. One normal is shared by the whole facet.
/// Texture coordinates are measured in the plane from `plane.point`, along
/// `line` (projected into the plane) and `normal × line`, and scaled by the
/// texture tile size.
///
/// Nothing is appended when the plane is vertical or a part cannot be
/// triangulated.
pub fn add_polygon_to_roof_mesh(
    mesh: &mut MeshFactory,
    shape: &Shape2D,
    plane: &Plane3D,
    line: &Vector3<f64>,
    texture: &TextureData,
) -> Result<()> {
    let n = plane.normal;
    if n.y.abs() < EPSILON {
        return Err(Error::VerticalPlane([n.x, n.y, n.z]));
    }

    let mut parts = Vec::new();
    for part in shape.to_polygons_with_holes() {
        let (points, indices) = triangulate_polygon_with_holes(&part)?;
        let lifted = points
            .iter()
            .map(|p| plane.lift(p.x, p.y))
            .collect::<Result<Vec<_>>>()?;
        parts.push((lifted, indices));
    }

    let (u, v) = plane_basis(&n, line);
    let (w, h) = (tile(texture.width), tile(texture.height));
    let normal = mesh.add_normal(n);

    for (lifted, indices) in parts {
        let ids: Vec<(usize, usize)> = lifted
            .iter()
            .map(|p| {
                let d = p - plane.point;
                let tc = mesh.add_text_coord(TextCoord::new(d.dot(&u) / w, d.dot(&v) / h));
                (mesh.add_vertex(*p), tc)
            })
            .collect();

        let mut face = mesh.add_face(FaceType::Triangles);
        for &i in &indices {
            let (vertex, tc) = ids[i];
            face.add_vert(vertex, Some(tc), normal);
        }
    }
    Ok(())
}

/// Append a vertical wall standing on `segment`.
///
/// `profile` lists `(distance along segment, height)` pairs of the wall's
/// top line from the segment start to its end. Zero-height end points fold
/// into the bottom corners, so a gable wall comes out as a triangle. The
/// wall faces the right-hand side of the segment, outwards for a
/// counter-clockwise footprint. Returns `false` when the profile has no
/// height and nothing was added.
pub fn add_wall_profile(
    mesh: &mut MeshFactory,
    segment: &LineSegment2D,
    profile: &[(f64, f64)],
    texture: &TextureData,
) -> bool {
    if profile.iter().all(|&(_, h)| h.abs() <= EPSILON) {
        return false;
    }
    let Some(dir) = segment.direction() else {
        return false;
    };
    let length = segment.length();
    let at = |s: f64| segment.begin + dir * s;
    let (w, h) = (tile(texture.width), tile(texture.height));

    let mut outline: Vec<(f64, f64)> = vec![(0.0, 0.0), (length, 0.0)];
    let last = profile.len() - 1;
    for (k, &(s, height)) in profile.iter().enumerate().rev() {
        let at_corner = k == 0 || k == last;
        if at_corner && height.abs() <= EPSILON {
            continue;
        }
        outline.push((s, height));
    }

    let out = orthogonal_right(&dir);
    let normal = mesh.add_normal(plan_dir_to_model(out.x, out.y));
    let corners: Vec<(usize, usize)> = outline
        .iter()
        .map(|&(s, height)| {
            let vertex = mesh.add_vertex(plan_to_model(&at(s), height));
            let tc = mesh.add_text_coord(TextCoord::new(s / w, height / h));
            (vertex, tc)
        })
        .collect();

    let mut face = mesh.add_face(FaceType::Polygon);
    for (vertex, tc) in corners {
        face.add_vert(vertex, Some(tc), normal);
    }
    true
}

/// Append the side walls of a ring extruded from `min_height` to
/// `max_height` as one face of quads. A counter-clockwise ring gets outward
/// facing walls.
pub fn add_extruded_polygon(
    mesh: &mut MeshFactory,
    ring: &[Point2<f64>],
    min_height: f64,
    max_height: f64,
    texture: &TextureData,
) {
    let n = ring.len();
    if n < 2 || (max_height - min_height).abs() <= EPSILON {
        return;
    }
    let (w, h) = (tile(texture.width), tile(texture.height));
    let mut corners = Vec::with_capacity(n * 4);
    let mut along = 0.0;

    for i in 0..n {
        let edge = LineSegment2D::new(ring[i], ring[(i + 1) % n]);
        let Some(dir) = edge.direction() else {
            continue;
        };
        let out = orthogonal_right(&dir);
        let normal = mesh.add_normal(plan_dir_to_model(out.x, out.y));
        let next = along + edge.length();

        let quad: [(Point3<f64>, TextCoord); 4] = [
            (plan_to_model(&edge.begin, min_height), TextCoord::new(along / w, min_height / h)),
            (plan_to_model(&edge.end, min_height), TextCoord::new(next / w, min_height / h)),
            (plan_to_model(&edge.end, max_height), TextCoord::new(next / w, max_height / h)),
            (plan_to_model(&edge.begin, max_height), TextCoord::new(along / w, max_height / h)),
        ];
        for (p, tc) in quad {
            corners.push((mesh.add_vertex(p), mesh.add_text_coord(tc), normal));
        }
        along = next;
    }

    let mut face = mesh.add_face(FaceType::Quads);
    for (vertex, tc, normal) in corners {
        face.add_vert(vertex, Some(tc), normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::{rectangle, Polygon2D, PolygonWithHoles2D};
    use approx::assert_relative_eq;

    fn square(size: f64) -> Shape2D {
        Polygon2D::new(rectangle(0.0, 0.0, size, size)).unwrap().into()
    }

    fn triangle_normal(mesh: &MeshFactory, tri: &[crate::factory::FaceVertex]) -> Vector3<f64> {
        let a = mesh.vertices[tri[0].vertex];
        let b = mesh.vertices[tri[1].vertex];
        let c = mesh.vertices[tri[2].vertex];
        (b - a).cross(&(c - a))
    }

    #[test]
    fn test_flat_facet() {
        let mut mesh = MeshFactory::new("roof");
        let tex = TextureData::new("roof.png", 2.0, 2.0);
        add_polygon_to_roof_mesh(
            &mut mesh,
            &square(4.0),
            &Plane3D::horizontal(3.0),
            &Vector3::new(-1.0, 0.0, 0.0),
            &tex,
        )
        .unwrap();

        assert_eq!(mesh.normals, vec![Vector3::y()]);
        assert_eq!(mesh.vertices.len(), 4);
        assert!(mesh.vertices.iter().all(|p| p.y == 3.0));
        assert_eq!(mesh.triangle_count(), 2);
        for tri in mesh.faces[0].corners.chunks(3) {
            assert!(triangle_normal(&mesh, tri).y > 0.0);
        }
        // u runs along -x, scaled by the 2 m tile
        let far = mesh.vertices.iter().position(|p| p.x == 4.0 && p.z == 0.0).unwrap();
        assert_relative_eq!(mesh.text_coords[far].u, -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sloped_facet_is_lifted() {
        let mut mesh = MeshFactory::new("roof");
        // rises 1 m per meter of plan +y
        let plane = Plane3D::new(Point3::origin(), Vector3::new(0.0, 1.0, 1.0));
        add_polygon_to_roof_mesh(
            &mut mesh,
            &square(2.0),
            &plane,
            &Vector3::x(),
            &TextureData::default(),
        )
        .unwrap();
        for p in &mesh.vertices {
            assert_relative_eq!(p.y, -p.z, epsilon = 1e-12);
        }
        // v climbs the slope
        let top = mesh.vertices.iter().position(|p| p.z == -2.0).unwrap();
        assert_relative_eq!(mesh.text_coords[top].v.abs(), 8f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_facet_with_hole() {
        let outer = Polygon2D::new(rectangle(0.0, 0.0, 10.0, 10.0)).unwrap();
        let hole = Polygon2D::new(rectangle(4.0, 4.0, 6.0, 6.0)).unwrap();
        let shape: Shape2D = PolygonWithHoles2D::new(outer, vec![hole]).into();

        let mut mesh = MeshFactory::new("roof");
        add_polygon_to_roof_mesh(
            &mut mesh,
            &shape,
            &Plane3D::horizontal(0.0),
            &Vector3::x(),
            &TextureData::default(),
        )
        .unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        let area: f64 = mesh.faces[0]
            .corners
            .chunks(3)
            .map(|t| triangle_normal(&mesh, t).norm() / 2.0)
            .sum();
        assert_relative_eq!(area, 96.0, epsilon = 1e-9);
    }

    #[test]
    fn test_vertical_plane_leaves_mesh_untouched() {
        let mut mesh = MeshFactory::new("roof");
        let r = add_polygon_to_roof_mesh(
            &mut mesh,
            &square(1.0),
            &Plane3D::new(Point3::origin(), Vector3::x()),
            &Vector3::z(),
            &TextureData::default(),
        );
        assert!(matches!(r, Err(Error::VerticalPlane(_))));
        assert!(mesh.vertices.is_empty() && mesh.normals.is_empty());
    }

    #[test]
    fn test_gable_wall_is_a_triangle() {
        let mut mesh = MeshFactory::new("facade");
        let edge = LineSegment2D::new(Point2::new(0.0, 0.0), Point2::new(6.0, 0.0));
        let added = add_wall_profile(
            &mut mesh,
            &edge,
            &[(0.0, 0.0), (3.0, 2.0), (6.0, 0.0)],
            &TextureData::default(),
        );
        assert!(added);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[2], Point3::new(3.0, 2.0, 0.0));
        // faces plan -y, which is model +z
        assert_eq!(mesh.normals[0], Vector3::new(0.0, 0.0, 1.0));
        let tri = &mesh.faces[0].corners;
        assert!(triangle_normal(&mesh, tri).z > 0.0);
    }

    #[test]
    fn test_flat_profile_adds_nothing() {
        let mut mesh = MeshFactory::new("facade");
        let edge = LineSegment2D::new(Point2::new(0.0, 0.0), Point2::new(6.0, 0.0));
        assert!(!add_wall_profile(&mut mesh, &edge, &[(0.0, 0.0), (6.0, 0.0)], &TextureData::default()));
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_extruded_ring() {
        let mut mesh = MeshFactory::new("facade");
        add_extruded_polygon(&mut mesh, &rectangle(0.0, 0.0, 4.0, 2.0), 0.0, 1.0, &TextureData::default());
        assert_eq!(mesh.vertices.len(), 16);
        assert_eq!(mesh.normals.len(), 4);
        assert_eq!(mesh.triangle_count(), 8);
        // the wall along the first edge starts its texture at 0, the last at 10
        assert_eq!(mesh.text_coords[0].u, 0.0);
        assert_eq!(mesh.text_coords[12].u, 10.0);
    }
}
