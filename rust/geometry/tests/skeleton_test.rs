// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use nalgebra::Rotation2;
use roofmesh_geometry::circle::signed_boundary_distance;
use roofmesh_geometry::polygon::rectangle;
use roofmesh_geometry::{
    build_dome, largest_inscribed_circle, skeleton, Circle, MeshFactory, Point2, Polygon2D,
    PolygonWithHoles2D, SkeletonOutput,
};

fn polygon(points: &[(f64, f64)]) -> Polygon2D {
    Polygon2D::new(points.iter().map(|&(x, y)| Point2::new(x, y)).collect()).unwrap()
}

fn l_shape() -> Polygon2D {
    polygon(&[
        (0.0, 0.0),
        (10.0, 0.0),
        (10.0, 4.0),
        (4.0, 4.0),
        (4.0, 10.0),
        (0.0, 10.0),
    ])
}

fn holed_square() -> PolygonWithHoles2D {
    PolygonWithHoles2D::new(
        Polygon2D::new(rectangle(0.0, 0.0, 10.0, 10.0)).unwrap(),
        vec![Polygon2D::new(rectangle(4.0, 4.0, 6.0, 6.0)).unwrap()],
    )
}

fn run(footprint: &PolygonWithHoles2D) -> SkeletonOutput {
    let out = skeleton(&footprint.outer, &footprint.holes).unwrap();
    assert!(out.is_complete(), "skipped faces: {:?}", out.skipped);
    out
}

/// Point samples on a grid offset so no sample lands on an integer or
/// half-integer coordinate
fn samples(footprint: &PolygonWithHoles2D) -> Vec<Point2<f64>> {
    let b = footprint.outer.bounds();
    let mut out = Vec::new();
    let mut x = b.min.x + 0.137;
    while x < b.max.x {
        let mut y = b.min.y + 0.291;
        while y < b.max.y {
            out.push(Point2::new(x, y));
            y += 0.5;
        }
        x += 0.5;
    }
    out
}

#[test]
fn test_area_is_conserved() {
    let footprints = vec![
        PolygonWithHoles2D::from_outer(Polygon2D::new(rectangle(0.0, 0.0, 10.0, 6.0)).unwrap()),
        PolygonWithHoles2D::from_outer(l_shape()),
        PolygonWithHoles2D::from_outer(polygon(&[(0.0, 0.0), (6.0, 0.0), (0.0, 8.0)])),
        PolygonWithHoles2D::from_outer(polygon(&[
            (0.0, 0.0),
            (8.0, 0.0),
            (10.0, 5.0),
            (3.0, 9.0),
            (-1.0, 4.0),
        ])),
        holed_square(),
    ];

    for footprint in &footprints {
        let out = run(footprint);
        let expected = footprint.area();
        assert_relative_eq!(out.area(), expected, max_relative = 1e-6);
        assert_eq!(
            out.faces.len(),
            footprint.rings().map(|r| r.len()).sum::<usize>()
        );
    }
}

#[test]
fn test_area_survives_rotation() {
    let rotated = l_shape().transformed(&Rotation2::new(0.5236).to_homogeneous());
    let out = skeleton(&rotated, &[]).unwrap();
    assert!(out.is_complete());
    assert_relative_eq!(out.area(), 64.0, max_relative = 1e-6);
}

#[test]
fn test_facets_are_disjoint() {
    for footprint in [PolygonWithHoles2D::from_outer(l_shape()), holed_square()] {
        let out = run(&footprint);
        for p in samples(&footprint) {
            let hits = out.faces.iter().filter(|f| f.polygon.contains(&p)).count();
            let expected = usize::from(footprint.contains(&p));
            assert_eq!(hits, expected, "sample {:?}", p);
        }
    }
}

#[test]
fn test_every_facet_rests_on_its_edge() {
    let out = run(&PolygonWithHoles2D::from_outer(l_shape()));
    for face in &out.faces {
        let pts = face.polygon.points();
        assert_eq!(pts[0], face.edge.begin);
        assert_eq!(pts[1], face.edge.end);
        assert!(face.polygon.is_ccw());
    }
}

#[test]
fn test_inscribed_circle_bound() {
    let tolerance = 0.01;
    for footprint in [PolygonWithHoles2D::from_outer(l_shape()), holed_square()] {
        let circle = largest_inscribed_circle(&footprint, tolerance);
        assert!(signed_boundary_distance(&circle.center, &footprint) + tolerance >= circle.radius);
        for p in samples(&footprint) {
            assert!(signed_boundary_distance(&p, &footprint) <= circle.radius + tolerance);
        }
    }
}

#[test]
fn test_dome_closes_seamlessly() {
    let mut mesh = MeshFactory::new("dome");
    build_dome(&mut mesh, &Circle::new(Point2::new(1.0, 1.0), 3.0), 5, 9, true).unwrap();
    let render = mesh.to_render_mesh();

    // 9 sections x 5 bands, two triangles each
    assert_eq!(render.triangle_count(), 90);
    // every profile point is shared around the ring, none is left dangling
    let mut used = vec![false; mesh.vertices.len()];
    for corner in &mesh.faces[0].corners {
        used[corner.vertex] = true;
    }
    assert!(used.iter().all(|&u| u));

    let bounds = mesh.bounds().unwrap();
    assert_relative_eq!(bounds.max.y, 3.0, epsilon = 1e-12);
    assert_relative_eq!(bounds.min.y, 0.0, epsilon = 1e-12);
}
