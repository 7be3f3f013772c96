// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Wrapper around earcutr. Triangles always come back counter-clockwise in
//! plan view, whatever the ring orientation of the input.

use crate::polygon::PolygonWithHoles2D;
use crate::vector::cross;
use crate::{Error, Point2, Result};

/// Check if a ring is convex (all turns have the same sign)
#[inline]
fn is_convex(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0i8;
    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];
        let turn = cross(&(p1 - p0), &(p2 - p1));
        if turn.abs() > 1e-10 {
            let current = if turn > 0.0 { 1i8 } else { -1i8 };
            if sign == 0 {
                sign = current;
            } else if sign != current {
                return false;
            }
        }
    }
    true
}

fn fan(n: usize) -> Vec<usize> {
    (1..n - 1).flat_map(|i| [0, i, i + 1]).collect()
}

/// Flip triangles that wind clockwise
fn make_ccw(points: &[Point2<f64>], indices: &mut [usize]) {
    for tri in indices.chunks_exact_mut(3) {
        let a = points[tri[0]];
        let b = points[tri[1]];
        let c = points[tri[2]];
        if cross(&(b - a), &(c - a)) < 0.0 {
            tri.swap(1, 2);
        }
    }
}

/// Triangulate a simple ring.
/// Returns triangle indices into the input points.
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();
    if n < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }

    // FAST PATH: convex ring, fan from the first point
    let mut indices = if is_convex(points) {
        fan(n)
    } else {
        let vertices: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        earcutr::earcut(&vertices, &[], 2)
            .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?
    };
    make_ccw(points, &mut indices);
    Ok(indices)
}

/// Triangulate a polygon with holes.
///
/// Returns the combined point list (outer ring first, then every hole) and
/// triangle indices into it.
pub fn triangulate_polygon_with_holes(
    polygon: &PolygonWithHoles2D,
) -> Result<(Vec<Point2<f64>>, Vec<usize>)> {
    let outer = polygon.outer.points();
    let holes: Vec<&[Point2<f64>]> = polygon
        .holes
        .iter()
        .map(|h| h.points())
        .filter(|h| h.len() >= 3)
        .collect();

    if holes.is_empty() {
        return Ok((outer.to_vec(), triangulate_polygon(outer)?));
    }

    let total = outer.len() + holes.iter().map(|h| h.len()).sum::<usize>();
    let mut points = Vec::with_capacity(total);
    points.extend_from_slice(outer);
    let mut hole_starts = Vec::with_capacity(holes.len());
    for hole in holes {
        hole_starts.push(points.len());
        points.extend_from_slice(hole);
    }

    let vertices: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    let mut indices = earcutr::earcut(&vertices, &hole_starts, 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;
    if indices.is_empty() {
        return Err(Error::TriangulationError(
            "earcut produced no triangles".to_string(),
        ));
    }
    make_ccw(&points, &mut indices);
    Ok((points, indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::{rectangle, signed_area, Polygon2D};
    use approx::assert_relative_eq;

    fn area_of(points: &[Point2<f64>], indices: &[usize]) -> f64 {
        indices
            .chunks_exact(3)
            .map(|t| signed_area(&[points[t[0]], points[t[1]], points[t[2]]]))
            .sum()
    }

    #[test]
    fn test_convex_fan() {
        let pts = rectangle(0.0, 0.0, 4.0, 2.0);
        let idx = triangulate_polygon(&pts).unwrap();
        assert_eq!(idx.len(), 6);
        assert_relative_eq!(area_of(&pts, &idx), 8.0);
    }

    #[test]
    fn test_clockwise_ring_gives_ccw_triangles() {
        let mut pts = rectangle(0.0, 0.0, 4.0, 2.0);
        pts.reverse();
        let idx = triangulate_polygon(&pts).unwrap();
        assert_relative_eq!(area_of(&pts, &idx), 8.0);
    }

    #[test]
    fn test_concave() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 4.0),
            Point2::new(4.0, 4.0),
            Point2::new(4.0, 10.0),
            Point2::new(0.0, 10.0),
        ];
        let idx = triangulate_polygon(&pts).unwrap();
        assert_eq!(idx.len(), 12);
        assert_relative_eq!(area_of(&pts, &idx), 64.0, epsilon = 1e-9);
    }

    #[test]
    fn test_with_hole() {
        let outer = Polygon2D::new(rectangle(0.0, 0.0, 10.0, 10.0)).unwrap();
        let hole = Polygon2D::new(rectangle(3.0, 3.0, 7.0, 7.0)).unwrap();
        let (pts, idx) =
            triangulate_polygon_with_holes(&PolygonWithHoles2D::new(outer, vec![hole])).unwrap();
        assert_eq!(pts.len(), 8);
        assert_relative_eq!(area_of(&pts, &idx), 84.0, epsilon = 1e-9);
    }

    #[test]
    fn test_too_few_points() {
        let r = triangulate_polygon(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert!(matches!(r, Err(Error::TriangulationError(_))));
    }
}
