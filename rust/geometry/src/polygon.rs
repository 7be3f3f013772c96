// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan-view polygons: simple rings, rings with holes and multi-polygons

use crate::error::{Error, Result};
use crate::transform::transform_point_2d;
use crate::vector::LineSegment2D;
use nalgebra::{Matrix3, Point2, Vector2};

/// Signed area (shoelace). Positive for counter-clockwise rings.
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        sum += a.x * b.y - b.x * a.y;
    }
    sum * 0.5
}

/// Ray-crossing point-in-polygon test.
///
/// Uses the half-open rule: points on a left or bottom boundary count as
/// inside, points on a right or top boundary as outside. Every point of the
/// plane is therefore claimed by exactly one of two polygons sharing an edge.
pub fn is_point_inside_polygon(point: &Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = &polygon[i];
        let pj = &polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pj.x + (point.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Lower-left corner of the axis-aligned bounding box
pub fn min_bound(points: &[Point2<f64>]) -> Point2<f64> {
    points.iter().fold(
        Point2::new(f64::MAX, f64::MAX),
        |acc, p| Point2::new(acc.x.min(p.x), acc.y.min(p.y)),
    )
}

/// Upper-right corner of the axis-aligned bounding box
pub fn max_bound(points: &[Point2<f64>]) -> Point2<f64> {
    points.iter().fold(
        Point2::new(f64::MIN, f64::MIN),
        |acc, p| Point2::new(acc.x.max(p.x), acc.y.max(p.y)),
    )
}

/// Axis-aligned 2D bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Bounds2D {
    pub fn of(points: &[Point2<f64>]) -> Self {
        Self {
            min: min_bound(points),
            max: max_bound(points),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Length of the diagonal
    #[inline]
    pub fn diagonal(&self) -> f64 {
        (self.max - self.min).norm()
    }
}

/// Sutherland-Hodgman clip of a ring against one half-plane.
///
/// Keeps the part where `(p - origin) · normal >= 0`. Non-convex input may
/// come back with zero-width bridges along the clip line, which is harmless
/// for area and triangulation.
pub fn clip_half_plane(
    points: &[Point2<f64>],
    origin: &Point2<f64>,
    normal: &Vector2<f64>,
) -> Vec<Point2<f64>> {
    let n = points.len();
    let mut out = Vec::with_capacity(n + 2);
    if n == 0 {
        return out;
    }
    let side = |p: &Point2<f64>| (p - origin).dot(normal);

    for i in 0..n {
        let cur = &points[i];
        let next = &points[(i + 1) % n];
        let dc = side(cur);
        let dn = side(next);

        if dc >= 0.0 {
            out.push(*cur);
        }
        if (dc >= 0.0) != (dn >= 0.0) {
            let t = dc / (dc - dn);
            out.push(cur + (next - cur) * t);
        }
    }
    out
}

/// Simple polygon, implicitly closed (the closing edge runs last -> first)
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    points: Vec<Point2<f64>>,
}

impl Polygon2D {
    /// Create a polygon. An explicit closing point equal to the first one is
    /// dropped; fewer than three remaining points is an error.
    pub fn new(mut points: Vec<Point2<f64>>) -> Result<Self> {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return Err(Error::polygon(format!(
                "polygon needs at least 3 points, got {}",
                points.len()
            )));
        }
        Ok(Self { points })
    }

    #[inline]
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area, positive when counter-clockwise
    #[inline]
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[inline]
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Same ring walked the other way
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Counter-clockwise copy
    pub fn to_ccw(&self) -> Self {
        if self.is_ccw() {
            self.clone()
        } else {
            self.reversed()
        }
    }

    /// Clockwise copy
    pub fn to_cw(&self) -> Self {
        if self.is_ccw() {
            self.reversed()
        } else {
            self.clone()
        }
    }

    pub fn contains(&self, point: &Point2<f64>) -> bool {
        is_point_inside_polygon(point, &self.points)
    }

    pub fn bounds(&self) -> Bounds2D {
        Bounds2D::of(&self.points)
    }

    /// Edges in ring order, including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = LineSegment2D> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| LineSegment2D::new(self.points[i], self.points[(i + 1) % n]))
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let offset = Vector2::new(dx, dy);
        Self {
            points: self.points.iter().map(|p| p + offset).collect(),
        }
    }

    pub fn transformed(&self, matrix: &Matrix3<f64>) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| transform_point_2d(p, matrix))
                .collect(),
        }
    }
}

/// Outer ring plus holes. Holes are expected inside the outer ring and
/// disjoint from each other; this is not validated.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonWithHoles2D {
    pub outer: Polygon2D,
    pub holes: Vec<Polygon2D>,
}

impl PolygonWithHoles2D {
    pub fn new(outer: Polygon2D, holes: Vec<Polygon2D>) -> Self {
        Self { outer, holes }
    }

    pub fn from_outer(outer: Polygon2D) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Outer area minus hole areas
    pub fn area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(Polygon2D::area).sum::<f64>()
    }

    pub fn contains(&self, point: &Point2<f64>) -> bool {
        self.outer.contains(point) && !self.holes.iter().any(|h| h.contains(point))
    }

    /// All rings, outer first
    pub fn rings(&self) -> impl Iterator<Item = &Polygon2D> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            outer: self.outer.translated(dx, dy),
            holes: self.holes.iter().map(|h| h.translated(dx, dy)).collect(),
        }
    }

    pub fn transformed(&self, matrix: &Matrix3<f64>) -> Self {
        Self {
            outer: self.outer.transformed(matrix),
            holes: self.holes.iter().map(|h| h.transformed(matrix)).collect(),
        }
    }
}

/// Any plan-view area a roof facet or footprint can take
#[derive(Debug, Clone, PartialEq)]
pub enum Shape2D {
    Simple(Polygon2D),
    WithHoles(PolygonWithHoles2D),
    Multi(Vec<PolygonWithHoles2D>),
}

impl Shape2D {
    pub fn area(&self) -> f64 {
        match self {
            Shape2D::Simple(p) => p.area(),
            Shape2D::WithHoles(p) => p.area(),
            Shape2D::Multi(parts) => parts.iter().map(PolygonWithHoles2D::area).sum(),
        }
    }

    pub fn contains(&self, point: &Point2<f64>) -> bool {
        match self {
            Shape2D::Simple(p) => p.contains(point),
            Shape2D::WithHoles(p) => p.contains(point),
            Shape2D::Multi(parts) => parts.iter().any(|p| p.contains(point)),
        }
    }

    /// Every ring of the shape (outer rings and holes)
    pub fn rings(&self) -> Vec<&Polygon2D> {
        match self {
            Shape2D::Simple(p) => vec![p],
            Shape2D::WithHoles(p) => p.rings().collect(),
            Shape2D::Multi(parts) => parts.iter().flat_map(|p| p.rings()).collect(),
        }
    }

    /// Normalize into independent polygon-with-holes parts
    pub fn to_polygons_with_holes(&self) -> Vec<PolygonWithHoles2D> {
        match self {
            Shape2D::Simple(p) => vec![PolygonWithHoles2D::from_outer(p.clone())],
            Shape2D::WithHoles(p) => vec![p.clone()],
            Shape2D::Multi(parts) => parts.clone(),
        }
    }

    pub fn bounds(&self) -> Bounds2D {
        let points: Vec<Point2<f64>> = self
            .rings()
            .into_iter()
            .flat_map(|r| r.points().iter().copied())
            .collect();
        Bounds2D::of(&points)
    }
}

impl From<Polygon2D> for Shape2D {
    fn from(p: Polygon2D) -> Self {
        Shape2D::Simple(p)
    }
}

impl From<PolygonWithHoles2D> for Shape2D {
    fn from(p: PolygonWithHoles2D) -> Self {
        if p.holes.is_empty() {
            Shape2D::Simple(p.outer)
        } else {
            Shape2D::WithHoles(p)
        }
    }
}

/// Axis-aligned rectangle `[x0, x1] x [y0, y1]` in counter-clockwise order
pub fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2<f64>> {
    vec![
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ]
}
