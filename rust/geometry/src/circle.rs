// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Largest circle inside a (possibly non-convex, holed) polygon
//!
//! Iterative cell refinement: the bounding box is covered with square cells,
//! each cell is scored by the distance from its centre to the boundary, and
//! cells that could still hold a better centre (`distance + half diagonal`)
//! are split into four until no cell can beat the best radius by more than
//! the tolerance.

use crate::polygon::{PolygonWithHoles2D, Polygon2D};
use crate::vector::LineSegment2D;
use nalgebra::Point2;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Upper bound on refined cells, keeps tiny tolerances from running away
const MAX_CELLS: usize = 200_000;

/// Circle in plan view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point2<f64>,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2<f64>, radius: f64) -> Self {
        Self { center, radius }
    }
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    center: Point2<f64>,
    half: f64,
    distance: f64,
    potential: f64,
}

impl Cell {
    fn new(center: Point2<f64>, half: f64, polygon: &PolygonWithHoles2D) -> Self {
        let distance = signed_boundary_distance(&center, polygon);
        Self {
            center,
            half,
            distance,
            potential: distance + half * std::f64::consts::SQRT_2,
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.potential.total_cmp(&other.potential) == Ordering::Equal
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.potential.total_cmp(&other.potential)
    }
}

fn segment_distance(p: &Point2<f64>, seg: &LineSegment2D) -> f64 {
    let v = seg.vector();
    let len_sq = v.norm_squared();
    if len_sq == 0.0 {
        return (p - seg.begin).norm();
    }
    let t = ((p - seg.begin).dot(&v) / len_sq).clamp(0.0, 1.0);
    (p - (seg.begin + v * t)).norm()
}

fn ring_distance(p: &Point2<f64>, ring: &Polygon2D) -> f64 {
    ring.edges()
        .map(|e| segment_distance(p, &e))
        .fold(f64::INFINITY, f64::min)
}

/// Distance to the nearest boundary, negative outside the polygon
pub fn signed_boundary_distance(p: &Point2<f64>, polygon: &PolygonWithHoles2D) -> f64 {
    let d = polygon
        .rings()
        .map(|r| ring_distance(p, r))
        .fold(f64::INFINITY, f64::min);
    if polygon.contains(p) {
        d
    } else {
        -d
    }
}

/// Area centroid of a ring, falls back to the vertex average for zero area
fn centroid(ring: &Polygon2D) -> Point2<f64> {
    let pts = ring.points();
    let n = pts.len();
    let mut cx = 0.0;
    let mut cy = 0.0;
    let mut area = 0.0;
    for i in 0..n {
        let a = &pts[i];
        let b = &pts[(i + 1) % n];
        let f = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * f;
        cy += (a.y + b.y) * f;
        area += f * 3.0;
    }
    if area.abs() < f64::EPSILON {
        let sum = pts.iter().fold(nalgebra::Vector2::zeros(), |acc, p| acc + p.coords);
        return Point2::from(sum / n as f64);
    }
    Point2::new(cx / area, cy / area)
}

/// Find the largest circle inside the polygon, to within `tolerance` of the
/// best achievable radius.
pub fn largest_inscribed_circle(polygon: &PolygonWithHoles2D, tolerance: f64) -> Circle {
    let bounds = polygon.outer.bounds();
    let cell_size = bounds.width().min(bounds.height());
    if cell_size <= 0.0 {
        return Circle::new(bounds.min, 0.0);
    }
    let tolerance = tolerance.max(f64::EPSILON);
    let half = cell_size / 2.0;

    let mut queue = BinaryHeap::new();
    let mut x = bounds.min.x;
    while x < bounds.max.x {
        let mut y = bounds.min.y;
        while y < bounds.max.y {
            queue.push(Cell::new(Point2::new(x + half, y + half), half, polygon));
            y += cell_size;
        }
        x += cell_size;
    }

    let mut best = Cell::new(centroid(&polygon.outer), 0.0, polygon);
    let box_cell = Cell::new(bounds.center(), 0.0, polygon);
    if box_cell.distance > best.distance {
        best = box_cell;
    }

    let mut processed = 0usize;
    while let Some(cell) = queue.pop() {
        processed += 1;
        if cell.distance > best.distance {
            best = cell;
        }
        if cell.potential - best.distance <= tolerance {
            // queue is ordered by potential, nothing left can improve
            break;
        }
        if processed > MAX_CELLS {
            tracing::warn!(
                processed,
                tolerance,
                "inscribed circle search hit the cell limit"
            );
            break;
        }
        let h = cell.half / 2.0;
        for (dx, dy) in [(-h, -h), (h, -h), (-h, h), (h, h)] {
            queue.push(Cell::new(
                Point2::new(cell.center.x + dx, cell.center.y + dy),
                h,
                polygon,
            ));
        }
    }

    Circle::new(best.center, best.distance.max(0.0))
}
