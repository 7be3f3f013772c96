// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Oriented bounding rectangle of a footprint

use crate::vector::{cross, orthogonal_left, try_normalize};
use nalgebra::{Point2, Vector2};

/// Rectangle spanned from a corner along a unit direction (width) and its
/// left orthogonal (height)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle2D {
    pub point: Point2<f64>,
    pub direction: Vector2<f64>,
    pub width: f64,
    pub height: f64,
}

impl Rectangle2D {
    /// Corners in counter-clockwise order, starting at `point`
    pub fn corners(&self) -> [Point2<f64>; 4] {
        let u = self.direction * self.width;
        let v = orthogonal_left(&self.direction) * self.height;
        [self.point, self.point + u, self.point + u + v, self.point + v]
    }

    pub fn center(&self) -> Point2<f64> {
        self.point
            + self.direction * (self.width / 2.0)
            + orthogonal_left(&self.direction) * (self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Unit vector along the longer side
    pub fn long_axis(&self) -> Vector2<f64> {
        if self.width >= self.height {
            self.direction
        } else {
            orthogonal_left(&self.direction)
        }
    }
}

/// Andrew's monotone chain, counter-clockwise without collinear points
fn convex_hull(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut pts = points.to_vec();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut hull = half_hull(pts.iter());
    hull.extend(half_hull(pts.iter().rev()));
    hull
}

fn half_hull<'a>(points: impl Iterator<Item = &'a Point2<f64>>) -> Vec<Point2<f64>> {
    let mut chain: Vec<Point2<f64>> = Vec::new();
    for p in points {
        while chain.len() >= 2 {
            let a = chain[chain.len() - 2];
            let b = chain[chain.len() - 1];
            if cross(&(b - a), &(p - b)) <= 0.0 {
                chain.pop();
            } else {
                break;
            }
        }
        chain.push(*p);
    }
    // last point starts the other half
    chain.pop();
    chain
}

/// Minimum-area rectangle enclosing `points`, aligned with one of the hull
/// edges, then grown by `offset` on every side (negative shrinks, clamped
/// at zero size).
///
/// Returns `None` for an empty input.
pub fn find_rectangle(points: &[Point2<f64>], offset: f64) -> Option<Rectangle2D> {
    let hull = convex_hull(points);
    if hull.is_empty() {
        return None;
    }

    let mut directions: Vec<Vector2<f64>> = (0..hull.len())
        .filter_map(|i| try_normalize(&(hull[(i + 1) % hull.len()] - hull[i])))
        .collect();
    if directions.is_empty() {
        directions.push(Vector2::x());
    }

    let mut best: Option<Rectangle2D> = None;
    for d in directions {
        let o = orthogonal_left(&d);
        let (mut min_u, mut max_u) = (f64::MAX, f64::MIN);
        let (mut min_v, mut max_v) = (f64::MAX, f64::MIN);
        for p in &hull {
            let u = p.coords.dot(&d);
            let v = p.coords.dot(&o);
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }
        let candidate = Rectangle2D {
            point: Point2::from(d * min_u + o * min_v),
            direction: d,
            width: max_u - min_u,
            height: max_v - min_v,
        };
        if best.map_or(true, |b| candidate.area() < b.area() - 1e-12) {
            best = Some(candidate);
        }
    }

    best.map(|r| {
        let o = orthogonal_left(&r.direction);
        let grow_w = offset.max(-r.width / 2.0);
        let grow_h = offset.max(-r.height / 2.0);
        Rectangle2D {
            point: r.point - r.direction * grow_w - o * grow_h,
            direction: r.direction,
            width: r.width + 2.0 * grow_w,
            height: r.height + 2.0 * grow_h,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::{rectangle, signed_area};
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_aligned() {
        let r = find_rectangle(&rectangle(0.0, 0.0, 8.0, 3.0), 0.0).unwrap();
        assert_relative_eq!(r.area(), 24.0, epsilon = 1e-9);
        assert_relative_eq!(r.center(), Point2::new(4.0, 1.5), epsilon = 1e-9);
        assert_relative_eq!(r.long_axis().x.abs(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotated_rectangle_is_tight() {
        // 4x2 rectangle rotated by 30 degrees
        let (s, c) = 30f64.to_radians().sin_cos();
        let rot = |x: f64, y: f64| Point2::new(c * x - s * y, s * x + c * y);
        let pts = vec![rot(0.0, 0.0), rot(4.0, 0.0), rot(4.0, 2.0), rot(0.0, 2.0)];
        let r = find_rectangle(&pts, 0.0).unwrap();
        assert_relative_eq!(r.area(), 8.0, epsilon = 1e-9);
        assert_relative_eq!(r.width.max(r.height), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_offset_and_corners() {
        let r = find_rectangle(&rectangle(0.0, 0.0, 4.0, 4.0), 1.0).unwrap();
        assert_relative_eq!(r.area(), 36.0, epsilon = 1e-9);
        let corners = r.corners();
        assert_relative_eq!(signed_area(&corners), 36.0, epsilon = 1e-9);

        let shrunk = find_rectangle(&rectangle(0.0, 0.0, 4.0, 2.0), -5.0).unwrap();
        assert_eq!(shrunk.height, 0.0);
        assert_eq!(shrunk.width, 0.0);
    }

    #[test]
    fn test_concave_input_uses_hull() {
        let l = vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 6.0),
            Point2::new(0.0, 6.0),
        ];
        let r = find_rectangle(&l, 0.0).unwrap();
        assert_relative_eq!(r.area(), 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty() {
        assert!(find_rectangle(&[], 1.0).is_none());
    }
}
