// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building outline model
//!
//! A wall is an ordered list of parts, each an open chain of nodes. Parts
//! link head-to-tail and the last node of the whole chain must return to the
//! first one.

use crate::error::{Result, RoofError};
use roofmesh_geometry::{Point2, Polygon2D, PolygonWithHoles2D};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallNode {
    pub point: Point2<f64>,
}

impl WallNode {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            point: Point2::new(x, y),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallPart {
    pub nodes: Vec<WallNode>,
}

impl WallPart {
    pub fn new(nodes: Vec<WallNode>) -> Self {
        Self { nodes }
    }

    /// Part through the given plan-view points
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        Self::new(points.iter().map(|&(x, y)| WallNode::new(x, y)).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wall {
    pub parts: Vec<WallPart>,
}

impl Wall {
    pub fn new(parts: Vec<WallPart>) -> Self {
        Self { parts }
    }
}

/// Outer wall plus inner courtyard walls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingPart {
    pub wall: Wall,
    pub inline_walls: Vec<Wall>,
}

/// Chain the wall parts into one closed ring.
///
/// A part starting where the previous one ended shares that node. The
/// chain has to end on its first node; the duplicate closing node is not
/// part of the returned polygon.
pub fn wall_to_polygon(wall: &Wall) -> Result<Polygon2D> {
    let mut points: Vec<Point2<f64>> = Vec::new();

    for part in &wall.parts {
        let shared = matches!(
            (points.last(), part.nodes.first()),
            (Some(last), Some(first)) if *last == first.point
        );
        if shared {
            points.pop();
        }
        points.extend(part.nodes.iter().map(|n| n.point));
    }

    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return Err(RoofError::EmptyWall);
    };
    if points.len() < 2 || first != last {
        return Err(RoofError::WallNotClosed {
            x: last.x,
            y: last.y,
        });
    }
    points.pop();

    Ok(Polygon2D::new(points)?)
}

/// Footprint of a building part, inline walls become holes
pub fn building_part_to_polygon_with_holes(part: &BuildingPart) -> Result<PolygonWithHoles2D> {
    let outer = wall_to_polygon(&part.wall)?;
    let holes = part
        .inline_walls
        .iter()
        .map(wall_to_polygon)
        .collect::<Result<Vec<_>>>()?;
    Ok(PolygonWithHoles2D::new(outer, holes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_share_nodes() {
        let wall = Wall::new(vec![
            WallPart::from_points(&[(0.0, 0.0), (4.0, 0.0), (4.0, 3.0)]),
            WallPart::from_points(&[(4.0, 3.0), (0.0, 3.0), (0.0, 0.0)]),
        ]);
        let polygon = wall_to_polygon(&wall).unwrap();
        assert_eq!(polygon.len(), 4);
        assert_eq!(polygon.points()[2], Point2::new(4.0, 3.0));
    }

    #[test]
    fn test_open_wall() {
        let wall = Wall::new(vec![WallPart::from_points(&[(0.0, 0.0), (4.0, 0.0), (4.0, 3.0)])]);
        assert_eq!(
            wall_to_polygon(&wall),
            Err(RoofError::WallNotClosed { x: 4.0, y: 3.0 })
        );
    }

    #[test]
    fn test_empty_wall() {
        assert_eq!(wall_to_polygon(&Wall::default()), Err(RoofError::EmptyWall));
    }

    #[test]
    fn test_closed_but_too_short() {
        let wall = Wall::new(vec![WallPart::from_points(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)])]);
        assert!(matches!(wall_to_polygon(&wall), Err(RoofError::Geometry(_))));
    }
}
