// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Straight skeleton of a polygon with holes
//!
//! The skeleton splits the footprint into one facet per boundary edge. When
//! every facet is raised with the same slope from its edge, neighbouring
//! facets meet exactly along the skeleton, which is what a hipped roof
//! looks like.
//!
//! Computation is event driven: the boundary is shrunk as a wavefront and
//! every wavefront vertex records the arc it travels. Facets are
//! then stitched from the arcs tagged with their edge. Faces that cannot be
//! closed are reported in [`SkeletonOutput::skipped`] instead of failing the
//! whole computation.

mod faces;
mod wavefront;


use crate::error::{Error, Result};
use crate::polygon::{signed_area, Polygon2D};
use crate::vector::{cross, try_normalize, LineSegment2D};
use nalgebra::Point2;
use std::fmt;

/// Default distance below which skeleton points are considered equal
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// Sine of the angle below which a ring vertex counts as collinear
const COLLINEAR_SINE: f64 = 1e-9;

/// One roof facet and the boundary edge it rises from
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeOutput {
    /// Facet polygon, counter-clockwise, starting with the edge's begin and end
    pub polygon: Polygon2D,
    /// Boundary edge in wavefront direction (holes run clockwise)
    pub edge: LineSegment2D,
}

impl EdgeOutput {
    /// Largest distance from a facet point to the line of its edge
    pub fn max_distance(&self) -> f64 {
        self.polygon
            .points()
            .iter()
            .map(|p| self.edge.distance_to_line(p))
            .fold(0.0, f64::max)
    }
}

/// Why a facet is missing from the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Collapsed to fewer than three distinct points
    Degenerate,
    /// Skeleton arcs around the edge do not form a closed ring
    Open,
    /// Propagation stopped at the event limit
    EventLimit,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::Degenerate => "facet has fewer than three vertices",
            SkipReason::Open => "facet boundary could not be closed",
            SkipReason::EventLimit => "skeleton event limit reached",
        };
        f.write_str(text)
    }
}

/// Facet that was dropped from the output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkippedFace {
    pub edge: LineSegment2D,
    pub reason: SkipReason,
}

/// Facets of one skeleton computation
#[derive(Debug, Clone, Default)]
pub struct SkeletonOutput {
    pub faces: Vec<EdgeOutput>,
    pub skipped: Vec<SkippedFace>,
}

impl SkeletonOutput {
    /// Summed facet area
    pub fn area(&self) -> f64 {
        self.faces.iter().map(|f| f.polygon.area()).sum()
    }

    /// Largest facet point distance to its own edge
    pub fn max_distance(&self) -> f64 {
        self.faces
            .iter()
            .map(EdgeOutput::max_distance)
            .fold(0.0, f64::max)
    }

    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Drop repeated and collinear points (including zero-width spikes)
fn clean_ring(points: &[Point2<f64>], tolerance: f64) -> Vec<Point2<f64>> {
    let mut ring: Vec<Point2<f64>> = Vec::with_capacity(points.len());
    for p in points {
        if ring.last().map_or(true, |q| (p - q).norm() > tolerance) {
            ring.push(*p);
        }
    }
    while ring.len() > 1 && (ring[0] - ring[ring.len() - 1]).norm() <= tolerance {
        ring.pop();
    }

    loop {
        let n = ring.len();
        if n < 3 {
            break;
        }
        let straight = (0..n).find(|&i| {
            let a = ring[(i + n - 1) % n];
            let b = ring[i];
            let c = ring[(i + 1) % n];
            match (try_normalize(&(b - a)), try_normalize(&(c - b))) {
                (Some(d1), Some(d2)) => cross(&d1, &d2).abs() < COLLINEAR_SINE,
                _ => true,
            }
        });
        match straight {
            Some(i) => {
                ring.remove(i);
            }
            None => break,
        }
    }
    ring
}

fn oriented(mut ring: Vec<Point2<f64>>, ccw: bool) -> Vec<Point2<f64>> {
    if (signed_area(&ring) > 0.0) != ccw {
        ring.reverse();
    }
    ring
}

/// Straight skeleton with [`DEFAULT_TOLERANCE`]
pub fn skeleton(outer: &Polygon2D, holes: &[Polygon2D]) -> Result<SkeletonOutput> {
    skeleton_with_tolerance(outer, holes, DEFAULT_TOLERANCE)
}

/// Compute the straight skeleton facets of `outer` minus `holes`.
///
/// Ring orientation of the input does not matter. Holes that degenerate
/// during cleanup are ignored. Fails only when the outer ring itself has
/// fewer than three usable points.
pub fn skeleton_with_tolerance(
    outer: &Polygon2D,
    holes: &[Polygon2D],
    tolerance: f64,
) -> Result<SkeletonOutput> {
    let outer_ring = clean_ring(outer.points(), tolerance);
    if outer_ring.len() < 3 {
        return Err(Error::polygon(format!(
            "outer ring has {} usable points after cleanup",
            outer_ring.len()
        )));
    }

    let mut rings = vec![oriented(outer_ring, true)];
    for (index, hole) in holes.iter().enumerate() {
        let ring = clean_ring(hole.points(), tolerance);
        if ring.len() < 3 {
            tracing::warn!(index, "ignoring degenerate hole");
            continue;
        }
        rings.push(oriented(ring, false));
    }

    let vertex_count: usize = rings.iter().map(Vec::len).sum();
    let max_events = 64 * vertex_count * vertex_count + 1024;

    let propagation = wavefront::Wavefront::new(&rings, tolerance).propagate(max_events);
    let (faces, skipped) = faces::assemble(
        &propagation.edges,
        &propagation.arcs,
        tolerance * 10.0,
        propagation.exhausted,
    );

    tracing::debug!(
        edges = propagation.edges.len(),
        arcs = propagation.arcs.len(),
        faces = faces.len(),
        skipped = skipped.len(),
        "straight skeleton computed"
    );

    Ok(SkeletonOutput { faces, skipped })
}
