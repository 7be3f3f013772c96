// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face assembly: stitch the arcs tagged with a boundary edge into the
//! polygon of that edge's facet.

use super::wavefront::{Arc, EdgeLine};
use super::{EdgeOutput, SkipReason, SkippedFace};
use crate::polygon::Polygon2D;
use crate::vector::{cross, LineSegment2D};
use nalgebra::{Point2, Vector2};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Points closer than the snap distance become one graph node
struct NodeIndex {
    points: Vec<Point2<f64>>,
    grid: FxHashMap<(i64, i64), SmallVec<[usize; 2]>>,
    snap: f64,
}

impl NodeIndex {
    fn new(snap: f64) -> Self {
        Self {
            points: Vec::new(),
            grid: FxHashMap::default(),
            snap,
        }
    }

    fn cell(&self, p: &Point2<f64>) -> (i64, i64) {
        ((p.x / self.snap).floor() as i64, (p.y / self.snap).floor() as i64)
    }

    fn insert(&mut self, p: Point2<f64>) -> usize {
        let (cx, cy) = self.cell(&p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(ids) = self.grid.get(&(cx + dx, cy + dy)) {
                    if let Some(&id) = ids
                        .iter()
                        .find(|&&id| (self.points[id] - p).norm() <= self.snap)
                    {
                        return id;
                    }
                }
            }
        }
        let id = self.points.len();
        self.points.push(p);
        self.grid.entry((cx, cy)).or_default().push(id);
        id
    }
}

/// Signed turn angle from `d_in` to `d_out`, positive to the left
fn turn(d_in: &Vector2<f64>, d_out: &Vector2<f64>) -> f64 {
    cross(d_in, d_out).atan2(d_in.dot(d_out))
}

fn trace_face(edge: &EdgeLine, arcs: &[&Arc], snap: f64) -> Result<Vec<Point2<f64>>, SkipReason> {
    let mut nodes = NodeIndex::new(snap);
    let goal = nodes.insert(edge.start);
    let first = nodes.insert(edge.end);
    if goal == first {
        return Err(SkipReason::Degenerate);
    }

    let mut adjacency: Vec<SmallVec<[usize; 4]>> = Vec::new();
    for arc in arcs {
        let a = nodes.insert(arc.from);
        let b = nodes.insert(arc.to);
        if a == b {
            continue;
        }
        adjacency.resize(nodes.points.len(), SmallVec::new());
        if !adjacency[a].contains(&b) {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
    }
    adjacency.resize(nodes.points.len(), SmallVec::new());

    let mut path = vec![edge.start, edge.end];
    let mut visited = vec![false; nodes.points.len()];
    visited[first] = true;
    let mut came_from = goal;
    let mut at = first;
    let mut d_in = edge.dir;

    for _ in 0..=arcs.len() {
        let here = nodes.points[at];
        let next = adjacency[at]
            .iter()
            .copied()
            .filter(|&n| n != came_from)
            .max_by(|&x, &y| {
                let tx = turn(&d_in, &(nodes.points[x] - here));
                let ty = turn(&d_in, &(nodes.points[y] - here));
                tx.total_cmp(&ty)
            })
            .ok_or(SkipReason::Open)?;

        if next == goal {
            return Ok(path);
        }
        if visited[next] {
            return Err(SkipReason::Open);
        }
        visited[next] = true;
        d_in = nodes.points[next] - here;
        path.push(nodes.points[next]);
        came_from = at;
        at = next;
    }
    Err(SkipReason::Open)
}

pub(super) fn assemble(
    edges: &[EdgeLine],
    arcs: &[Arc],
    snap: f64,
    exhausted: bool,
) -> (Vec<EdgeOutput>, Vec<SkippedFace>) {
    let mut by_edge: Vec<Vec<&Arc>> = vec![Vec::new(); edges.len()];
    for arc in arcs {
        by_edge[arc.edges[0]].push(arc);
        if arc.edges[1] != arc.edges[0] {
            by_edge[arc.edges[1]].push(arc);
        }
    }

    let mut faces = Vec::with_capacity(edges.len());
    let mut skipped = Vec::new();
    for (edge, edge_arcs) in edges.iter().zip(&by_edge) {
        let segment = LineSegment2D::new(edge.start, edge.end);
        let traced = trace_face(edge, edge_arcs, snap)
            .and_then(|points| Polygon2D::new(points).map_err(|_| SkipReason::Degenerate));
        match traced {
            Ok(polygon) => faces.push(EdgeOutput {
                polygon,
                edge: segment,
            }),
            Err(reason) => {
                let reason = if exhausted {
                    SkipReason::EventLimit
                } else {
                    reason
                };
                tracing::warn!(
                    begin_x = edge.start.x,
                    begin_y = edge.start.y,
                    end_x = edge.end.x,
                    end_y = edge.end.y,
                    %reason,
                    "skipping skeleton face"
                );
                skipped.push(SkippedFace {
                    edge: segment,
                    reason,
                });
            }
        }
    }
    (faces, skipped)
}
