// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront propagation
//!
//! Every boundary edge moves inward at unit speed along its left normal.
//! Wavefront vertices sit where two moving edges meet, so a vertex created
//! at time `t0` at `origin` is at `origin + velocity * (t - t0)` later on.
//! Vertices are never moved or edited after creation; an event consumes
//! vertices and spawns new ones, which keeps queued events checkable by
//! looking at the `active` flags and neighbour links.

use crate::vector::{cross, EPSILON};
use nalgebra::{Point2, Vector2};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// `1 + n_l·n_r` below this means the two edges are anti-parallel
const ANTI_PARALLEL: f64 = 1e-9;

/// One boundary edge with its unit direction and inward normal
#[derive(Debug, Clone, Copy)]
pub(super) struct EdgeLine {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub dir: Vector2<f64>,
    pub normal: Vector2<f64>,
}

/// Piece of the skeleton traced by a vertex or left by a collapsed loop,
/// separating the faces of the two tagged edges
#[derive(Debug, Clone, Copy)]
pub(super) struct Arc {
    pub from: Point2<f64>,
    pub to: Point2<f64>,
    pub edges: [usize; 2],
}

#[derive(Debug, Clone)]
struct Vertex {
    origin: Point2<f64>,
    t0: f64,
    velocity: Vector2<f64>,
    /// Edge ending at this vertex
    left: usize,
    /// Edge starting at this vertex
    right: usize,
    prev: usize,
    next: usize,
    active: bool,
    reflex: bool,
    anti_parallel: bool,
}

impl Vertex {
    #[inline]
    fn at(&self, t: f64) -> Point2<f64> {
        self.origin + self.velocity * (t - self.t0)
    }
}

#[derive(Debug, Clone, Copy)]
enum EventKind {
    Edge { a: usize, b: usize },
    Split { v: usize, edge: usize },
}

#[derive(Debug, Clone, Copy)]
struct Event {
    time: f64,
    kind: EventKind,
}

impl Event {
    fn rank(&self) -> u8 {
        match self.kind {
            EventKind::Edge { .. } => 0,
            EventKind::Split { .. } => 1,
        }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    // reversed: BinaryHeap is a max-heap, earliest event must come out first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.rank().cmp(&self.rank()))
    }
}

/// Result of running the wavefront to completion
pub(super) struct Propagation {
    pub edges: Vec<EdgeLine>,
    pub arcs: Vec<Arc>,
    /// The event limit was hit before every loop collapsed
    pub exhausted: bool,
}

pub(super) struct Wavefront {
    edges: Vec<EdgeLine>,
    vertices: Vec<Vertex>,
    /// Vertices whose right edge is the indexed edge, some may be inactive
    pieces: Vec<SmallVec<[usize; 2]>>,
    queue: BinaryHeap<Event>,
    arcs: Vec<Arc>,
    tolerance: f64,
    now: f64,
}

impl Wavefront {
    /// Build the initial wavefront. Rings must already be cleaned, the outer
    /// ring counter-clockwise and holes clockwise.
    pub fn new(rings: &[Vec<Point2<f64>>], tolerance: f64) -> Self {
        let mut wf = Self {
            edges: Vec::new(),
            vertices: Vec::new(),
            pieces: Vec::new(),
            queue: BinaryHeap::new(),
            arcs: Vec::new(),
            tolerance,
            now: 0.0,
        };

        for ring in rings {
            let n = ring.len();
            let base = wf.edges.len();
            for i in 0..n {
                let start = ring[i];
                let end = ring[(i + 1) % n];
                let dir = (end - start).normalize();
                wf.edges.push(EdgeLine {
                    start,
                    end,
                    dir,
                    normal: Vector2::new(-dir.y, dir.x),
                });
                wf.pieces.push(SmallVec::new());
            }
            for i in 0..n {
                let left = base + (i + n - 1) % n;
                let right = base + i;
                let prev = base + (i + n - 1) % n;
                let next = base + (i + 1) % n;
                wf.spawn(ring[i], 0.0, left, right, prev, next);
            }
        }

        for v in 0..wf.vertices.len() {
            wf.schedule_edge(v);
            wf.schedule_splits(v);
        }
        wf
    }

    /// Process events in time order until the queue drains or `max_events`
    /// have been popped.
    pub fn propagate(mut self, max_events: usize) -> Propagation {
        let mut processed = 0usize;
        let mut exhausted = false;

        while let Some(event) = self.queue.pop() {
            processed += 1;
            if processed > max_events {
                tracing::warn!(
                    max_events,
                    time = self.now,
                    "straight skeleton event limit reached"
                );
                exhausted = true;
                break;
            }
            self.now = self.now.max(event.time);
            match event.kind {
                EventKind::Edge { a, b } => self.on_edge_event(a, b),
                EventKind::Split { v, edge } => self.on_split_event(v, edge),
            }
        }

        let remaining = self.vertices.iter().filter(|v| v.active).count();
        if remaining > 0 && !exhausted {
            tracing::debug!(remaining, "wavefront vertices left after the last event");
        }

        Propagation {
            edges: self.edges,
            arcs: self.arcs,
            exhausted,
        }
    }

    fn spawn(
        &mut self,
        origin: Point2<f64>,
        t0: f64,
        left: usize,
        right: usize,
        prev: usize,
        next: usize,
    ) -> usize {
        let nl = self.edges[left].normal;
        let nr = self.edges[right].normal;
        let denom = 1.0 + nl.dot(&nr);
        let anti_parallel = denom < ANTI_PARALLEL;
        let velocity = if anti_parallel {
            tracing::debug!(
                x = origin.x,
                y = origin.y,
                time = t0,
                "anti-parallel wavefront edges, vertex gets zero velocity"
            );
            Vector2::zeros()
        } else {
            (nl + nr) / denom
        };
        let reflex = cross(&self.edges[left].dir, &self.edges[right].dir) < -EPSILON;

        let id = self.vertices.len();
        self.vertices.push(Vertex {
            origin,
            t0,
            velocity,
            left,
            right,
            prev,
            next,
            active: true,
            reflex,
            anti_parallel,
        });
        self.pieces[right].push(id);
        id
    }

    #[inline]
    fn at(&self, v: usize, t: f64) -> Point2<f64> {
        self.vertices[v].at(t)
    }

    fn schedule_edge(&mut self, a: usize) {
        let va = &self.vertices[a];
        let b = va.next;
        if a == b {
            return;
        }
        let vb = &self.vertices[b];
        let d = self.edges[va.right].dir;
        let t_ref = va.t0.max(vb.t0);
        let length = (vb.at(t_ref) - va.at(t_ref)).dot(&d);
        let rate = (vb.velocity - va.velocity).dot(&d);
        if rate >= -EPSILON {
            return;
        }
        let time = (t_ref - length / rate).max(self.now);
        self.queue.push(Event {
            time,
            kind: EventKind::Edge { a, b },
        });
    }

    fn schedule_splits(&mut self, v: usize) {
        let vert = &self.vertices[v];
        if !vert.reflex || vert.anti_parallel {
            return;
        }
        let mut events = Vec::new();
        for (e, edge) in self.edges.iter().enumerate() {
            if e == vert.left || e == vert.right {
                continue;
            }
            // distance to the moving line at t0, positive in front of it
            let ahead = (vert.origin - edge.start).dot(&edge.normal) - vert.t0;
            if ahead < -self.tolerance {
                continue;
            }
            let closing = 1.0 - vert.velocity.dot(&edge.normal);
            if closing <= EPSILON {
                continue;
            }
            let time = (vert.t0 + ahead.max(0.0) / closing).max(self.now);
            events.push(Event {
                time,
                kind: EventKind::Split { v, edge: e },
            });
        }
        self.queue.extend(events);
    }

    fn schedule(&mut self, v: usize) {
        let prev = self.vertices[v].prev;
        self.schedule_edge(prev);
        self.schedule_edge(v);
        self.schedule_splits(v);
    }

    /// Retire a vertex, recording the arc it traced up to `to`
    fn consume(&mut self, v: usize, to: Point2<f64>) {
        let vert = &mut self.vertices[v];
        vert.active = false;
        let arc = Arc {
            from: vert.origin,
            to,
            edges: [vert.left, vert.right],
        };
        self.push_arc(arc);
    }

    fn push_arc(&mut self, arc: Arc) {
        if (arc.to - arc.from).norm() > self.tolerance {
            self.arcs.push(arc);
        }
    }

    /// Replace adjacent vertices `a -> b` by one vertex at `x`
    fn merge(&mut self, a: usize, b: usize, x: Point2<f64>) -> usize {
        let (left, prev) = (self.vertices[a].left, self.vertices[a].prev);
        let (right, next) = (self.vertices[b].right, self.vertices[b].next);
        self.consume(a, x);
        self.consume(b, x);
        let n = self.spawn(x, self.now, left, right, prev, next);
        self.vertices[prev].next = n;
        self.vertices[next].prev = n;
        n
    }

    /// Both vertices of a two-vertex loop meet along a ridge
    fn collapse_pair(&mut self, p: usize, q: usize) {
        let t = self.now;
        let xp = self.at(p, t);
        let xq = self.at(q, t);
        let edges = [self.vertices[p].right, self.vertices[q].right];
        self.consume(p, xp);
        self.consume(q, xq);
        self.push_arc(Arc {
            from: xp,
            to: xq,
            edges,
        });
    }

    /// Resolve whatever the new vertex `start` collapses with right away,
    /// then queue its future events.
    fn settle(&mut self, start: usize) {
        let t = self.now;
        let mut current = start;
        loop {
            if !self.vertices[current].active {
                return;
            }
            let Vertex { prev, next, .. } = self.vertices[current];
            if next == current {
                let x = self.at(current, t);
                self.consume(current, x);
                return;
            }
            if prev == next {
                self.collapse_pair(current, next);
                return;
            }

            let here = self.at(current, t);
            let to_next = (self.at(next, t) - here).norm();
            let to_prev = (self.at(prev, t) - here).norm();
            if to_next <= self.tolerance {
                current = self.merge(current, next, here);
            } else if to_prev <= self.tolerance {
                current = self.merge(prev, current, here);
            } else if self.vertices[current].anti_parallel {
                // the two edges overlap: zip up to the nearer neighbour
                if to_next <= to_prev {
                    let x = self.at(next, t);
                    current = self.merge(current, next, x);
                } else {
                    let x = self.at(prev, t);
                    current = self.merge(prev, current, x);
                }
            } else {
                self.schedule(current);
                return;
            }
        }
    }

    fn on_edge_event(&mut self, a: usize, b: usize) {
        let (va, vb) = (&self.vertices[a], &self.vertices[b]);
        if !va.active || !vb.active || va.next != b {
            return;
        }
        let t = self.now;
        let x = nalgebra::center(&va.at(t), &vb.at(t));
        if va.prev == b {
            self.collapse_pair(a, b);
            return;
        }
        let n = self.merge(a, b, x);
        self.settle(n);
    }

    /// Active vertex starting the piece of `edge` that contains `x`
    fn split_target(&self, v: usize, edge: usize, x: &Point2<f64>) -> Option<usize> {
        let t = self.now;
        let d = self.edges[edge].dir;
        self.pieces[edge].iter().copied().find(|&u| {
            let vu = &self.vertices[u];
            if !vu.active || u == v || vu.next == v {
                return false;
            }
            let pu = vu.at(t);
            let pn = self.at(vu.next, t);
            let along = (x - pu).dot(&d);
            along >= -self.tolerance && along <= (pn - pu).dot(&d) + self.tolerance
        })
    }

    fn on_split_event(&mut self, v: usize, edge: usize) {
        if !self.vertices[v].active {
            return;
        }
        let x = self.at(v, self.now);
        let Some(u) = self.split_target(v, edge, &x) else {
            return;
        };
        let Vertex {
            left, right, prev, next, ..
        } = self.vertices[v];
        let un = self.vertices[u].next;

        self.consume(v, x);
        let t = self.now;
        let v1 = self.spawn(x, t, left, edge, prev, un);
        let v2 = self.spawn(x, t, edge, right, u, next);
        self.vertices[prev].next = v1;
        self.vertices[un].prev = v1;
        self.vertices[u].next = v2;
        self.vertices[next].prev = v2;

        self.settle(v1);
        self.settle(v2);
    }
}
