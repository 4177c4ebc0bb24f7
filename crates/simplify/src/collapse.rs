//! Edge collapse operator.
//!
//! One collapse runs as select, gather, splice, remove fins, validate,
//! commit:
//! - select pops the cheapest queued edge, or reports exhaustion without
//!   touching anything
//! - gather reads both endpoint fans before anything is mutated, and rejects
//!   an edge whose endpoints already share a third triangle
//! - splice tombstones the one or two triangles on the edge and stitches
//!   their outer neighbours together
//! - fin removal excises pairs of triangles the splice made coincident
//! - validate inspects the tentatively spliced graph and rejects results that
//!   are below the floor or non-manifold
//! - commit merges the vertices, retires dead edge records and rescores
//!   the neighbourhood
//!
//! Every graph mutation from splice onward goes through the
//! [`CollapseRecord`] being built, so a rejected collapse is undone exactly by
//! reverting the partial record.

use std::collections::{BTreeSet, HashMap, HashSet};

use glam::Vec3;
use tracing::{debug, trace, warn};

use crate::cost::{self, MergeTarget};
use crate::half_edge::{EdgeId, HalfEdgeGraph, HalfEdgeId, VertexId};
use crate::mesh::LodMesh;
use crate::timeline::CollapseRecord;
use crate::vertex::Vertex;

/// Result of one step of [`LodMesh::try_collapse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseOutcome {
    /// A new collapse was computed and appended to the timeline
    Collapsed,
    /// An already recorded collapse was re-applied
    Replayed,
    /// The cheapest edge could not be collapsed and was dropped from the queue
    Rejected,
    /// Nothing left to collapse under the current limits
    Exhausted,
}

impl CollapseOutcome {
    /// Whether the level advanced
    pub fn advanced(self) -> bool {
        matches!(self, CollapseOutcome::Collapsed | CollapseOutcome::Replayed)
    }
}

/// Reason a tentative collapse was undone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    /// Queue entry no longer matches a live edge
    Stale,
    /// Result would drop below the triangle floor
    BelowFloor,
    /// Fin removal did not settle within the local valence
    FinBound,
    /// Result would have two edges between the merged vertex and one neighbour
    NonManifold,
    /// Result would pinch the merged vertex into separate fans
    Pinched,
}

/// Two half-edges freshly linked as syms across the merged vertex
pub(crate) type Seam = (HalfEdgeId, HalfEdgeId);

/// Link two outer half-edges that end up on the same edge.
///
/// Tombstoned candidates count as absent. With both present they become
/// syms sharing `u`'s edge record; with one present it becomes a boundary.
fn link(
    graph: &mut HalfEdgeGraph,
    record: &mut CollapseRecord,
    u: Option<HalfEdgeId>,
    v: Option<HalfEdgeId>,
    seams: &mut Vec<Seam>,
) {
    let u = u.filter(|&he| graph.is_alive(he));
    let v = v.filter(|&he| graph.is_alive(he));
    match (u, v) {
        (Some(u), Some(v)) => {
            let edge = graph.edge(u);
            record.set_sym(graph, u, Some(v));
            record.set_sym(graph, v, Some(u));
            record.set_edge(graph, v, edge);
            seams.push((u, v));
        }
        (Some(he), None) | (None, Some(he)) => record.set_sym(graph, he, None),
        (None, None) => {}
    }
}

/// Remove the triangles on both sides of `h` and stitch their neighbours.
///
/// Returns the seams created, for fin detection.
pub(crate) fn splice(
    graph: &mut HalfEdgeGraph,
    record: &mut CollapseRecord,
    h: HalfEdgeId,
) -> Vec<Seam> {
    let mut sides = vec![h];
    if let Some(g) = graph.sym(h) {
        sides.push(g);
    }

    let outer: Vec<_> = sides
        .iter()
        .map(|&he| (graph.sym(graph.next(he)), graph.sym(graph.prev(he))))
        .collect();

    for &he in &sides {
        record.kill_triangle(graph, he);
    }

    let mut seams = Vec::new();
    for (u, v) in outer {
        link(graph, record, u, v, &mut seams);
    }
    seams
}

/// Whether a seam joins two triangles that share their third vertex once
/// `b` is merged into `a`.
pub(crate) fn is_fin(graph: &HalfEdgeGraph, (u, v): Seam, a: VertexId, b: VertexId) -> bool {
    if !graph.is_alive(u) || !graph.is_alive(v) || graph.sym(u) != Some(v) {
        return false;
    }
    if u.triangle() == v.triangle() {
        return false;
    }
    let canon = |x: VertexId| if x == b { a } else { x };
    canon(graph.origin(graph.prev(u))) == canon(graph.origin(graph.prev(v)))
}

/// Tombstone both triangles of a fin and stitch what was behind them
pub(crate) fn excise_fin(
    graph: &mut HalfEdgeGraph,
    record: &mut CollapseRecord,
    (u, v): Seam,
    seams: &mut Vec<Seam>,
) {
    let outer = [
        (graph.sym(graph.next(u)), graph.sym(graph.prev(v))),
        (graph.sym(graph.prev(u)), graph.sym(graph.next(v))),
    ];
    record.kill_triangle(graph, u);
    record.kill_triangle(graph, v);
    for (x, y) in outer {
        link(graph, record, x, y, seams);
    }
}

/// Excise fins until every seam, including the ones excision exposes, is
/// clean. At most `limit` fins are removed.
pub(crate) fn remove_fins(
    graph: &mut HalfEdgeGraph,
    record: &mut CollapseRecord,
    mut seams: Vec<Seam>,
    limit: usize,
) -> Result<(), Rejection> {
    let (a, b) = (record.src, record.dst);
    let mut cursor = 0;
    while cursor < seams.len() {
        let seam = seams[cursor];
        cursor += 1;
        if !is_fin(graph, seam, a, b) {
            continue;
        }
        if record.fins >= limit {
            warn!(
                "Fin removal for {:?} + {:?} hit its bound of {}",
                a, b, limit
            );
            return Err(Rejection::FinBound);
        }
        trace!("Excising fin at {:?}/{:?}", seam.0, seam.1);
        excise_fin(graph, record, seam, &mut seams);
        record.fins += 1;
    }
    Ok(())
}

/// Check the spliced neighbourhood of the merged vertex.
///
/// `fan` is every outgoing half-edge of both endpoints gathered before the
/// splice; the ones still alive are exactly the merged vertex's fan.
pub(crate) fn check_result(
    graph: &HalfEdgeGraph,
    fan: &[HalfEdgeId],
    a: VertexId,
    b: VertexId,
    floor: usize,
) -> Result<(), Rejection> {
    if graph.triangle_count() < floor.max(1) {
        return Err(Rejection::BelowFloor);
    }

    // Every half-edge between the merged vertex and a neighbour must belong
    // to one edge record: an outgoing and an incoming boundary edge to the
    // same neighbour are two edges, not one.
    let canon = |x: VertexId| if x == b { a } else { x };
    let live: Vec<_> = fan.iter().copied().filter(|&he| graph.is_alive(he)).collect();
    let mut edges: HashMap<VertexId, EdgeId> = HashMap::new();
    for &he in &live {
        let incoming = graph.prev(he);
        for (neighbour, edge) in [
            (canon(graph.dest(he)), graph.edge(he)),
            (canon(graph.origin(incoming)), graph.edge(incoming)),
        ] {
            if *edges.entry(neighbour).or_insert(edge) != edge {
                return Err(Rejection::NonManifold);
            }
        }
    }

    if let Some(&first) = live.first() {
        if graph.outgoing_fan(first).len() != live.len() {
            return Err(Rejection::Pinched);
        }
    }

    Ok(())
}

/// Whether a live triangle other than the ones on `h` contains both of its
/// endpoints. Only triangles reachable from either endpoint's fan are seen.
pub(crate) fn shares_extra_triangle(graph: &HalfEdgeGraph, h: HalfEdgeId) -> bool {
    let (a, b) = (graph.origin(h), graph.dest(h));
    let own = [Some(h), graph.sym(h)].map(|side| side.map(HalfEdgeId::triangle));
    graph
        .outgoing_fan(h)
        .into_iter()
        .chain(graph.outgoing_fan(graph.next(h)))
        .filter(|&he| graph.is_alive(he) && !own.contains(&Some(he.triangle())))
        .any(|he| {
            let corners = graph.triangle_vertices(he);
            corners.contains(&a) && corners.contains(&b)
        })
}

impl LodMesh {
    /// Compute and apply one new collapse at the end of the timeline
    pub(crate) fn collapse_next(&mut self) -> CollapseOutcome {
        let Some(edge) = self.select() else {
            return CollapseOutcome::Exhausted;
        };
        match self.collapse_edge(edge) {
            Ok(()) => CollapseOutcome::Collapsed,
            Err(reason) => {
                debug!("Rejected collapse of {:?}: {:?}", edge, reason);
                CollapseOutcome::Rejected
            }
        }
    }

    /// Pop the cheapest edge, unless simplification is exhausted.
    ///
    /// The exhaustion checks only peek, so an exhausted mesh is untouched.
    fn select(&mut self) -> Option<EdgeId> {
        if self.graph.triangle_count() <= self.config.min_triangles {
            trace!(
                "Select: at triangle floor ({} <= {})",
                self.graph.triangle_count(),
                self.config.min_triangles
            );
            return None;
        }
        if self.queue.len() < self.config.min_queue_edges {
            trace!("Select: only {} queued edges left", self.queue.len());
            return None;
        }
        let top = self.queue.peek()?;
        if !self.config.accepts_cost(top.cost) {
            trace!("Select: cheapest cost {} exceeds threshold", top.cost);
            return None;
        }

        self.queue.pop();
        if let Some(record) = self.records.get_mut(top.edge.index()) {
            record.handle = None;
        }
        Some(top.edge)
    }

    /// Collapse `edge` or leave the mesh exactly as it was.
    ///
    /// The splice is tentative: validation runs on the spliced graph and a
    /// rejection reverts the partial record before returning.
    fn collapse_edge(&mut self, edge: EdgeId) -> Result<(), Rejection> {
        let Some(edge_record) = self.records.get(edge.index()) else {
            warn!("Queue entry for unknown edge {:?}", edge);
            return Err(Rejection::Stale);
        };
        let h = edge_record.half_edge;
        if edge_record.retired || !self.graph.is_alive(h) || self.graph.edge(h) != edge {
            warn!("Stale queue entry for {:?}", edge);
            return Err(Rejection::Stale);
        }
        let target = edge_record.target;
        let a = self.graph.origin(h);
        let b = self.graph.dest(h);
        if matches!(target, MergeTarget::Keep(v) if v != a && v != b) {
            warn!("Edge {:?} pins a vertex that is not an endpoint", edge);
            return Err(Rejection::Stale);
        }

        // Gather
        if shares_extra_triangle(&self.graph, h) {
            return Err(Rejection::NonManifold);
        }
        let mut fan = self.graph.outgoing_fan(h);
        fan.extend(self.graph.outgoing_fan(self.graph.next(h)));

        // Tentative splice, fins, validate
        let mut record = CollapseRecord::new(edge, a, b, edge_record.cost);
        let seams = splice(&mut self.graph, &mut record, h);
        let checked = remove_fins(&mut self.graph, &mut record, seams, fan.len())
            .and_then(|()| check_result(&self.graph, &fan, a, b, self.config.min_triangles));
        if let Err(reason) = checked {
            record.revert(&mut self.graph);
            self.graph.debug_validate("rejected collapse");
            return Err(reason);
        }

        // Commit
        let quadric = self.vertices.quadric(a) + self.vertices.quadric(b);
        record.survivor = match target {
            MergeTarget::Keep(v) => {
                if let Some(vertex) = self.vertices.get_mut(v) {
                    vertex.quadric = quadric;
                }
                v
            }
            MergeTarget::Place(position) => {
                let normal = |v: VertexId| self.vertices.get(v).map_or(Vec3::ZERO, |v| v.normal);
                let normal = (normal(a) + normal(b)).normalize_or_zero();
                self.vertices.push(Vertex {
                    position: position.as_vec3(),
                    normal,
                    quadric,
                })
            }
        };

        let live_fan: Vec<_> = fan
            .into_iter()
            .filter(|&he| self.graph.is_alive(he))
            .collect();
        for &he in &live_fan {
            record.reassign(&mut self.graph, he);
        }
        record.finalize(&self.graph);

        self.retire_edges(&record);
        self.rescore_around(&live_fan);
        self.graph.debug_validate("collapse");

        trace!(
            "Collapsed {:?}: {:?} + {:?} -> {:?}, {} triangles removed, {} fins, cost {}",
            edge,
            a,
            b,
            record.survivor,
            record.removed_triangles(),
            record.fins,
            record.cost
        );
        self.timeline.push(record);
        Ok(())
    }

    /// Retire every edge record that no live half-edge references any more,
    /// and point the surviving ones at a live half-edge.
    fn retire_edges(&mut self, record: &CollapseRecord) {
        let mut kept = HashSet::new();
        for relink in &record.relinks {
            if !self.graph.is_alive(relink.half_edge) {
                continue;
            }
            kept.insert(relink.new_edge);
            if let Some(edge_record) = self.records.get_mut(relink.new_edge.index()) {
                edge_record.half_edge = relink.half_edge;
            }
        }

        let candidates: BTreeSet<EdgeId> = record
            .removed
            .iter()
            .map(|&he| self.graph.edge(he))
            .chain(record.relinks.iter().map(|r| r.old_edge))
            .collect();

        for edge in candidates {
            if kept.contains(&edge) {
                continue;
            }
            if let Some(edge_record) = self.records.get_mut(edge.index()) {
                edge_record.retired = true;
                if let Some(key) = edge_record.handle.take() {
                    self.queue.remove(key);
                }
            }
        }
    }

    /// Rescore every edge touching the merged vertex or one of its neighbours
    fn rescore_around(&mut self, fan: &[HalfEdgeId]) {
        let mut edges = BTreeSet::new();
        for &he in fan {
            edges.insert(self.graph.edge(he));
            edges.insert(self.graph.edge(self.graph.prev(he)));
            for neighbour in [self.graph.next(he), self.graph.prev(he)] {
                for f in self.graph.outgoing_fan(neighbour) {
                    edges.insert(self.graph.edge(f));
                    edges.insert(self.graph.edge(self.graph.prev(f)));
                }
            }
        }
        trace!("Rescoring {} edges", edges.len());
        for edge in edges {
            self.rescore(edge);
        }
    }

    fn rescore(&mut self, edge: EdgeId) {
        let Some(edge_record) = self.records.get(edge.index()) else {
            return;
        };
        if edge_record.retired {
            return;
        }
        let he = edge_record.half_edge;
        if !self.graph.is_alive(he) {
            warn!("Edge {:?} has no live half-edge", edge);
            return;
        }

        let (target, cost) = cost::evaluate_edge(&self.graph, &self.vertices, he, &self.config);
        if let Some(edge_record) = self.records.get_mut(edge.index()) {
            edge_record.target = target;
            edge_record.cost = cost;
            edge_record.handle = Some(self.queue.update(edge_record.handle, edge, cost));
        }
    }
}
