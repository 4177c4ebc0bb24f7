//! Replayable log of edge collapses.
//!
//! Each [`CollapseRecord`] captures every field a collapse changed in the
//! half-edge graph, old and new value side by side, the first time the
//! collapse touched it. Reverting writes the old values back and applying
//! writes the new ones, so moving along the timeline in either direction is
//! exact and never recomputes geometry or costs.

use tracing::{debug, trace};

use crate::half_edge::{EdgeId, HalfEdgeGraph, HalfEdgeId, VertexId};

/// Before/after connectivity of one half-edge touched by a collapse
#[derive(Debug, Clone, PartialEq)]
pub struct Relink {
    pub half_edge: HalfEdgeId,
    pub old_sym: Option<HalfEdgeId>,
    pub new_sym: Option<HalfEdgeId>,
    pub old_edge: EdgeId,
    pub new_edge: EdgeId,
}

/// Everything needed to redo or undo one edge collapse
#[derive(Debug, Clone, PartialEq)]
pub struct CollapseRecord {
    /// Edge record that was collapsed
    pub edge: EdgeId,
    /// Origin of the collapsed half-edge
    pub src: VertexId,
    /// Destination of the collapsed half-edge
    pub dst: VertexId,
    /// Vertex both endpoints merged into; may equal `src` or `dst`
    pub survivor: VertexId,
    /// Half-edges tombstoned by this collapse, whole triangles at a time
    pub removed: Vec<HalfEdgeId>,
    pub relinks: Vec<Relink>,
    /// Half-edges whose origin moved from `src` to `survivor`
    pub from_src: Vec<HalfEdgeId>,
    /// Half-edges whose origin moved from `dst` to `survivor`
    pub from_dst: Vec<HalfEdgeId>,
    /// Number of fins excised after the main splice
    pub fins: usize,
    pub cost: f64,
}

impl CollapseRecord {
    pub(crate) fn new(edge: EdgeId, src: VertexId, dst: VertexId, cost: f64) -> Self {
        Self {
            edge,
            src,
            dst,
            survivor: src,
            removed: Vec::new(),
            relinks: Vec::new(),
            from_src: Vec::new(),
            from_dst: Vec::new(),
            fins: 0,
            cost,
        }
    }

    /// Triangles removed by this collapse
    pub fn removed_triangles(&self) -> usize {
        self.removed.len() / 3
    }

    // ========================================================================
    // Logged mutation (used while the collapse is being computed)
    // ========================================================================

    /// Capture the current connectivity of `he` unless already captured
    fn capture(&mut self, graph: &HalfEdgeGraph, he: HalfEdgeId) {
        if self.relinks.iter().any(|r| r.half_edge == he) {
            return;
        }
        let sym = graph.sym(he);
        let edge = graph.edge(he);
        self.relinks.push(Relink {
            half_edge: he,
            old_sym: sym,
            new_sym: sym,
            old_edge: edge,
            new_edge: edge,
        });
    }

    pub(crate) fn set_sym(&mut self, graph: &mut HalfEdgeGraph, he: HalfEdgeId, sym: Option<HalfEdgeId>) {
        self.capture(graph, he);
        graph.set_sym(he, sym);
    }

    pub(crate) fn set_edge(&mut self, graph: &mut HalfEdgeGraph, he: HalfEdgeId, edge: EdgeId) {
        self.capture(graph, he);
        graph.set_edge(he, edge);
    }

    /// Tombstone the whole triangle owning `he`
    pub(crate) fn kill_triangle(&mut self, graph: &mut HalfEdgeGraph, he: HalfEdgeId) {
        for id in graph.triangle_half_edges(he) {
            if graph.is_alive(id) {
                graph.kill(id);
                self.removed.push(id);
            }
        }
    }

    /// Move the origin of `he` onto the survivor, remembering which endpoint
    /// it came from
    pub(crate) fn reassign(&mut self, graph: &mut HalfEdgeGraph, he: HalfEdgeId) {
        let origin = graph.origin(he);
        if origin == self.survivor {
            return;
        }
        if origin == self.src {
            self.from_src.push(he);
        } else if origin == self.dst {
            self.from_dst.push(he);
        } else {
            return;
        }
        graph.set_origin(he, self.survivor);
    }

    /// Fill in post-collapse values for every captured half-edge and drop
    /// the ones that ended up unchanged.
    pub(crate) fn finalize(&mut self, graph: &HalfEdgeGraph) {
        for relink in &mut self.relinks {
            relink.new_sym = graph.sym(relink.half_edge);
            relink.new_edge = graph.edge(relink.half_edge);
        }
        self.relinks
            .retain(|r| r.old_sym != r.new_sym || r.old_edge != r.new_edge);
    }

    // ========================================================================
    // Replay
    // ========================================================================

    /// Re-apply this collapse to the graph state it was computed on
    pub fn apply(&self, graph: &mut HalfEdgeGraph) {
        for &he in &self.removed {
            graph.kill(he);
        }
        for relink in &self.relinks {
            graph.set_sym(relink.half_edge, relink.new_sym);
            graph.set_edge(relink.half_edge, relink.new_edge);
        }
        for &he in self.from_src.iter().chain(&self.from_dst) {
            graph.set_origin(he, self.survivor);
        }
    }

    /// Restore the graph state this collapse was computed on
    pub fn revert(&self, graph: &mut HalfEdgeGraph) {
        for &he in &self.from_src {
            graph.set_origin(he, self.src);
        }
        for &he in &self.from_dst {
            graph.set_origin(he, self.dst);
        }
        for relink in &self.relinks {
            graph.set_sym(relink.half_edge, relink.old_sym);
            graph.set_edge(relink.half_edge, relink.old_edge);
        }
        for &he in &self.removed {
            graph.revive(he);
        }
    }
}

/// Ordered collapse records plus the cursor of the current level.
///
/// Level `n` means the first `n` records are applied. Records past the
/// cursor stay recorded so coarsening back over them is a replay.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    records: Vec<CollapseRecord>,
    level: usize,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of applied collapses
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of recorded collapses
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when every recorded collapse is applied
    pub fn is_at_frontier(&self) -> bool {
        self.level == self.records.len()
    }

    pub fn records(&self) -> &[CollapseRecord] {
        &self.records
    }

    pub fn get(&self, level: usize) -> Option<&CollapseRecord> {
        self.records.get(level)
    }

    /// Append a freshly computed (already applied) collapse at the frontier
    pub(crate) fn push(&mut self, record: CollapseRecord) {
        debug_assert!(self.is_at_frontier());
        self.records.push(record);
        self.level = self.records.len();
    }

    /// Re-apply the next recorded collapse. False at the frontier.
    pub(crate) fn step_forward(&mut self, graph: &mut HalfEdgeGraph) -> bool {
        let Some(record) = self.records.get(self.level) else {
            return false;
        };
        record.apply(graph);
        trace!(
            "Replayed collapse {} ({:?} + {:?} -> {:?})",
            self.level, record.src, record.dst, record.survivor
        );
        self.level += 1;
        true
    }

    /// Undo the last applied collapse. False at full detail.
    pub(crate) fn step_back(&mut self, graph: &mut HalfEdgeGraph) -> bool {
        if self.level == 0 {
            debug!("Refine: already at full detail");
            return false;
        }
        self.level -= 1;
        let record = &self.records[self.level];
        record.revert(graph);
        trace!(
            "Reverted collapse {} ({:?} -> {:?} + {:?})",
            self.level, record.survivor, record.src, record.dst
        );
        true
    }
}
