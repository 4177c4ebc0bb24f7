//! Half-edge graph for progressive simplification
//!
//! Every directed edge of every triangle is a slot in one growable table.
//! Slots are tombstoned rather than freed, so a [`HalfEdgeId`] recorded in
//! the timeline stays meaningful for the lifetime of the mesh.

mod construction;
mod topology;
mod types;
mod validation;

pub use types::{EdgeId, HalfEdge, HalfEdgeId, TopologyError, VertexId};

/// Half-edge adjacency structure
///
/// Owns only connectivity. Vertex attributes live in
/// [`crate::vertex::VertexStore`] and edge costs in [`crate::cost::EdgeRecord`].
#[derive(Debug, Clone)]
pub struct HalfEdgeGraph {
    pub(crate) half_edges: Vec<HalfEdge>,
    /// Number of undirected edge records handed out at construction
    pub(crate) edge_count: usize,
    /// Number of half-edges with `alive == true`
    pub(crate) live: usize,
}

impl HalfEdgeGraph {
    // ========================================================================
    // Mutation (crate-internal; every call site logs into a CollapseRecord)
    // ========================================================================

    pub(crate) fn set_origin(&mut self, id: HalfEdgeId, origin: VertexId) {
        self.half_edges[id.index()].origin = origin;
    }

    pub(crate) fn set_sym(&mut self, id: HalfEdgeId, sym: Option<HalfEdgeId>) {
        self.half_edges[id.index()].sym = sym;
    }

    pub(crate) fn set_edge(&mut self, id: HalfEdgeId, edge: EdgeId) {
        self.half_edges[id.index()].edge = edge;
    }

    /// Tombstone a half-edge. Its fields are left untouched.
    pub(crate) fn kill(&mut self, id: HalfEdgeId) {
        let he = &mut self.half_edges[id.index()];
        if he.alive {
            he.alive = false;
            self.live -= 1;
        }
    }

    /// Bring a tombstoned half-edge back
    pub(crate) fn revive(&mut self, id: HalfEdgeId) {
        let he = &mut self.half_edges[id.index()];
        if !he.alive {
            he.alive = true;
            self.live += 1;
        }
    }
}
