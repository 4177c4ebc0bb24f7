//! Type definitions for the half-edge graph.

/// Type-safe vertex identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Type-safe half-edge identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeId(pub u32);

/// Type-safe identifier of an undirected edge record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl HalfEdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Index of the triangle owning this half-edge.
    ///
    /// Triangles are allocated as three consecutive slots and never rewired,
    /// so the owning triangle is fixed for the lifetime of the slot.
    pub fn triangle(self) -> usize {
        self.index() / 3
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A directed edge of one triangle
///
/// `next` and `prev` walk the owning triangle counter-clockwise and never
/// change after construction. `origin`, `sym` and `edge` are rewritten by
/// collapses and restored exactly when a collapse is undone.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfEdge {
    /// The vertex this half-edge originates from
    pub origin: VertexId,
    /// The next half-edge around the triangle
    pub next: HalfEdgeId,
    /// The previous half-edge around the triangle
    pub prev: HalfEdgeId,
    /// The opposite half-edge (None for boundary edges)
    pub sym: Option<HalfEdgeId>,
    /// Undirected edge record shared with `sym`
    pub edge: EdgeId,
    /// False once the triangle has been collapsed away (tombstone)
    pub alive: bool,
}

/// Invariant violations reported by [`super::HalfEdgeGraph::validate`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("Half-edge {0:?}: reference to a slot that does not exist")]
    DanglingReference(HalfEdgeId),
    #[error("Half-edge {0:?}: next/prev do not form a 3-cycle")]
    BrokenCycle(HalfEdgeId),
    #[error("Half-edge {0:?}: live half-edge links to a tombstoned slot")]
    LinksTombstone(HalfEdgeId),
    #[error("Half-edge {0:?}: sym.sym does not point back")]
    AsymmetricSym(HalfEdgeId),
    #[error("Half-edge {0:?}: sym runs in the wrong direction")]
    SymDirection(HalfEdgeId),
    #[error("Half-edge {0:?}: sym does not share the edge record")]
    SplitEdgeRecord(HalfEdgeId),
    #[error("Half-edge {0:?}: triangle has a repeated vertex")]
    DegenerateTriangle(HalfEdgeId),
    #[error("Live half-edge count {counted} disagrees with tracked count {tracked}")]
    LiveCountMismatch { counted: usize, tracked: usize },
}
