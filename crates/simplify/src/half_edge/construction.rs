//! Construction methods for HalfEdgeGraph.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::types::{EdgeId, HalfEdge, HalfEdgeId, VertexId};
use super::HalfEdgeGraph;
use crate::error::BuildError;

/// State of an undirected edge key during construction
struct EdgeSlot {
    first: HalfEdgeId,
    paired: bool,
}

impl HalfEdgeGraph {
    /// Build the graph from an indexed triangle list.
    ///
    /// Each triangle gets three consecutive half-edge slots linked into a
    /// 3-cycle. Half-edges are keyed by their unordered vertex pair: the first
    /// half-edge seen for a key gets a fresh edge record and no `sym`; the
    /// second is cross-linked with it and shares its record. An edge seen only
    /// once is an open boundary, which is valid input.
    pub fn build(vertex_count: usize, triangles: &[[u32; 3]]) -> Result<Self, BuildError> {
        if triangles.is_empty() {
            return Err(BuildError::NoTriangles);
        }

        let mut half_edges: Vec<HalfEdge> = Vec::with_capacity(triangles.len() * 3);
        let mut edge_map: HashMap<(u32, u32), EdgeSlot> = HashMap::with_capacity(triangles.len() * 3 / 2);
        let mut edge_count = 0usize;

        for (tri_idx, tri) in triangles.iter().enumerate() {
            for &index in tri {
                if index as usize >= vertex_count {
                    return Err(BuildError::IndexOutOfRange {
                        triangle: tri_idx,
                        index,
                        vertex_count,
                    });
                }
            }
            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return Err(BuildError::DegenerateTriangle { triangle: tri_idx });
            }

            let base = half_edges.len() as u32;
            for corner in 0..3u32 {
                let id = HalfEdgeId(base + corner);
                let origin = tri[corner as usize];
                let dest = tri[((corner + 1) % 3) as usize];
                let key = (origin.min(dest), origin.max(dest));

                let (sym, edge) = match edge_map.entry(key) {
                    Entry::Vacant(slot) => {
                        let edge = EdgeId(edge_count as u32);
                        edge_count += 1;
                        slot.insert(EdgeSlot {
                            first: id,
                            paired: false,
                        });
                        (None, edge)
                    }
                    Entry::Occupied(mut slot) => {
                        let slot = slot.get_mut();
                        if slot.paired {
                            return Err(BuildError::NonManifoldEdge { a: key.0, b: key.1 });
                        }
                        let first = &mut half_edges[slot.first.index()];
                        if first.origin == VertexId(origin) {
                            return Err(BuildError::InconsistentWinding { a: origin, b: dest });
                        }
                        first.sym = Some(id);
                        slot.paired = true;
                        (Some(slot.first), first.edge)
                    }
                };

                half_edges.push(HalfEdge {
                    origin: VertexId(origin),
                    next: HalfEdgeId(base + (corner + 1) % 3),
                    prev: HalfEdgeId(base + (corner + 2) % 3),
                    sym,
                    edge,
                    alive: true,
                });
            }
        }

        let boundary = half_edges.iter().filter(|he| he.sym.is_none()).count();
        tracing::debug!(
            "HalfEdgeGraph::build: {} triangles, {} half-edges, {} edges ({} boundary)",
            triangles.len(),
            half_edges.len(),
            edge_count,
            boundary
        );

        let live = half_edges.len();
        Ok(Self {
            half_edges,
            edge_count,
            live,
        })
    }
}
