//! Topology query methods for HalfEdgeGraph.

use std::collections::HashSet;

use super::types::{EdgeId, HalfEdge, HalfEdgeId, VertexId};
use super::HalfEdgeGraph;

impl HalfEdgeGraph {
    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get half-edge by ID (live or tombstoned)
    pub fn half_edge(&self, id: HalfEdgeId) -> Option<&HalfEdge> {
        self.half_edges.get(id.index())
    }

    /// Get all half-edge slots, including tombstones
    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    /// Whether a slot exists and is not tombstoned
    pub fn is_alive(&self, id: HalfEdgeId) -> bool {
        self.half_edge(id).is_some_and(|he| he.alive)
    }

    /// Number of undirected edge records
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of live half-edges
    pub fn live_half_edge_count(&self) -> usize {
        self.live
    }

    /// Number of live triangles
    pub fn triangle_count(&self) -> usize {
        self.live / 3
    }

    pub fn origin(&self, id: HalfEdgeId) -> VertexId {
        self.half_edges[id.index()].origin
    }

    pub fn next(&self, id: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[id.index()].next
    }

    pub fn prev(&self, id: HalfEdgeId) -> HalfEdgeId {
        self.half_edges[id.index()].prev
    }

    pub fn sym(&self, id: HalfEdgeId) -> Option<HalfEdgeId> {
        self.half_edges[id.index()].sym
    }

    pub fn edge(&self, id: HalfEdgeId) -> EdgeId {
        self.half_edges[id.index()].edge
    }

    /// Destination vertex of a half-edge
    pub fn dest(&self, id: HalfEdgeId) -> VertexId {
        self.origin(self.next(id))
    }

    /// The three half-edges of the triangle owning `id`, starting at `id`
    pub fn triangle_half_edges(&self, id: HalfEdgeId) -> [HalfEdgeId; 3] {
        [id, self.next(id), self.prev(id)]
    }

    /// Vertices of the triangle owning `id`, starting at its origin
    pub fn triangle_vertices(&self, id: HalfEdgeId) -> [VertexId; 3] {
        self.triangle_half_edges(id).map(|he| self.origin(he))
    }

    /// Iterate live triangles as the first half-edge slot of each
    pub fn live_triangles(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.half_edges
            .chunks_exact(3)
            .enumerate()
            .filter(|(_, tri)| tri[0].alive)
            .map(|(i, _)| HalfEdgeId(i as u32 * 3))
    }

    // ========================================================================
    // Fan walks
    // ========================================================================

    /// Collect every live outgoing half-edge around the origin of `start`.
    ///
    /// Rotates one way through `prev.sym` until the fan closes or a boundary
    /// stops it, then (if it stopped) rotates the other way through
    /// `sym.next` from `start`. The walk only visits live half-edges and is
    /// bounded by the number of slots, so a damaged fan cannot loop forever.
    pub fn outgoing_fan(&self, start: HalfEdgeId) -> Vec<HalfEdgeId> {
        let mut fan = Vec::new();
        if !self.is_alive(start) {
            return fan;
        }

        let mut visited = HashSet::new();
        fan.push(start);
        visited.insert(start);

        let limit = self.half_edges.len();
        let mut closed = false;

        // prev.sym rotation
        let mut current = start;
        for _ in 0..limit {
            match self.sym(self.prev(current)) {
                Some(s) if s == start => {
                    closed = true;
                    break;
                }
                Some(s) if self.is_alive(s) && visited.insert(s) => {
                    fan.push(s);
                    current = s;
                }
                _ => break,
            }
        }

        if closed {
            return fan;
        }

        // sym.next rotation for the other side of an open fan
        let mut current = start;
        for _ in 0..limit {
            let Some(s) = self.sym(current) else {
                break;
            };
            let candidate = self.next(s);
            if !self.is_alive(candidate) || !visited.insert(candidate) {
                break;
            }
            fan.push(candidate);
            current = candidate;
        }

        fan
    }

    /// Whether the origin of `start` touches an open boundary.
    ///
    /// Walks the vertex fan looking for a half-edge (outgoing or incoming)
    /// that lacks a `sym`.
    pub fn is_boundary_vertex(&self, start: HalfEdgeId) -> bool {
        self.outgoing_fan(start).iter().any(|&he| {
            self.sym(he).is_none() || self.sym(self.prev(he)).is_none()
        })
    }

    /// Whether a half-edge lies on an open boundary
    pub fn is_boundary_edge(&self, id: HalfEdgeId) -> bool {
        self.sym(id).is_none()
    }

    /// Distinct vertices referenced by live triangles
    pub fn live_vertices(&self) -> HashSet<VertexId> {
        self.half_edges
            .iter()
            .filter(|he| he.alive)
            .map(|he| he.origin)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_closed_fan_has_valence() {
        let (positions, triangles) = fixtures::icosahedron();
        let graph = HalfEdgeGraph::build(positions.len(), &triangles).unwrap();

        // Every icosahedron vertex has valence 5
        for he in 0..graph.half_edges().len() {
            let fan = graph.outgoing_fan(HalfEdgeId(he as u32));
            assert_eq!(fan.len(), 5, "fan of half-edge {} has {} entries", he, fan.len());
            let origin = graph.origin(HalfEdgeId(he as u32));
            assert!(fan.iter().all(|&f| graph.origin(f) == origin));
            assert!(!graph.is_boundary_vertex(HalfEdgeId(he as u32)));
        }
    }

    #[test]
    fn test_open_fan_walks_both_ways() {
        let (positions, triangles) = fixtures::strip(4);
        let graph = HalfEdgeGraph::build(positions.len(), &triangles).unwrap();

        // Start from each outgoing half-edge of a vertex: the fan must be the
        // same set regardless of where the walk begins.
        for he in 0..graph.half_edges().len() {
            let start = HalfEdgeId(he as u32);
            let origin = graph.origin(start);
            let mut fan = graph.outgoing_fan(start);
            fan.sort();
            let mut expected: Vec<HalfEdgeId> = (0..graph.half_edges().len())
                .map(|i| HalfEdgeId(i as u32))
                .filter(|&h| graph.origin(h) == origin)
                .collect();
            expected.sort();
            assert_eq!(fan, expected, "fan of vertex {:?}", origin);
            assert!(graph.is_boundary_vertex(start));
        }
    }

    #[test]
    fn test_triangle_accessors() {
        let (_, triangles) = fixtures::single_triangle();
        let graph = HalfEdgeGraph::build(3, &triangles).unwrap();

        assert_eq!(
            graph.triangle_vertices(HalfEdgeId(1)),
            [VertexId(1), VertexId(2), VertexId(0)]
        );
        assert_eq!(graph.dest(HalfEdgeId(2)), VertexId(0));
        assert_eq!(HalfEdgeId(2).triangle(), 0);
        assert_eq!(graph.live_triangles().count(), 1);
        assert_eq!(graph.live_vertices().len(), 3);
        assert!(graph.is_boundary_edge(HalfEdgeId(0)));
    }

    #[test]
    fn test_tombstoned_triangle_is_skipped() {
        let (positions, triangles) = fixtures::quad();
        let mut graph = HalfEdgeGraph::build(positions.len(), &triangles).unwrap();
        for he in graph.triangle_half_edges(HalfEdgeId(3)) {
            graph.kill(he);
        }
        let live: Vec<_> = graph.live_triangles().collect();
        assert_eq!(live, vec![HalfEdgeId(0)]);
        assert!(graph.outgoing_fan(HalfEdgeId(3)).is_empty());
    }
}
