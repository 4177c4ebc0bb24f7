//! Edge collapse cost model.
//!
//! Every undirected edge carries one [`EdgeRecord`]: where its endpoints
//! would merge, what that merge costs under the combined quadric of both
//! endpoints, and the handle of its entry in the collapse queue.
//!
//! ## Merge point policy
//!
//! Applied in order:
//! 1. With `preserve_boundary`, an edge with an endpoint on an open boundary
//!    (which includes every boundary edge) merges onto that endpoint, reusing
//!    its vertex slot. If both endpoints qualify the cheaper one wins, ties
//!    going to the half-edge origin.
//! 2. A boundary edge (no `sym`) merges at its midpoint.
//! 3. If the quadric's 3x3 block is singular, the midpoint.
//! 4. Otherwise the closed-form quadric optimum.

use glam::{DVec3, Vec3};
use meshlod_config::LodConfig;

use crate::half_edge::{HalfEdgeGraph, HalfEdgeId, VertexId};
use crate::queue::QueueKey;
use crate::vertex::VertexStore;

/// Where a collapse puts the surviving vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MergeTarget {
    /// Reuse this endpoint's slot and position
    Keep(VertexId),
    /// Append a new vertex at this point
    Place(DVec3),
}

impl MergeTarget {
    /// Position of the merged vertex
    pub fn position(&self, vertices: &VertexStore) -> DVec3 {
        match *self {
            MergeTarget::Keep(v) => vertices.position(v).as_dvec3(),
            MergeTarget::Place(p) => p,
        }
    }
}

/// Per-edge merge point, merge cost and queue handle
#[derive(Debug, Clone)]
pub struct EdgeRecord {
    /// One live half-edge of this edge
    pub half_edge: HalfEdgeId,
    pub target: MergeTarget,
    pub cost: f64,
    /// Current queue entry, if queued
    pub(crate) handle: Option<QueueKey>,
    /// Set once the edge has vanished from the frontier mesh
    pub(crate) retired: bool,
}

impl EdgeRecord {
    pub fn new(half_edge: HalfEdgeId, target: MergeTarget, cost: f64) -> Self {
        Self {
            half_edge,
            target,
            cost,
            handle: None,
            retired: false,
        }
    }

    pub fn is_queued(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }

    /// Merge position as a render-precision point
    pub fn merge_point(&self, vertices: &VertexStore) -> Vec3 {
        self.target.position(vertices).as_vec3()
    }
}

/// Compute merge target and cost for the edge of half-edge `he`.
pub fn evaluate_edge(
    graph: &HalfEdgeGraph,
    vertices: &VertexStore,
    he: HalfEdgeId,
    config: &LodConfig,
) -> (MergeTarget, f64) {
    let a = graph.origin(he);
    let b = graph.dest(he);
    let q = vertices.quadric(a) + vertices.quadric(b);
    let pa = vertices.position(a).as_dvec3();
    let pb = vertices.position(b).as_dvec3();

    if config.preserve_boundary {
        let a_on_boundary = graph.is_boundary_vertex(he);
        let b_on_boundary = graph.is_boundary_vertex(graph.next(he));
        let pinned = match (a_on_boundary, b_on_boundary) {
            (true, true) => {
                if q.evaluate(pb) < q.evaluate(pa) {
                    Some((b, pb))
                } else {
                    Some((a, pa))
                }
            }
            (true, false) => Some((a, pa)),
            (false, true) => Some((b, pb)),
            (false, false) => None,
        };
        if let Some((v, p)) = pinned {
            return (MergeTarget::Keep(v), q.evaluate(p).max(0.0));
        }
    }

    let midpoint = (pa + pb) * 0.5;
    let point = if graph.is_boundary_edge(he) {
        midpoint
    } else {
        q.optimal_point().unwrap_or(midpoint)
    };

    (MergeTarget::Place(point), q.evaluate(point).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::quadric::Quadric;
    use crate::vertex::Vertex;

    fn store_with_quadrics(positions: &[Vec3], triangles: &[[u32; 3]]) -> VertexStore {
        let mut store = VertexStore::default();
        for &position in positions {
            store.push(Vertex {
                position,
                normal: Vec3::ZERO,
                quadric: Quadric::default(),
            });
        }
        for tri in triangles {
            let [p0, p1, p2] = tri.map(|i| positions[i as usize].as_dvec3());
            let q = Quadric::from_triangle(p0, p1, p2);
            for &i in tri {
                store.get_mut(VertexId(i)).unwrap().quadric += q;
            }
        }
        store
    }

    #[test]
    fn test_strip_boundary_edges_keep_an_endpoint() {
        let (positions, triangles) = fixtures::strip(3);
        let graph = HalfEdgeGraph::build(positions.len(), &triangles).unwrap();
        let store = store_with_quadrics(&positions, &triangles);
        let config = LodConfig::default();

        for i in 0..graph.half_edges().len() {
            let he = HalfEdgeId(i as u32);
            if !graph.is_boundary_edge(he) {
                continue;
            }
            let (target, cost) = evaluate_edge(&graph, &store, he, &config);
            let MergeTarget::Keep(v) = target else {
                panic!("boundary edge {:?} merges to a new point: {:?}", he, target);
            };
            assert!(v == graph.origin(he) || v == graph.dest(he));
            // Flat strip: every plane passes through every vertex
            assert!(cost.abs() < 1e-9);
        }
    }

    #[test]
    fn test_boundary_edge_midpoint_without_preservation() {
        let (positions, triangles) = fixtures::strip(2);
        let graph = HalfEdgeGraph::build(positions.len(), &triangles).unwrap();
        let store = store_with_quadrics(&positions, &triangles);
        let config = LodConfig::default().with_preserve_boundary(false);

        let he = (0..graph.half_edges().len())
            .map(|i| HalfEdgeId(i as u32))
            .find(|&h| graph.is_boundary_edge(h))
            .unwrap();
        let (target, _) = evaluate_edge(&graph, &store, he, &config);
        let expected = (positions[graph.origin(he).index()] + positions[graph.dest(he).index()]) * 0.5;
        assert_eq!(target, MergeTarget::Place(expected.as_dvec3()));
    }

    #[test]
    fn test_interior_edge_of_closed_mesh_uses_optimum() {
        let (positions, triangles) = fixtures::icosahedron();
        let graph = HalfEdgeGraph::build(positions.len(), &triangles).unwrap();
        let store = store_with_quadrics(&positions, &triangles);
        let config = LodConfig::default();

        let he = HalfEdgeId(0);
        let (target, cost) = evaluate_edge(&graph, &store, he, &config);
        let MergeTarget::Place(p) = target else {
            panic!("closed mesh edge should not pin an endpoint");
        };
        let q = store.quadric(graph.origin(he)) + store.quadric(graph.dest(he));
        let optimum = q.optimal_point().expect("icosahedron quadrics are full rank");
        assert!((p - optimum).length() < 1e-9);
        assert!(cost >= 0.0);

        // The optimum is never worse than either endpoint
        let pa = positions[graph.origin(he).index()].as_dvec3();
        let pb = positions[graph.dest(he).index()].as_dvec3();
        assert!(cost <= q.evaluate(pa) + 1e-9);
        assert!(cost <= q.evaluate(pb) + 1e-9);
    }

    #[test]
    fn test_singular_quadric_falls_back_to_midpoint() {
        // Flat quad with preservation off: interior diagonal has coplanar
        // quadrics, which are singular.
        let (positions, triangles) = fixtures::quad();
        let graph = HalfEdgeGraph::build(positions.len(), &triangles).unwrap();
        let store = store_with_quadrics(&positions, &triangles);
        let config = LodConfig::default().with_preserve_boundary(false);

        let he = (0..6)
            .map(HalfEdgeId)
            .find(|&h| !graph.is_boundary_edge(h))
            .unwrap();
        let (target, cost) = evaluate_edge(&graph, &store, he, &config);
        assert_eq!(target, MergeTarget::Place(glam::DVec3::new(0.5, 0.5, 0.0)));
        assert!(cost.abs() < 1e-12);
    }

    #[test]
    fn test_record_accessors() {
        let mut store = VertexStore::default();
        let v = store.push(Vertex {
            position: Vec3::new(1.0, 2.0, 3.0),
            normal: Vec3::Z,
            quadric: Quadric::default(),
        });
        let record = EdgeRecord::new(HalfEdgeId(0), MergeTarget::Keep(v), 0.0);
        assert!(!record.is_queued());
        assert!(!record.is_retired());
        assert_eq!(record.merge_point(&store), Vec3::new(1.0, 2.0, 3.0));
    }
}
