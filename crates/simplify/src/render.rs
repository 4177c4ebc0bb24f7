//! GPU-ready buffers for the current level of detail.

use std::collections::HashMap;

use crate::half_edge::{HalfEdgeGraph, VertexId};
use crate::vertex::VertexStore;

/// One vertex as uploaded to the GPU (32-byte stride)
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct RenderVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub _padding: [f32; 2],
}

/// Flattened vertex and triangle-index arrays for the live triangles.
///
/// Only vertices referenced by a live triangle are emitted, numbered in order
/// of first reference while walking live triangles in slot order. A given
/// level therefore always produces the same buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBuffer {
    pub vertices: Vec<RenderVertex>,
    pub indices: Vec<u32>,
}

impl RenderBuffer {
    /// Flatten the live part of `graph`
    pub fn from_graph(graph: &HalfEdgeGraph, store: &VertexStore) -> Self {
        let mut remap: HashMap<VertexId, u32> = HashMap::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::with_capacity(graph.triangle_count() * 3);

        for tri in graph.live_triangles() {
            for v in graph.triangle_vertices(tri) {
                let index = *remap.entry(v).or_insert_with(|| {
                    let (position, normal) = store
                        .get(v)
                        .map(|vertex| (vertex.position, vertex.normal))
                        .unwrap_or_default();
                    vertices.push(RenderVertex {
                        position: position.to_array(),
                        normal: normal.to_array(),
                        _padding: [0.0; 2],
                    });
                    (vertices.len() - 1) as u32
                });
                indices.push(index);
            }
        }

        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex data as raw bytes for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::quadric::Quadric;
    use crate::vertex::Vertex;
    use glam::Vec3;

    fn store_of(positions: &[Vec3]) -> VertexStore {
        let mut store = VertexStore::default();
        for &position in positions {
            store.push(Vertex {
                position,
                normal: Vec3::Z,
                quadric: Quadric::default(),
            });
        }
        store
    }

    #[test]
    fn test_render_vertex_stride() {
        assert_eq!(std::mem::size_of::<RenderVertex>(), 32);
    }

    #[test]
    fn test_flattens_live_triangles() {
        let (positions, triangles) = fixtures::quad();
        let graph = HalfEdgeGraph::build(positions.len(), &triangles).unwrap();
        let buffer = RenderBuffer::from_graph(&graph, &store_of(&positions));

        assert_eq!(buffer.triangle_count(), 2);
        assert_eq!(buffer.vertices.len(), 4);
        assert_eq!(buffer.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(buffer.vertices[2].position, [1.0, 1.0, 0.0]);
        assert_eq!(buffer.vertices[2].normal, [0.0, 0.0, 1.0]);
        assert_eq!(buffer.vertex_bytes().len(), 4 * 32);
        assert_eq!(buffer.index_bytes().len(), 6 * 4);
    }

    #[test]
    fn test_skips_unreferenced_vertices() {
        let (positions, triangles) = fixtures::quad();
        let mut graph = HalfEdgeGraph::build(positions.len(), &triangles).unwrap();
        for he in graph.triangle_half_edges(crate::half_edge::HalfEdgeId(0)) {
            graph.kill(he);
        }
        let buffer = RenderBuffer::from_graph(&graph, &store_of(&positions));

        // Triangle [0, 2, 3] alone; vertex 1 is dropped and the rest renumbered
        assert_eq!(buffer.vertices.len(), 3);
        assert_eq!(buffer.indices, vec![0, 1, 2]);
        assert_eq!(buffer.vertices[1].position, [1.0, 1.0, 0.0]);
    }
}
