//! Append-only vertex store.
//!
//! Vertex slots are never removed or reused. A collapse that merges two
//! vertices onto a new point appends a vertex; refining past that collapse
//! simply stops referencing it. This keeps every [`VertexId`] recorded in the
//! timeline valid for the lifetime of the mesh.

use glam::Vec3;

use crate::half_edge::VertexId;
use crate::quadric::Quadric;

/// A vertex and its accumulated error quadric
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// Sum of the fundamental quadrics of every face this vertex represents
    pub quadric: Quadric,
}

/// Flat table of vertices addressed by [`VertexId`]
#[derive(Debug, Clone, Default)]
pub struct VertexStore {
    vertices: Vec<Vertex>,
}

impl VertexStore {
    /// Create an empty store with room for `capacity` vertices
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
        }
    }

    /// Append a vertex and return its id
    pub fn push(&mut self, vertex: Vertex) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(vertex);
        id
    }

    /// Get vertex by ID
    pub fn get(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    /// Get mutable vertex by ID
    pub fn get_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(id.index())
    }

    /// Position of a vertex, or zero for an unknown id
    pub fn position(&self, id: VertexId) -> Vec3 {
        self.get(id).map(|v| v.position).unwrap_or(Vec3::ZERO)
    }

    /// Quadric of a vertex, or the zero quadric for an unknown id
    pub fn quadric(&self, id: VertexId) -> Quadric {
        self.get(id).map(|v| v.quadric).unwrap_or_default()
    }

    /// Number of slots ever allocated
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All vertices in slot order
    pub fn as_slice(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId(i as u32), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex_at(x: f32) -> Vertex {
        Vertex {
            position: Vec3::new(x, 0.0, 0.0),
            normal: Vec3::Z,
            quadric: Quadric::default(),
        }
    }

    #[test]
    fn test_push_assigns_sequential_ids() {
        let mut store = VertexStore::default();
        assert!(store.is_empty());
        assert_eq!(store.push(vertex_at(0.0)), VertexId(0));
        assert_eq!(store.push(vertex_at(1.0)), VertexId(1));
        assert_eq!(store.len(), 2);
        assert_eq!(store.position(VertexId(1)), Vec3::X);
    }

    #[test]
    fn test_unknown_id() {
        let store = VertexStore::default();
        assert!(store.get(VertexId(3)).is_none());
        assert_eq!(store.position(VertexId(3)), Vec3::ZERO);
        assert_eq!(store.quadric(VertexId(3)), Quadric::default());
    }

    #[test]
    fn test_quadric_mutation_in_place() {
        let mut store = VertexStore::default();
        let id = store.push(vertex_at(2.0));
        let q = Quadric::from_plane(glam::DVec3::Z, 0.0);
        store.get_mut(id).unwrap().quadric += q;
        assert_eq!(store.quadric(id), q);
        assert_eq!(store.iter().count(), 1);
    }
}
