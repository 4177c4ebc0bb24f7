//! Error types for mesh construction.

/// Structural problems in the input triangle list.
///
/// These are fatal at [`crate::LodMesh::build`]: no partially built mesh is
/// ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Mesh has no triangles")]
    NoTriangles,
    #[error("Triangle {triangle} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("Triangle {triangle} repeats a vertex index")]
    DegenerateTriangle { triangle: usize },
    #[error("Edge ({a}, {b}) is shared by more than two triangles")]
    NonManifoldEdge { a: u32, b: u32 },
    #[error("Directed edge {a} -> {b} appears twice (inconsistent winding)")]
    InconsistentWinding { a: u32, b: u32 },
}
