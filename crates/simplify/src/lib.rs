//! Progressive level-of-detail simplification for triangle meshes.
//!
//! This crate computes a sequence of edge collapses ordered by the Quadric
//! Error Metric and lets a caller walk that sequence in both directions:
//! - [`vertex`] - Append-only vertex store (position, normal, quadric)
//! - [`quadric`] - Symmetric 4x4 error quadrics and their closed-form optimum
//! - [`half_edge`] - Arena-backed half-edge graph with tombstoned slots
//! - [`cost`] - Per-edge merge point and cost policy
//! - [`queue`] - Mutable min-priority queue of edge costs
//! - [`collapse`] - The edge collapse operator and fin removal
//! - [`timeline`] - Replayable log of collapse records
//! - [`mesh`] - The [`LodMesh`] aggregate and its navigation surface
//! - [`render`] - Flattened, GPU-ready vertex and index buffers
//!
//! ## Levels
//!
//! Level 0 is full detail. Every collapse raises the level by one. Moving
//! back down (refine) replays the recorded inverse of each collapse; moving
//! up over already-recorded levels (coarsen) re-applies the recorded
//! mutation. Neither direction recomputes costs, so navigation is exact and
//! cheap enough to drive from a UI every frame.
//!
//! ## Threading
//!
//! Everything here is synchronous and unsynchronized. A [`LodMesh`] must not
//! be mutated from more than one thread at a time.

pub mod collapse;
pub mod cost;
mod error;
pub mod half_edge;
pub mod mesh;
pub mod quadric;
pub mod queue;
pub mod render;
pub mod timeline;
pub mod vertex;

#[cfg(test)]
pub(crate) mod fixtures;

pub use collapse::CollapseOutcome;
pub use cost::{EdgeRecord, MergeTarget};
pub use error::BuildError;
pub use half_edge::{EdgeId, HalfEdge, HalfEdgeGraph, HalfEdgeId, TopologyError, VertexId};
pub use mesh::LodMesh;
pub use meshlod_config::LodConfig;
pub use quadric::Quadric;
pub use queue::{CollapseQueue, QueueKey};
pub use render::{RenderBuffer, RenderVertex};
pub use timeline::{CollapseRecord, Relink, Timeline};
pub use vertex::{Vertex, VertexStore};
