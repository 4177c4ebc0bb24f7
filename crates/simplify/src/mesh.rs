//! The level-of-detail mesh aggregate.
//!
//! [`LodMesh`] owns the vertex store, the half-edge graph, one
//! [`EdgeRecord`] per undirected edge, the collapse queue and the timeline,
//! and exposes the navigation surface used by viewers.

use glam::Vec3;
use meshlod_config::LodConfig;
use tracing::debug;

use crate::collapse::CollapseOutcome;
use crate::cost::{self, EdgeRecord};
use crate::error::BuildError;
use crate::half_edge::{HalfEdgeGraph, HalfEdgeId, TopologyError, VertexId};
use crate::quadric::Quadric;
use crate::queue::CollapseQueue;
use crate::render::RenderBuffer;
use crate::timeline::Timeline;
use crate::vertex::{Vertex, VertexStore};

/// A triangle mesh with a navigable sequence of edge collapses
#[derive(Debug, Clone)]
pub struct LodMesh {
    pub(crate) graph: HalfEdgeGraph,
    pub(crate) vertices: VertexStore,
    /// Indexed by `EdgeId`
    pub(crate) records: Vec<EdgeRecord>,
    pub(crate) queue: CollapseQueue,
    pub(crate) timeline: Timeline,
    pub(crate) config: LodConfig,
}

impl LodMesh {
    /// Build from an indexed triangle list.
    ///
    /// Accumulates per-face quadrics and area-weighted normals, builds the
    /// half-edge graph, then scores and queues every edge. On error no mesh
    /// is returned.
    pub fn build(
        positions: &[Vec3],
        triangles: &[[u32; 3]],
        config: LodConfig,
    ) -> Result<Self, BuildError> {
        let graph = HalfEdgeGraph::build(positions.len(), triangles)?;

        let mut quadrics = vec![Quadric::default(); positions.len()];
        let mut normals = vec![Vec3::ZERO; positions.len()];
        for tri in triangles {
            let [p0, p1, p2] = tri.map(|i| positions[i as usize]);
            let quadric = Quadric::from_triangle(p0.as_dvec3(), p1.as_dvec3(), p2.as_dvec3());
            // Unnormalized cross product weights by area
            let normal = (p1 - p0).cross(p2 - p0);
            for &i in tri {
                quadrics[i as usize] += quadric;
                normals[i as usize] += normal;
            }
        }

        let mut vertices = VertexStore::with_capacity(positions.len());
        for ((&position, normal), quadric) in positions.iter().zip(normals).zip(quadrics) {
            vertices.push(Vertex {
                position,
                normal: normal.normalize_or_zero(),
                quadric,
            });
        }

        // First half-edge seen for each edge represents it
        let mut representatives: Vec<Option<HalfEdgeId>> = vec![None; graph.edge_count()];
        for (i, he) in graph.half_edges().iter().enumerate() {
            let slot = &mut representatives[he.edge.index()];
            if slot.is_none() {
                *slot = Some(HalfEdgeId(i as u32));
            }
        }

        let mut queue = CollapseQueue::new();
        let mut records = Vec::with_capacity(representatives.len());
        for (index, he) in representatives.into_iter().enumerate() {
            let Some(he) = he else {
                continue;
            };
            let (target, cost) = cost::evaluate_edge(&graph, &vertices, he, &config);
            let mut record = EdgeRecord::new(he, target, cost);
            record.handle = Some(queue.push(graph.edge(he), cost));
            debug_assert_eq!(index, records.len());
            records.push(record);
        }

        debug!(
            "LodMesh::build: {} vertices, {} triangles, {} edges queued",
            vertices.len(),
            graph.triangle_count(),
            queue.len()
        );

        let mesh = Self {
            graph,
            vertices,
            records,
            queue,
            timeline: Timeline::new(),
            config,
        };
        mesh.graph.debug_validate("build");
        Ok(mesh)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Advance one level: replay the next recorded collapse, or compute a new
    /// one at the end of the timeline.
    pub fn try_collapse(&mut self) -> CollapseOutcome {
        if self.timeline.step_forward(&mut self.graph) {
            self.graph.debug_validate("replay");
            return CollapseOutcome::Replayed;
        }
        self.collapse_next()
    }

    /// Advance one level, skipping edges that cannot be collapsed.
    ///
    /// Returns false once simplification is exhausted; the mesh is then left
    /// exactly as it was.
    pub fn collapse_once(&mut self) -> bool {
        loop {
            match self.try_collapse() {
                CollapseOutcome::Rejected => continue,
                outcome => return outcome.advanced(),
            }
        }
    }

    /// Undo up to `n` collapses. Stops at full detail; returns the number of
    /// levels actually moved.
    pub fn refine(&mut self, n: usize) -> usize {
        let mut steps = 0;
        while steps < n && self.timeline.step_back(&mut self.graph) {
            steps += 1;
        }
        self.graph.debug_validate("refine");
        debug!(
            "Refined {} of {} levels, now at level {} ({} triangles)",
            steps,
            n,
            self.level(),
            self.current_triangle_count()
        );
        steps
    }

    /// Apply up to `n` collapses. Returns the number of levels actually moved.
    pub fn coarsen(&mut self, n: usize) -> usize {
        let mut steps = 0;
        while steps < n && self.collapse_once() {
            steps += 1;
        }
        debug!(
            "Coarsened {} of {} levels, now at level {} ({} triangles)",
            steps,
            n,
            self.level(),
            self.current_triangle_count()
        );
        steps
    }

    /// Navigate to an absolute level. Returns the level reached, which is
    /// lower than requested if simplification ran out first.
    pub fn set_level(&mut self, level: usize) -> usize {
        let current = self.level();
        if level < current {
            self.refine(current - level);
        } else if level > current {
            self.coarsen(level - current);
        }
        self.level()
    }

    /// Coarsen until at most `target` triangles are live or simplification
    /// is exhausted. Returns the number of levels moved.
    pub fn coarsen_to_triangles(&mut self, target: usize) -> usize {
        let mut steps = 0;
        while self.current_triangle_count() > target && self.collapse_once() {
            steps += 1;
        }
        steps
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Current level; 0 is full detail
    pub fn level(&self) -> usize {
        self.timeline.level()
    }

    /// Number of levels computed so far
    pub fn recorded_levels(&self) -> usize {
        self.timeline.len()
    }

    pub fn current_triangle_count(&self) -> usize {
        self.graph.triangle_count()
    }

    /// Distinct vertices referenced by live triangles
    pub fn live_vertex_count(&self) -> usize {
        self.graph.live_vertices().len()
    }

    /// Position of a vertex, if it exists
    pub fn position(&self, id: VertexId) -> Option<Vec3> {
        self.vertices.get(id).map(|v| v.position)
    }

    pub fn graph(&self) -> &HalfEdgeGraph {
        &self.graph
    }

    pub fn vertices(&self) -> &VertexStore {
        &self.vertices
    }

    pub fn edge_records(&self) -> &[EdgeRecord] {
        &self.records
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn config(&self) -> &LodConfig {
        &self.config
    }

    /// Check every half-edge invariant
    pub fn validate(&self) -> Result<(), TopologyError> {
        self.graph.validate()
    }

    /// Flatten the current level for rendering
    pub fn render_buffer(&self) -> RenderBuffer {
        RenderBuffer::from_graph(&self.graph, &self.vertices)
    }
}
