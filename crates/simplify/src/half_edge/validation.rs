//! Validation methods for HalfEdgeGraph.
//!
//! Checks the structural invariants every operation must preserve:
//! - `next.next.next == self` and `prev.prev.prev == self`
//! - `next.prev == self` and the whole triangle shares one liveness
//! - `sym.sym == self`, `sym` runs in the opposite direction and shares the
//!   edge record
//!
//! Tombstoned slots are skipped; they are expected after collapses.

use super::types::{HalfEdgeId, TopologyError};
use super::HalfEdgeGraph;

impl HalfEdgeGraph {
    /// Validate every live half-edge.
    pub fn validate(&self) -> Result<(), TopologyError> {
        let slots = self.half_edges.len();
        let mut counted = 0;

        for (i, he) in self.half_edges.iter().enumerate() {
            if !he.alive {
                continue;
            }
            counted += 1;
            let id = HalfEdgeId(i as u32);

            if he.next.index() >= slots || he.prev.index() >= slots {
                return Err(TopologyError::DanglingReference(id));
            }
            let n = self.next(id);
            let p = self.prev(id);
            if self.next(self.next(n)) != id
                || self.prev(self.prev(p)) != id
                || self.prev(n) != id
                || self.next(p) != id
            {
                return Err(TopologyError::BrokenCycle(id));
            }
            if !self.is_alive(n) || !self.is_alive(p) {
                return Err(TopologyError::LinksTombstone(id));
            }

            let [a, b, c] = self.triangle_vertices(id);
            if a == b || b == c || a == c {
                return Err(TopologyError::DegenerateTriangle(id));
            }

            if let Some(sym) = he.sym {
                if sym.index() >= slots {
                    return Err(TopologyError::DanglingReference(id));
                }
                if !self.is_alive(sym) {
                    return Err(TopologyError::LinksTombstone(id));
                }
                if self.sym(sym) != Some(id) {
                    return Err(TopologyError::AsymmetricSym(id));
                }
                if self.origin(sym) != self.dest(id) || self.dest(sym) != he.origin {
                    return Err(TopologyError::SymDirection(id));
                }
                if self.edge(sym) != he.edge {
                    return Err(TopologyError::SplitEdgeRecord(id));
                }
            }
        }

        if counted != self.live {
            return Err(TopologyError::LiveCountMismatch {
                counted,
                tracked: self.live,
            });
        }

        Ok(())
    }

    /// Debug-only invariant check run after every mutation.
    ///
    /// A violation here is a defect in the collapse operator, not a runtime
    /// condition, so it is reported loudly and asserted in debug builds.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_validate(&self, context: &str) {
        if let Err(err) = self.validate() {
            tracing::error!("{}: half-edge invariant violated: {}", context, err);
            debug_assert!(false, "{context}: {err}");
        }
    }

    /// No-op in release builds.
    #[cfg(not(debug_assertions))]
    pub(crate) fn debug_validate(&self, _context: &str) {}
}
