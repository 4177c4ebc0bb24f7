//! Shared configuration for meshlod
//!
//! This crate provides the single source of truth for the simplifier's
//! stopping conditions and boundary policy, so every front end (viewer,
//! batch tools, tests) drives the collapse scheduler with the same numbers.

use serde::{Deserialize, Serialize};

/// Default triangle floor. Simplification never goes below this many live triangles.
pub const DEFAULT_MIN_TRIANGLES: usize = 4;

/// Default minimum number of queued edges required to attempt a collapse
pub const DEFAULT_MIN_QUEUE_EDGES: usize = 3;

/// Errors raised while loading a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid max_cost {0} (must be a non-negative number)")]
    InvalidMaxCost(f64),
}

/// Tuning parameters for the level-of-detail simplifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LodConfig {
    /// Live triangle count the simplifier will not go below
    pub min_triangles: usize,
    /// Stop when fewer edges than this remain in the collapse queue
    pub min_queue_edges: usize,
    /// Quality threshold: stop when the cheapest edge costs more than this.
    /// `None` means no limit.
    pub max_cost: Option<f64>,
    /// Pin boundary vertices in place instead of merging toward a midpoint.
    ///
    /// When set, every edge touching an open boundary collapses onto its
    /// boundary endpoint, which keeps the outline from eroding.
    pub preserve_boundary: bool,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            min_triangles: DEFAULT_MIN_TRIANGLES,
            min_queue_edges: DEFAULT_MIN_QUEUE_EDGES,
            max_cost: None,
            preserve_boundary: true,
        }
    }
}

impl LodConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if let Some(max_cost) = config.max_cost {
            if max_cost.is_nan() || max_cost < 0.0 {
                return Err(ConfigError::InvalidMaxCost(max_cost));
            }
        }
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the triangle floor
    #[must_use]
    pub fn with_min_triangles(mut self, min_triangles: usize) -> Self {
        self.min_triangles = min_triangles;
        self
    }

    /// Set the quality threshold
    #[must_use]
    pub fn with_max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = Some(max_cost);
        self
    }

    /// Set the boundary policy
    #[must_use]
    pub fn with_preserve_boundary(mut self, preserve: bool) -> Self {
        self.preserve_boundary = preserve;
        self
    }

    /// Whether an edge of the given cost is within the quality threshold
    pub fn accepts_cost(&self, cost: f64) -> bool {
        self.max_cost.is_none_or(|max| cost <= max)
    }
}
