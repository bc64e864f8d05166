//! Configuration
//!
//! Tunables for the recycler and for graphs. Both structs deserialize from
//! JSON with every field optional, so a host application can keep them in
//! whatever settings file it already loads.

use serde::{Deserialize, Serialize};

/// Settings for a [`Recycler`](crate::recycler::Recycler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecyclerConfig {
    /// Optional upper bound on idle instances kept per pooled type.
    /// Instances released beyond it are dropped. `None` (the default) keeps
    /// every released instance, so a rebuild of any size reuses them all.
    pub max_idle_per_type: Option<usize>,
}

impl RecyclerConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for RecyclerConfig {
    fn default() -> Self {
        Self {
            max_idle_per_type: None,
        }
    }
}

/// Settings for a [`WeightedGraph`](crate::graph::WeightedGraph).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Size hint for the incident-edge set of freshly allocated nodes.
    /// A maze cell rarely has more than three open walls.
    pub node_size_hint: usize,

    /// Panic on a detected consistency violation instead of returning
    /// [`GraphError::Inconsistent`](crate::GraphError::Inconsistent).
    pub strict_consistency: bool,
}

impl GraphConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            node_size_hint: 3,
            strict_consistency: cfg!(debug_assertions),
        }
    }
}
