//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// Default "not yet reached" value for distances and edge costs.
pub const DEFAULT_UNREACHED: f64 = 1e9;

/// Tunables for a [`Graph`](crate::graph::Graph).
///
/// ```rust
/// use splitpath_core::EngineConfig;
///
/// let cfg = EngineConfig::from_json(r#"{ "unreached": 1e12 }"#).unwrap();
/// assert_eq!(cfg.unreached, 1e12);
/// assert!(cfg.dedupe_worklist);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sentinel assigned to every distance and edge cost at the start of a run.
    /// Large and finite rather than infinite.
    pub unreached: f64,

    /// Keep at most one pending worklist entry per node. When off, a node
    /// improved twice before being drained is queued twice.
    pub dedupe_worklist: bool,
}

impl EngineConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.unreached.is_finite() || self.unreached <= 0.0 {
            return Err(GraphError::InvalidConfig(format!(
                "unreached must be finite and positive, got {}",
                self.unreached
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unreached: DEFAULT_UNREACHED,
            dedupe_worklist: true,
        }
    }
}
