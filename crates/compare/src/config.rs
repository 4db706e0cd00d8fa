use serde::{Deserialize, Serialize};

use crate::error::CompareError;
use crate::prune::{PrunePolicy, POSITION_EPSILON};
use crate::sorter::SortOrder;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Optional knobs for a comparison run. The defaults reproduce the
/// behavior reference data was generated with.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    #[serde(default)]
    pub prune: PruneConfig,
    #[serde(default)]
    pub sort: SortConfig,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PruneConfig {
    #[serde(default)]
    pub policy: PrunePolicy,
    #[serde(default = "default_position_epsilon")]
    pub position_epsilon: f64,
}

fn default_position_epsilon() -> f64 {
    POSITION_EPSILON
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            policy: PrunePolicy::default(),
            position_epsilon: POSITION_EPSILON,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SortConfig {
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ToleranceConfig {
    /// Allow a few ULPs above the tolerance for float representation error.
    #[serde(default = "default_true")]
    pub relative_epsilon: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            relative_epsilon: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CompareConfig {
    pub fn from_toml(input: &str) -> Result<Self, CompareError> {
        let config: CompareConfig =
            toml::from_str(input).map_err(|e| CompareError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CompareError> {
        let eps = self.prune.position_epsilon;
        if !eps.is_finite() || eps <= 0.0 {
            return Err(CompareError::config(format!(
                "prune.position_epsilon must be a positive finite number, got {eps}"
            )));
        }
        Ok(())
    }
}
