//! Configuration for the analysis pipeline.
//!
//! Every threshold and weight used by the stages lives here with the
//! production default. Each sub-config is `#[serde(default)]`, so a JSON
//! document only needs to name the values it overrides.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Master configuration for the analysis pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Artifact loading limits.
    pub io: IoConfig,
    /// PE normalization.
    pub pe: PeConfig,
    /// Packed-file heuristic thresholds.
    pub packed: PackedConfig,
    /// Trust score penalties, weights and buckets.
    pub scoring: ScoringConfig,
    /// ML request fallback estimate.
    pub ml: MlConfig,
    /// Static string and IOC extraction.
    pub strings: StringsConfig,
}

impl AnalysisConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// I/O configuration for artifact loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Files larger than this are rejected before analysis.
    pub max_file_size: u64,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// PE header normalization configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeConfig {
    /// Upper bound on characteristics text, in bytes.
    pub max_characteristics_len: usize,
}

impl Default for PeConfig {
    fn default() -> Self {
        Self {
            max_characteristics_len: 250,
        }
    }
}

/// Packed heuristic configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackedConfig {
    /// Section entropy at or above this counts as suspicious.
    pub entropy_threshold: f64,
    /// Virtual/raw size ratio above this counts as suspicious.
    pub size_ratio_threshold: f64,
}

impl Default for PackedConfig {
    fn default() -> Self {
        Self {
            entropy_threshold: 7.0,
            size_ratio_threshold: 5.0,
        }
    }
}

/// Trust score configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Starting trust before penalties.
    pub base_score: f64,
    /// Penalty when the artifact is known to be unsigned.
    pub unsigned_penalty: f64,
    pub critical_penalty: f64,
    pub high_penalty: f64,
    pub medium_penalty: f64,
    pub low_penalty: f64,
    /// Weight of the alert/signature score when an ML score is blended.
    pub base_weight: f64,
    /// Weight of the ML-derived trust when blended.
    pub ml_weight: f64,
    /// Trust at or below this is Critical.
    pub critical_limit: f64,
    /// Trust at or below this is High.
    pub high_limit: f64,
    /// Trust at or below this is Medium.
    pub medium_limit: f64,
    /// Blend the local fallback estimate when the model was unavailable.
    pub blend_fallback_score: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 100.0,
            unsigned_penalty: 30.0,
            critical_penalty: 25.0,
            high_penalty: 15.0,
            medium_penalty: 10.0,
            low_penalty: 5.0,
            base_weight: 0.6,
            ml_weight: 0.4,
            critical_limit: 30.0,
            high_limit: 50.0,
            medium_limit: 70.0,
            blend_fallback_score: false,
        }
    }
}

/// ML collaborator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MlConfig {
    /// Weight of normalized entropy in the fallback estimate.
    pub entropy_weight: f64,
    /// Weight of the YARA hit term in the fallback estimate.
    pub hits_weight: f64,
    /// Contribution of each YARA hit before capping at 1.0.
    pub per_hit: f64,
    /// Scores above this classify as malicious.
    pub malicious_threshold: f64,
    /// Scores above this classify as suspicious.
    pub suspicious_threshold: f64,
    /// Deadline for the model call in async contexts.
    pub deadline_secs: u64,
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            entropy_weight: 0.6,
            hits_weight: 0.4,
            per_hit: 0.15,
            malicious_threshold: 0.7,
            suspicious_threshold: 0.4,
            deadline_secs: 30,
        }
    }
}

/// Static string extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringsConfig {
    /// Minimum printable run length.
    pub min_length: usize,
    /// Maximum number of indicator strings kept per artifact.
    pub max_indicators: usize,
}

impl Default for StringsConfig {
    fn default() -> Self {
        Self {
            min_length: 5,
            max_indicators: 200,
        }
    }
}
