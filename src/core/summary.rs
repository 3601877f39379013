//! The serialized result of one analysis.

use crate::core::alert::Alert;
use crate::core::pe::PeSection;
use crate::core::trust::RiskLevel;
use crate::error::Result;
use crate::ml::MlSource;
use crate::triage::iocs::IocReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Random v4 UUID assigned per analysis.
    pub binary_id: String,
    pub filename: String,
    pub timestamp: DateTime<Utc>,
    pub sha256: String,
    pub fuzzy_hash: Option<String>,
    pub size: u64,
    pub entropy: f64,
    pub yara_matched: bool,
    pub matched_rules: Vec<String>,
    pub ml_risk_score: f64,
    pub classification: String,
    pub ml_source: MlSource,
    pub machine_type: String,
    pub entry_point: u64,
    pub image_base: u64,
    pub subsystem: String,
    pub sections: Vec<PeSection>,
    pub packed: bool,
    /// False unless a signer or certificate directory was found.
    pub signed: bool,
    pub trust_score: f64,
    pub risk_level: RiskLevel,
    pub alerts: Vec<Alert>,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub iocs: IocReport,
}

impl AnalysisSummary {
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}
