//! Contract with the external ML risk scorer.
//!
//! The scorer is optional and untrusted. [`assess`] calls it once (no
//! retries) and substitutes a local estimate when it is missing, fails or
//! returns an out-of-range score; the substitution is recorded in
//! [`MlAssessment::source`].

use crate::error::{Result, TrustScanError};
use crate::timeout::{with_timeout, TimeoutConfig};
use crate::triage::config::MlConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Request body sent to the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MlRequest {
    pub entropy: f64,
    pub size: u64,
    pub hash: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuckoo_score: Option<f64>,
    pub yara_hits: Vec<String>,
    pub yara_hit_count: usize,
    pub imports: Vec<String>,
}

impl MlRequest {
    /// Assemble a request. `imports` from the PE stage are used as given;
    /// when there are none, dll/exe names are inferred from the rule names.
    pub fn new(
        entropy: f64,
        size: u64,
        hash: impl Into<String>,
        file_name: impl Into<String>,
        cuckoo_score: Option<f64>,
        rules: &[String],
        imports: &[String],
    ) -> Self {
        let yara_hits: Vec<String> = rules
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();
        let imports = if imports.is_empty() {
            infer_imports(&yara_hits)
        } else {
            imports.to_vec()
        };
        Self {
            entropy,
            size,
            hash: hash.into(),
            file_name: file_name.into(),
            cuckoo_score,
            yara_hit_count: yara_hits.len(),
            yara_hits,
            imports,
        }
    }
}

/// Lower-cased `*.dll` / `*.exe` tokens found in rule names, first occurrence order.
pub fn infer_imports(rules: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for rule in rules {
        for token in rule.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.')) {
            let token = token.to_ascii_lowercase();
            if (token.ends_with(".dll") || token.ends_with(".exe")) && !out.contains(&token) {
                out.push(token);
            }
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MlResponse {
    pub risk_score: f64,
    #[serde(default)]
    pub classification: String,
}

/// An external risk scorer.
pub trait RiskModel: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, request: &MlRequest) -> Result<MlResponse>;
}

/// Where an assessment's score came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MlSource {
    Model,
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MlAssessment {
    pub risk_score: f64,
    pub classification: String,
    pub source: MlSource,
}

impl MlAssessment {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, MlSource::Fallback { .. })
    }
}

/// `min(1, min(1, entropy/8) * w_e + min(1, hits * per_hit) * w_h)`.
pub fn fallback_estimate(entropy: f64, hit_count: usize, cfg: &MlConfig) -> f64 {
    let entropy = if entropy.is_finite() { entropy.max(0.0) } else { 0.0 };
    let entropy_norm = (entropy / 8.0).min(1.0);
    let hit_factor = (hit_count as f64 * cfg.per_hit).min(1.0);
    (entropy_norm * cfg.entropy_weight + hit_factor * cfg.hits_weight).min(1.0)
}

pub fn classify(score: f64, cfg: &MlConfig) -> &'static str {
    if score > cfg.malicious_threshold {
        "malicious"
    } else if score > cfg.suspicious_threshold {
        "suspicious"
    } else {
        "benign"
    }
}

pub fn fallback(request: &MlRequest, cfg: &MlConfig, reason: impl Into<String>) -> MlAssessment {
    let score = fallback_estimate(request.entropy, request.yara_hit_count, cfg);
    MlAssessment {
        risk_score: score,
        classification: classify(score, cfg).to_string(),
        source: MlSource::Fallback {
            reason: reason.into(),
        },
    }
}

/// Score with `model`, falling back to the local estimate on any failure.
pub fn assess(model: Option<&dyn RiskModel>, request: &MlRequest, cfg: &MlConfig) -> MlAssessment {
    match model {
        None => fallback(request, cfg, "no model configured"),
        Some(m) => {
            debug!(model = m.name(), hits = request.yara_hit_count, "requesting ML score");
            resolve(m.score(request), request, cfg)
        }
    }
}

/// Like [`assess`], but the model runs on the blocking pool under `deadline`.
pub async fn assess_with_deadline(
    model: Option<Arc<dyn RiskModel>>,
    request: MlRequest,
    cfg: &MlConfig,
    deadline: Duration,
) -> MlAssessment {
    let Some(model) = model else {
        return assess(None, &request, cfg);
    };

    let req = request.clone();
    let call = async move {
        tokio::task::spawn_blocking(move || model.score(&req))
            .await
            .map_err(|e| TrustScanError::Internal(format!("model task failed: {e}")))?
    };
    let outcome = with_timeout(TimeoutConfig::from_duration(deadline, "ml_score"), call).await;
    resolve(outcome, &request, cfg)
}

fn resolve(outcome: Result<MlResponse>, request: &MlRequest, cfg: &MlConfig) -> MlAssessment {
    match outcome {
        Ok(resp) if resp.risk_score.is_finite() && (0.0..=1.0).contains(&resp.risk_score) => {
            let classification = if resp.classification.trim().is_empty() {
                classify(resp.risk_score, cfg).to_string()
            } else {
                resp.classification
            };
            MlAssessment {
                risk_score: resp.risk_score,
                classification,
                source: MlSource::Model,
            }
        }
        Ok(resp) => {
            warn!(risk_score = resp.risk_score, "ML score out of range, using fallback heuristic");
            fallback(request, cfg, format!("invalid risk score {}", resp.risk_score))
        }
        Err(e) => {
            warn!(error = %e, "ML scoring failed, using fallback heuristic");
            fallback(request, cfg, e.to_string())
        }
    }
}
