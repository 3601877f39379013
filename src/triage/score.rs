//! Trust score aggregation and risk ranking.

use crate::core::alert::{Alert, Severity};
use crate::core::trust::{RiskLevel, TrustScore};
use crate::triage::config::ScoringConfig;
use tracing::debug;

/// Combines alerts, the signature signal and an optional ML risk score.
#[derive(Debug, Clone, Default)]
pub struct TrustScoreAggregator {
    config: ScoringConfig,
}

impl TrustScoreAggregator {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn penalty(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Critical => self.config.critical_penalty,
            Severity::High => self.config.high_penalty,
            Severity::Medium => self.config.medium_penalty,
            Severity::Low => self.config.low_penalty,
        }
    }

    /// Score before ML blending.
    pub fn base_score(&self, signed: bool, alerts: &[Alert]) -> f64 {
        let mut score = self.config.base_score;
        if !signed {
            score -= self.config.unsigned_penalty;
        }
        for alert in alerts {
            score -= self.penalty(alert.severity);
        }
        score.clamp(0.0, 100.0)
    }

    /// Blend `base` with ML-derived trust. A missing or NaN risk leaves `base`.
    pub fn blend(&self, base: f64, ml_risk: Option<f64>) -> f64 {
        match ml_risk.filter(|r| !r.is_nan()) {
            Some(r) => {
                let ml_trust = ((1.0 - r.clamp(0.0, 1.0)) * 100.0).clamp(0.0, 100.0);
                (base * self.config.base_weight + ml_trust * self.config.ml_weight).clamp(0.0, 100.0)
            }
            None => base,
        }
    }

    pub fn trust_level(&self, value: f64) -> RiskLevel {
        if value <= self.config.critical_limit {
            RiskLevel::Critical
        } else if value <= self.config.high_limit {
            RiskLevel::High
        } else if value <= self.config.medium_limit {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn aggregate(&self, alerts: &[Alert], signed: bool, ml_risk: Option<f64>) -> TrustScore {
        let base = self.base_score(signed, alerts);
        let value = self.blend(base, ml_risk);
        let by_trust = self.trust_level(value);
        let by_alerts = alert_level(alerts);
        let level = by_trust.escalate(by_alerts);
        debug!(base, value, %by_trust, %by_alerts, %level, "trust score");
        TrustScore::new(value, level)
    }
}

/// Risk implied by the alert mix alone.
pub fn alert_level(alerts: &[Alert]) -> RiskLevel {
    let critical = alerts.iter().filter(|a| a.severity == Severity::Critical).count();
    let high = alerts.iter().filter(|a| a.severity == Severity::High).count();
    if critical > 0 {
        RiskLevel::Critical
    } else if high >= 2 {
        RiskLevel::High
    } else if high >= 1 || alerts.len() >= 3 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
