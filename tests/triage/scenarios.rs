use crate::common::pe;
use serde_json::json;
use std::sync::Arc;
use trustscan::core::{Alert, BinaryArtifact, RiskLevel, Severity};
use trustscan::ml::{MlRequest, MlResponse, MlSource, RiskModel};
use trustscan::triage::config::ScoringConfig;
use trustscan::triage::score::TrustScoreAggregator;
use trustscan::{Analyzer, ExternalFindings, Result, TrustScanError};

struct Unreachable;

impl RiskModel for Unreachable {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn score(&self, _request: &MlRequest) -> Result<MlResponse> {
        Err(TrustScanError::Collaborator("connection refused".into()))
    }
}

struct Fixed(f64);

impl RiskModel for Fixed {
    fn name(&self) -> &str {
        "fixed"
    }

    fn score(&self, _request: &MlRequest) -> Result<MlResponse> {
        Ok(MlResponse { risk_score: self.0, classification: String::new() })
    }
}

#[test]
fn unsigned_clean_image_is_medium() {
    let summary = Analyzer::default()
        .analyze_artifact(&BinaryArtifact::new("hello.exe", pe::plain()), &ExternalFindings::default());
    assert!(!summary.signed);
    assert!(summary.alerts.is_empty());
    assert_eq!(summary.trust_score, 70.0);
    assert_eq!(summary.risk_level, RiskLevel::Medium);
}

#[test]
fn report_without_signers_is_medium() {
    let report = json!({"behaviors": [], "static": {"pe": {"imagebase": "0x400000"}}});
    let summary = Analyzer::default().analyze_report("clean.json", &report);
    assert!(!summary.signed);
    assert!(summary.alerts.is_empty());
    assert_eq!(summary.trust_score, 70.0);
    assert_eq!(summary.risk_level, RiskLevel::Medium);
}

#[test]
fn signed_with_critical_alert_escalates_to_critical() {
    let scorer = TrustScoreAggregator::new(&ScoringConfig::default());
    let alerts = vec![Alert::new(Severity::Critical, "Ransom note dropped")];
    let trust = scorer.aggregate(&alerts, true, None);
    assert_eq!(trust.value, 75.0);
    assert_eq!(scorer.trust_level(trust.value), RiskLevel::Low);
    assert_eq!(trust.risk_level, RiskLevel::Critical);
}

#[test]
fn signed_image_has_no_unsigned_penalty() {
    let image = pe::build(&[pe::Section::code(".text", vec![0xc3; 64])], true);
    let summary = Analyzer::default()
        .analyze_artifact(&BinaryArtifact::new("signed.exe", image), &ExternalFindings::default());
    assert!(summary.signed);
    assert_eq!(summary.trust_score, 100.0);
    assert_eq!(summary.risk_level, RiskLevel::Low);
}

#[test]
fn unreachable_model_uses_fallback_estimate() {
    let analyzer = Analyzer::default().with_model(Arc::new(Unreachable));
    let summary = analyzer.analyze_report("sample.json", &json!({"entropy": 7.9}));
    assert!((summary.ml_risk_score - 0.5925).abs() < 1e-9);
    assert_eq!(summary.classification, "suspicious");
    match &summary.ml_source {
        MlSource::Fallback { reason } => assert!(reason.contains("connection refused")),
        other => panic!("expected fallback, got {other:?}"),
    }
    // unsigned; fallback estimate is not blended by default
    assert_eq!(summary.trust_score, 70.0);
    assert_eq!(summary.risk_level, RiskLevel::Medium);
}

#[test]
fn fallback_blending_is_configurable() {
    let mut config = trustscan::AnalysisConfig::default();
    config.scoring.blend_fallback_score = true;
    let summary = Analyzer::new(config).analyze_report("sample.json", &json!({"entropy": 7.9}));
    // 70 * 0.6 + (1 - 0.5925) * 100 * 0.4
    assert!((summary.trust_score - 58.3).abs() < 1e-9);
}

#[test]
fn three_sections_two_suspicious_is_packed() {
    let report = json!({
        "static": {"pe": {"sections": [
            {"name": ".text", "virtual_size": "0x1000", "size_of_data": "0x1000", "entropy": "7.2"},
            {"name": ".data", "virtual_size": "0x1000", "size_of_data": "0x400", "entropy": "3.0"},
            {"name": ".rsrc", "virtual_size": "0x2000", "size_of_data": "0x2000", "entropy": "7.5"}
        ]}}
    });
    let summary = Analyzer::default().analyze_report("packed.json", &report);
    assert_eq!(summary.sections.len(), 3);
    let entropies: Vec<f64> = summary.sections.iter().map(|s| s.entropy).collect();
    assert_eq!(entropies, vec![7.2, 3.0, 7.5]);
    assert!(summary.packed);
}

#[test]
fn model_score_is_blended() {
    let analyzer = Analyzer::default().with_model(Arc::new(Fixed(0.9)));
    let summary =
        analyzer.analyze_artifact(&BinaryArtifact::new("hello.exe", pe::plain()), &ExternalFindings::default());
    assert_eq!(summary.ml_source, MlSource::Model);
    assert_eq!(summary.classification, "malicious");
    // 70 * 0.6 + 10 * 0.4
    assert!((summary.trust_score - 46.0).abs() < 1e-9);
    assert_eq!(summary.risk_level, RiskLevel::High);
}

#[test]
fn alerts_escalate_risk_over_trust_bucket() {
    let report = json!({
        "behaviors": ["Process hook installed"],
        "apicalls": [{"api": "VirtualAllocEx"}],
        "static": {"pe": {"digital_signers": [{"common_name": "Contoso"}]}}
    });
    let summary = Analyzer::default().analyze_report("r.json", &report);
    assert!(summary.signed);
    assert_eq!(summary.alerts.len(), 2);
    assert!(summary.alerts.iter().all(|a| a.severity == Severity::High));
    assert_eq!(summary.trust_score, 70.0);
    assert_eq!(summary.risk_level, RiskLevel::High);
}
