use crate::common::pe;
use std::sync::Arc;
use std::time::Duration;
use trustscan::core::BinaryArtifact;
use trustscan::ml::{MlRequest, MlResponse, MlSource, RiskModel};
use trustscan::timeout::{with_timeout, TimeoutConfig};
use trustscan::{AnalysisConfig, Analyzer, ExternalFindings, Result, TrustScanError};

struct Sleepy(Duration);

impl RiskModel for Sleepy {
    fn name(&self) -> &str {
        "sleepy"
    }

    fn score(&self, _request: &MlRequest) -> Result<MlResponse> {
        std::thread::sleep(self.0);
        Ok(MlResponse { risk_score: 0.05, classification: "benign".into() })
    }
}

fn config_with_deadline(secs: u64) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.ml.deadline_secs = secs;
    config
}

#[tokio::test]
async fn slow_model_past_deadline_falls_back() {
    let analyzer = Analyzer::new(config_with_deadline(1)).with_model(Arc::new(Sleepy(Duration::from_secs(3))));
    let artifact = BinaryArtifact::new("hello.exe", pe::plain());
    let summary = analyzer.analyze_artifact_with_deadline(&artifact, &ExternalFindings::default()).await;
    assert!(matches!(summary.ml_source, MlSource::Fallback { .. }));
    assert_eq!(summary.trust_score, 70.0);
}

#[tokio::test]
async fn fast_model_within_deadline_is_used() {
    let analyzer = Analyzer::new(config_with_deadline(5)).with_model(Arc::new(Sleepy(Duration::from_millis(10))));
    let artifact = BinaryArtifact::new("hello.exe", pe::plain());
    let summary = analyzer.analyze_artifact_with_deadline(&artifact, &ExternalFindings::default()).await;
    assert_eq!(summary.ml_source, MlSource::Model);
    assert_eq!(summary.classification, "benign");
}

#[tokio::test]
async fn with_timeout_reports_timeout_error() {
    let cfg = TimeoutConfig::from_duration(Duration::from_millis(10), "sleep");
    let result: Result<()> = with_timeout(cfg, async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(())
    })
    .await;
    assert!(matches!(result, Err(TrustScanError::Timeout { .. })));
}
