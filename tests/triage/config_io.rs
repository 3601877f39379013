use crate::common::{create_temp_file, pe};
use trustscan::core::BinaryArtifact;
use trustscan::triage::config::{AnalysisConfig, IoConfig};
use trustscan::{Analyzer, ExternalFindings, TrustScanError};

#[test]
fn partial_config_file_keeps_defaults() {
    let file = create_temp_file(br#"{"scoring": {"unsigned_penalty": 10.0}, "packed": {"entropy_threshold": 6.5}}"#);
    let config = AnalysisConfig::from_path(file.path()).unwrap();
    assert_eq!(config.scoring.unsigned_penalty, 10.0);
    assert_eq!(config.scoring.high_penalty, 15.0);
    assert_eq!(config.packed.entropy_threshold, 6.5);
    assert_eq!(config.packed.size_ratio_threshold, 5.0);
    assert_eq!(config.io, IoConfig::default());
}

#[test]
fn config_changes_scoring() {
    let file = create_temp_file(br#"{"scoring": {"unsigned_penalty": 10.0}}"#);
    let analyzer = Analyzer::new(AnalysisConfig::from_path(file.path()).unwrap());
    let summary =
        analyzer.analyze_artifact(&BinaryArtifact::new("hello.exe", pe::plain()), &ExternalFindings::default());
    assert_eq!(summary.trust_score, 90.0);
}

#[test]
fn malformed_config_is_an_error() {
    let file = create_temp_file(b"{ not json");
    assert!(matches!(
        AnalysisConfig::from_path(file.path()),
        Err(TrustScanError::Serialization(_))
    ));
    assert!(matches!(
        AnalysisConfig::from_path("/nonexistent/trustscan.json"),
        Err(TrustScanError::Io(_))
    ));
}

#[test]
fn artifact_from_path_reads_file() {
    let file = create_temp_file(&pe::plain());
    let artifact = BinaryArtifact::from_path(file.path(), &IoConfig::default()).unwrap();
    assert_eq!(artifact.bytes(), pe::plain().as_slice());
    assert!(!artifact.filename().is_empty());

    let summary = Analyzer::default().analyze_artifact(&artifact, &ExternalFindings::default());
    assert_eq!(summary.filename, artifact.filename());
    assert_eq!(summary.size, artifact.size());
    assert_eq!(summary.sha256, artifact.sha256());
}

#[test]
fn artifact_from_path_enforces_limits() {
    let io = IoConfig { max_file_size: 1024 };
    let big = create_temp_file(&vec![0xaa; 4096]);
    match BinaryArtifact::from_path(big.path(), &io) {
        Err(TrustScanError::ResourceExhausted { used, limit, .. }) => {
            assert_eq!(used, 4096);
            assert_eq!(limit, 1024);
        }
        other => panic!("expected ResourceExhausted, got {other:?}"),
    }

    let empty = create_temp_file(b"");
    assert!(matches!(
        BinaryArtifact::from_path(empty.path(), &io),
        Err(TrustScanError::InvalidInput(_))
    ));
}
