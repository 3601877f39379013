use serde_json::json;
use trustscan::core::AnalysisSummary;
use trustscan::triage::scanners::{parse_ssdeep_output, parse_yara_output};
use trustscan::{Analyzer, TrustScanError};

fn sandbox_report() -> serde_json::Value {
    json!({
        "sha256": "9F86D081884C7D659A2FEAA0C55AD015A3BF4F1B2B0B822CD15D6C15B0F00A08",
        "entropy": "7.41",
        "size": 73728,
        "info": {"score": 7.5},
        "yara": {"rules": ["UPX_Packed", {"rule": "Suspicious_kernel32.dll_Strings"}]},
        "signatures": [{"name": "creates_service"}],
        "network": {
            "domains": [{"domain": "c2.example.net"}],
            "http": [{"uri": "http://c2.example.net/beacon"}]
        },
        "behaviors": ["Deletes original binary"],
        "mutexes": ["Global\\qwerty"],
        "target": {"file": {"ssdeep": "1536:abcd:efgh"}},
        "static": {"pe": {
            "machine": "IMAGE_FILE_MACHINE_I386",
            "subsystem": "IMAGE_SUBSYSTEM_WINDOWS_GUI",
            "imagebase": "0x00400000",
            "entrypoint": "Address of entry point: 5360 (0x14f0)",
            "timestamp": "2016-03-01 10:22:13",
            "digital_signers": [],
            "sections": [
                {"name": ".text", "virtual_address": "0x00001000", "virtual_size": "0x0001b3a0", "size_of_data": "0x0001b400", "entropy": "6.52"},
                {"name": ".rsrc", "virtual_address": "0x0001d000", "virtual_size": "0x00004000", "size_of_data": "0x00003a00", "entropy": "92.1"}
            ]
        }}
    })
}

#[test]
fn report_pipeline_normalizes_header_text() {
    let summary = Analyzer::default().analyze_report("sample.exe.json", &sandbox_report());

    assert_eq!(summary.machine_type, "IMAGE_FILE_MACHINE_I386");
    assert_eq!(summary.subsystem, "IMAGE_SUBSYSTEM_WINDOWS_GUI");
    assert_eq!(summary.image_base, 0x400000);
    assert_eq!(summary.entry_point, 0x14f0);
    assert_eq!(summary.sections[0].rva, 0x1000);
    assert_eq!(summary.sections[0].raw_size, 0x1b400);
    assert_eq!(summary.sections[0].entropy, 6.52);
    // 92.1 rescaled into range
    assert_eq!(summary.sections[1].entropy, 0.921);
    assert!(!summary.packed);
}

#[test]
fn report_pipeline_collects_metrics_and_iocs() {
    let summary = Analyzer::default().analyze_report("sample.exe.json", &sandbox_report());

    assert_eq!(summary.sha256, "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08");
    assert_eq!(summary.size, 73728);
    assert_eq!(summary.entropy, 7.41);
    assert_eq!(summary.fuzzy_hash.as_deref(), Some("1536:abcd:efgh"));
    assert!(summary.yara_matched);
    assert_eq!(summary.matched_rules, vec!["UPX_Packed", "Suspicious_kernel32.dll_Strings"]);
    assert!(!summary.signed);

    assert_eq!(summary.iocs.score, Some(7.5));
    assert_eq!(summary.iocs.domains, vec!["c2.example.net"]);
    assert_eq!(summary.iocs.urls, vec!["http://c2.example.net/beacon"]);
    assert_eq!(summary.iocs.signatures, vec!["creates_service"]);

    // file manipulation (medium) + mutex (low), unsigned
    assert_eq!(summary.alerts.len(), 2);
    assert_eq!(summary.trust_score, 55.0);
}

#[test]
fn report_bytes_errors() {
    let analyzer = Analyzer::default();
    assert!(matches!(
        analyzer.analyze_report_bytes("r.json", b"   "),
        Err(TrustScanError::InvalidInput(_))
    ));
    assert!(matches!(
        analyzer.analyze_report_bytes("r.json", b"{\"behaviors\": ["),
        Err(TrustScanError::Serialization(_))
    ));
    assert!(matches!(
        analyzer.analyze_report_bytes("r.json", b"[1, 2]"),
        Err(TrustScanError::InvalidFormat(_))
    ));
}

#[test]
fn report_bytes_hash_raw_document_when_sha_missing() {
    let bytes = br#"{"behaviors": []}"#;
    let summary = Analyzer::default().analyze_report_bytes("r.json", bytes).unwrap();
    assert_eq!(summary.sha256, trustscan::hashing::sha256_digest(bytes));
    assert_eq!(summary.size, bytes.len() as u64);
    assert_eq!(summary.machine_type, "UNKNOWN");
}

#[test]
fn summary_json_uses_camel_case_and_round_trips() {
    let summary = Analyzer::default().analyze_report("sample.exe.json", &sandbox_report());
    let text = summary.to_json_string().unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    for key in ["binaryId", "mlRiskScore", "trustScore", "riskLevel", "machineType", "entryPoint", "yaraMatched"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["sections"][0]["rawSize"], 0x1b400);
    assert_eq!(value["mlSource"]["kind"], "fallback");

    let back = AnalysisSummary::from_json_str(&text).unwrap();
    assert_eq!(back, summary);
}

#[test]
fn binary_ids_are_unique() {
    let analyzer = Analyzer::default();
    let a = analyzer.analyze_report("a", &json!({}));
    let b = analyzer.analyze_report("a", &json!({}));
    assert_ne!(a.binary_id, b.binary_id);
    assert_eq!(a.binary_id.len(), 36);
}

#[test]
fn scanner_output_feeds_findings() {
    let yara = "UPX_Packed /tmp/sample.exe\nSuspicious_Strings /tmp/sample.exe\n\n";
    let ssdeep = "ssdeep,1.1--blocksize:hash:hash,filename\n96:abc:def,\"/tmp/sample.exe\"\n";
    assert_eq!(parse_yara_output(yara), vec!["UPX_Packed", "Suspicious_Strings"]);
    assert_eq!(parse_ssdeep_output(ssdeep).as_deref(), Some("96:abc:def"));
}
