//! Metrics read from a sandbox behavior report.

use crate::entropy::sanitize_entropy;
use crate::error::{Result, TrustScanError};
use serde_json::Value;
use tracing::debug;

/// Parse a report document. It must be a JSON object.
pub fn parse_report(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(TrustScanError::InvalidInput("report is empty".into()));
    }
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(TrustScanError::InvalidFormat(
            "report must be a JSON object".into(),
        ));
    }
    Ok(value)
}

/// Scalar facts about the analyzed file, as recorded by the sandbox.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportMetrics {
    pub sha256: Option<String>,
    /// 0.0 when the report has none.
    pub entropy: f64,
    pub size: Option<u64>,
    pub signatures: Vec<String>,
    pub yara_rules: Vec<String>,
    /// True only when `static.pe.digital_signers` lists a signer.
    pub signed: bool,
    /// `info.score`, forwarded to the ML request as `cuckooScore`.
    pub cuckoo_score: Option<f64>,
    pub fuzzy_hash: Option<String>,
}

impl ReportMetrics {
    pub fn from_report(report: &Value) -> Self {
        let metrics = Self {
            sha256: report
                .get("sha256")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty()),
            entropy: report
                .get("entropy")
                .and_then(as_f64_lenient)
                .map(sanitize_entropy)
                .unwrap_or(0.0),
            size: report.get("size").and_then(|v| {
                v.as_u64()
                    .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
            }),
            signatures: names(report.get("signatures"), &["name"]),
            yara_rules: names(report.pointer("/yara/rules"), &["name", "rule"]),
            signed: has_signers(report),
            cuckoo_score: report.pointer("/info/score").and_then(as_f64_lenient),
            fuzzy_hash: report
                .pointer("/target/file/ssdeep")
                .or_else(|| report.get("ssdeep"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .filter(|s| !s.is_empty()),
        };
        debug!(
            rules = metrics.yara_rules.len(),
            signatures = metrics.signatures.len(),
            signed = metrics.signed,
            "report metrics extracted"
        );
        metrics
    }
}

/// Whether the report names at least one Authenticode signer. An absent or
/// empty signer list counts as unsigned.
pub fn has_signers(report: &Value) -> bool {
    report
        .pointer("/static/pe/digital_signers")
        .and_then(Value::as_array)
        .is_some_and(|signers| !signers.is_empty())
}

fn as_f64_lenient(v: &Value) -> Option<f64> {
    v.as_f64()
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|f: &f64| f.is_finite())
}

/// Non-empty names from an array of strings or objects carrying one of `keys`.
fn names(list: Option<&Value>, keys: &[&str]) -> Vec<String> {
    let Some(items) = list.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.as_str()),
            Value::Object(_) => keys.iter().find_map(|k| item.get(*k).and_then(Value::as_str)),
            _ => None,
        })
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
