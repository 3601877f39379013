//! Indicators of compromise collected for the summary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IocReport {
    /// Sandbox score (`info.score`).
    pub score: Option<f64>,
    pub domains: Vec<String>,
    pub urls: Vec<String>,
    pub signatures: Vec<String>,
    /// Compact JSON of `behavior.summary`, empty when absent.
    pub behavior_summary: String,
    /// Indicator strings found in the artifact bytes.
    pub static_indicators: Vec<String>,
}

/// Sandbox-side IOCs from a behavior report. Missing sections stay empty.
pub fn extract_report_iocs(report: &Value) -> IocReport {
    IocReport {
        score: report.pointer("/info/score").and_then(Value::as_f64),
        domains: field_list(report.pointer("/network/domains"), "domain"),
        urls: field_list(report.pointer("/network/http"), "uri"),
        signatures: field_list(report.get("signatures"), "name"),
        behavior_summary: report
            .pointer("/behavior/summary")
            .map(Value::to_string)
            .unwrap_or_default(),
        static_indicators: Vec::new(),
    }
}

fn field_list(list: Option<&Value>, key: &str) -> Vec<String> {
    list.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get(key))
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.clone()),
                    Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect()
        })
        .unwrap_or_default()
}
