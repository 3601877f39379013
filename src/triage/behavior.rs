//! Rule-based alerts over a sandbox behavior report.
//!
//! Rules are independent; a rule whose input is absent or has the wrong
//! shape is skipped rather than failing the scan. Text is matched as
//! lower-case substrings.

use crate::core::alert::{Alert, Severity};
use serde_json::Value;
use tracing::debug;

struct KeywordRule {
    /// Matches when any of these appear...
    any: &'static [&'static str],
    /// ...or when all of these appear.
    all: &'static [&'static str],
    severity: Severity,
    message: &'static str,
}

impl KeywordRule {
    fn matches(&self, text: &str) -> bool {
        (!self.any.is_empty() && self.any.iter().any(|k| text.contains(k)))
            || (!self.all.is_empty() && self.all.iter().all(|k| text.contains(k)))
    }
}

const BEHAVIOR_RULES: &[KeywordRule] = &[
    KeywordRule {
        any: &["inject", "hook"],
        all: &[],
        severity: Severity::High,
        message: "Code injection detected",
    },
    KeywordRule {
        any: &[],
        all: &["registry", "modify"],
        severity: Severity::High,
        message: "Registry modification detected",
    },
    KeywordRule {
        any: &["delete", "overwrite"],
        all: &[],
        severity: Severity::Medium,
        message: "File system manipulation detected",
    },
];

const INJECTION_APIS: &[&str] = &["createremotethread", "virtualalloc"];
const REGISTRY_APIS: &[&str] = &["regsetvalueex", "regcreatekeyex"];

/// Scan `report` and return alerts in rule order: behaviors, API calls,
/// network, dropped files, mutexes.
pub fn scan_report(report: &Value) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for behavior in array_texts(report, "behaviors") {
        for rule in BEHAVIOR_RULES {
            if rule.matches(&behavior) {
                alerts.push(Alert::new(rule.severity, rule.message));
            }
        }
    }

    for api in api_names(report) {
        if INJECTION_APIS.iter().any(|k| api.contains(k)) {
            alerts.push(Alert::new(
                Severity::High,
                format!("Process injection API detected: {api}"),
            ));
        }
        if REGISTRY_APIS.iter().any(|k| api.contains(k)) {
            alerts.push(Alert::new(Severity::Medium, "Registry operation detected"));
        }
    }

    if let Some(n) = non_empty_len(report, "network") {
        alerts.push(Alert::new(
            Severity::Medium,
            format!("Network activity detected: {n} connections"),
        ));
    }
    if let Some(n) = non_empty_len(report, "dropped") {
        alerts.push(Alert::new(
            Severity::High,
            format!("Dropped files detected: {n} file(s)"),
        ));
    }
    if non_empty_len(report, "mutexes").is_some() {
        alerts.push(Alert::new(
            Severity::Low,
            "Mutex created (potential ransomware indicator)",
        ));
    }

    debug!(alerts = alerts.len(), "behavior scan complete");
    alerts
}

/// Lower-cased scalar elements of `report[key]`; containers are skipped.
fn array_texts(report: &Value, key: &str) -> Vec<String> {
    report
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(scalar_text).collect())
        .unwrap_or_default()
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.to_lowercase()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// API call names; entries may be plain strings or objects with `api`/`name`.
fn api_names(report: &Value) -> Vec<String> {
    report
        .get("apicalls")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|call| match call {
                    Value::Object(_) => call
                        .get("api")
                        .or_else(|| call.get("name"))
                        .and_then(Value::as_str)
                        .map(str::to_lowercase),
                    other => scalar_text(other),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn non_empty_len(report: &Value, key: &str) -> Option<usize> {
    report
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::len)
        .filter(|n| *n > 0)
}
