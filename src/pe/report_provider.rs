//! PE provider over the `static.pe` block of a sandbox report.
//!
//! Sandbox reports render most header values as strings (`"0x00401000"`,
//! `"6.52"`), sometimes as numbers, and occasionally as prose. Values are
//! passed through as candidates and left for the normalizer to resolve.

use super::provider::{PeMetadataProvider, RawHeader, RawSection, RawValue};
use crate::error::{Result, TrustScanError};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportPeProvider;

impl ReportPeProvider {
    pub fn new() -> Self {
        Self
    }

    /// Describe the PE block of an already parsed report.
    pub fn describe_report(&self, report: &Value) -> Result<RawHeader> {
        let pe = report
            .pointer("/static/pe")
            .filter(|v| v.is_object())
            .ok_or_else(|| TrustScanError::InvalidFormat("report has no static.pe block".into()))?;

        let sections = pe
            .get("sections")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter(|s| s.is_object()).map(section).collect());

        Ok(RawHeader {
            machine: candidates(pe, &["machine", "machine_type"]),
            timestamp: numbers_only(candidates(pe, &["timestamp", "time_date_stamp"])),
            entry_point: candidates(pe, &["entrypoint", "entry_point", "address_of_entry_point"]),
            image_base: candidates(pe, &["imagebase", "image_base"]),
            subsystem: candidates(pe, &["subsystem"]),
            dll_characteristics: candidates(pe, &["dll_characteristics"]),
            num_sections: candidates(pe, &["number_of_sections", "num_sections"]),
            characteristics: candidates(pe, &["characteristics"]),
            info: info_text(pe),
            sections,
            imports: imports(pe),
            exports: exports(pe),
            signed: pe
                .get("digital_signers")
                .and_then(Value::as_array)
                .map(|signers| !signers.is_empty()),
        })
    }
}

impl PeMetadataProvider for ReportPeProvider {
    fn name(&self) -> &'static str {
        "report"
    }

    /// `data` is the raw JSON report.
    fn describe(&self, data: &[u8]) -> Result<RawHeader> {
        let report: Value = serde_json::from_slice(data)?;
        self.describe_report(&report)
    }
}

fn section(s: &Value) -> RawSection {
    RawSection {
        name: candidates(s, &["name"]),
        rva: candidates(s, &["virtual_address", "rva"]),
        virtual_size: candidates(s, &["virtual_size"]),
        raw_size: candidates(s, &["size_of_data", "raw_size", "size_of_raw_data"]),
        entropy: candidates(s, &["entropy"]),
        characteristics: candidates(s, &["characteristics"]),
        info: info_text(s),
    }
}

/// Scalar values under the given keys, in key order.
fn candidates(obj: &Value, keys: &[&str]) -> Vec<RawValue> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(scalar)
        .collect()
}

fn scalar(v: &Value) -> Option<RawValue> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .map(RawValue::Number)
            .or_else(|| n.as_f64().map(RawValue::Real)),
        Value::String(s) => Some(RawValue::Text(s.clone())),
        _ => None,
    }
}

// Report timestamps are usually formatted dates; digits inside them are
// not a time stamp.
fn numbers_only(values: Vec<RawValue>) -> Vec<RawValue> {
    values
        .into_iter()
        .filter(|v| matches!(v, RawValue::Number(_)))
        .collect()
}

fn info_text(obj: &Value) -> Vec<String> {
    match obj.get("info") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn imports(pe: &Value) -> Vec<String> {
    let Some(entries) = pe.get("imports").and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for entry in entries {
        match entry {
            Value::String(s) => out.push(s.clone()),
            Value::Object(_) => {
                let dll = entry.get("dll").and_then(Value::as_str).unwrap_or("");
                let Some(funcs) = entry.get("imports").and_then(Value::as_array) else {
                    if !dll.is_empty() {
                        out.push(dll.to_string());
                    }
                    continue;
                };
                for f in funcs {
                    let name = f
                        .get("name")
                        .and_then(Value::as_str)
                        .or_else(|| f.as_str())
                        .unwrap_or("");
                    if !name.is_empty() {
                        out.push(format!("{dll}::{name}"));
                    }
                }
            }
            _ => {}
        }
    }
    out
}

fn exports(pe: &Value) -> Vec<String> {
    pe.get("exports")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|e| e.get("name").and_then(Value::as_str).or_else(|| e.as_str()))
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
