//! Label-anchored number extraction from provider text.
//!
//! Providers that cannot hand over a typed value usually still print one:
//!
//! ```text
//! Address of entry point: 5360 (0x14f0)
//! Image base: 4194304 (0x400000)
//! ```
//!
//! [`LabelMatcher::find`] looks for a field label and reads the number that
//! follows it, preferring the parenthesized hex form when both are present.
//! [`any_number`] is the last resort when no label matches: the first
//! `0x` token, else the first decimal run of at least two digits.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_ANY_HEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"0[xX]([0-9a-fA-F]+)").expect("valid hex regex"));

static RE_ANY_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{2,})\b").expect("valid decimal regex"));

static RE_REAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)").expect("valid real regex"));

/// Parses a bare integer literal: decimal, or hex with a `0x` prefix.
///
/// Surrounding whitespace is ignored; anything else makes it fail.
pub fn parse_integer_literal(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok();
    }
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parses a leading real number (`"7.21"`, `"7.21 bits"`, `"6"`).
pub fn parse_real_literal(s: &str) -> Option<f64> {
    RE_REAL
        .captures(s)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First `0xHEX` token anywhere, else first decimal run of two or more digits.
pub fn any_number(text: &str) -> Option<u64> {
    if let Some(v) = RE_ANY_HEX
        .captures_iter(text)
        .find_map(|c| u64::from_str_radix(&c[1], 16).ok())
    {
        return Some(v);
    }
    RE_ANY_DECIMAL
        .captures_iter(text)
        .find_map(|c| c[1].parse::<u64>().ok())
}

struct LabelPatterns {
    paren_hex: Regex,
    adjacent_hex: Regex,
    adjacent_decimal: Regex,
    adjacent_real: Regex,
}

/// Precompiled patterns for one field's labels, tried in order.
pub struct LabelMatcher {
    labels: Vec<LabelPatterns>,
}

impl LabelMatcher {
    pub fn new(labels: &[&str]) -> Self {
        let labels = labels
            .iter()
            .map(|label| {
                let l = regex::escape(label);
                let build = |pattern: String| {
                    Regex::new(&pattern).expect("escaped label forms a valid regex")
                };
                LabelPatterns {
                    paren_hex: build(format!(r"(?i){l}[^\r\n]*?\(\s*0x([0-9a-f]+)\s*\)")),
                    adjacent_hex: build(format!(r"(?i){l}\s*[:=]?\s*0x([0-9a-f]+)")),
                    adjacent_decimal: build(format!(r"(?i){l}\s*[:=]?\s*(\d+)")),
                    adjacent_real: build(format!(r"(?i){l}\s*[:=]?\s*(\d+(?:\.\d+)?)")),
                }
            })
            .collect();
        Self { labels }
    }

    /// Integer following the first label that yields one.
    ///
    /// Per label: `(0xHEX)` later on the same line wins, then a `0x` value
    /// right after the label, then a decimal run right after the label.
    pub fn find(&self, text: &str) -> Option<u64> {
        self.labels.iter().find_map(|p| {
            capture_hex(&p.paren_hex, text)
                .or_else(|| capture_hex(&p.adjacent_hex, text))
                .or_else(|| {
                    p.adjacent_decimal
                        .captures_iter(text)
                        .find_map(|c| c[1].parse::<u64>().ok())
                })
        })
    }

    /// Real number right after the first label that yields one.
    pub fn find_real(&self, text: &str) -> Option<f64> {
        self.labels.iter().find_map(|p| {
            p.adjacent_real
                .captures_iter(text)
                .find_map(|c| c[1].parse::<f64>().ok())
        })
    }
}

fn capture_hex(re: &Regex, text: &str) -> Option<u64> {
    re.captures_iter(text)
        .find_map(|c| u64::from_str_radix(&c[1], 16).ok())
}

/// Labels used for each numeric field, most specific first.
pub mod labels {
    pub const ENTRY_POINT: &[&str] = &["address of entry point", "addr_of_entry_point", "entry point"];
    pub const IMAGE_BASE: &[&str] = &["image base", "imagebase"];
    pub const NUM_SECTIONS: &[&str] = &["number of sections", "numberofsections"];
    pub const TIMESTAMP: &[&str] = &["time date stamp", "timedatestamp", "timestamp"];
    pub const VIRTUAL_SIZE: &[&str] = &["virtual size", "virtual_size"];
    pub const RAW_SIZE: &[&str] = &["size of raw data", "size_of_raw_data"];
    pub const RVA: &[&str] = &["virtual address", "virtual_address"];
    pub const ENTROPY: &[&str] = &["entropy"];
}
