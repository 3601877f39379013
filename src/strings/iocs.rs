//! Static indicators of compromise from extracted strings.

use super::patterns::{RE_COMMAND_TOOL, RE_IPV4_CANDIDATE, RE_REGISTRY, RE_URL};
use std::net::Ipv4Addr;

/// True when `s` contains a URL, a valid IPv4 address, a registry key or a
/// command-line tool name.
pub fn is_indicator(s: &str) -> bool {
    RE_URL.is_match(s)
        || RE_IPV4_CANDIDATE
            .find_iter(s)
            .any(|m| m.as_str().parse::<Ipv4Addr>().is_ok())
        || RE_REGISTRY.is_match(s)
        || RE_COMMAND_TOOL.is_match(s)
}

/// Trimmed strings that look like indicators, in input order, at most `limit`.
pub fn extract_static_iocs<S: AsRef<str>>(strings: &[S], limit: usize) -> Vec<String> {
    strings
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty() && is_indicator(s))
        .take(limit)
        .map(str::to_string)
        .collect()
}
