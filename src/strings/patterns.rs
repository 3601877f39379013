//! Precompiled indicator patterns for extracted strings.
//!
//! IPv4 matches are candidates only; validate with `std::net::Ipv4Addr`.

use once_cell::sync::Lazy;
use regex::Regex;

pub static RE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:https?|ftp|file)://\S+"#).expect("valid URL regex")
});

pub static RE_IPV4_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b(?:\d{1,3}\.){3}\d{1,3}\b"#).expect("valid ipv4 candidate regex"));

// Short hive names plus their long forms
pub static RE_REGISTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:HKEY_LOCAL_MACHINE|HKEY_CURRENT_USER|HKLM|HKCU)\\\S+"#)
        .expect("valid registry regex")
});

// Living-off-the-land tools commonly spawned by droppers
pub static RE_COMMAND_TOOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:cmd\.exe|powershell|wmic|schtasks|rundll32|regedit|netsh|curl|wget)\b"#)
        .expect("valid command tool regex")
});
