//! Parsers for the textual output of external scanners.
//!
//! The scanners themselves run elsewhere; only their stdout is consumed.

/// Rule names from `yara` output: the first whitespace-separated token of
/// each non-empty line (`RuleName path/to/file`).
pub fn parse_yara_output(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// The fuzzy hash from `ssdeep` output.
///
/// Skips the `ssdeep,1.1--blocksize:hash:hash,filename` header and returns
/// the part before the first comma of the first data line.
pub fn parse_ssdeep_output(output: &str) -> Option<String> {
    output
        .lines()
        .filter(|line| !line.starts_with("ssdeep"))
        .find(|line| line.contains(','))
        .and_then(|line| line.split(',').next())
        .map(str::trim)
        .filter(|hash| !hash.is_empty())
        .map(str::to_string)
}
