//! Bounded characteristics text.

/// Truncates comma-separated flag text to at most `limit` bytes.
///
/// Text that already fits is returned unchanged. Otherwise the longest
/// prefix of whole tokens, rejoined with `", "`, is kept and `" ..."` is
/// appended; a token is never cut. If not even the first token fits, the
/// result is just `"..."`, or empty when `limit < 4`.
pub fn truncate_characteristics(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }
    if limit < 4 {
        return String::new();
    }

    const MARKER: &str = " ...";
    let budget = limit - MARKER.len();
    let mut out = String::new();
    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let needed = if out.is_empty() {
            token.len()
        } else {
            out.len() + 2 + token.len()
        };
        if needed > budget {
            break;
        }
        if !out.is_empty() {
            out.push_str(", ");
        }
        out.push_str(token);
    }

    if out.is_empty() {
        "...".to_string()
    } else {
        out.push_str(MARKER);
        out
    }
}
