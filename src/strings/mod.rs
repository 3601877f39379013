//! Printable string extraction.
//!
//! A string is a run of printable ASCII or whitespace at least `min_len`
//! bytes long. Any other byte ends the run.

pub mod iocs;
pub mod patterns;

pub use iocs::extract_static_iocs;

#[inline]
fn is_string_byte(b: u8) -> bool {
    b.is_ascii_graphic() || matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Extract printable runs of at least `min_len` bytes, in file order.
pub fn extract_ascii_strings(data: &[u8], min_len: usize) -> Vec<String> {
    let min_len = min_len.max(1);
    data.split(|b| !is_string_byte(*b))
        .filter(|run| run.len() >= min_len)
        // every byte in a run is ASCII
        .map(|run| String::from_utf8_lossy(run).into_owned())
        .collect()
}
