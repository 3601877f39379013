//! Byte-level entropy for artifacts and sections.
//!
//! [`entropy_score`] is the bounded value reported for an artifact: Shannon
//! entropy over a 256-bucket histogram, clamped to `[0, 8]` and rounded to
//! three decimals. [`sanitize_entropy`] applies the same bounds to section
//! entropies reported by an external provider.

pub mod core;

pub use self::core::{round3, shannon_entropy};

/// Upper bound of byte entropy in bits.
pub const MAX_ENTROPY: f64 = 8.0;

/// Entropy of `data` in `[0.0, 8.0]`, rounded to 3 decimals.
///
/// Empty input yields 0.0. Never fails.
pub fn entropy_score(data: &[u8]) -> f64 {
    let raw = shannon_entropy(data);
    if !raw.is_finite() {
        return 0.0;
    }
    round3(raw.clamp(0.0, MAX_ENTROPY))
}

/// Normalizes a provider-reported section entropy.
///
/// Non-finite values become 0.0. Values above 8 are divided by 10 until they
/// fit; some providers report entropy scaled by a power of ten.
// TODO: drop the rescaling loop once the report provider exposes the scale it uses.
pub fn sanitize_entropy(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let mut v = value;
    while v > MAX_ENTROPY {
        v /= 10.0;
    }
    round3(v.clamp(0.0, MAX_ENTROPY))
}
