//! Packed-file heuristic.
//!
//! Each section contributes up to two suspicion points: one for entropy at
//! or above the threshold, one for a virtual size much larger than its raw
//! size (a stub that unpacks into memory). The image is packed when the
//! points reach half the section count, rounded up. Sparse but legitimate
//! sections (large `.bss`-like data) can trip the ratio check; that is
//! accepted for a coarse signal.

use crate::core::pe::{PeHeader, PeSection};
use crate::triage::config::PackedConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedVerdict {
    pub packed: bool,
    pub suspicion: usize,
    /// Points needed: `ceil(sections / 2)`.
    pub required: usize,
    pub sections: usize,
    /// One line per point awarded.
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PackedHeuristic {
    entropy_threshold: f64,
    size_ratio_threshold: f64,
}

impl Default for PackedHeuristic {
    fn default() -> Self {
        Self::new(&PackedConfig::default())
    }
}

impl PackedHeuristic {
    pub fn new(config: &PackedConfig) -> Self {
        Self {
            entropy_threshold: config.entropy_threshold,
            size_ratio_threshold: config.size_ratio_threshold,
        }
    }

    pub fn evaluate(&self, header: &PeHeader) -> PackedVerdict {
        self.evaluate_sections(&header.sections)
    }

    pub fn evaluate_sections(&self, sections: &[PeSection]) -> PackedVerdict {
        let mut reasons = Vec::new();
        for s in sections {
            if s.entropy >= self.entropy_threshold {
                reasons.push(format!(
                    "{}: entropy {:.3} >= {}",
                    s.name, s.entropy, self.entropy_threshold
                ));
            }
            if let Some(ratio) = s.size_ratio().filter(|r| *r > self.size_ratio_threshold) {
                reasons.push(format!(
                    "{}: virtual/raw size ratio {:.2} > {}",
                    s.name, ratio, self.size_ratio_threshold
                ));
            }
        }

        let n = sections.len();
        let required = n.div_ceil(2);
        let suspicion = reasons.len();
        let packed = n > 0 && suspicion >= required;
        debug!(sections = n, suspicion, required, packed, "packed heuristic");

        PackedVerdict {
            packed,
            suspicion,
            required,
            sections: n,
            reasons,
        }
    }

    pub fn is_packed(&self, header: &PeHeader) -> bool {
        self.evaluate(header).packed
    }
}
