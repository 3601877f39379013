//! Canonical PE header and section model.
//!
//! Providers disagree about how they expose header fields; the normalizer
//! in [`crate::pe`] resolves them into these types. Fields that could not be
//! resolved carry sentinels: `0` for numbers, [`UNKNOWN`] for tags and names,
//! the empty string for flag text.

use serde::{Deserialize, Serialize};

/// Sentinel for unresolved machine type, subsystem and section names.
pub const UNKNOWN: &str = "UNKNOWN";

/// One section table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeSection {
    pub name: String,
    pub rva: u64,
    pub virtual_size: u64,
    pub raw_size: u64,
    /// Always within `[0.0, 8.0]` with at most three decimals.
    pub entropy: f64,
    /// Bounded flag text; truncated only at token boundaries.
    pub characteristics: String,
}

impl PeSection {
    /// `virtual_size / raw_size`, or `None` when the section has no raw data.
    pub fn size_ratio(&self) -> Option<f64> {
        if self.raw_size == 0 {
            None
        } else {
            Some(self.virtual_size as f64 / self.raw_size as f64)
        }
    }
}

impl Default for PeSection {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            rva: 0,
            virtual_size: 0,
            raw_size: 0,
            entropy: 0.0,
            characteristics: String::new(),
        }
    }
}

/// Header summary of a PE image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeHeader {
    pub machine_type: String,
    /// COFF time/date stamp (seconds since the epoch), 0 when unknown.
    pub timestamp: u64,
    pub entry_point: u64,
    pub image_base: u64,
    pub subsystem: String,
    pub dll_characteristics: String,
    /// Equals `sections.len()` whenever a section table was read.
    pub num_sections: u32,
    pub characteristics: String,
    pub sections: Vec<PeSection>,
}

impl PeHeader {
    /// The header reported for artifacts that could not be read as PE.
    pub fn sentinel() -> Self {
        Self {
            machine_type: UNKNOWN.to_string(),
            timestamp: 0,
            entry_point: 0,
            image_base: 0,
            subsystem: UNKNOWN.to_string(),
            dll_characteristics: String::new(),
            num_sections: 0,
            characteristics: String::new(),
            sections: Vec::new(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel()
    }
}

impl Default for PeHeader {
    fn default() -> Self {
        Self::sentinel()
    }
}
