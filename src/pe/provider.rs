//! The accessor surface a PE metadata provider exposes.
//!
//! Providers differ in what they can answer and how: one returns a typed
//! integer for the entry point, another only a formatted string such as
//! `"0x00401000"`, a third only a text dump of the whole optional header.
//! A provider fills, per field, an ordered list of candidate values (best
//! first) plus any descriptive text it has; [`crate::pe::PeNormalizer`]
//! turns that into a canonical [`crate::core::PeHeader`].

use crate::error::Result;
use std::fmt;

/// One candidate value for a field, as the provider reported it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Number(u64),
    Real(f64),
    Text(String),
}

impl RawValue {
    pub fn text(s: impl Into<String>) -> Self {
        RawValue::Text(s.into())
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{n}"),
            RawValue::Real(r) => write!(f, "{r}"),
            RawValue::Text(s) => f.write_str(s),
        }
    }
}

/// Raw header fields. Empty candidate lists mean "not provided".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawHeader {
    pub machine: Vec<RawValue>,
    pub timestamp: Vec<RawValue>,
    pub entry_point: Vec<RawValue>,
    pub image_base: Vec<RawValue>,
    pub subsystem: Vec<RawValue>,
    pub dll_characteristics: Vec<RawValue>,
    pub num_sections: Vec<RawValue>,
    pub characteristics: Vec<RawValue>,
    /// Descriptive dumps (e.g. "Address of entry point: 5360 (0x14f0)").
    pub info: Vec<String>,
    /// `None` when the provider could not read a section table at all.
    pub sections: Option<Vec<RawSection>>,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    /// Whether an Authenticode signature is present, if the provider knows.
    pub signed: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSection {
    pub name: Vec<RawValue>,
    pub rva: Vec<RawValue>,
    pub virtual_size: Vec<RawValue>,
    pub raw_size: Vec<RawValue>,
    pub entropy: Vec<RawValue>,
    pub characteristics: Vec<RawValue>,
    pub info: Vec<String>,
}

/// Anything that can describe a PE image.
///
/// An `Err` means the input could not be read as PE at all; the normalizer
/// then reports the sentinel header.
pub trait PeMetadataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn describe(&self, data: &[u8]) -> Result<RawHeader>;
}
