//! PE header normalization.
//!
//! A [`PeMetadataProvider`] reports whatever it can about an image as
//! candidate values; [`PeNormalizer`] resolves each field of the canonical
//! [`PeHeader`] with a fixed chain:
//!
//! 1. the first candidate that is a number, or text that is a clean integer
//!    literal;
//! 2. label-anchored matching over the remaining text candidates and the
//!    provider's descriptive dumps ([`fallback::LabelMatcher`]);
//! 3. the first `0x` token, then the first decimal run of two or more
//!    digits, anywhere in that text;
//! 4. the sentinel.
//!
//! Unresolved fields stay `None` until the header is assembled, so
//! sentinels only appear in the output. Normalization never fails: an
//! image the provider cannot read yields [`PeHeader::sentinel`].

pub mod characteristics;
pub mod fallback;
pub mod names;
pub mod object_provider;
pub mod provider;
pub mod report_provider;

pub use characteristics::truncate_characteristics;
pub use object_provider::ObjectPeProvider;
pub use provider::{PeMetadataProvider, RawHeader, RawSection, RawValue};
pub use report_provider::ReportPeProvider;

use crate::core::pe::{PeHeader, PeSection, UNKNOWN};
use crate::entropy::sanitize_entropy;
use crate::triage::config::PeConfig;
use fallback::{any_number, labels, parse_integer_literal, parse_real_literal, LabelMatcher};
use once_cell::sync::Lazy;
use tracing::{debug, warn};

static ENTRY_POINT: Lazy<LabelMatcher> = Lazy::new(|| LabelMatcher::new(labels::ENTRY_POINT));
static IMAGE_BASE: Lazy<LabelMatcher> = Lazy::new(|| LabelMatcher::new(labels::IMAGE_BASE));
static NUM_SECTIONS: Lazy<LabelMatcher> = Lazy::new(|| LabelMatcher::new(labels::NUM_SECTIONS));
static TIMESTAMP: Lazy<LabelMatcher> = Lazy::new(|| LabelMatcher::new(labels::TIMESTAMP));
static VIRTUAL_SIZE: Lazy<LabelMatcher> = Lazy::new(|| LabelMatcher::new(labels::VIRTUAL_SIZE));
static RAW_SIZE: Lazy<LabelMatcher> = Lazy::new(|| LabelMatcher::new(labels::RAW_SIZE));
static RVA: Lazy<LabelMatcher> = Lazy::new(|| LabelMatcher::new(labels::RVA));
static ENTROPY: Lazy<LabelMatcher> = Lazy::new(|| LabelMatcher::new(labels::ENTROPY));

/// Everything the pipeline needs from the PE stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PeMetadata {
    pub header: PeHeader,
    pub imports: Vec<String>,
    pub exports: Vec<String>,
    pub signed: Option<bool>,
    /// False when the provider could not read the input as PE.
    pub parsed: bool,
}

impl PeMetadata {
    pub fn unparsed() -> Self {
        Self {
            header: PeHeader::sentinel(),
            imports: Vec::new(),
            exports: Vec::new(),
            signed: None,
            parsed: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PeNormalizer {
    max_characteristics_len: usize,
}

impl Default for PeNormalizer {
    fn default() -> Self {
        Self::new(&PeConfig::default())
    }
}

impl PeNormalizer {
    pub fn new(config: &PeConfig) -> Self {
        Self {
            max_characteristics_len: config.max_characteristics_len,
        }
    }

    /// Describe `data` with `provider` and normalize the result.
    pub fn extract(&self, provider: &dyn PeMetadataProvider, data: &[u8]) -> PeMetadata {
        match provider.describe(data) {
            Ok(raw) => self.metadata(&raw),
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "PE provider failed; using sentinel header");
                PeMetadata::unparsed()
            }
        }
    }

    pub fn metadata(&self, raw: &RawHeader) -> PeMetadata {
        PeMetadata {
            header: self.normalize(raw),
            imports: raw.imports.clone(),
            exports: raw.exports.clone(),
            signed: raw.signed,
            parsed: true,
        }
    }

    pub fn normalize(&self, raw: &RawHeader) -> PeHeader {
        let info = &raw.info;
        let sections: Vec<PeSection> = raw
            .sections
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|s| self.normalize_section(s))
            .collect();

        let declared = resolve_number("num_sections", &raw.num_sections, info, &NUM_SECTIONS);
        let num_sections = match &raw.sections {
            Some(_) => {
                if let Some(d) = declared.filter(|&d| d != sections.len() as u64) {
                    debug!(declared = d, read = sections.len(), "section count differs from section table");
                }
                sections.len() as u32
            }
            None => declared.and_then(|d| u32::try_from(d).ok()).unwrap_or(0),
        };

        let characteristics = resolve_text(&raw.characteristics, |n| {
            u16::try_from(n).ok().map(names::file_characteristics)
        })
        .unwrap_or_default();

        PeHeader {
            machine_type: resolve_text(&raw.machine, |n| {
                u16::try_from(n).ok().and_then(names::machine_name).map(str::to_string)
            })
            .unwrap_or_else(|| UNKNOWN.to_string()),
            timestamp: resolve_number("timestamp", &raw.timestamp, info, &TIMESTAMP).unwrap_or(0),
            entry_point: resolve_number("entry_point", &raw.entry_point, info, &ENTRY_POINT)
                .unwrap_or(0),
            image_base: resolve_number("image_base", &raw.image_base, info, &IMAGE_BASE)
                .unwrap_or(0),
            subsystem: resolve_text(&raw.subsystem, |n| {
                u16::try_from(n).ok().and_then(names::subsystem_name).map(str::to_string)
            })
            .unwrap_or_else(|| UNKNOWN.to_string()),
            dll_characteristics: resolve_text(&raw.dll_characteristics, |n| {
                u16::try_from(n).ok().map(names::dll_characteristics)
            })
            .unwrap_or_default(),
            num_sections,
            characteristics: truncate_characteristics(&characteristics, self.max_characteristics_len),
            sections,
        }
    }

    pub fn normalize_section(&self, raw: &RawSection) -> PeSection {
        let info = &raw.info;
        let characteristics = resolve_text(&raw.characteristics, |n| {
            u32::try_from(n).ok().map(names::section_characteristics)
        })
        .unwrap_or_default();

        PeSection {
            name: resolve_text(&raw.name, |_| None).unwrap_or_else(|| UNKNOWN.to_string()),
            rva: resolve_number("rva", &raw.rva, info, &RVA).unwrap_or(0),
            virtual_size: resolve_number("virtual_size", &raw.virtual_size, info, &VIRTUAL_SIZE)
                .unwrap_or(0),
            raw_size: resolve_number("raw_size", &raw.raw_size, info, &RAW_SIZE).unwrap_or(0),
            entropy: sanitize_entropy(resolve_real(&raw.entropy, info, &ENTROPY).unwrap_or(0.0)),
            characteristics: truncate_characteristics(&characteristics, self.max_characteristics_len),
        }
    }
}

/// Integer field resolution (steps 1-3).
pub fn resolve_number(
    field: &'static str,
    candidates: &[RawValue],
    info: &[String],
    matcher: &LabelMatcher,
) -> Option<u64> {
    let mut corpus: Vec<&str> = Vec::new();
    for candidate in candidates {
        match candidate {
            RawValue::Number(n) => return Some(*n),
            RawValue::Real(r) if r.is_finite() && *r >= 0.0 && r.fract() == 0.0 => {
                return Some(*r as u64)
            }
            RawValue::Real(_) => {}
            RawValue::Text(t) => match parse_integer_literal(t) {
                Some(v) => return Some(v),
                None => corpus.push(t),
            },
        }
    }
    corpus.extend(info.iter().map(String::as_str));
    if corpus.is_empty() {
        return None;
    }

    let text = corpus.join("\n");
    if let Some(v) = matcher.find(&text) {
        debug!(field, value = v, "resolved from labeled text");
        return Some(v);
    }
    let scanned = any_number(&text);
    if let Some(v) = scanned {
        debug!(field, value = v, "resolved by scanning text");
    }
    scanned
}

/// Real field resolution: direct value, then label-anchored text.
pub fn resolve_real(candidates: &[RawValue], info: &[String], matcher: &LabelMatcher) -> Option<f64> {
    let mut corpus: Vec<&str> = Vec::new();
    for candidate in candidates {
        match candidate {
            RawValue::Real(r) => return Some(*r),
            RawValue::Number(n) => return Some(*n as f64),
            RawValue::Text(t) => match parse_real_literal(t) {
                Some(v) => return Some(v),
                None => corpus.push(t),
            },
        }
    }
    corpus.extend(info.iter().map(String::as_str));
    matcher.find_real(&corpus.join("\n"))
}

/// Text field resolution. Numbers go through `render`; blank text is absent.
pub fn resolve_text(candidates: &[RawValue], render: impl Fn(u64) -> Option<String>) -> Option<String> {
    candidates.iter().find_map(|candidate| match candidate {
        RawValue::Text(t) if !t.trim().is_empty() => Some(t.trim().to_string()),
        RawValue::Number(n) => render(*n),
        _ => None,
    })
}
