//! PE provider backed by the `object` crate.

use super::names;
use super::provider::{PeMetadataProvider, RawHeader, RawSection, RawValue};
use crate::entropy::shannon_entropy;
use crate::error::{Result, TrustScanError};
use object::read::pe::{ImageNtHeaders, ImageOptionalHeader, PeFile};
use object::{FileKind, LittleEndian as LE, Object};
use tracing::debug;

/// Reads PE32 and PE32+ images with `object`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectPeProvider;

impl ObjectPeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl PeMetadataProvider for ObjectPeProvider {
    fn name(&self) -> &'static str {
        "object"
    }

    fn describe(&self, data: &[u8]) -> Result<RawHeader> {
        let kind = FileKind::parse(data)
            .map_err(|e| TrustScanError::InvalidFormat(e.to_string()))?;
        match kind {
            FileKind::Pe32 => describe_image::<object::pe::ImageNtHeaders32>(data),
            FileKind::Pe64 => describe_image::<object::pe::ImageNtHeaders64>(data),
            other => Err(TrustScanError::InvalidFormat(format!(
                "not a PE image ({other:?})"
            ))),
        }
    }
}

fn describe_image<Pe: ImageNtHeaders>(data: &[u8]) -> Result<RawHeader> {
    let pe = PeFile::<Pe>::parse(data).map_err(|e| TrustScanError::InvalidFormat(e.to_string()))?;
    let file_header = pe.nt_headers().file_header();
    let optional = pe.nt_headers().optional_header();

    let machine = file_header.machine.get(LE);
    let subsystem = optional.subsystem();
    let dll_chars = optional.dll_characteristics();

    let mut raw = RawHeader {
        machine: vec![tag(names::machine_name(machine), machine)],
        timestamp: vec![RawValue::Number(file_header.time_date_stamp.get(LE) as u64)],
        entry_point: vec![RawValue::Number(optional.address_of_entry_point() as u64)],
        image_base: vec![RawValue::Number(optional.image_base())],
        subsystem: vec![tag(names::subsystem_name(subsystem), subsystem)],
        dll_characteristics: vec![RawValue::Text(names::dll_characteristics(dll_chars))],
        num_sections: vec![RawValue::Number(file_header.number_of_sections.get(LE) as u64)],
        characteristics: vec![RawValue::Text(names::file_characteristics(
            file_header.characteristics.get(LE),
        ))],
        ..RawHeader::default()
    };

    let sections = pe
        .section_table()
        .iter()
        .map(|section| {
            let name = String::from_utf8_lossy(section.raw_name()).into_owned();
            // Sections whose raw data lies outside the file report no entropy.
            let entropy = section
                .pe_data(data)
                .ok()
                .filter(|bytes| !bytes.is_empty())
                .map(|bytes| vec![RawValue::Real(shannon_entropy(bytes))])
                .unwrap_or_default();
            RawSection {
                name: vec![RawValue::Text(name)],
                rva: vec![RawValue::Number(section.virtual_address.get(LE) as u64)],
                virtual_size: vec![RawValue::Number(section.virtual_size.get(LE) as u64)],
                raw_size: vec![RawValue::Number(section.size_of_raw_data.get(LE) as u64)],
                entropy,
                characteristics: vec![RawValue::Text(names::section_characteristics(
                    section.characteristics.get(LE),
                ))],
                info: Vec::new(),
            }
        })
        .collect();
    raw.sections = Some(sections);

    if let Ok(imports) = pe.imports() {
        raw.imports = imports
            .iter()
            .map(|imp| {
                format!(
                    "{}::{}",
                    String::from_utf8_lossy(imp.library()),
                    String::from_utf8_lossy(imp.name())
                )
            })
            .collect();
    }
    if let Ok(exports) = pe.exports() {
        raw.exports = exports
            .iter()
            .map(|exp| String::from_utf8_lossy(exp.name()).into_owned())
            .filter(|name| !name.is_empty())
            .collect();
    }

    let security = pe
        .data_directories()
        .get(object::pe::IMAGE_DIRECTORY_ENTRY_SECURITY);
    raw.signed = Some(security.is_some_and(|dir| {
        dir.virtual_address.get(LE) != 0 && dir.size.get(LE) != 0
    }));

    debug!(
        machine,
        sections = raw.sections.as_ref().map_or(0, Vec::len),
        imports = raw.imports.len(),
        exports = raw.exports.len(),
        "object provider described PE image"
    );
    Ok(raw)
}

/// Known constants become their name; unknown ones stay numeric.
fn tag(name: Option<&'static str>, value: u16) -> RawValue {
    match name {
        Some(n) => RawValue::text(n),
        None => RawValue::Number(value as u64),
    }
}
