use crate::common::{noise, pe};
use trustscan::core::BinaryArtifact;
use trustscan::pe::{ObjectPeProvider, PeMetadataProvider, PeNormalizer};
use trustscan::triage::packed::PackedHeuristic;
use trustscan::{Analyzer, ExternalFindings};

#[test]
fn object_provider_reads_synthetic_image() {
    let image = pe::plain();
    let meta = PeNormalizer::default().extract(&ObjectPeProvider::new(), &image);
    assert!(meta.parsed);

    let h = &meta.header;
    assert_eq!(h.machine_type, "AMD64");
    assert_eq!(h.subsystem, "WINDOWS_CUI");
    assert_eq!(h.entry_point, pe::ENTRY_POINT as u64);
    assert_eq!(h.image_base, pe::IMAGE_BASE);
    assert_eq!(h.timestamp, pe::TIMESTAMP as u64);
    assert_eq!(h.num_sections, 2);
    assert!(!h.characteristics.is_empty());
    assert!(h.characteristics.len() <= 250);

    let names: Vec<&str> = h.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec![".text", ".data"]);
    assert_eq!(h.sections[0].rva, 0x1000);
    assert_eq!(h.sections[1].rva, 0x2000);
    assert_eq!(h.sections[0].raw_size, 0x400);
    assert_eq!(h.sections[0].entropy, 2.0);
    assert!(!h.sections[0].characteristics.is_empty());

    assert_eq!(meta.signed, Some(false));
    assert!(meta.imports.is_empty());
}

#[test]
fn section_names_are_trimmed_of_padding() {
    let raw = ObjectPeProvider::new().describe(&pe::plain()).unwrap();
    let sections = raw.sections.unwrap();
    let meta = PeNormalizer::default().normalize_section(&sections[0]);
    assert_eq!(meta.name, ".text");
}

#[test]
fn security_directory_marks_image_signed() {
    let image = pe::build(&[pe::Section::code(".text", vec![0xc3; 64])], true);
    let raw = ObjectPeProvider::new().describe(&image).unwrap();
    assert_eq!(raw.signed, Some(true));
}

#[test]
fn packed_image_is_flagged() {
    let meta = PeNormalizer::default().extract(&ObjectPeProvider::new(), &pe::packed());
    let verdict = PackedHeuristic::default().evaluate(&meta.header);
    assert_eq!(verdict.sections, 2);
    assert_eq!(verdict.suspicion, 2, "{:?}", verdict.reasons);
    assert!(verdict.packed);
    assert!(meta.header.sections[1].entropy >= 7.0);
    assert!(meta.header.sections.iter().all(|s| (0.0..=8.0).contains(&s.entropy)));
}

#[test]
fn plain_image_is_not_packed() {
    let meta = PeNormalizer::default().extract(&ObjectPeProvider::new(), &pe::plain());
    assert!(!PackedHeuristic::default().is_packed(&meta.header));
}

#[test]
fn truncated_image_degrades_to_sentinel() {
    let mut image = pe::plain();
    image.truncate(0x60);
    let meta = PeNormalizer::default().extract(&ObjectPeProvider::new(), &image);
    assert!(!meta.parsed);
    assert!(meta.header.is_sentinel());
}

#[test]
fn analyzer_reports_header_and_static_indicators() {
    let mut data = b"http://203.0.113.9/gate.php\0".to_vec();
    data.extend_from_slice(b"cmd.exe /c whoami\0");
    data.extend_from_slice(br"HKCU\Software\Microsoft\Windows\CurrentVersion\Run");
    data.push(0);
    let image = pe::build(
        &[
            pe::Section::code(".text", vec![0x90; 0x200]),
            pe::Section::data(".rdata", data, 0x200),
        ],
        false,
    );

    let summary = Analyzer::default()
        .analyze_artifact(&BinaryArtifact::new("dropper.exe", image), &ExternalFindings::default());

    assert_eq!(summary.machine_type, "AMD64");
    assert_eq!(summary.entry_point, pe::ENTRY_POINT as u64);
    assert_eq!(summary.sections.len(), 2);
    assert!(!summary.packed);
    assert_eq!(
        summary.iocs.static_indicators,
        vec![
            "http://203.0.113.9/gate.php".to_string(),
            "cmd.exe /c whoami".to_string(),
            r"HKCU\Software\Microsoft\Windows\CurrentVersion\Run".to_string(),
        ]
    );
}

#[test]
fn high_entropy_blob_is_not_pe() {
    let summary = Analyzer::default()
        .analyze_artifact(&BinaryArtifact::new("blob.bin", noise(64 * 1024, 3)), &ExternalFindings::default());
    assert!(summary.entropy > 7.9);
    assert!(summary.entropy <= 8.0);
    assert_eq!(summary.machine_type, "UNKNOWN");
    assert!(!summary.packed);
}
