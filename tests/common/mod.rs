//! Common test utilities and helpers.

#![allow(dead_code)]

use std::io::Write;
use tempfile::NamedTempFile;

/// Creates a temporary file with the given content.
pub fn create_temp_file(content: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content).unwrap();
    temp_file
}

/// Deterministic pseudo-random bytes (LCG), high entropy for large `len`.
pub fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect()
}

/// Minimal PE32+ image builder.
pub mod pe {
    pub const ENTRY_POINT: u32 = 0x1010;
    pub const IMAGE_BASE: u64 = 0x1_4000_0000;
    pub const TIMESTAMP: u32 = 0x5f00_0000;

    const E_LFANEW: usize = 0x40;
    const OPTIONAL_HEADER_SIZE: usize = 240;
    const SECTION_TABLE: usize = E_LFANEW + 4 + 20 + OPTIONAL_HEADER_SIZE;
    const FILE_ALIGN: usize = 0x200;
    const SECTION_ALIGN: u32 = 0x1000;

    pub struct Section {
        pub name: &'static str,
        pub data: Vec<u8>,
        pub virtual_size: u32,
        pub characteristics: u32,
    }

    impl Section {
        pub fn code(name: &'static str, data: Vec<u8>) -> Self {
            let virtual_size = data.len() as u32;
            Self { name, data, virtual_size, characteristics: 0x6000_0020 }
        }

        pub fn data(name: &'static str, data: Vec<u8>, virtual_size: u32) -> Self {
            Self { name, data, virtual_size, characteristics: 0xc000_0040 }
        }
    }

    fn put16(buf: &mut [u8], at: usize, v: u16) {
        buf[at..at + 2].copy_from_slice(&v.to_le_bytes());
    }

    fn put32(buf: &mut [u8], at: usize, v: u32) {
        buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
    }

    fn put64(buf: &mut [u8], at: usize, v: u64) {
        buf[at..at + 8].copy_from_slice(&v.to_le_bytes());
    }

    fn align(v: usize, to: usize) -> usize {
        v.div_ceil(to) * to
    }

    /// AMD64 console image with the given sections. `signed` fills the
    /// security data directory.
    pub fn build(sections: &[Section], signed: bool) -> Vec<u8> {
        assert!(SECTION_TABLE + sections.len() * 40 <= FILE_ALIGN);

        let mut raw_offsets = Vec::new();
        let mut offset = FILE_ALIGN;
        for s in sections {
            raw_offsets.push(offset);
            offset += align(s.data.len().max(1), FILE_ALIGN);
        }
        let mut buf = vec![0u8; offset];

        buf[0] = b'M';
        buf[1] = b'Z';
        put32(&mut buf, 0x3c, E_LFANEW as u32);
        buf[E_LFANEW..E_LFANEW + 4].copy_from_slice(b"PE\0\0");

        let fh = E_LFANEW + 4;
        put16(&mut buf, fh, 0x8664);
        put16(&mut buf, fh + 2, sections.len() as u16);
        put32(&mut buf, fh + 4, TIMESTAMP);
        put16(&mut buf, fh + 16, OPTIONAL_HEADER_SIZE as u16);
        put16(&mut buf, fh + 18, 0x0022);

        let oh = fh + 20;
        let mut rva = SECTION_ALIGN;
        let mut rvas = Vec::new();
        for s in sections {
            rvas.push(rva);
            rva += (s.virtual_size.max(1)).div_ceil(SECTION_ALIGN) * SECTION_ALIGN;
        }
        put16(&mut buf, oh, 0x20b);
        put32(&mut buf, oh + 16, ENTRY_POINT);
        put64(&mut buf, oh + 24, IMAGE_BASE);
        put32(&mut buf, oh + 32, SECTION_ALIGN);
        put32(&mut buf, oh + 36, FILE_ALIGN as u32);
        put16(&mut buf, oh + 40, 6);
        put16(&mut buf, oh + 48, 6);
        put32(&mut buf, oh + 56, rva);
        put32(&mut buf, oh + 60, FILE_ALIGN as u32);
        put16(&mut buf, oh + 68, 3);
        put16(&mut buf, oh + 70, 0x8160);
        put64(&mut buf, oh + 72, 0x10_0000);
        put64(&mut buf, oh + 80, 0x1000);
        put64(&mut buf, oh + 88, 0x10_0000);
        put64(&mut buf, oh + 96, 0x1000);
        put32(&mut buf, oh + 108, 16);
        if signed {
            // IMAGE_DIRECTORY_ENTRY_SECURITY holds a file offset.
            put32(&mut buf, oh + 112 + 4 * 8, offset as u32);
            put32(&mut buf, oh + 112 + 4 * 8 + 4, 0x100);
        }

        for (i, s) in sections.iter().enumerate() {
            let at = SECTION_TABLE + i * 40;
            let name = s.name.as_bytes();
            buf[at..at + name.len().min(8)].copy_from_slice(&name[..name.len().min(8)]);
            put32(&mut buf, at + 8, s.virtual_size);
            put32(&mut buf, at + 12, rvas[i]);
            put32(&mut buf, at + 16, s.data.len() as u32);
            put32(&mut buf, at + 20, raw_offsets[i] as u32);
            put32(&mut buf, at + 36, s.characteristics);
            buf[raw_offsets[i]..raw_offsets[i] + s.data.len()].copy_from_slice(&s.data);
        }
        buf
    }

    /// A plain two-section image: low-entropy code and data.
    pub fn plain() -> Vec<u8> {
        let text: Vec<u8> = (0..0x400).map(|i| [0x48, 0x89, 0xe5, 0x90][i % 4]).collect();
        build(
            &[
                Section::code(".text", text),
                Section::data(".data", b"hello from a test image\0".repeat(16), 0x200),
            ],
            false,
        )
    }

    /// An image with one high-entropy section that inflates in memory.
    pub fn packed() -> Vec<u8> {
        build(
            &[
                Section::data("UPX0", vec![0u8; 0x200], 0x20000),
                Section::code("UPX1", super::noise(0x2000, 7)),
            ],
            false,
        )
    }
}
