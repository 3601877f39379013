#![no_main]
use libfuzzer_sys::fuzz_target;
use trustscan::pe::{ObjectPeProvider, PeNormalizer};

fuzz_target!(|data: &[u8]| {
    let meta = PeNormalizer::default().extract(&ObjectPeProvider::new(), data);
    for s in &meta.header.sections {
        assert!((0.0..=8.0).contains(&s.entropy));
    }
});
