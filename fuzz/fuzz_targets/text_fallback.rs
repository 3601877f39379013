#![no_main]
use libfuzzer_sys::fuzz_target;
use trustscan::pe::fallback::{any_number, labels, LabelMatcher};

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = any_number(text);
        let _ = LabelMatcher::new(labels::ENTRY_POINT).find(text);
        let _ = LabelMatcher::new(labels::ENTROPY).find_real(text);
    }
});
