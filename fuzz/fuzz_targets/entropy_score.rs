#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let e = trustscan::entropy::entropy_score(data);
    assert!((0.0..=8.0).contains(&e));
});
