#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(report) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = trustscan::triage::behavior::scan_report(&report);
        let _ = trustscan::triage::report::ReportMetrics::from_report(&report);
    }
});
