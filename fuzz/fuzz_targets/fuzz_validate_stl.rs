#![no_main]

use libfuzzer_sys::fuzz_target;
use stl_validator::{ValidatorConfig, validate_bytes};

fuzz_target!(|data: &[u8]| {
    // Full pipeline: sniff -> parse -> validate -> report
    for tolerant in [false, true] {
        let config = ValidatorConfig::new().with_tolerant(tolerant);
        let result = validate_bytes(data, &config);
        let _ = result.render_text("fuzz.stl", true);
        let _ = result.event_outcome("fuzz.stl", true);
    }
});
