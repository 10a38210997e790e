#![no_main]

use kaucher::{parse_constraints, ResourceLimits};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_constraints(s, &ResourceLimits::default());
    }
});
