/*
 * fuzz_targets/parse_duration.rs
 *
 * fuzz target for duration parsing. shell hooks pass --duration straight
 * through, so parse_duration must return Ok or Err on anything, never panic.
 *
 * edge cases: "", "9999999999999h", "-1", "1.2.3s", ".s", "µs", huge numbers
 */

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = core::str::from_utf8(data) {
        if let Ok(d) = reporter::duration::parse_duration(s) {
            /* anything we accept we must also be able to print */
            let _ = reporter::duration::format_duration(d);
        }
    }
});
