/*
 * fuzz_targets/escape_applescript.rs
 *
 * fuzz target for the AppleScript escaper. command lines end up inside a
 * double-quoted literal, so the output must never contain a bare quote,
 * a raw line break, or a trailing lone backslash.
 */

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = core::str::from_utf8(data) else {
        return;
    };
    let out = reporter::escape::escape_applescript(s);

    assert!(!out.contains('\n') && !out.contains('\r') && !out.contains('\t'));

    let mut escaped = false;
    for c in out.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else {
            assert_ne!(c, '"', "bare quote in {out:?}");
        }
    }
    assert!(!escaped, "dangling backslash in {out:?}");
});
