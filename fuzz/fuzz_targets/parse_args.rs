/*
 * fuzz_targets/parse_args.rs
 *
 * fuzz target for CLI argument parsing plus config building. parsing and
 * NotifyConfig::from_args must return Ok or Err on any argument list.
 *
 * edge cases: "--threshold" (missing value), "-t-5s", "--exit=abc",
 * "--notify-only" without "--duration", a bare "--", very long args
 */

#![no_main]

use clap::Parser;
use libfuzzer_sys::fuzz_target;
use reporter::{Args, NotifyConfig};

fuzz_target!(|data: &[u8]| {
    /* split input on null bytes to simulate multiple arguments */
    let args: Vec<String> = std::iter::once("reporter".to_string())
        .chain(
            data.split(|&b| b == 0)
                .filter_map(|chunk| core::str::from_utf8(chunk).ok())
                .filter(|s| !s.is_empty())
                .map(String::from),
        )
        .collect();

    if let Ok(parsed) = Args::try_parse_from(&args) {
        let _ = NotifyConfig::from_args(&parsed);
    }
});
