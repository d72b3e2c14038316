/*
 * proptest.rs
 *
 * property-based tests for the pure pieces: parsing, formatting, escaping,
 * and the notify decision. generates thousands of inputs to find edge cases.
 */

use proptest::prelude::*;
use std::time::Duration;

use reporter::duration::{format_duration, parse_duration};
use reporter::escape::escape_applescript;
use reporter::report::should_notify;

/* ============================================================================
 * Duration Parsing Properties
 * ============================================================================ */

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn duration_valid_seconds_parse(secs in 0u64..1_000_000) {
        let d = parse_duration(&format!("{secs}s")).expect("valid seconds should parse");
        prop_assert_eq!(d, Duration::from_secs(secs));
    }

    #[test]
    fn duration_bare_number_is_seconds(secs in 0u64..1_000_000) {
        let d = parse_duration(&secs.to_string()).expect("bare number should parse");
        prop_assert_eq!(d, Duration::from_secs(secs));
    }

    #[test]
    fn duration_valid_milliseconds_parse(ms in 0u64..1_000_000) {
        let d = parse_duration(&format!("{ms}ms")).expect("valid milliseconds should parse");
        prop_assert_eq!(d, Duration::from_millis(ms));
    }

    #[test]
    fn duration_composite_adds_up(h in 0u64..100, m in 0u64..60, s in 0u64..60) {
        let d = parse_duration(&format!("{h}h{m}m{s}s")).expect("composite should parse");
        prop_assert_eq!(d, Duration::from_secs(h * 3600 + m * 60 + s));
    }

    #[test]
    fn duration_negative_rejected(secs in 1u64..1_000_000) {
        let input = format!("-{secs}s");
        prop_assert!(parse_duration(&input).is_err());
    }

    /* never panics, whatever the shell hook hands us */
    #[test]
    fn duration_parse_never_panics(s in "\\PC{0,24}") {
        let _ = parse_duration(&s);
    }
}

/* ============================================================================
 * Duration Formatting Properties
 * ============================================================================ */

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /* whole seconds format to something parse_duration reads back exactly */
    #[test]
    fn format_whole_seconds_reparses(secs in 1u64..400_000) {
        let text = format_duration(Duration::from_secs(secs));
        let back = parse_duration(&text).expect("formatted duration should parse");
        prop_assert_eq!(back, Duration::from_secs(secs));
    }

    #[test]
    fn format_subsecond_is_ms_or_boundary(nanos in 0u64..1_000_000_000) {
        let text = format_duration(Duration::from_nanos(nanos));
        prop_assert!(
            text == "0s" || text == "1s" || text.ends_with("ms"),
            "unexpected rendering {text}"
        );
    }

    #[test]
    fn format_minutes_and_seconds_zero_padded(secs in 60u64..3600) {
        let text = format_duration(Duration::from_secs(secs));
        let (_, rest) = text.split_once('m').expect("minutes present");
        prop_assert_eq!(rest.len(), 3, "seconds not padded in {}", text);
    }

    #[test]
    fn format_hours_shape(secs in 3600u64..1_000_000) {
        let text = format_duration(Duration::from_secs(secs));
        let (_, rest) = text.split_once('h').expect("hours present");
        prop_assert_eq!(rest.len(), 6, "minutes/seconds not padded in {}", text);
    }
}

/* ============================================================================
 * Escaping Properties
 * ============================================================================ */

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn escape_removes_line_breaks_and_tabs(s in "\\PC*|[\\n\\r\\t\"\\\\a-z]{0,40}") {
        let out = escape_applescript(&s);
        prop_assert!(!out.contains('\n'));
        prop_assert!(!out.contains('\r'));
        prop_assert!(!out.contains('\t'));
    }

    /* every quote in the output is escaped, so the literal can't end early */
    #[test]
    fn escape_quotes_always_escaped(s in "[\"\\\\a-z ]{0,40}") {
        let out = escape_applescript(&s);
        let mut escaped = false;
        for c in out.chars() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '"' => prop_assert!(false, "bare quote in {}", out),
                _ => {}
            }
        }
        prop_assert!(!escaped, "dangling backslash in {}", out);
    }

    #[test]
    fn escape_identity_without_specials(s in "[a-zA-Z0-9 ./:_-]{0,60}") {
        prop_assert_eq!(escape_applescript(&s), s);
    }
}

/* ============================================================================
 * Decision Policy Properties
 * ============================================================================ */

proptest! {
    #[test]
    fn decision_below_threshold_never_notifies(elapsed in 0u64..10_000, extra in 1u64..10_000) {
        let threshold = Duration::from_millis(elapsed + extra);
        prop_assert!(!should_notify(Duration::from_millis(elapsed), threshold, false));
    }

    #[test]
    fn decision_at_or_above_threshold_notifies(threshold in 0u64..10_000, extra in 0u64..10_000) {
        prop_assert!(should_notify(
            Duration::from_millis(threshold + extra),
            Duration::from_millis(threshold),
            false
        ));
    }

    #[test]
    fn decision_force_always_notifies(elapsed in 0u64..10_000, threshold in 0u64..10_000) {
        prop_assert!(should_notify(
            Duration::from_millis(elapsed),
            Duration::from_millis(threshold),
            true
        ));
    }
}
