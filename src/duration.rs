/*
 * duration.rs
 *
 * Parse "10s", "1m30s", "1.5h", "250ms", "1h05m03s". A lone number is seconds.
 * Format elapsed time back into something you'd say out loud: "45s", "2m30s",
 * "1h05m03s", and "500ms" for the quick ones.
 *
 * The sub-second and second-and-above formatters stay separate. They round
 * at different granularity, and 999.5ms lands on "1s" only because the
 * millisecond path rounds it up to a whole second.
 */

use std::time::Duration;

use crate::error::{ReporterError, Result};

/* cap at u64::MAX seconds - nobody waits 584 billion years for a build */
#[allow(clippy::cast_precision_loss)]
const MAX_NANOS: f64 = u64::MAX as f64 * 1e9;

const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parse a duration: one or more `<number><unit>` pairs, or a bare number of seconds.
///
/// Units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`, `d`. Numbers may be fractional.
///
/// # Examples
///
/// ```
/// use reporter::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
/// assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
/// assert_eq!(parse_duration("30").unwrap(), Duration::from_secs(30));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();

    if input.starts_with('-') {
        return Err(ReporterError::NegativeDuration);
    }
    let input = input.strip_prefix('+').unwrap_or(input);

    if input.is_empty() {
        return Err(ReporterError::InvalidDuration("empty duration".to_string()));
    }

    /* bare number, no unit anywhere: seconds */
    if input.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return nanos_to_duration(parse_number(input)? * 1e9);
    }

    let mut total_nanos = 0.0;
    let mut rest = input;
    while !rest.is_empty() {
        let (num_str, after) = split_number(rest);
        if num_str.is_empty() {
            return Err(ReporterError::InvalidDuration(format!(
                "no numeric value in '{input}'"
            )));
        }
        let value = parse_number(num_str)?;

        let (unit, after) = split_unit(after);
        if unit.is_empty() {
            return Err(ReporterError::InvalidDuration(format!(
                "missing unit in '{input}'"
            )));
        }
        let multiplier = unit_nanos(unit).ok_or_else(|| {
            ReporterError::InvalidDuration(format!("invalid unit '{unit}'"))
        })?;

        total_nanos += value * multiplier;
        rest = after;
    }

    nanos_to_duration(total_nanos)
}

fn parse_number(num_str: &str) -> Result<f64> {
    num_str
        .parse()
        .map_err(|_| ReporterError::InvalidDuration(format!("invalid number '{num_str}'")))
}

/* nanoseconds per unit, case insensitive */
fn unit_nanos(unit: &str) -> Option<f64> {
    match unit.to_lowercase().as_str() {
        "ns" => Some(1.0),
        "us" | "µs" | "μs" => Some(1e3),
        "ms" => Some(1e6),
        "s" => Some(1e9),
        "m" => Some(60e9),
        "h" => Some(3600e9),
        "d" => Some(86400e9),
        _ => None,
    }
}

/* whole inputs stay exact: integer nanos are representable well past 100 days */
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn nanos_to_duration(total_nanos: f64) -> Result<Duration> {
    if total_nanos.is_nan() {
        return Err(ReporterError::InvalidDuration("not a number".to_string()));
    }
    if !total_nanos.is_finite() || total_nanos >= MAX_NANOS {
        return Err(ReporterError::DurationOverflow);
    }
    let nanos = total_nanos.round() as u128;
    let secs = u64::try_from(nanos / NANOS_PER_SEC).map_err(|_| ReporterError::DurationOverflow)?;
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    Ok(Duration::new(secs, subsec))
}

/* leading run of digits and dots */
fn split_number(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(input.len());
    input.split_at(end)
}

/* everything up to the next number */
fn split_unit(input: &str) -> (&str, &str) {
    let end = input
        .find(|c: char| c.is_ascii_digit() || c == '.')
        .unwrap_or(input.len());
    input.split_at(end)
}

/// Human-readable elapsed time.
///
/// Under a second: nearest millisecond (`"500ms"`), with zero shown as `"0s"`.
/// Otherwise nearest second as `"45s"`, `"2m30s"` or `"1h05m03s"`.
///
/// # Examples
///
/// ```
/// use reporter::duration::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
/// assert_eq!(format_duration(Duration::from_secs(150)), "2m30s");
/// assert_eq!(format_duration(Duration::from_secs(3903)), "1h05m03s");
/// ```
#[must_use]
pub fn format_duration(elapsed: Duration) -> String {
    if elapsed < Duration::from_secs(1) {
        return format_subsecond(elapsed);
    }

    let total = round_div(elapsed.as_nanos(), NANOS_PER_SEC);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}h{minutes:02}m{secs:02}s")
    } else if minutes > 0 {
        format!("{minutes}m{secs:02}s")
    } else {
        format!("{secs}s")
    }
}

/* millisecond resolution, rendered as a duration would print itself */
fn format_subsecond(elapsed: Duration) -> String {
    match round_div(elapsed.as_nanos(), NANOS_PER_MILLI) {
        0 => "0s".to_string(),
        1000 => "1s".to_string(),
        ms => format!("{ms}ms"),
    }
}

/* nearest multiple of unit, halves round up */
#[inline]
const fn round_div(nanos: u128, unit: u128) -> u128 {
    (nanos + unit / 2) / unit
}
