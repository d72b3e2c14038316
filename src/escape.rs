/*
 * escape.rs
 *
 * AppleScript string literals. osascript gets the whole script as one -e
 * argument, so a stray quote in a command line ends the string early and
 * the notification silently never shows.
 *
 * One pass, no rescanning: the backslash we emit for a quote is never doubled.
 */

/// Escape text for embedding between double quotes in an AppleScript literal.
///
/// `\` becomes `\\`, `"` becomes `\"`, and newline, carriage return and tab
/// each become a single space.
///
/// ```
/// use reporter::escape::escape_applescript;
///
/// assert_eq!(escape_applescript(r#"say "hello""#), r#"say \"hello\""#);
/// assert_eq!(escape_applescript("a\tb"), "a b");
/// ```
#[must_use]
pub fn escape_applescript(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' | '\r' | '\t' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}
