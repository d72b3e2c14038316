/*
 * config.rs
 *
 * Flags first, then environment, then built-in defaults. Built once in main,
 * read-only afterwards.
 *
 * An env var set to "" counts as unset. Shell rc files love `export X=`.
 */

use std::time::Duration;

use crate::args::Args;
use crate::duration::parse_duration;
use crate::error::Result;

/// Notify when a run takes at least this long.
pub const DEFAULT_THRESHOLD: &str = "10s";
pub const DEFAULT_TITLE: &str = "Task finished";
/// Push endpoint used when `--push-url` is not given.
pub const PUSH_URL_ENV: &str = "REPORTER_PUSH_URL";
/// tracing filter directives, e.g. `REPORTER_LOG=debug`.
pub const LOG_ENV: &str = "REPORTER_LOG";

/// `key` from the environment, or `default` when unset, empty or not UTF-8.
///
/// ```
/// use reporter::config::env_or_default;
///
/// assert_eq!(env_or_default("REPORTER_DOC_SURELY_UNSET", "fallback"), "fallback");
/// ```
#[must_use]
pub fn env_or_default(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Everything the decision and dispatch steps need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyConfig {
    pub threshold: Duration,
    /// notify regardless of elapsed time (`--always`)
    pub force: bool,
    pub title: String,
    /// ring the terminal bell before notifying
    pub bell: bool,
    /// never `Some("")`
    pub push_url: Option<String>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            threshold: Duration::from_secs(10),
            force: false,
            title: DEFAULT_TITLE.to_string(),
            bell: true,
            push_url: None,
        }
    }
}

impl NotifyConfig {
    /// Fails only on an unparseable `--threshold`.
    pub fn from_args(args: &Args) -> Result<Self> {
        let threshold = parse_duration(&args.threshold)?;

        let push_url = match &args.push_url {
            Some(url) => url.clone(),
            None => env_or_default(PUSH_URL_ENV, ""),
        };

        Ok(Self {
            threshold,
            force: args.always,
            title: args.title.clone(),
            bell: !args.no_bell,
            push_url: Some(push_url).filter(|url| !url.is_empty()),
        })
    }
}
