/*
 * lib.rs
 *
 * Exists mostly for testing. Integration tests need our types, doc tests
 * need a lib. You could use this as a library but honestly just shell out.
 */

//! # reporter
//!
//! Run a command, and get a desktop (and optionally phone) notification when
//! it finishes, if it took long enough to be worth one.
//!
//! ## Quick Start
//!
//! ```rust
//! use reporter::{format_duration, parse_duration, should_notify};
//! use std::time::Duration;
//!
//! let threshold = parse_duration("10s").unwrap();
//! let elapsed = Duration::from_secs(150);
//!
//! assert!(should_notify(elapsed, threshold, false));
//! assert_eq!(format_duration(elapsed), "2m30s");
//! ```

pub mod args;
pub mod config;
pub mod duration;
pub mod error;
pub mod escape;
pub mod notify;
pub mod report;
pub mod runner;
pub mod signal;

pub use args::Args;
pub use config::{NotifyConfig, env_or_default};
pub use duration::{format_duration, parse_duration};
pub use error::{ReporterError, Result, exit_codes};
pub use escape::escape_applescript;
pub use notify::{Dispatcher, Notification, Notify};
pub use report::{report, should_notify};
pub use runner::{RunOutcome, SIGNALED_EXIT_CODE, notify_only, run_and_report, run_command};
