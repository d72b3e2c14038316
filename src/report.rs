/*
 * report.rs
 *
 * The part both modes share: decide, ring, dispatch. Runs strictly after the
 * exit code and elapsed time are known. Never changes either.
 */

use std::io::{self, Write};
use std::time::Duration;

use tracing::debug;

use crate::config::NotifyConfig;
use crate::notify::{Notification, Notify};
use crate::runner::RunOutcome;

/// Notify if forced, or if the run took at least `threshold` (inclusive).
///
/// ```
/// use reporter::report::should_notify;
/// use std::time::Duration;
///
/// let ten = Duration::from_secs(10);
/// assert!(!should_notify(Duration::from_secs(5), ten, false));
/// assert!(should_notify(ten, ten, false));
/// assert!(should_notify(Duration::ZERO, ten, true));
/// ```
#[inline]
#[must_use]
pub fn should_notify(elapsed: Duration, threshold: Duration, force: bool) -> bool {
    force || elapsed >= threshold
}

/// Decide and, if warranted, ring the bell and dispatch once.
/// Returns whether a notification went out.
pub fn report(
    command: &str,
    outcome: &RunOutcome,
    config: &NotifyConfig,
    notifier: &dyn Notify,
) -> bool {
    if !should_notify(outcome.elapsed, config.threshold, config.force) {
        debug!(
            elapsed = ?outcome.elapsed,
            threshold = ?config.threshold,
            "below threshold, not notifying"
        );
        return false;
    }

    if config.bell {
        ring_bell();
    }

    let notification =
        Notification::for_run(&config.title, command, outcome.elapsed, outcome.exit_code);
    notifier.notify(&notification);
    true
}

/* BEL on stderr; stdout belongs to the child */
fn ring_bell() {
    let mut err = io::stderr().lock();
    let _ = err.write_all(b"\x07");
    let _ = err.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Recorder;

    fn outcome(secs: u64, exit_code: i32) -> RunOutcome {
        RunOutcome {
            elapsed: Duration::from_secs(secs),
            exit_code,
        }
    }

    #[test]
    fn test_below_threshold() {
        assert!(!should_notify(
            Duration::from_secs(5),
            Duration::from_secs(10),
            false
        ));
    }

    #[test]
    fn test_equal_threshold_notifies() {
        assert!(should_notify(
            Duration::from_secs(10),
            Duration::from_secs(10),
            false
        ));
    }

    #[test]
    fn test_above_threshold() {
        assert!(should_notify(
            Duration::from_secs(15),
            Duration::from_secs(10),
            false
        ));
    }

    #[test]
    fn test_force_overrides_threshold() {
        assert!(should_notify(
            Duration::from_secs(1),
            Duration::from_secs(10),
            true
        ));
        assert!(should_notify(Duration::ZERO, Duration::from_secs(10), true));
    }

    #[test]
    fn test_report_dispatches_once() {
        let recorder = Recorder::default();
        let config = NotifyConfig {
            bell: false,
            ..NotifyConfig::default()
        };

        assert!(report("sleep 15", &outcome(15, 0), &config, &recorder));

        let sent = recorder.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Task finished");
        assert_eq!(sent[0].subtitle, "sleep 15");
        assert!(sent[0].body.contains("succeeded in 15s"));
    }

    #[test]
    fn test_report_skips_short_runs() {
        let recorder = Recorder::default();
        let config = NotifyConfig::default();

        assert!(!report("true", &outcome(1, 0), &config, &recorder));
        assert!(recorder.sent.borrow().is_empty());
    }

    #[test]
    fn test_report_forced_failure() {
        let recorder = Recorder::default();
        let config = NotifyConfig {
            force: true,
            bell: false,
            title: "CI".to_string(),
            ..NotifyConfig::default()
        };

        assert!(report("false", &outcome(0, 1), &config, &recorder));
        let sent = recorder.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "CI");
        assert!(sent[0].body.contains("failed (exit 1)"));
    }
}
