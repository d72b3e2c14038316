/*
 * notify/mod.rs
 *
 * Two channels, every time: the desktop notifier and the HTTP push. They
 * don't know about each other. Desktop failing prints a one-liner to stderr
 * instead; push failing prints a [push] diagnostic. Neither touches the exit
 * code - by the time we get here the child's code is already decided.
 */

pub mod desktop;
pub mod push;

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use tracing::debug;

use crate::duration::format_duration;

pub use desktop::{DesktopError, DesktopNotifier, Platform};
pub use push::{PUSH_TIMEOUT, PushClient, PushError};

/// What every channel gets: the same three strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    /// "succeeded in 15s" / "failed (exit 2) in 1m03s"
    pub body: String,
    /// The command line that ran.
    pub subtitle: String,
}

impl Notification {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        subtitle: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            subtitle: subtitle.into(),
        }
    }

    /// Build the message for a finished command.
    #[must_use]
    pub fn for_run(title: &str, command: &str, elapsed: Duration, exit_code: i32) -> Self {
        let status = if exit_code == 0 {
            "succeeded".to_string()
        } else {
            format!("failed (exit {exit_code})")
        };
        Self::new(
            title,
            format!("{status} in {}", format_duration(elapsed)),
            command,
        )
    }

    /// `[notify] <subtitle> — <body>`, printed when no desktop notifier works.
    #[must_use]
    pub fn fallback_line(&self) -> String {
        format!("[notify] {} — {}", self.subtitle, self.body)
    }
}

/// Anything that can deliver a [`Notification`]. Delivery never fails
/// outward; implementations deal with their own errors.
pub trait Notify {
    fn notify(&self, notification: &Notification);
}

/// Desktop notifier plus optional push, both attempted on every call.
pub struct Dispatcher {
    desktop: DesktopNotifier,
    push: Option<PushClient>,
}

impl Dispatcher {
    /// Native desktop notifier for this platform; push only if `push_url`
    /// is set and non-empty.
    #[must_use]
    pub fn new(push_url: Option<&str>) -> Self {
        Self::with_channels(
            DesktopNotifier::native(),
            push_url.filter(|url| !url.is_empty()).map(PushClient::new),
        )
    }

    #[must_use]
    pub fn with_channels(desktop: DesktopNotifier, push: Option<PushClient>) -> Self {
        Self { desktop, push }
    }

    #[must_use]
    pub fn desktop(&self) -> &DesktopNotifier {
        &self.desktop
    }

    #[must_use]
    pub fn push(&self) -> Option<&PushClient> {
        self.push.as_ref()
    }
}

impl Notify for Dispatcher {
    fn notify(&self, notification: &Notification) {
        match self.desktop.send(notification) {
            Ok(()) => debug!("desktop notification sent"),
            Err(e) => {
                debug!(error = %e, "desktop notification unavailable, falling back to stderr");
                stderr_line(format_args!("{}", notification.fallback_line()));
            }
        }

        if let Some(push) = &self.push {
            match push.send(notification) {
                Ok(()) => debug!(url = push.url(), "push delivered"),
                Err(e) => stderr_line(format_args!("[push] {e}")),
            }
        }
    }
}

/* stderr may be /dev/null or closed when a shell hook runs us detached */
pub(crate) fn stderr_line(args: fmt::Arguments<'_>) {
    let mut err = io::stderr().lock();
    let _ = err.write_fmt(args);
    let _ = err.write_all(b"\n");
}

/* test double: remembers what it was asked to deliver */
#[cfg(test)]
#[derive(Default)]
pub(crate) struct Recorder {
    pub(crate) sent: std::cell::RefCell<Vec<Notification>>,
}

#[cfg(test)]
impl Notify for Recorder {
    fn notify(&self, notification: &Notification) {
        self.sent.borrow_mut().push(notification.clone());
    }
}
