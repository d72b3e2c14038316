/*
 * notify/desktop.rs
 *
 * macOS: osascript -e 'display notification ...'. Everything goes through one
 * AppleScript string, hence escape_applescript.
 * Linux: notify-send TITLE MESSAGE. Plain argv, nothing to escape.
 * Anything else: no desktop notifier, caller falls back to stderr.
 *
 * The PATH lookup happens once per notifier and is never redone. We live for
 * one command; PATH doesn't change under us.
 */

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::OnceLock;

use thiserror::Error;
use tracing::debug;

use super::Notification;
use crate::escape::escape_applescript;

/// Which native mechanism to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Other,
}

impl Platform {
    /// The platform this binary was built for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else {
            Self::Other
        }
    }

    /// Name of the notifier binary looked up on PATH.
    #[must_use]
    pub const fn tool(self) -> Option<&'static str> {
        match self {
            Self::MacOs => Some("osascript"),
            Self::Linux => Some("notify-send"),
            Self::Other => None,
        }
    }

    /* argv after the tool name */
    fn tool_args(self, notification: &Notification) -> Vec<String> {
        match self {
            Self::MacOs => vec!["-e".to_string(), applescript(notification)],
            Self::Linux => vec![
                notification.title.clone(),
                format!("{} — {}", notification.subtitle, notification.body),
            ],
            Self::Other => Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("no notifier available for {0}")]
    Unsupported(&'static str),
    #[error("{0} not found in PATH")]
    ToolMissing(&'static str),
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("{tool} exited with {status}")]
    Failed {
        tool: &'static str,
        status: ExitStatus,
    },
}

/// The `display notification` script osascript runs.
///
/// ```
/// use reporter::notify::{Notification, desktop::applescript};
///
/// let n = Notification::new("Done", "succeeded in 2s", r#"echo "hi""#);
/// assert_eq!(
///     applescript(&n),
///     r#"display notification "succeeded in 2s" with title "Done" subtitle "echo \"hi\"""#
/// );
/// ```
#[must_use]
pub fn applescript(notification: &Notification) -> String {
    format!(
        "display notification \"{}\" with title \"{}\" subtitle \"{}\"",
        escape_applescript(&notification.body),
        escape_applescript(&notification.title),
        escape_applescript(&notification.subtitle),
    )
}

/// Platform notifier with a memoized PATH lookup.
pub struct DesktopNotifier {
    platform: Platform,
    search_path: Option<OsString>,
    tool: OnceLock<Option<PathBuf>>,
}

impl DesktopNotifier {
    #[must_use]
    pub fn native() -> Self {
        Self::new(Platform::current())
    }

    #[must_use]
    pub const fn new(platform: Platform) -> Self {
        Self {
            platform,
            search_path: None,
            tool: OnceLock::new(),
        }
    }

    /// Look the tool up in `paths` (PATH syntax) instead of `$PATH`.
    #[must_use]
    pub fn with_search_path(mut self, paths: impl Into<OsString>) -> Self {
        self.search_path = Some(paths.into());
        self
    }

    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Where the notifier binary lives, if anywhere. Looked up on first call only.
    pub fn tool_path(&self) -> Option<&Path> {
        self.tool.get_or_init(|| self.lookup()).as_deref()
    }

    fn lookup(&self) -> Option<PathBuf> {
        let name = self.platform.tool()?;
        let found = match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_default();
                which::which_in(name, Some(paths), cwd)
            }
            None => which::which(name),
        };
        debug!(tool = name, found = found.is_ok(), "notifier lookup");
        found.ok()
    }

    /// Show `notification`. Blocks until the tool exits.
    pub fn send(&self, notification: &Notification) -> Result<(), DesktopError> {
        let tool = self
            .platform
            .tool()
            .ok_or(DesktopError::Unsupported(std::env::consts::OS))?;
        let path = self.tool_path().ok_or(DesktopError::ToolMissing(tool))?;

        let status = Command::new(path)
            .args(self.platform.tool_args(notification))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| DesktopError::Launch { tool, source })?;

        if status.success() {
            Ok(())
        } else {
            Err(DesktopError::Failed { tool, status })
        }
    }
}
