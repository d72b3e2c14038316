/*
 * args.rs
 *
 * Clap derive macros handle parsing. Life's too short to do this by hand.
 *
 * trailing_var_arg grabs everything after COMMAND so `reporter make -j8`
 * doesn't try to parse make's flags. Use -- when the command itself starts
 * with a dash.
 *
 * Clap exits 2 on bad flags, which is exactly our usage-error code.
 */

use clap::CommandFactory;
use clap::Parser;
use clap_complete::Shell;
use std::io;

use crate::config::{DEFAULT_THRESHOLD, DEFAULT_TITLE};

#[derive(Parser, Debug)]
#[command(
    name = "reporter",
    version,
    about = "Run a command and notify when it finishes, if it took a while",
    long_about = "Run COMMAND with its stdin, stdout and stderr untouched. When it exits,\n\
                  send a desktop notification if it ran for at least THRESHOLD.\n\n\
                  Notifications go through osascript on macOS and notify-send on Linux,\n\
                  falling back to a line on stderr. With --push-url (or REPORTER_PUSH_URL)\n\
                  the same text is also POSTed to that URL, e.g. an ntfy.sh topic.\n\n\
                  Examples:\n\
                    reporter make                      # notify if make takes 10s or more\n\
                    reporter -t 1m cargo build         # only builds longer than a minute\n\
                    reporter --always -- ./deploy.sh   # always notify\n\n\
                  Shell hooks time commands themselves and call:\n\
                    reporter --notify-only --cmd 'make' --duration 42s --exit 0",
    after_help = "Exit status:\n\
                  2 on usage errors (bad flags, bad durations, missing command)\n\
                  1 if COMMAND could not be started\n\
                  255 if COMMAND was killed by a signal\n\
                  the exit status of COMMAND otherwise (--exit in notify-only mode)"
)]
pub struct Args {
    /// Minimum run time before a notification is sent (e.g. 5s, 1m30s).
    #[arg(
        short = 't',
        long = "threshold",
        default_value = DEFAULT_THRESHOLD,
        value_name = "DURATION"
    )]
    pub threshold: String,

    /// Notify even if the command finishes before the threshold.
    #[arg(short = 'a', long = "always")]
    pub always: bool,

    /// Title shown in notifications.
    #[arg(long = "title", default_value = DEFAULT_TITLE, value_name = "TEXT")]
    pub title: String,

    /// Do not ring the terminal bell alongside the notification.
    #[arg(long = "no-bell")]
    pub no_bell: bool,

    /// HTTP endpoint for push notifications (e.g. an ntfy topic URL).
    ///
    /// Falls back to the REPORTER_PUSH_URL environment variable.
    #[arg(long = "push-url", value_name = "URL")]
    pub push_url: Option<String>,

    /// Don't run anything, just notify about a command that already finished.
    ///
    /// Used by shell hooks. Requires --duration.
    #[arg(long = "notify-only")]
    pub notify_only: bool,

    /// Command text to show in the notification (notify-only mode).
    ///
    /// Defaults to the trailing arguments joined by spaces.
    #[arg(long = "cmd", value_name = "TEXT")]
    pub cmd: Option<String>,

    /// How long the finished command ran (notify-only mode).
    #[arg(long = "duration", value_name = "DURATION")]
    pub duration: Option<String>,

    /// Exit code of the finished command (notify-only mode).
    #[arg(
        long = "exit",
        value_name = "CODE",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub exit: i32,

    /// Generate shell completions and exit.
    ///
    /// Supported: bash, zsh, fish, powershell, elvish.
    #[arg(long = "completions", value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// Command to run, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

impl Args {
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// generate shell completions to stdout
    pub fn print_completions(shell: Shell) {
        let mut cmd = Self::command();
        clap_complete::generate(shell, &mut cmd, "reporter", &mut io::stdout());
    }

    /// one-line usage, for "missing command"
    #[must_use]
    pub fn usage() -> String {
        Self::command().render_usage().to_string()
    }
}
