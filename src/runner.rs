/*
 * runner.rs
 *
 * Spawn child, wait, measure. Then hand off to report.
 *
 * stdio is inherited, not piped. The child writes straight to our terminal
 * with no buffering in between, sees the same tty, reads the same stdin.
 * If you can tell it's wrapped, that's a bug.
 *
 * Signal forwarding is installed before spawn so a Ctrl-C racing the spawn
 * waits in the pipe instead of killing us with the child orphaned.
 *
 * Exit code: the child's. Killed by a signal has no code; that reports as -1
 * (the body says "failed (exit -1)") and the process exits 255.
 */

use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::NotifyConfig;
use crate::error::{ReporterError, Result};
use crate::notify::Notify;
use crate::report::report;
use crate::signal::SignalRelay;

/// Reported exit code for a child that was terminated by a signal.
/// `process::exit(-1)` surfaces as 255.
pub const SIGNALED_EXIT_CODE: i32 = -1;

/// How a run ended. Produced once per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// From just before spawn to the moment wait returned.
    pub elapsed: Duration,
    pub exit_code: i32,
}

/// Run `argv[0]` with `argv[1..]`, forwarding INT/TERM/HUP, and measure it.
///
/// Errors only when the command can't be started or waited on. A non-zero
/// exit is a normal outcome.
pub fn run_command(argv: &[String]) -> Result<RunOutcome> {
    let (program, args) = argv.split_first().ok_or(ReporterError::MissingCommand)?;

    let mut relay = match SignalRelay::install() {
        Ok(relay) => Some(relay),
        Err(e) => {
            warn!(error = %e, "running without signal forwarding");
            None
        }
    };

    let start = Instant::now();
    /* on spawn failure relay drops here and restores handlers */
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| ReporterError::Spawn {
            command: program.clone(),
            source,
        })?;
    debug!(pid = child.id(), command = %program, "child started");

    if let Some(relay) = relay.as_mut() {
        relay.attach(child.id());
    }

    let waited = child.wait();
    let elapsed = start.elapsed();
    /* child is gone: stop relaying before anything else */
    drop(relay);

    let status = waited.map_err(ReporterError::Wait)?;
    let exit_code = status_to_exit_code(status);
    debug!(exit_code, elapsed = ?elapsed, "child exited");

    Ok(RunOutcome { elapsed, exit_code })
}

/// Wrapping mode: run, report, return the child's exit code.
pub fn run_and_report(
    argv: &[String],
    config: &NotifyConfig,
    notifier: &dyn Notify,
) -> Result<i32> {
    let outcome = run_command(argv)?;
    report(&argv.join(" "), &outcome, config, notifier);
    Ok(outcome.exit_code)
}

/// Notify-only mode: a shell hook already ran and timed the command.
/// Same decision and dispatch, no process. Returns `exit_code` unchanged.
pub fn notify_only(
    command: &str,
    elapsed: Duration,
    exit_code: i32,
    config: &NotifyConfig,
    notifier: &dyn Notify,
) -> i32 {
    let outcome = RunOutcome { elapsed, exit_code };
    report(command, &outcome, config, notifier);
    exit_code
}

/* exit status to code; no code (killed by a signal) is -1 */
fn status_to_exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => {
            debug!(signal = ?status.signal(), "child terminated by signal");
            SIGNALED_EXIT_CODE
        }
    }
}
