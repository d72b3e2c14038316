/*
 * main.rs
 *
 * Parse args, pick a mode, exit with the right code. Boring on purpose.
 * The interesting stuff is in runner.rs and notify/.
 *
 * Two modes, one tail:
 *   wrapping     reporter [flags] -- cmd args...   spawn, time, report
 *   notify-only  reporter --notify-only ...        shell hook already timed it
 */

use std::io::IsTerminal;

use reporter::args::Args;
use reporter::config::{LOG_ENV, NotifyConfig};
use reporter::duration::parse_duration;
use reporter::error::{ReporterError, exit_codes};
use reporter::notify::Dispatcher;
use reporter::runner::{notify_only, run_and_report};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    init_logging();
    std::process::exit(run_main(Args::parse_args()));
}

/* quiet unless REPORTER_LOG says otherwise; never on stdout */
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

fn run_main(args: Args) -> i32 {
    if let Some(shell) = args.completions {
        Args::print_completions(shell);
        return 0;
    }

    let config = match NotifyConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };
    let dispatcher = Dispatcher::new(config.push_url.as_deref());

    if args.notify_only {
        let elapsed = match args.duration.as_deref().filter(|d| !d.is_empty()) {
            Some(d) => match parse_duration(d) {
                Ok(elapsed) => elapsed,
                Err(e) => return fail(&e),
            },
            None => return fail(&ReporterError::MissingDuration),
        };
        let command = args
            .cmd
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| args.command.join(" "));
        return notify_only(&command, elapsed, args.exit, &config, &dispatcher);
    }

    if args.command.is_empty() {
        eprintln!("reporter: missing command");
        eprintln!("{}", Args::usage());
        return exit_codes::USAGE;
    }

    match run_and_report(&args.command, &config, &dispatcher) {
        Ok(code) => code,
        Err(e) => fail(&e),
    }
}

fn fail(e: &ReporterError) -> i32 {
    eprintln!("reporter: {e}");
    e.exit_code()
}
