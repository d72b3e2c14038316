/*
 * error.rs
 *
 * 2 = you called us wrong, 1 = we couldn't run your command.
 * Anything else is the child's own exit code and belongs to it.
 *
 * Notification failures never show up here. They're handled where they
 * happen and the child's code wins.
 */

use std::io;

use thiserror::Error;

/// exit codes for failures that are ours, not the child's.
pub mod exit_codes {
    /// Command could not be started, or waiting on it failed
    pub const FAILURE: i32 = 1;
    /// Bad flags, bad durations, missing command
    pub const USAGE: i32 = 2;
}

/* everything that can go wrong before the child's exit code is known */
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
    #[error("invalid duration: negative values not allowed")]
    NegativeDuration,
    #[error("invalid duration: value too large")]
    DurationOverflow,
    #[error("missing command")]
    MissingCommand,
    #[error("--duration is required in notify-only mode")]
    MissingDuration,
    #[error("failed to start command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to run command: {0}")]
    Wait(#[source] io::Error),
    #[error("signal forwarding setup failed: {0}")]
    SignalSetup(#[source] io::Error),
}

impl ReporterError {
    /* usage errors are 2, everything else is 1 */
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidDuration(_)
            | Self::NegativeDuration
            | Self::DurationOverflow
            | Self::MissingCommand
            | Self::MissingDuration => exit_codes::USAGE,
            Self::Spawn { .. } | Self::Wait(_) | Self::SignalSetup(_) => exit_codes::FAILURE,
        }
    }
}

pub type Result<T> = core::result::Result<T, ReporterError>;
