/*
 * signal.rs
 *
 * Ctrl-C while wrapped should behave like Ctrl-C without us in the way.
 * We catch INT, TERM and HUP and pass the same signal to the child. We never
 * die from them ourselves: the child decides, we report what it decided.
 *
 * Self-pipe trick: the handler can only do async-signal-safe things, so it
 * writes the signal number into a pipe. A relay thread blocks on the read
 * end and calls kill(2). Shutdown is closing the write end: the thread reads
 * EOF and returns. No flags, no polling.
 *
 * The relay thread starts with INT/TERM/HUP blocked, so the handler only
 * ever runs on the main thread. Drop runs there too and can't interleave
 * with a handler that already loaded the fd.
 *
 * Local Signal enum with libc constants - no nix dependency.
 */

use std::fs::File;
use std::io::{self, Read};
use std::os::fd::{FromRawFd, OwnedFd, RawFd};
use std::sync::atomic::{AtomicI32, Ordering};
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::error::{ReporterError, Result};

/* the "please stop" signals a terminal or init system sends */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Signal {
    SIGHUP = libc::SIGHUP,
    SIGINT = libc::SIGINT,
    SIGTERM = libc::SIGTERM,
}

/// Signals relayed to the child while it runs.
pub const FORWARDED: [Signal; 3] = [Signal::SIGINT, Signal::SIGTERM, Signal::SIGHUP];

impl Signal {
    /* convert from raw signal number */
    pub fn try_from_raw(num: i32) -> Option<Self> {
        match num {
            libc::SIGHUP => Some(Self::SIGHUP),
            libc::SIGINT => Some(Self::SIGINT),
            libc::SIGTERM => Some(Self::SIGTERM),
            _ => None,
        }
    }

    #[inline]
    pub const fn as_raw(self) -> i32 {
        self as i32
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SIGHUP => "HUP",
            Self::SIGINT => "INT",
            Self::SIGTERM => "TERM",
        }
    }
}

/* write end of the pipe, -1 when no relay is installed */
static SIGNAL_WRITE_FD: AtomicI32 = AtomicI32::new(-1);

/* Minimal signal handler - write the signal number to the pipe */
extern "C" fn signal_handler(sig: i32) {
    let fd = SIGNAL_WRITE_FD.load(Ordering::SeqCst);
    if fd >= 0 {
        // SAFETY: fd was validated >= 0 and set by SignalRelay::install().
        // write() with a 1-byte buffer is async-signal-safe per POSIX.
        // Errors are ignored; a full pipe already holds a pending signal.
        unsafe {
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            let byte: u8 = sig as u8;
            let _ = libc::write(fd, (&raw const byte).cast(), 1);
        }
    }
}

/// Forwards INT/TERM/HUP to a child process for as long as it lives.
///
/// Install before spawning, [`attach`](Self::attach) once the pid is known,
/// drop after the child has been reaped. Dropping restores the previous
/// handlers, closes the pipe and joins the relay thread.
///
/// Only one relay can be installed per process at a time.
pub struct SignalRelay {
    read: Option<OwnedFd>,
    previous: Vec<(Signal, libc::sigaction)>,
    relay: Option<JoinHandle<()>>,
}

impl SignalRelay {
    /// Create the pipe and install handlers.
    ///
    /// Signals arriving before [`attach`](Self::attach) wait in the pipe and
    /// are forwarded as soon as the child exists.
    pub fn install() -> Result<Self> {
        let mut fds = [0 as RawFd; 2];
        // SAFETY: fds is a valid 2-element array, pipe() writes exactly 2 fds
        if unsafe { libc::pipe(fds.as_mut_ptr()) } != 0 {
            return Err(ReporterError::SignalSetup(io::Error::last_os_error()));
        }
        // SAFETY: both fds were just returned by pipe() and are owned by nobody else
        #[allow(clippy::multiple_unsafe_ops_per_block)]
        let (read, write) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };

        /* the child must not inherit either end, or EOF never comes */
        set_cloexec(fds[0]).map_err(ReporterError::SignalSetup)?;
        set_cloexec(fds[1]).map_err(ReporterError::SignalSetup)?;
        /* handler must never block */
        set_nonblocking(fds[1]).map_err(ReporterError::SignalSetup)?;

        /* Claim the slot before registering handlers so a signal arriving
         * right after sigaction() always finds a valid fd. */
        if SIGNAL_WRITE_FD
            .compare_exchange(-1, fds[1], Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ReporterError::SignalSetup(io::Error::new(
                io::ErrorKind::AlreadyExists,
                "another signal relay is active",
            )));
        }
        /* the static owns the write end from here on */
        core::mem::forget(write);

        let mut previous = Vec::with_capacity(FORWARDED.len());
        for signal in FORWARDED {
            // SAFETY: sa is zeroed then initialized; signal_handler is an
            // extern "C" fn with the expected signature; old is a valid out pointer.
            #[allow(clippy::multiple_unsafe_ops_per_block)]
            let old = unsafe {
                let mut sa: libc::sigaction = core::mem::zeroed();
                sa.sa_sigaction = signal_handler as *const () as usize;
                sa.sa_flags = libc::SA_RESTART;
                libc::sigemptyset(&raw mut sa.sa_mask);
                let mut old: libc::sigaction = core::mem::zeroed();
                if libc::sigaction(signal.as_raw(), &sa, &mut old) != 0 {
                    None
                } else {
                    Some(old)
                }
            };
            match old {
                Some(old) => previous.push((signal, old)),
                None => {
                    let err = io::Error::last_os_error();
                    /* undo what we did so far */
                    let partial = Self {
                        read: Some(read),
                        previous,
                        relay: None,
                    };
                    drop(partial);
                    return Err(ReporterError::SignalSetup(err));
                }
            }
        }

        debug!("signal relay installed");
        Ok(Self {
            read: Some(read),
            previous,
            relay: None,
        })
    }

    /// Start relaying to `pid`. Calling twice is a no-op.
    pub fn attach(&mut self, pid: u32) {
        let Some(read) = self.read.take() else {
            return;
        };
        let Ok(pid) = libc::pid_t::try_from(pid) else {
            warn!(pid, "child pid out of range, signals will not be forwarded");
            return;
        };

        /* the new thread inherits the blocked mask from the moment it exists */
        let spawned = with_forwarded_blocked(|| {
            std::thread::Builder::new()
                .name("signal-relay".to_string())
                .spawn(move || relay_loop(File::from(read), pid))
        });

        match spawned {
            Ok(handle) => self.relay = Some(handle),
            Err(e) => warn!(error = %e, "could not start signal relay thread"),
        }
    }
}

impl Drop for SignalRelay {
    fn drop(&mut self) {
        /* Restore handlers FIRST so nothing writes while we close the pipe. */
        for (signal, old) in &self.previous {
            // SAFETY: old was filled in by a successful sigaction() call in install()
            unsafe {
                libc::sigaction(signal.as_raw(), old, core::ptr::null_mut());
            }
        }

        let write_fd = SIGNAL_WRITE_FD.swap(-1, Ordering::SeqCst);
        if write_fd >= 0 {
            // SAFETY: write_fd was stored by install() and ownership moved to the static
            drop(unsafe { OwnedFd::from_raw_fd(write_fd) });
        }

        /* writer is gone, relay thread sees EOF and returns */
        if let Some(handle) = self.relay.take() {
            let _ = handle.join();
        }
        debug!("signal relay removed");
    }
}

/* one byte per signal; EOF means the child is done */
fn relay_loop(mut pipe: File, pid: libc::pid_t) {
    let mut buf = [0u8; 1];
    loop {
        match pipe.read(&mut buf) {
            Ok(0) => return,
            Ok(_) => {
                let Some(signal) = Signal::try_from_raw(i32::from(buf[0])) else {
                    continue;
                };
                debug!(signal = signal.name(), pid, "forwarding signal to child");
                // SAFETY: kill() has no memory-safety preconditions
                if unsafe { libc::kill(pid, signal.as_raw()) } != 0 {
                    debug!(error = %io::Error::last_os_error(), "kill failed");
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                warn!(error = %e, "signal relay stopped");
                return;
            }
        }
    }
}

#[allow(clippy::multiple_unsafe_ops_per_block)]
fn forwarded_sigset() -> libc::sigset_t {
    // SAFETY: sigemptyset initializes the zeroed set before sigaddset touches it
    unsafe {
        let mut set: libc::sigset_t = core::mem::zeroed();
        libc::sigemptyset(&raw mut set);
        for signal in FORWARDED {
            libc::sigaddset(&raw mut set, signal.as_raw());
        }
        set
    }
}

/* run f with the forwarded signals blocked on this thread; pending ones
 * are delivered here once the old mask is back */
fn with_forwarded_blocked<T>(f: impl FnOnce() -> T) -> T {
    let set = forwarded_sigset();
    // SAFETY: zeroed sigset_t is a valid out parameter for pthread_sigmask
    let mut old: libc::sigset_t = unsafe { core::mem::zeroed() };
    // SAFETY: set and old are valid sigset_t values living on this stack frame
    let blocked = unsafe { libc::pthread_sigmask(libc::SIG_BLOCK, &set, &mut old) } == 0;
    if !blocked {
        warn!("could not block signals for the relay thread");
    }

    let result = f();

    if blocked {
        // SAFETY: old was filled in by the successful pthread_sigmask above
        unsafe {
            libc::pthread_sigmask(libc::SIG_SETMASK, &old, core::ptr::null_mut());
        }
    }
    result
}

fn set_cloexec(fd: RawFd) -> io::Result<()> {
    // SAFETY: fd is a valid open descriptor owned by the caller
    let ok = unsafe { libc::fcntl(fd, libc::F_SETFD, libc::FD_CLOEXEC) } >= 0;
    if ok { Ok(()) } else { Err(io::Error::last_os_error()) }
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    // SAFETY: fd is a valid open descriptor; F_GETFL/F_SETFL have no other preconditions
    #[allow(clippy::multiple_unsafe_ops_per_block)]
    let ok = unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL);
        flags >= 0 && libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) >= 0
    };
    if ok { Ok(()) } else { Err(io::Error::last_os_error()) }
}
