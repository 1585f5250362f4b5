//! One-line side channel back to the invoking shell.
//!
//! A child process cannot change its parent's environment. The shell
//! function printed by `pathy activate` runs the binary with descriptor 3
//! connected to a pipe it reads, then `eval`s whatever arrives there. The
//! channel must be checked before any side effect so that a missing wrapper
//! fails without partial work.
//!
//! The inherited descriptor is inspected with `fstat` and written through
//! directly; `/dev/fd` is not required.

use std::io::{self, Write};
use thiserror::Error;

/// Descriptor the activation wrapper connects to its reader.
pub const SIDE_CHANNEL_FD: i32 = 3;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error(
        "fd {0} is not open; run pathy through the shell function set up by `eval \"$(pathy activate)\"`"
    )]
    Unavailable(i32),
    #[error(
        "fd {0} is not a pipe; run pathy through the shell function set up by `eval \"$(pathy activate)\"`"
    )]
    NotAPipe(i32),
    #[error("cannot write to fd {fd}: {source}")]
    Write {
        fd: i32,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Handle on an inherited descriptor. The descriptor is never closed.
pub struct SideChannel {
    fd: i32,
}

impl SideChannel {
    /// The descriptor the activation wrapper sets up.
    pub fn inherited() -> Self {
        Self::with_fd(SIDE_CHANNEL_FD)
    }

    pub fn with_fd(fd: i32) -> Self {
        Self { fd }
    }

    pub fn fd(&self) -> i32 {
        self.fd
    }

    /// Precondition for every mutating command: the descriptor is open and
    /// is a pipe. Performs no I/O beyond a stat.
    pub fn check(&self) -> Result<(), ChannelError> {
        imp::check(self.fd)
    }

    /// Check the channel, then write the generator's output as one line.
    pub fn publish<F>(&self, generate: F) -> Result<(), ChannelError>
    where
        F: FnOnce() -> String,
    {
        self.check()?;
        let line = generate();
        imp::write_fd(self.fd, &line).map_err(|source| ChannelError::Write {
            fd: self.fd,
            source,
        })?;
        tracing::debug!(fd = self.fd, bytes = line.len() + 1, "published to side channel");
        Ok(())
    }
}

/// Write `line` plus a newline and flush.
pub fn write_line<W: Write>(w: &mut W, line: &str) -> io::Result<()> {
    writeln!(w, "{}", line)?;
    w.flush()
}

#[cfg(unix)]
mod imp {
    use super::{write_line, ChannelError};
    use nix::sys::stat::{fstat, SFlag};
    use std::fs::File;
    use std::io;
    use std::os::fd::BorrowedFd;

    pub fn check(fd: i32) -> Result<(), ChannelError> {
        let st = match fstat(fd) {
            Ok(st) => st,
            Err(errno) => {
                tracing::debug!(fd, error = %errno, "side channel fstat failed");
                return Err(ChannelError::Unavailable(fd));
            }
        };
        let kind = SFlag::from_bits_truncate(st.st_mode) & SFlag::S_IFMT;
        if kind == SFlag::S_IFIFO {
            Ok(())
        } else {
            Err(ChannelError::NotAPipe(fd))
        }
    }

    /// Write through a duplicate of `fd` so the inherited one stays open.
    pub fn write_fd(fd: i32, line: &str) -> io::Result<()> {
        // SAFETY: `check` just confirmed `fd` is open, and nothing in this
        // process closes it.
        let borrowed = unsafe { BorrowedFd::borrow_raw(fd) };
        let mut pipe = File::from(borrowed.try_clone_to_owned()?);
        write_line(&mut pipe, line)
    }
}

#[cfg(not(unix))]
mod imp {
    use super::ChannelError;
    use std::io;

    pub fn check(fd: i32) -> Result<(), ChannelError> {
        Err(ChannelError::Unavailable(fd))
    }

    pub fn write_fd(_fd: i32, _line: &str) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }
}
