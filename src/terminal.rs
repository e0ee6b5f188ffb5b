//! Switching the controlling terminal between cooked and raw input.
//!
//! [`ModeControl`] is the seam between the shell and the terminal device.
//! [`Tty`] implements it with termios on standard input, and [`RawMode`] is the
//! scoped guard the read loop holds while it consumes bytes: dropping the guard
//! (on success, on `?`, or during unwinding) puts the saved attributes back.

use crate::error::{Result, ShellError};
use std::io;
use std::mem::MaybeUninit;
use std::os::fd::{AsRawFd, RawFd};

/// The two input modes the shell moves the terminal between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalMode {
    /// Line buffered with echo, as the terminal driver normally behaves.
    Cooked,
    /// Every byte delivered immediately, without echo or signal generation.
    Raw,
}

/// A terminal whose input mode can be changed and put back.
pub trait ModeControl {
    /// Attributes saved by [`enter_raw`](ModeControl::enter_raw).
    type Attrs;

    /// Disable line buffering and echo. Returns the attributes in effect before.
    fn enter_raw(&mut self) -> io::Result<Self::Attrs>;

    /// Reapply attributes previously returned by `enter_raw`.
    fn restore(&mut self, previous: &Self::Attrs) -> io::Result<()>;
}

/// Termios-backed terminal on a file descriptor, normally standard input.
pub struct Tty {
    fd: RawFd,
}

impl Tty {
    pub fn stdin() -> Self {
        Self {
            fd: io::stdin().as_raw_fd(),
        }
    }
}

impl ModeControl for Tty {
    type Attrs = libc::termios;

    fn enter_raw(&mut self) -> io::Result<libc::termios> {
        let original = get_attrs(self.fd)?;

        let mut raw = original;
        // CR to NL translation on input stays enabled so Enter arrives as '\n',
        // and output post-processing stays on so '\n' still returns the carriage.
        raw.c_lflag &= !(libc::ICANON | libc::ECHO | libc::ISIG);
        raw.c_cc[libc::VMIN] = 1;
        raw.c_cc[libc::VTIME] = 0;
        set_attrs(self.fd, &raw)?;

        Ok(original)
    }

    fn restore(&mut self, previous: &libc::termios) -> io::Result<()> {
        set_attrs(self.fd, previous)
    }
}

fn get_attrs(fd: RawFd) -> io::Result<libc::termios> {
    let mut attrs = MaybeUninit::<libc::termios>::uninit();
    // SAFETY: tcgetattr writes a complete termios into `attrs` when it returns 0.
    if unsafe { libc::tcgetattr(fd, attrs.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: initialised by the successful call above.
    Ok(unsafe { attrs.assume_init() })
}

fn set_attrs(fd: RawFd, attrs: &libc::termios) -> io::Result<()> {
    // SAFETY: `attrs` points to a valid termios for the duration of the call.
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, attrs) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Raw mode held for the lifetime of the guard.
///
/// Call [`RawMode::restore`] to leave raw mode and observe a failure to do so;
/// otherwise the previous attributes are reapplied when the guard is dropped.
pub struct RawMode<'a, T: ModeControl> {
    term: &'a mut T,
    saved: Option<T::Attrs>,
}

impl<'a, T: ModeControl> RawMode<'a, T> {
    /// Switch `term` into raw mode. Failure is fatal to the shell.
    pub fn enter(term: &'a mut T) -> Result<Self> {
        let saved = term.enter_raw().map_err(ShellError::RawMode)?;
        log::trace!("terminal switched to raw mode");
        Ok(Self {
            term,
            saved: Some(saved),
        })
    }

    /// Leave raw mode now.
    pub fn restore(mut self) -> io::Result<()> {
        match self.saved.take() {
            Some(saved) => {
                log::trace!("terminal restored");
                self.term.restore(&saved)
            }
            None => Ok(()),
        }
    }
}

impl<T: ModeControl> Drop for RawMode<'_, T> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            if let Err(err) = self.term.restore(&saved) {
                log::error!("failed to restore terminal mode: {err}");
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeTerminal;
    use super::*;

    #[test]
    fn test_guard_restores_on_drop() {
        let mut term = FakeTerminal::new();
        {
            let _guard = RawMode::enter(&mut term).unwrap();
        }
        assert_eq!(term.mode, TerminalMode::Cooked);
        assert_eq!(term.raw_entries, 1);
    }

    #[test]
    fn test_explicit_restore() {
        let mut term = FakeTerminal::new();
        let guard = RawMode::enter(&mut term).unwrap();
        guard.restore().unwrap();
        assert_eq!(term.mode, TerminalMode::Cooked);
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        fn read_then_fail(term: &mut FakeTerminal) -> Result<()> {
            let _guard = RawMode::enter(term)?;
            Err(ShellError::InputClosed)
        }

        let mut term = FakeTerminal::new();
        assert!(read_then_fail(&mut term).is_err());
        assert_eq!(term.mode, TerminalMode::Cooked);
    }

    #[test]
    fn test_enter_failure_is_fatal() {
        let mut term = FakeTerminal::failing();
        let err = RawMode::enter(&mut term).err().unwrap();
        assert!(matches!(err, ShellError::RawMode(_)));
        assert!(err.is_fatal());
        assert_eq!(term.mode, TerminalMode::Cooked);
    }

    #[test]
    fn test_tty_on_non_terminal_fails() {
        let file = std::fs::File::open("/dev/null").unwrap();
        let mut tty = Tty {
            fd: file.as_raw_fd(),
        };
        assert!(tty.enter_raw().is_err());
    }
}
