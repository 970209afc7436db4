//! # Raw mode
//!
//! Scoped raw mode for the controlling terminal and a bounded-wait byte reader on stdin.
//!
//! [`RawMode::enable`] snapshots the current termios settings of stdin (or of any terminal
//! descriptor handed to [`RawMode::enable_on`]) and switches it to raw mode: no line
//! buffering, no echo, no signal generation. The snapshot lives in the guard and is
//! written back when the guard is dropped, so the terminal is restored on every exit
//! path, panics included.
use crate::utils::editor::KeySource;
use rustix::{
    event::{PollFd, PollFlags, Timespec, poll},
    io::Errno,
    termios::{self, OptionalActions, Termios},
};
use std::{
    io::{self, Stdin},
    os::fd::{AsFd, OwnedFd},
    time::Duration,
};

/// Restores the captured terminal settings on drop.
pub struct RawMode {
    tty: OwnedFd,
    original: Termios,
}

impl RawMode {
    /// Raw mode on stdin.
    ///
    /// # Errors
    ///
    /// Fails when stdin is not a terminal or its attributes cannot be changed.
    pub fn enable() -> io::Result<Self> {
        Self::enable_on(io::stdin())
    }

    /// Raw mode on `tty`. The guard keeps its own duplicate of the descriptor.
    ///
    /// # Errors
    ///
    /// Fails when `tty` is not a terminal or its attributes cannot be changed.
    pub fn enable_on(tty: impl AsFd) -> io::Result<Self> {
        let tty = tty.as_fd().try_clone_to_owned()?;
        let original = termios::tcgetattr(&tty)?;

        let mut raw = original.clone();
        raw.make_raw();
        termios::tcsetattr(&tty, OptionalActions::Now, &raw)?;

        tracing::debug!("raw mode enabled");
        Ok(Self { tty, original })
    }
}

impl std::fmt::Debug for RawMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawMode").finish_non_exhaustive()
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        match termios::tcsetattr(&self.tty, OptionalActions::Drain, &self.original) {
            Ok(()) => tracing::debug!("terminal mode restored"),
            Err(e) => tracing::warn!("failed to restore terminal mode: {}", e),
        }
    }
}

/// Reads single bytes from stdin straight off the file descriptor, waiting at most the
/// requested timeout for each one.
#[derive(Debug)]
pub struct StdinKeys {
    stdin: Stdin,
}

impl StdinKeys {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for StdinKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for StdinKeys {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        let wait = Timespec {
            tv_sec: timeout.as_secs().try_into().unwrap_or(i64::MAX),
            tv_nsec: timeout.subsec_nanos().into(),
        };
        let mut fds = [PollFd::new(&self.stdin, PollFlags::IN)];

        match poll(&mut fds, Some(&wait)) {
            Ok(0) => return Ok(None),
            Ok(_) => {}
            Err(Errno::INTR) => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        // The std handle is buffered, so the byte is taken from the descriptor itself.
        let mut byte = [0u8; 1];
        match rustix::io::read(&self.stdin, &mut byte[..]) {
            Ok(0) => Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
            Ok(_) => Ok(Some(byte[0])),
            Err(Errno::INTR) | Err(Errno::AGAIN) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{
        InputConfig, InputValue, LineEditor, ValidatorChain, editor::tests::ScriptedKeys,
        pattern_cache::PatternCache, terminal::InputError,
    };
    use rustix::{
        fs::{Mode, OFlags},
        pty::{OpenptFlags, grantpt, openpt, ptsname, unlockpt},
        termios::LocalModes,
    };
    use std::io::IsTerminal;

    /// Returns `(master, slave)`, or `None` where no pseudo-terminal can be allocated.
    fn pty_pair() -> Option<(OwnedFd, OwnedFd)> {
        let master = openpt(OpenptFlags::RDWR | OpenptFlags::NOCTTY).ok()?;
        grantpt(&master).ok()?;
        unlockpt(&master).ok()?;
        let name = ptsname(&master, Vec::new()).ok()?;
        let slave =
            rustix::fs::open(name.as_c_str(), OFlags::RDWR | OFlags::NOCTTY, Mode::empty()).ok()?;
        Some((master, slave))
    }

    fn assert_same_modes(actual: &Termios, expected: &Termios) {
        assert_eq!(actual.input_modes, expected.input_modes);
        assert_eq!(actual.output_modes, expected.output_modes);
        assert_eq!(actual.control_modes, expected.control_modes);
        assert_eq!(actual.local_modes, expected.local_modes);
    }

    fn ask_on(tty: &OwnedFd, keys: &[u8]) -> Result<InputValue, InputError> {
        let config = InputConfig::builder("Name")
            .pattern_cache(PatternCache::new_shared())
            .build()?;
        let chain = ValidatorChain::from_config(&config);
        let validated = {
            let _raw = RawMode::enable_on(tty)?;
            LineEditor::new(&config, &chain, ScriptedKeys::new(keys), Vec::new()).run()?
        };
        Ok(validated.cast()?)
    }

    #[test]
    fn test_enable_requires_a_terminal() {
        // Only meaningful when the test runner does not hand us a tty.
        if !io::stdin().is_terminal() {
            assert!(RawMode::enable().is_err());
        }
    }

    #[test]
    fn test_enable_on_non_terminal_fails() {
        let file = std::fs::File::open("Cargo.toml").unwrap();
        assert!(RawMode::enable_on(&file).is_err());
    }

    #[test]
    fn test_raw_while_held_and_restored_on_drop() {
        let Some((_master, slave)) = pty_pair() else {
            return;
        };
        let before = termios::tcgetattr(&slave).unwrap();
        assert!(before.local_modes.contains(LocalModes::ICANON));

        {
            let _raw = RawMode::enable_on(&slave).unwrap();
            let during = termios::tcgetattr(&slave).unwrap();
            assert!(!during.local_modes.contains(LocalModes::ICANON));
            assert!(!during.local_modes.contains(LocalModes::ECHO));
            assert!(!during.local_modes.contains(LocalModes::ISIG));
        }

        assert_same_modes(&termios::tcgetattr(&slave).unwrap(), &before);
    }

    #[test]
    fn test_restored_after_accepted_answer() {
        let Some((_master, slave)) = pty_pair() else {
            return;
        };
        let before = termios::tcgetattr(&slave).unwrap();

        let value = ask_on(&slave, b"bob\r").unwrap();
        assert_eq!(value, InputValue::String("bob".into()));
        assert_same_modes(&termios::tcgetattr(&slave).unwrap(), &before);
    }

    #[test]
    fn test_restored_after_ctrl_c() {
        let Some((_master, slave)) = pty_pair() else {
            return;
        };
        let before = termios::tcgetattr(&slave).unwrap();

        assert!(matches!(ask_on(&slave, b"bo\x03"), Err(InputError::Interrupted)));
        assert_same_modes(&termios::tcgetattr(&slave).unwrap(), &before);
    }

    #[test]
    fn test_restored_after_panic() {
        let Some((_master, slave)) = pty_pair() else {
            return;
        };
        let before = termios::tcgetattr(&slave).unwrap();

        let outcome = std::panic::catch_unwind(|| {
            let _raw = RawMode::enable_on(&slave).unwrap();
            panic!("editor blew up");
        });
        assert!(outcome.is_err());
        assert_same_modes(&termios::tcgetattr(&slave).unwrap(), &before);
    }
}
