//! # Line Editor
//!
//! The keystroke state machine behind interactive prompts. A [`LineEditor`] pulls one
//! byte at a time from a [`KeySource`], keeps an [`EditBuffer`] in sync with what is
//! drawn on the terminal, and on Enter runs the candidate through its
//! [`ValidatorChain`].
//!
//! ```text
//!                +--------------------+
//!        +-----> |    AwaitingChar    | <------------------+
//!        |       +--------------------+                    |
//!        |          |        |       |                     |
//!        |   printable   control   ESC                     |
//!        |          v        v       v                     |
//!        +---- Printable  ControlKey  EscapeSequence ------+
//!                            |   |
//!                   CR (ok)  |   |  ETX
//!                            v   v
//!                   Submitted     Interrupted
//! ```
//!
//! The editor only handles bytes; entering and leaving raw mode is the caller's job
//! (see [`crate::utils::RawMode`]).
use crate::utils::{
    config::InputConfig,
    sanitize::{Validated, ValidatorChain},
    style::apply_style,
    terminal::InputError,
};
use crossterm::{
    cursor::{MoveLeft, MoveRight, MoveUp},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::{
    io::{self, Write},
    time::Duration,
};

/// How long a single read waits before reporting "no data".
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

const CTRL_C: u8 = 3;
const ENTER: u8 = 13;
const ESCAPE: u8 = 27;
const BACKSPACE: u8 = 127;
const PRINTABLE: std::ops::RangeInclusive<u8> = 32..=126;

const MASK: char = '*';

/// A byte stream with bounded-wait reads.
pub trait KeySource {
    /// Waits at most `timeout` for one byte. `Ok(None)` means nothing arrived.
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

/// Decoded meaning of a byte read in the idle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Interrupt,
    Submit,
    Backspace,
    Escape,
    Printable(char),
    Ignored,
}

impl From<u8> for Key {
    fn from(byte: u8) -> Self {
        match byte {
            CTRL_C => Key::Interrupt,
            ENTER => Key::Submit,
            BACKSPACE => Key::Backspace,
            ESCAPE => Key::Escape,
            b if PRINTABLE.contains(&b) => Key::Printable(char::from(b)),
            _ => Key::Ignored,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    Left,
    Right,
    Home,
    End,
}

/// Where an inserted character landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    Append,
    Middle,
}

/// The characters being edited and the cursor between them.
///
/// The cursor always stays in `0..=len`.
#[derive(Debug, Default, Clone)]
pub struct EditBuffer {
    chars: Vec<char>,
    cursor: usize,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Characters from the cursor to the end.
    pub fn tail(&self) -> &[char] {
        &self.chars[self.cursor..]
    }

    pub fn insert(&mut self, c: char) -> Insertion {
        let at_tail = self.cursor == self.chars.len();
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
        if at_tail {
            Insertion::Append
        } else {
            Insertion::Middle
        }
    }

    /// Removes the character before the cursor. Returns `false` at position 0.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Jumps to the start, returning how many columns the cursor moved.
    pub fn move_home(&mut self) -> usize {
        std::mem::take(&mut self.cursor)
    }

    /// Jumps to the end, returning how many columns the cursor moved.
    pub fn move_end(&mut self) -> usize {
        let moved = self.chars.len() - self.cursor;
        self.cursor = self.chars.len();
        moved
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }
}

/// Drives one interactive input request over a key source and an output sink.
pub struct LineEditor<'a, K, W> {
    config: &'a InputConfig,
    chain: &'a ValidatorChain,
    keys: K,
    out: W,
    buffer: EditBuffer,
}

impl<'a, K: KeySource, W: Write> LineEditor<'a, K, W> {
    pub fn new(config: &'a InputConfig, chain: &'a ValidatorChain, keys: K, out: W) -> Self {
        Self {
            config,
            chain,
            keys,
            out,
            buffer: EditBuffer::new(),
        }
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// Shows the prompt and edits until the user submits an accepted candidate.
    ///
    /// # Errors
    ///
    /// [`InputError::Interrupted`] on Ctrl-C, [`InputError::Io`] when the key source or
    /// the output fails.
    pub fn run(&mut self) -> Result<Validated<'a>, InputError> {
        self.out.write_all(self.config.styled_prompt().as_bytes())?;
        self.out.flush()?;

        loop {
            let Some(byte) = self.keys.read_byte(READ_TIMEOUT)? else {
                continue;
            };

            match Key::from(byte) {
                Key::Interrupt => {
                    tracing::debug!("input interrupted");
                    return Err(InputError::Interrupted);
                }
                Key::Submit => {
                    if let Some(validated) = self.submit()? {
                        return Ok(validated);
                    }
                }
                Key::Backspace => self.backspace()?,
                Key::Escape => {
                    if let Some(motion) = self.read_escape()? {
                        self.apply_motion(motion)?;
                    }
                }
                Key::Printable(c) => self.insert(c)?,
                Key::Ignored => tracing::trace!(byte, "ignored byte"),
            }
        }
    }

    fn submit(&mut self) -> io::Result<Option<Validated<'a>>> {
        let mut candidate = self.buffer.text();
        if candidate.is_empty() {
            if let Some(default) = self.config.default_value() {
                candidate = default.to_string();
            }
        }

        match self.chain.accept(&candidate) {
            Some(validated) => {
                queue!(self.out, Print("\r\n"), Clear(ClearType::UntilNewLine))?;
                self.out.flush()?;
                Ok(Some(validated))
            }
            None => {
                self.show_error_and_reset()?;
                Ok(None)
            }
        }
    }

    fn show_error_and_reset(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            Print("\r\n"),
            Clear(ClearType::UntilNewLine),
            Print(self.config.styled_error()),
            MoveUp(1),
            Print("\r"),
            Clear(ClearType::UntilNewLine),
            Print(self.config.styled_prompt()),
        )?;
        self.buffer.clear();
        self.out.flush()
    }

    fn backspace(&mut self) -> io::Result<()> {
        if !self.buffer.backspace() {
            return Ok(());
        }

        self.out.write_all(b"\x08 \x08")?;
        if !self.buffer.tail().is_empty() {
            self.redraw_tail()?;
        }
        self.out.flush()
    }

    /// Reads the rest of an escape sequence. Incomplete or unknown sequences yield `None`.
    fn read_escape(&mut self) -> io::Result<Option<Motion>> {
        let Some(first) = self.keys.read_byte(READ_TIMEOUT)? else {
            return Ok(None);
        };
        let Some(second) = self.keys.read_byte(READ_TIMEOUT)? else {
            return Ok(None);
        };

        if first != b'[' {
            tracing::trace!(first, second, "unknown escape sequence");
            return Ok(None);
        }

        let motion = match second {
            b'D' => Some(Motion::Left),
            b'C' => Some(Motion::Right),
            b'H' => Some(Motion::Home),
            b'F' => Some(Motion::End),
            digit if digit.is_ascii_digit() => {
                let Some(terminator) = self.keys.read_byte(READ_TIMEOUT)? else {
                    return Ok(None);
                };
                match (digit, terminator) {
                    (b'1', b'~') => Some(Motion::Home),
                    (b'4', b'~') => Some(Motion::End),
                    _ => None,
                }
            }
            _ => None,
        };
        Ok(motion)
    }

    fn apply_motion(&mut self, motion: Motion) -> io::Result<()> {
        match motion {
            Motion::Left => {
                if self.buffer.move_left() {
                    queue!(self.out, MoveLeft(1))?;
                }
            }
            Motion::Right => {
                if self.buffer.move_right() {
                    queue!(self.out, MoveRight(1))?;
                }
            }
            Motion::Home => {
                let moved = self.buffer.move_home();
                if moved > 0 {
                    queue!(self.out, MoveLeft(columns(moved)))?;
                }
            }
            Motion::End => {
                let moved = self.buffer.move_end();
                if moved > 0 {
                    queue!(self.out, MoveRight(columns(moved)))?;
                }
            }
        }
        self.out.flush()
    }

    fn insert(&mut self, c: char) -> io::Result<()> {
        if self
            .config
            .max_length()
            .is_some_and(|max| self.buffer.len() >= max)
        {
            return Ok(());
        }

        let insertion = self.buffer.insert(c);
        self.echo(c)?;
        if insertion == Insertion::Middle {
            self.redraw_tail()?;
        }
        self.out.flush()
    }

    fn echo(&mut self, c: char) -> io::Result<()> {
        if self.config.is_password() {
            queue!(self.out, Print(MASK))
        } else {
            let styled = apply_style(c.encode_utf8(&mut [0; 4]), self.config.input_style());
            queue!(self.out, Print(styled))
        }
    }

    /// Clears from the cursor and reprints the characters after it, leaving the
    /// terminal cursor where the buffer cursor is.
    fn redraw_tail(&mut self) -> io::Result<()> {
        let tail: String = self.buffer.tail().iter().collect();
        let count = self.buffer.tail().len();

        queue!(self.out, Clear(ClearType::UntilNewLine))?;
        if self.config.is_password() {
            queue!(self.out, Print(MASK.to_string().repeat(count)))?;
        } else {
            queue!(self.out, Print(apply_style(&tail, self.config.input_style())))?;
        }
        if count > 0 {
            queue!(self.out, MoveLeft(columns(count)))?;
        }
        Ok(())
    }
}

fn columns(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
