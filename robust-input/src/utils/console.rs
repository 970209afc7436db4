//! # Console keys
//!
//! Raw mode and key input through crossterm, for consoles that have no termios (Windows).
//! Key events are translated back into the byte protocol [`LineEditor`] speaks, so the
//! editing and masking behavior is the same everywhere.
//!
//! [`LineEditor`]: crate::utils::LineEditor
use crate::utils::editor::KeySource;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
};
use std::{collections::VecDeque, io, time::Duration};

/// Leaves console raw mode on drop.
#[derive(Debug)]
pub struct ConsoleRawMode;

impl ConsoleRawMode {
    /// # Errors
    ///
    /// Fails when the console mode cannot be changed.
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        tracing::debug!("console raw mode enabled");
        Ok(Self)
    }
}

impl Drop for ConsoleRawMode {
    fn drop(&mut self) {
        match terminal::disable_raw_mode() {
            Ok(()) => tracing::debug!("console mode restored"),
            Err(e) => tracing::warn!("failed to restore console mode: {}", e),
        }
    }
}

/// Bytes for one key press, as a raw unix terminal would send them.
pub fn key_bytes(key: KeyEvent) -> Vec<u8> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return Vec::new();
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => vec![3],
        KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => Vec::new(),
        KeyCode::Char(c) => c.to_string().into_bytes(),
        KeyCode::Enter => vec![13],
        KeyCode::Backspace => vec![127],
        KeyCode::Left => b"\x1b[D".to_vec(),
        KeyCode::Right => b"\x1b[C".to_vec(),
        KeyCode::Home => b"\x1b[H".to_vec(),
        KeyCode::End => b"\x1b[F".to_vec(),
        _ => Vec::new(),
    }
}

/// Reads console key events and hands them out one byte at a time.
#[derive(Debug, Default)]
pub struct ConsoleKeys {
    pending: VecDeque<u8>,
}

impl ConsoleKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeySource for ConsoleKeys {
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pending.pop_front() {
            return Ok(Some(byte));
        }

        if !event::poll(timeout)? {
            return Ok(None);
        }
        if let Event::Key(key) = event::read()? {
            self.pending.extend(key_bytes(key));
        }
        Ok(self.pending.pop_front())
    }
}
