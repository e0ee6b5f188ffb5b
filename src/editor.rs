//! Byte-at-a-time line editing with command name completion.
//!
//! The editor expects the terminal to be in raw mode: it echoes what the user
//! types itself and interprets a handful of control bytes. Editing only
//! happens at the end of the line.

use crate::error::{Result, ShellError};
use std::io::{self, Read, Write};

const TAB: u8 = b'\t';
const NEWLINE: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';
const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;
const INTERRUPT: u8 = 0x03;
const BELL: &[u8] = b"\x07";

/// Source of completion candidates for the command being typed.
pub trait Completer {
    /// Every name `prefix` is a strict prefix of, without duplicates.
    fn candidates(&self, prefix: &str) -> Vec<String>;
}

/// How a call to [`LineEditor::read_line`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Enter was pressed; the line without its terminator.
    Line(String),
    /// The interrupt byte was received.
    Interrupted,
}

/// Line editor over an input byte stream and an output stream.
pub struct LineEditor<R, W> {
    input: R,
    output: W,
}

impl<R: Read, W: Write> LineEditor<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `prompt` and edit one line until Enter or interrupt.
    ///
    /// End of input and read failures are fatal.
    pub fn read_line(
        &mut self,
        prompt: &str,
        completer: &dyn Completer,
    ) -> Result<ReadOutcome> {
        self.output
            .write_all(prompt.as_bytes())
            .map_err(ShellError::Input)?;
        self.output.flush().map_err(ShellError::Input)?;

        let mut line = LineBuffer::default();
        loop {
            let byte = self.read_byte()?;
            self.handle_byte(byte, prompt, &mut line, completer)
                .map_err(ShellError::Input)?;
            match byte {
                NEWLINE => return Ok(ReadOutcome::Line(line.text)),
                INTERRUPT => return Ok(ReadOutcome::Interrupted),
                _ => {}
            }
        }
    }

    fn handle_byte(
        &mut self,
        byte: u8,
        prompt: &str,
        line: &mut LineBuffer,
        completer: &dyn Completer,
    ) -> io::Result<()> {
        match byte {
            TAB => self.complete(prompt, line, completer)?,
            BACKSPACE | DELETE => {
                if line.pop() {
                    self.output.write_all(b"\x08 \x08")?;
                }
            }
            NEWLINE => self.output.write_all(b"\n")?,
            CARRIAGE_RETURN => {}
            INTERRUPT => self.output.write_all(b"^C\n")?,
            _ => {
                self.output.write_all(&[byte])?;
                line.push_byte(byte);
            }
        }
        self.output.flush()
    }

    fn complete(
        &mut self,
        prompt: &str,
        line: &mut LineBuffer,
        completer: &dyn Completer,
    ) -> io::Result<()> {
        let Some(completed) = complete_command(&line.text, completer) else {
            return self.output.write_all(BELL);
        };
        line.replace(completed);
        // Return to column 0, clear the line, redraw.
        write!(self.output, "\r\x1b[K{}{}", prompt, line.text)
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(0) => return Err(ShellError::InputClosed),
                Ok(_) => return Ok(buf[0]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ShellError::Input(e)),
            }
        }
    }
}

/// The new buffer when `buffer` completes to exactly one command name.
///
/// Only the leading command token is completed, so a buffer that already
/// contains whitespace never completes.
pub fn complete_command(buffer: &str, completer: &dyn Completer) -> Option<String> {
    if buffer.contains(char::is_whitespace) {
        return None;
    }
    let mut candidates = completer.candidates(buffer);
    log::debug!("{} completion candidates for {buffer:?}", candidates.len());
    match candidates.len() {
        1 => candidates.pop().map(|name| name + " "),
        _ => None,
    }
}

/// The characters typed so far plus any incomplete UTF-8 sequence.
#[derive(Debug, Default)]
struct LineBuffer {
    text: String,
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push_byte(&mut self, byte: u8) {
        if self.pending.is_empty() && byte.is_ascii() {
            self.text.push(byte as char);
            return;
        }
        self.pending.push(byte);
        match std::str::from_utf8(&self.pending) {
            Ok(s) => {
                self.text.push_str(s);
                self.pending.clear();
            }
            // Incomplete sequence: wait for more bytes.
            Err(e) if e.error_len().is_none() => {}
            Err(_) => {
                self.text.push(char::REPLACEMENT_CHARACTER);
                self.pending.clear();
            }
        }
    }

    /// Remove the last character. Returns false when there was nothing to remove.
    fn pop(&mut self) -> bool {
        if !self.pending.is_empty() {
            self.pending.clear();
            return true;
        }
        self.text.pop().is_some()
    }

    fn replace(&mut self, text: String) {
        self.text = text;
        self.pending.clear();
    }
}
