//! Terminal and stream adapters for [`Console`].
//!
//! [`ReadlineConsole`] drives an interactive terminal with line editing and
//! history. [`StreamConsole`] reads from any buffered reader, which covers
//! piped stdin and `--script` files.

use std::io::{self, BufRead, Write};

use owo_colors::{OwoColorize, Stream};
use paraedit_core::session::{Console, Tone};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

/// Apply the color for `tone` if stdout supports it.
fn styled(tone: Tone, text: &str) -> String {
    match tone {
        Tone::Plain => text.to_string(),
        Tone::Success => text
            .if_supports_color(Stream::Stdout, |t| t.green())
            .to_string(),
        Tone::Error => text
            .if_supports_color(Stream::Stdout, |t| t.red())
            .to_string(),
    }
}

/// Interactive console backed by rustyline.
pub struct ReadlineConsole {
    editor: DefaultEditor,
}

impl ReadlineConsole {
    /// Open the terminal for line editing.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Console for ReadlineConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty()
                    && let Err(err) = self.editor.add_history_entry(line.as_str())
                {
                    debug!(%err, "history entry not recorded");
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) => Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "interrupted by user",
            )),
            Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(err)) => Err(err),
            Err(err) => Err(io::Error::other(err)),
        }
    }

    fn display(&mut self, tone: Tone, text: &str) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{}", styled(tone, text))
    }
}

/// Console over a buffered reader and a writer.
///
/// Prompts are written before each read. Only the line terminator (`\n` or
/// `\r\n`) is stripped from input. Bytes that are not UTF-8 become U+FFFD.
pub struct StreamConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StreamConsole<R, W> {
    /// Wrap `input` and `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Recover the writer.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for StreamConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if !prompt.is_empty() {
            self.output.write_all(prompt.as_bytes())?;
            self.output.flush()?;
        }

        let mut buffer = Vec::new();
        if self.input.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(None);
        }
        if buffer.ends_with(b"\n") {
            buffer.pop();
            if buffer.ends_with(b"\r") {
                buffer.pop();
            }
        }
        let line = String::from_utf8_lossy(&buffer).into_owned();
        Ok(Some(line))
    }

    fn display(&mut self, tone: Tone, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", styled(tone, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console(input: &str) -> StreamConsole<&[u8], Vec<u8>> {
        StreamConsole::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn strips_only_line_terminators() {
        let mut c = console("  spaced  \r\nlast");
        assert_eq!(c.read_line("").unwrap().as_deref(), Some("  spaced  "));
        assert_eq!(c.read_line("").unwrap().as_deref(), Some("last"));
        assert_eq!(c.read_line("").unwrap(), None);
    }

    #[test]
    fn empty_line_is_not_end_of_input() {
        let mut c = console("\n");
        assert_eq!(c.read_line("").unwrap().as_deref(), Some(""));
        assert_eq!(c.read_line("").unwrap(), None);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let mut c = StreamConsole::new(&b"ADD\n\xff\xfeok\nPRINT\n"[..], Vec::new());
        assert_eq!(c.read_line("").unwrap().as_deref(), Some("ADD"));
        assert_eq!(
            c.read_line("").unwrap().as_deref(),
            Some("\u{FFFD}\u{FFFD}ok")
        );
        assert_eq!(c.read_line("").unwrap().as_deref(), Some("PRINT"));
    }

    #[test]
    fn writes_prompts_and_messages() {
        let mut c = console("PRINT\n");
        c.read_line("> ").unwrap();
        c.display(Tone::Plain, "hello").unwrap();
        let out = String::from_utf8(c.into_output()).unwrap();
        assert_eq!(out, "> hello\n");
    }
}
