//! Interactive editing session.
//!
//! A [`Session`] owns the paragraph store, the formatter and the index
//! builder, and executes one [`Command`] at a time. All user interaction
//! goes through a [`Console`], so the session itself never touches the
//! terminal.
//!
//! Positions are validated before any follow-up prompt: a command that will
//! be rejected never asks for text.

use std::io;

use tracing::{debug, info, instrument, warn};

use crate::command::{self, Command};
use crate::config::{Config, DEFAULT_PREVIEW_CHARS};
use crate::error::{EditError, SessionError, SessionResult};
use crate::format::{FormatMode, Formatter};
use crate::index::IndexBuilder;
use crate::store::{DUMMY_TEXT, ParagraphStore, Placement};
use crate::text::preview;

/// Prompt shown when waiting for the next command.
pub const COMMAND_PROMPT: &str = "> ";

/// Prompt for the overwrite-or-shift decision.
pub const PLACEMENT_PROMPT: &str = "Overwrite (o) or shift down (s)? [o/s] > ";

/// How a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Prompts, listings and reports.
    Plain,
    /// Confirmation of a completed command.
    Success,
    /// A rejected or failed command.
    Error,
}

/// Line-oriented input and output used by a [`Session`].
pub trait Console {
    /// Show `prompt` and read one line without its terminator.
    ///
    /// Returns `Ok(None)` once input is exhausted. An error of kind
    /// [`io::ErrorKind::Interrupted`] means the user asked to stop;
    /// [`io::ErrorKind::InvalidData`] means one line could not be decoded.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Show `text` to the user.
    fn display(&mut self, tone: Tone, text: &str) -> io::Result<()>;
}

/// Whether the session keeps reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command.
    Continue,
    /// The session has ended.
    Exit,
}

/// How `INDEX` output is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportStyle {
    /// One `Term p1,p2` line per term.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Tunables for a new [`Session`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    /// Output mode at start.
    pub format: FormatMode,
    /// A term must appear in more than this many paragraphs to be indexed.
    pub index_threshold: usize,
    /// Filler paragraph for `DUMMY`.
    pub dummy_text: String,
    /// Characters of the existing paragraph shown on a collision.
    pub preview_chars: usize,
    /// Rendering of `INDEX` output.
    pub report_style: ReportStyle,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            format: FormatMode::Raw,
            index_threshold: IndexBuilder::default().threshold(),
            dummy_text: DUMMY_TEXT.to_string(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
            report_style: ReportStyle::Text,
        }
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            format: config.initial_format(),
            index_threshold: config.index_threshold(),
            dummy_text: config.dummy_text().to_string(),
            preview_chars: config.preview_chars(),
            report_style: ReportStyle::Text,
        }
    }
}

/// Editor state and command execution.
#[derive(Debug)]
pub struct Session {
    store: ParagraphStore,
    formatter: Formatter,
    indexer: IndexBuilder,
    dummy_text: String,
    preview_chars: usize,
    report_style: ReportStyle,
    running: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

impl Session {
    /// Create a session with an empty store.
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            store: ParagraphStore::new(),
            formatter: Formatter::new(settings.format),
            indexer: IndexBuilder::new(settings.index_threshold),
            dummy_text: settings.dummy_text,
            preview_chars: settings.preview_chars,
            report_style: settings.report_style,
            running: true,
        }
    }

    /// The paragraphs edited so far.
    pub const fn store(&self) -> &ParagraphStore {
        &self.store
    }

    /// The current output formatter.
    pub const fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Returns `false` once `EXIT` has been executed.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Read and execute commands until `EXIT`, end of input or interrupt.
    ///
    /// End of input and interrupts end the session normally with a closing
    /// notice. Undecodable input abandons the current command and the loop
    /// goes on. Other I/O failures are returned as errors.
    #[instrument(skip_all)]
    pub fn run<C: Console + ?Sized>(&mut self, console: &mut C) -> SessionResult<()> {
        info!("session started");
        console.display(Tone::Plain, "=== Editor started ===")?;
        console.display(Tone::Plain, "Type 'EXIT' to quit")?;
        console.display(Tone::Plain, "")?;

        while self.running {
            let outcome = next_line(console, COMMAND_PROMPT)
                .and_then(|line| self.process_line(&line, console));
            match outcome {
                Ok(_) => {}
                Err(SessionError::Interrupted | SessionError::InputClosed) => {
                    console.display(Tone::Plain, "Exiting program...")?;
                    self.running = false;
                }
                Err(SessionError::Io(err)) if err.kind() == io::ErrorKind::InvalidData => {
                    warn!(%err, "unreadable input line skipped");
                    console.display(Tone::Error, &format!("Error: {err}"))?;
                }
                Err(err) => return Err(err),
            }
        }

        info!(paragraphs = self.store.len(), "session ended");
        Ok(())
    }

    /// Parse and execute one input line.
    ///
    /// Invalid input is reported as "Unknown command!" and leaves the
    /// session unchanged.
    pub fn process_line<C: Console + ?Sized>(
        &mut self,
        line: &str,
        console: &mut C,
    ) -> SessionResult<Flow> {
        match command::parse(line) {
            Ok(command) => self.execute(command, console),
            Err(err) => {
                debug!(%err, "input rejected");
                console.display(Tone::Error, "Unknown command!")?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Execute a parsed command.
    #[instrument(skip(self, console), fields(command = %command))]
    pub fn execute<C: Console + ?Sized>(
        &mut self,
        command: Command,
        console: &mut C,
    ) -> SessionResult<Flow> {
        match command {
            Command::Add { position } => self.add(position, console)?,
            Command::Delete { position } => self.delete(position, console)?,
            Command::Dummy { position } => self.dummy(position, console)?,
            Command::Replace { position } => self.replace(position, console)?,
            Command::Format(mode) => {
                self.formatter.set_mode(mode);
                console.display(Tone::Success, &format!("Format set to {mode}."))?;
            }
            Command::Print => {
                let output = self.formatter.render(self.store.paragraphs());
                console.display(Tone::Plain, &output)?;
            }
            Command::Index => {
                let index = self.indexer.build(self.store.paragraphs());
                let output = match self.report_style {
                    ReportStyle::Text => index.to_string(),
                    ReportStyle::Json => {
                        serde_json::to_string_pretty(&index).map_err(io::Error::other)?
                    }
                };
                console.display(Tone::Plain, &output)?;
            }
            Command::Exit => {
                console.display(Tone::Plain, "Editor is closing.")?;
                self.running = false;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn add<C: Console + ?Sized>(
        &mut self,
        position: Option<usize>,
        console: &mut C,
    ) -> SessionResult<()> {
        if let Err(err) = self.store.check_insert(position) {
            return report(console, &format!("Error adding paragraph. {}", reason(&err)));
        }

        console.display(Tone::Plain, "Enter text:")?;
        let text = next_line(console, "")?;
        let placement = self.ask_placement(position, console)?;

        match self.store.add(&text, position, placement) {
            Ok(_) => {
                let message = match position {
                    Some(p) => format!("Paragraph added at position {p}."),
                    None => "Paragraph added.".to_string(),
                };
                console.display(Tone::Success, &message)?;
            }
            Err(err) => report(console, &format!("Error adding paragraph. {}", reason(&err)))?,
        }
        Ok(())
    }

    fn delete<C: Console + ?Sized>(
        &mut self,
        position: Option<usize>,
        console: &mut C,
    ) -> SessionResult<()> {
        match self.store.delete(position) {
            Ok((at, _)) => console.display(Tone::Success, &format!("Paragraph {at} deleted."))?,
            Err(err) => report(
                console,
                &format!("Error deleting paragraph. {}", reason(&err)),
            )?,
        }
        Ok(())
    }

    fn dummy<C: Console + ?Sized>(
        &mut self,
        position: Option<usize>,
        console: &mut C,
    ) -> SessionResult<()> {
        if let Err(err) = self.store.check_insert(position) {
            return report(
                console,
                &format!("Error inserting dummy text. {}", reason(&err)),
            );
        }

        let placement = self.ask_placement(position, console)?;
        match self.store.insert_dummy(&self.dummy_text, position, placement) {
            Ok(at) => console.display(
                Tone::Success,
                &format!("Dummy text inserted at position {at}."),
            )?,
            Err(err) => report(
                console,
                &format!("Error inserting dummy text. {}", reason(&err)),
            )?,
        }
        Ok(())
    }

    fn replace<C: Console + ?Sized>(
        &mut self,
        position: Option<usize>,
        console: &mut C,
    ) -> SessionResult<()> {
        let at = match self.store.resolve(position) {
            Ok(at) => at,
            Err(EditError::EmptyCollection) => {
                return report(console, "No paragraphs available.");
            }
            Err(err) => {
                return report(console, &format!("Error replacing text. {}", reason(&err)));
            }
        };

        console.display(Tone::Plain, "Text to search for:")?;
        let search = next_line(console, "")?;
        console.display(Tone::Plain, "Replacement text:")?;
        let replacement = next_line(console, "")?;

        match self.store.replace(Some(at), &search, &replacement) {
            Ok(at) => console.display(Tone::Success, &format!("Text replaced in paragraph {at}."))?,
            Err(err) => {
                debug!(%err, "replace failed");
                report(console, "Text not found or replacement failed.")?;
            }
        }
        Ok(())
    }

    /// Ask overwrite-or-shift if `position` names an occupied slot.
    fn ask_placement<C: Console + ?Sized>(
        &self,
        position: Option<usize>,
        console: &mut C,
    ) -> SessionResult<Placement> {
        let (Some(at), Some(existing)) = (position, self.store.occupant(position)) else {
            return Ok(Placement::default());
        };

        console.display(
            Tone::Plain,
            &format!("A paragraph already exists at position {at}:"),
        )?;
        console.display(
            Tone::Plain,
            &format!("→ {}", preview(existing, self.preview_chars)),
        )?;
        let answer = next_line(console, PLACEMENT_PROMPT)?;
        Ok(Placement::from_answer(&answer))
    }
}

/// Read a line, treating end of input as [`SessionError::InputClosed`].
fn next_line<C: Console + ?Sized>(console: &mut C, prompt: &str) -> SessionResult<String> {
    console.read_line(prompt)?.ok_or(SessionError::InputClosed)
}

fn report<C: Console + ?Sized>(console: &mut C, message: &str) -> SessionResult<()> {
    console.display(Tone::Error, message)?;
    Ok(())
}

/// The user-facing sentence for an edit failure.
fn reason(err: &EditError) -> String {
    match err {
        EditError::PositionOutOfRange { max, .. } => {
            format!("Position out of range (allowed: 1..{max}).")
        }
        EditError::EmptyCollection => "No paragraphs available.".to_string(),
        EditError::TextNotFound(_) => "Text not found.".to_string(),
    }
}
