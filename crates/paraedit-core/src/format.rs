//! Paragraph rendering.
//!
//! Two output modes exist:
//!
//! - [`FormatMode::Raw`] lists every paragraph on one line as `<i>: text`.
//! - [`FormatMode::Fix`] wraps each paragraph greedily to a fixed width and
//!   separates paragraphs with a blank line. Words longer than the width are
//!   split into width-sized chunks.
//!
//! Widths are measured in characters, not bytes.

use std::fmt;
use std::num::NonZeroUsize;

/// Shown instead of a listing when there is nothing to render.
pub const NO_PARAGRAPHS: &str = "No paragraphs available.";

/// The active output mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatMode {
    /// Numbered, unwrapped listing.
    #[default]
    Raw,
    /// Greedy wrap at the given column width.
    Fix(NonZeroUsize),
}

impl fmt::Display for FormatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str("RAW"),
            Self::Fix(width) => write!(f, "FIX with width {width}"),
        }
    }
}

/// Holds the output mode and renders paragraph lists with it.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    mode: FormatMode,
}

impl Formatter {
    /// Create a formatter starting in `mode`.
    pub const fn new(mode: FormatMode) -> Self {
        Self { mode }
    }

    /// The current mode.
    pub const fn mode(&self) -> FormatMode {
        self.mode
    }

    /// Switch to RAW output.
    pub const fn set_raw(&mut self) {
        self.mode = FormatMode::Raw;
    }

    /// Switch to FIX output with `width` columns.
    pub const fn set_fix(&mut self, width: NonZeroUsize) {
        self.mode = FormatMode::Fix(width);
    }

    /// Switch to `mode`.
    pub const fn set_mode(&mut self, mode: FormatMode) {
        self.mode = mode;
    }

    /// Render `paragraphs` in the current mode.
    #[tracing::instrument(skip_all, fields(mode = %self.mode, count = paragraphs.len()))]
    pub fn render<S: AsRef<str>>(&self, paragraphs: &[S]) -> String {
        if paragraphs.is_empty() {
            return NO_PARAGRAPHS.to_string();
        }

        match self.mode {
            FormatMode::Raw => render_raw(paragraphs),
            FormatMode::Fix(width) => render_fixed(paragraphs, width),
        }
    }
}

fn render_raw<S: AsRef<str>>(paragraphs: &[S]) -> String {
    paragraphs
        .iter()
        .enumerate()
        .map(|(i, p)| format!("<{}>: {}", i + 1, p.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_fixed<S: AsRef<str>>(paragraphs: &[S], width: NonZeroUsize) -> String {
    let mut lines = Vec::new();
    for paragraph in paragraphs {
        lines.extend(wrap(paragraph.as_ref(), width));
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Greedily wrap `text` into lines of at most `width` characters.
///
/// Words are taken in order. A word that fits on the current line (with one
/// separating space) is appended; otherwise the line is flushed and the word
/// starts a new one. A word longer than `width` flushes the pending line and
/// is emitted as consecutive `width`-sized chunks, the last possibly shorter.
pub fn wrap(text: &str, width: NonZeroUsize) -> Vec<String> {
    let width = width.get();
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            lines.extend(split_long_word(word, width));
        } else if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn split_long_word(word: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
