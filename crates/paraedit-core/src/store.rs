//! Ordered paragraph storage.
//!
//! Positions are 1-based and always contiguous. Inserts accept `1..=len+1`;
//! every other operation accepts `1..=len`. A missing position targets the
//! end of the list (inserts) or the last paragraph (everything else).
//!
//! All text entering the store passes through [`sanitize`].

use tracing::debug;

use crate::error::{EditError, EditResult};
use crate::text::sanitize;

/// Default filler paragraph used by `DUMMY`.
pub const DUMMY_TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
     Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. \
     Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris.";

/// What to do when inserting at a position that is already occupied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
    /// Replace the paragraph at the position.
    #[default]
    Overwrite,
    /// Insert before it, moving it and every later paragraph down by one.
    Shift,
}

impl Placement {
    /// Interpret a user's answer to the overwrite/shift question.
    ///
    /// Only `s` (any case, surrounding whitespace ignored) selects
    /// [`Placement::Shift`]; anything else overwrites.
    pub fn from_answer(answer: &str) -> Self {
        if answer.trim().eq_ignore_ascii_case("s") {
            Self::Shift
        } else {
            Self::Overwrite
        }
    }
}

/// The paragraph list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParagraphStore {
    paragraphs: Vec<String>,
}

impl ParagraphStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            paragraphs: Vec::new(),
        }
    }

    /// Number of paragraphs.
    pub const fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Returns `true` if the store holds no paragraphs.
    pub const fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// The paragraph at `position`, if it exists.
    pub fn get(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.paragraphs.get(i))
            .map(String::as_str)
    }

    /// Read-only view of all paragraphs in order.
    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// Validate `position` as an insertion point (`1..=len+1`).
    ///
    /// A missing position is always valid.
    pub fn check_insert(&self, position: Option<usize>) -> EditResult<()> {
        let max = self.paragraphs.len() + 1;
        match position {
            Some(p) if p < 1 || p > max => Err(EditError::PositionOutOfRange { position: p, max }),
            _ => Ok(()),
        }
    }

    /// Resolve `position` to an existing paragraph (`1..=len`).
    ///
    /// A missing position resolves to the last paragraph.
    pub fn resolve(&self, position: Option<usize>) -> EditResult<usize> {
        let max = self.paragraphs.len();
        if max == 0 {
            return Err(EditError::EmptyCollection);
        }
        match position {
            None => Ok(max),
            Some(p) if p < 1 || p > max => Err(EditError::PositionOutOfRange { position: p, max }),
            Some(p) => Ok(p),
        }
    }

    /// The paragraph an insert at `position` would collide with.
    ///
    /// Returns `None` for appends (missing position or `len+1`) and for
    /// invalid positions.
    pub fn occupant(&self, position: Option<usize>) -> Option<&str> {
        position.and_then(|p| self.get(p))
    }

    /// Add `text` at `position`.
    ///
    /// The text is sanitized first. Without a position, or at `len+1`, the
    /// paragraph is appended. At an occupied position `placement` decides
    /// between overwriting and shifting. Returns the paragraph's position.
    pub fn add(
        &mut self,
        text: &str,
        position: Option<usize>,
        placement: Placement,
    ) -> EditResult<usize> {
        self.check_insert(position)?;
        let cleaned = sanitize(text);

        let at = match position {
            Some(p) if p <= self.paragraphs.len() => {
                match placement {
                    Placement::Overwrite => self.paragraphs[p - 1] = cleaned,
                    Placement::Shift => self.paragraphs.insert(p - 1, cleaned),
                }
                debug!(position = p, ?placement, "paragraph placed");
                p
            }
            _ => {
                self.paragraphs.push(cleaned);
                debug!(position = self.paragraphs.len(), "paragraph appended");
                self.paragraphs.len()
            }
        };
        Ok(at)
    }

    /// Add `filler` with the positional rules of [`add`](Self::add).
    pub fn insert_dummy(
        &mut self,
        filler: &str,
        position: Option<usize>,
        placement: Placement,
    ) -> EditResult<usize> {
        self.add(filler, position, placement)
    }

    /// Remove the paragraph at `position` (default: the last one).
    ///
    /// Returns the removed position and text.
    pub fn delete(&mut self, position: Option<usize>) -> EditResult<(usize, String)> {
        let at = self.resolve(position)?;
        let removed = self.paragraphs.remove(at - 1);
        debug!(position = at, remaining = self.paragraphs.len(), "paragraph deleted");
        Ok((at, removed))
    }

    /// Replace every occurrence of `search` with `replacement` in the
    /// paragraph at `position` (default: the last one).
    ///
    /// Fails without touching the paragraph if `search` does not occur in
    /// it. The result is sanitized before it is stored. Returns the
    /// paragraph's position.
    pub fn replace(
        &mut self,
        position: Option<usize>,
        search: &str,
        replacement: &str,
    ) -> EditResult<usize> {
        let at = self.resolve(position)?;
        let paragraph = &mut self.paragraphs[at - 1];
        if !paragraph.contains(search) {
            return Err(EditError::TextNotFound(search.to_string()));
        }

        *paragraph = sanitize(&paragraph.replace(search, replacement));
        debug!(position = at, "paragraph text replaced");
        Ok(at)
    }
}
