//! Term index of capitalized words.
//!
//! A term is a word that starts with an uppercase letter (`A`–`Z`, `Ä`, `Ö`,
//! `Ü`) followed by letters only. For each distinct term the index records
//! the 1-based positions of the paragraphs containing it, each paragraph at
//! most once. Only terms recorded in more than `threshold` paragraphs are
//! kept, sorted by code point.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Default number of paragraphs a term must exceed to be indexed.
pub const DEFAULT_THRESHOLD: usize = 3;

static TERM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-ZÄÖÜ][a-zäöüA-ZÄÖÜ]*\b").expect("valid regex"));

/// Iterate over the term occurrences in `text`, in order.
pub fn find_terms(text: &str) -> impl Iterator<Item = &str> {
    TERM_PATTERN.find_iter(text).map(|m| m.as_str())
}

/// One indexed term and the paragraphs it appears in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    /// The term, case preserved.
    pub term: String,
    /// Ascending, duplicate-free 1-based paragraph positions.
    pub positions: Vec<usize>,
}

/// The filtered, sorted index produced by [`IndexBuilder::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermIndex {
    threshold: usize,
    entries: Vec<IndexEntry>,
}

impl TermIndex {
    /// Entries in ascending term order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Returns `true` if no term passed the threshold.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of indexed terms.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Positions recorded for `term`, if it was indexed.
    pub fn get(&self, term: &str) -> Option<&[usize]> {
        self.entries
            .binary_search_by(|e| e.term.as_str().cmp(term))
            .ok()
            .map(|i| self.entries[i].positions.as_slice())
    }
}

impl fmt::Display for TermIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(
                f,
                "No terms found (must occur > {} times).",
                self.threshold
            );
        }

        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            let positions: Vec<String> = entry.positions.iter().map(ToString::to_string).collect();
            write!(f, "{} {}", entry.term, positions.join(","))?;
        }
        Ok(())
    }
}

/// Builds a [`TermIndex`] from a paragraph list.
#[derive(Debug, Clone, Copy)]
pub struct IndexBuilder {
    threshold: usize,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl IndexBuilder {
    /// Keep terms found in more than `threshold` paragraphs.
    pub const fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// The configured threshold.
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// Scan `paragraphs` in order and build the filtered index.
    #[tracing::instrument(skip_all, fields(count = paragraphs.len(), threshold = self.threshold))]
    pub fn build<S: AsRef<str>>(&self, paragraphs: &[S]) -> TermIndex {
        let mut occurrences: HashMap<&str, Vec<usize>> = HashMap::new();

        for (i, paragraph) in paragraphs.iter().enumerate() {
            let position = i + 1;
            for term in find_terms(paragraph.as_ref()) {
                let positions = occurrences.entry(term).or_default();
                // Paragraphs are scanned in order, so a repeat is always the tail.
                if positions.last() != Some(&position) {
                    positions.push(position);
                }
            }
        }

        let total_terms = occurrences.len();
        let mut entries: Vec<IndexEntry> = occurrences
            .into_iter()
            .filter(|(_, positions)| positions.len() > self.threshold)
            .map(|(term, positions)| IndexEntry {
                term: term.to_string(),
                positions,
            })
            .collect();
        entries.sort_by(|a, b| a.term.cmp(&b.term));

        tracing::debug!(total_terms, indexed = entries.len(), "index built");

        TermIndex {
            threshold: self.threshold,
            entries,
        }
    }
}
