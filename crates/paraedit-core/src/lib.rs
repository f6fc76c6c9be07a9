//! Core library for paraedit.
//!
//! This crate holds the editing model behind the `paraedit` CLI: command
//! parsing, the paragraph store, RAW/FIX rendering, the term index and the
//! session loop that ties them together.
//!
//! # Modules
//!
//! - [`command`] - Parsing of command lines
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`format`] - RAW listing and fixed-width wrapping
//! - [`index`] - Index of capitalized terms
//! - [`session`] - Command dispatch against a [`Console`]
//! - [`store`] - The ordered paragraph collection
//! - [`text`] - Character filtering and previews
//!
//! # Quick Start
//!
//! ```
//! use paraedit_core::{FormatMode, ParagraphStore, Placement, Formatter};
//! use std::num::NonZeroUsize;
//!
//! let mut store = ParagraphStore::new();
//! store.add("The quick brown fox jumps", None, Placement::default()).unwrap();
//!
//! let width = NonZeroUsize::new(10).unwrap();
//! let out = Formatter::new(FormatMode::Fix(width)).render(store.paragraphs());
//! assert_eq!(out, "The quick\nbrown fox\njumps\n");
//! ```
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod error;
pub mod format;
pub mod index;
pub mod session;
pub mod store;
pub mod text;

pub use command::Command;
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use error::{
    ConfigError, ConfigResult, EditError, EditResult, ParseError, ParseResult, SessionError,
    SessionResult,
};
pub use format::{FormatMode, Formatter};
pub use index::{IndexBuilder, IndexEntry, TermIndex};
pub use session::{Console, Flow, ReportStyle, Session, SessionSettings, Tone};
pub use store::{ParagraphStore, Placement};
