//! Error types for paraedit-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reasons an input line is not a valid command.
///
/// Every variant is reported to the user the same way ("Unknown command!");
/// the distinction exists for logging and tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line contained no tokens.
    #[error("empty input")]
    Empty,

    /// The first token is not one of the command keywords.
    #[error("unknown keyword: {0}")]
    UnknownKeyword(String),

    /// A position token was present but is neither `N` nor `[N]`.
    #[error("malformed position: {0}")]
    MalformedPosition(String),

    /// `FORMAT` without a mode.
    #[error("missing format mode")]
    MissingFormatMode,

    /// `FORMAT` with a mode other than `RAW` or `FIX`.
    #[error("unknown format mode: {0}")]
    UnknownFormatMode(String),

    /// `FORMAT FIX` without a positive integer width.
    #[error("invalid width: {0:?}")]
    InvalidWidth(Option<String>),
}

/// Result type alias using [`ParseError`].
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised by paragraph mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The position is outside the window valid for the operation.
    #[error("position {position} out of range (allowed: 1..{max})")]
    PositionOutOfRange {
        /// The rejected position.
        position: usize,
        /// The largest position the operation accepts.
        max: usize,
    },

    /// The operation needs at least one paragraph.
    #[error("no paragraphs available")]
    EmptyCollection,

    /// The search text does not occur in the target paragraph.
    #[error("text not found: {0:?}")]
    TextNotFound(String),
}

/// Result type alias using [`EditError`].
pub type EditResult<T> = Result<T, EditError>;

/// Errors that end an editing session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The user interrupted input (e.g. Ctrl-C).
    #[error("interrupted")]
    Interrupted,

    /// The input source has no more lines.
    #[error("input closed")]
    InputClosed,

    /// Reading input or writing output failed.
    #[error(transparent)]
    Io(std::io::Error),
}

impl From<std::io::Error> for SessionError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::Interrupted {
            Self::Interrupted
        } else {
            Self::Io(err)
        }
    }
}

/// Result type alias using [`SessionError`].
pub type SessionResult<T> = Result<T, SessionError>;
