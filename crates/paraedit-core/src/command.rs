//! Command parsing.
//!
//! A command line is split on whitespace. The first token selects one of the
//! eight keywords (case-insensitive); the remaining tokens are interpreted per
//! keyword:
//!
//! - `ADD`, `DEL`, `DUMMY`, `REPLACE` take an optional position written as
//!   `3` or `[3]`. Any other second token makes the line invalid.
//! - `FORMAT` requires `RAW`, or `FIX` followed by a positive width.
//! - `EXIT`, `INDEX`, `PRINT` ignore trailing tokens.
//!
//! Positions are not range-checked here; the session validates them against
//! the store before prompting for anything.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ParseError, ParseResult};
use crate::format::FormatMode;

/// Matches `3` or `[3]`.
static POSITION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\[([0-9]+)\]|([0-9]+))$").expect("valid regex"));

/// A parsed editor command.
///
/// `position` is 1-based; `None` means the operation's default target (the
/// end of the list for inserts, the last paragraph otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Add a paragraph read from input.
    Add {
        /// Target position.
        position: Option<usize>,
    },
    /// Delete a paragraph.
    Delete {
        /// Target position.
        position: Option<usize>,
    },
    /// Insert the filler paragraph.
    Dummy {
        /// Target position.
        position: Option<usize>,
    },
    /// End the session.
    Exit,
    /// Switch the output mode.
    Format(FormatMode),
    /// Print the term index.
    Index,
    /// Print all paragraphs in the current mode.
    Print,
    /// Replace text inside a paragraph.
    Replace {
        /// Target position.
        position: Option<usize>,
    },
}

impl Command {
    /// The command keyword in canonical upper case.
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Add { .. } => "ADD",
            Self::Delete { .. } => "DEL",
            Self::Dummy { .. } => "DUMMY",
            Self::Exit => "EXIT",
            Self::Format(_) => "FORMAT",
            Self::Index => "INDEX",
            Self::Print => "PRINT",
            Self::Replace { .. } => "REPLACE",
        }
    }

    /// The explicit position, if the command carries one.
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::Add { position }
            | Self::Delete { position }
            | Self::Dummy { position }
            | Self::Replace { position } => *position,
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format(FormatMode::Raw) => f.write_str("FORMAT RAW"),
            Self::Format(FormatMode::Fix(width)) => write!(f, "FORMAT FIX {width}"),
            _ => match self.position() {
                Some(position) => write!(f, "{} {position}", self.keyword()),
                None => f.write_str(self.keyword()),
            },
        }
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parse one input line into a [`Command`].
#[tracing::instrument(level = "debug", ret, err(level = "debug"))]
pub fn parse(line: &str) -> ParseResult<Command> {
    let mut tokens = line.split_whitespace();
    let keyword = tokens.next().ok_or(ParseError::Empty)?.to_uppercase();
    let argument = tokens.next();

    let positioned = |build: fn(Option<usize>) -> Command| -> ParseResult<Command> {
        let position = argument.map(parse_position).transpose()?;
        Ok(build(position))
    };

    match keyword.as_str() {
        "ADD" => positioned(|position| Command::Add { position }),
        "DEL" => positioned(|position| Command::Delete { position }),
        "DUMMY" => positioned(|position| Command::Dummy { position }),
        "REPLACE" => positioned(|position| Command::Replace { position }),
        "EXIT" => Ok(Command::Exit),
        "INDEX" => Ok(Command::Index),
        "PRINT" => Ok(Command::Print),
        "FORMAT" => parse_format(argument, tokens.next()).map(Command::Format),
        _ => Err(ParseError::UnknownKeyword(keyword)),
    }
}

/// Parse a position token of the form `N` or `[N]`.
///
/// Values too large for `usize` saturate so they surface as out of range
/// rather than as a malformed token.
pub fn parse_position(token: &str) -> ParseResult<usize> {
    let caps = POSITION_PATTERN
        .captures(token)
        .ok_or_else(|| ParseError::MalformedPosition(token.to_string()))?;
    let digits = caps
        .get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str());
    Ok(digits.parse().unwrap_or(usize::MAX))
}

fn parse_format(mode: Option<&str>, width: Option<&str>) -> ParseResult<FormatMode> {
    let mode = mode.ok_or(ParseError::MissingFormatMode)?.to_uppercase();
    match mode.as_str() {
        "RAW" => Ok(FormatMode::Raw),
        "FIX" => {
            let token = width.ok_or(ParseError::InvalidWidth(None))?;
            token
                .parse::<i64>()
                .ok()
                .and_then(|w| usize::try_from(w).ok())
                .and_then(NonZeroUsize::new)
                .map(FormatMode::Fix)
                .ok_or_else(|| ParseError::InvalidWidth(Some(token.to_string())))
        }
        _ => Err(ParseError::UnknownFormatMode(mode)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn parses_bare_keywords() {
        assert_eq!(parse("EXIT"), Ok(Command::Exit));
        assert_eq!(parse("INDEX"), Ok(Command::Index));
        assert_eq!(parse("PRINT"), Ok(Command::Print));
        assert_eq!(parse("ADD"), Ok(Command::Add { position: None }));
        assert_eq!(parse("DEL"), Ok(Command::Delete { position: None }));
        assert_eq!(parse("DUMMY"), Ok(Command::Dummy { position: None }));
        assert_eq!(parse("REPLACE"), Ok(Command::Replace { position: None }));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(parse("add"), Ok(Command::Add { position: None }));
        assert_eq!(parse("Print"), Ok(Command::Print));
        assert_eq!(parse("format fix 7"), Ok(Command::Format(FormatMode::Fix(width(7)))));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse("   del   2  "), Ok(Command::Delete { position: Some(2) }));
        assert_eq!(parse("\tPRINT\t"), Ok(Command::Print));
    }

    #[test]
    fn empty_line_is_invalid() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("    "), Err(ParseError::Empty));
    }

    #[test]
    fn unknown_keyword_is_invalid() {
        assert_eq!(
            parse("INSERT 3"),
            Err(ParseError::UnknownKeyword("INSERT".to_string()))
        );
    }

    #[test]
    fn accepts_bare_and_bracketed_positions() {
        assert_eq!(parse("ADD 3"), Ok(Command::Add { position: Some(3) }));
        assert_eq!(parse("ADD [3]"), Ok(Command::Add { position: Some(3) }));
        assert_eq!(parse("DUMMY [12]"), Ok(Command::Dummy { position: Some(12) }));
        assert_eq!(parse("REPLACE 1"), Ok(Command::Replace { position: Some(1) }));
    }

    #[test]
    fn zero_position_is_left_for_range_checks() {
        assert_eq!(parse("DEL 0"), Ok(Command::Delete { position: Some(0) }));
    }

    #[test]
    fn huge_position_saturates() {
        assert_eq!(
            parse("DEL 999999999999999999999999"),
            Ok(Command::Delete {
                position: Some(usize::MAX)
            })
        );
    }

    #[test]
    fn malformed_position_rejects_whole_command() {
        for line in ["ADD x", "DEL -1", "DUMMY [3", "REPLACE 3]", "ADD [[3]]", "DEL 2a"] {
            assert!(
                matches!(parse(line), Err(ParseError::MalformedPosition(_))),
                "expected malformed position for {line:?}"
            );
        }
    }

    #[test]
    fn only_second_token_is_a_position() {
        assert_eq!(parse("ADD 2 extra"), Ok(Command::Add { position: Some(2) }));
    }

    #[test]
    fn trailing_tokens_ignored_for_exit_index_print() {
        assert_eq!(parse("EXIT now"), Ok(Command::Exit));
        assert_eq!(parse("INDEX all of it"), Ok(Command::Index));
        assert_eq!(parse("PRINT x"), Ok(Command::Print));
    }

    #[test]
    fn format_raw_ignores_extra_tokens() {
        assert_eq!(parse("FORMAT RAW"), Ok(Command::Format(FormatMode::Raw)));
        assert_eq!(parse("FORMAT raw 10"), Ok(Command::Format(FormatMode::Raw)));
    }

    #[test]
    fn format_fix_requires_positive_width() {
        assert_eq!(
            parse("FORMAT FIX 10"),
            Ok(Command::Format(FormatMode::Fix(width(10))))
        );
        assert_eq!(parse("FORMAT FIX"), Err(ParseError::InvalidWidth(None)));
        for bad in ["0", "-5", "ten", "1.5"] {
            assert_eq!(
                parse(&format!("FORMAT FIX {bad}")),
                Err(ParseError::InvalidWidth(Some(bad.to_string())))
            );
        }
    }

    #[test]
    fn format_needs_known_mode() {
        assert_eq!(parse("FORMAT"), Err(ParseError::MissingFormatMode));
        assert_eq!(
            parse("FORMAT wide"),
            Err(ParseError::UnknownFormatMode("WIDE".to_string()))
        );
    }

    #[test]
    fn from_str_and_display_agree() {
        let cmd: Command = "dummy [4]".parse().unwrap();
        assert_eq!(cmd.to_string(), "DUMMY 4");
        assert_eq!(
            Command::Format(FormatMode::Fix(width(20))).to_string(),
            "FORMAT FIX 20"
        );
        assert_eq!(Command::Format(FormatMode::Raw).to_string(), "FORMAT RAW");
        assert_eq!(Command::Exit.to_string(), "EXIT");
    }
}
