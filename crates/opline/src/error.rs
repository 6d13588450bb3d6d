use alloc::string::String;
use core::fmt;

use thiserror::Error;

use crate::state::StateId;

/// The character a failing handler was looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    /// An input character.
    Char(char),
    /// The input was exhausted.
    EndOfInput,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Found::Char(c) => write!(f, "{c:?}"),
            Found::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// What went wrong.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A quoted literal was still open at end of input.
    #[error("unterminated quoted literal")]
    UnterminatedQuote,
    /// A bracket, brace or parenthesis literal was still open at end of input.
    #[error("unmatched '{opener}'")]
    UnmatchedBracket {
        /// The opening character of the literal.
        opener: char,
    },
    /// The character is not valid where it appears.
    #[error("unexpected character")]
    UnexpectedCharacter,
    /// `:` was not followed by an operation name.
    #[error("operation name is missing")]
    EmptyOperationName,
    /// The property list was still open at end of input.
    #[error("property list is missing its closing ')'")]
    MissingCloseParen,
    /// `>` or `>>` was not followed by a target.
    #[error("output redirection is missing its target")]
    EmptyRedirectTarget,
    /// The input ended right after an escaping backslash.
    #[error("nothing to escape after '\\'")]
    DanglingEscape,
    /// The callback sink refused an event.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// A parse failure: the first error aborts the whole parse.
///
/// `offset` is a byte offset into the parsed line. For constructs that were
/// still open when the input ran out (quotes, brackets, the property list, a
/// trailing backslash) and for an empty operation name it points at the
/// construct's opening character,
/// so a terminal can highlight where the problem starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset} (in {state}, found {found})")]
pub struct ParseError {
    /// The error category.
    pub kind: ErrorKind,
    /// Byte offset of the offending location.
    pub offset: usize,
    /// The state that was active when the error was raised.
    pub state: StateId,
    /// The character being processed, or end of input.
    pub found: Found,
}

impl ParseError {
    pub(crate) fn new(kind: ErrorKind, offset: usize, state: StateId, found: Found) -> Self {
        Self {
            kind,
            offset,
            state,
            found,
        }
    }
}

/// Returned by a [`ParsingStateCallbackHandler`](crate::ParsingStateCallbackHandler)
/// that refuses an event. The engine reports it as [`ErrorKind::Rejected`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct Rejection(pub String);

impl From<&str> for Rejection {
    fn from(msg: &str) -> Self {
        Self(msg.into())
    }
}
