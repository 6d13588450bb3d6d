//! Immutable transition tables.
//!
//! A [`ParsingState`] is a named table mapping characters to
//! [`CharacterHandler`]s plus four lifecycle handlers. Tables are built with
//! `const fn` builder methods, so every state of a grammar can live in a
//! `static` and be shared by any number of concurrent parses.
//!
//! ```rust
//! use opline::{CharacterHandler, ParsingState, StateId, Whitespace};
//!
//! static WORD: ParsingState = ParsingState::new(StateId::OperationName)
//!     .whitespace(Whitespace::Ignore)
//!     .handlers(&[('!', CharacterHandler::Leave)]);
//!
//! assert_eq!(WORD.handler_for('a'), CharacterHandler::Content);
//! assert_eq!(WORD.handler_for('!'), CharacterHandler::Leave);
//! ```

use core::fmt;

/// Stable identifier of a grammar state, as seen by callback sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(any(test, feature = "serde"), serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum StateId {
    /// The implicit floor below every other state.
    Initial,
    /// One `type=name` address segment; holds the node type.
    Node,
    /// The node name after `=` in an address segment.
    NodeName,
    /// The operation name after `:`.
    #[cfg_attr(any(test, feature = "serde"), serde(rename = "OP_NAME"))]
    OperationName,
    /// A parenthesised property list.
    #[cfg_attr(any(test, feature = "serde"), serde(rename = "PROP_LIST"))]
    PropertyList,
    /// One property; holds the property name.
    Property,
    /// A property value after `=`.
    #[cfg_attr(any(test, feature = "serde"), serde(rename = "PROP_VALUE"))]
    PropertyValue,
    /// A double-quoted literal.
    Quotes,
    /// The character following an escaping backslash.
    Escape,
    /// A verbatim `[...]` literal.
    Brackets,
    /// A verbatim `{...}` literal.
    Braces,
    /// A verbatim `(...)` literal inside a property value.
    Parens,
    /// After the property list: only whitespace and redirection may follow.
    RequestEnd,
    /// The `>` or `>>` redirection operator.
    #[cfg_attr(any(test, feature = "serde"), serde(rename = "OUT_REDIRECT"))]
    OutputRedirect,
    /// The redirection target path.
    #[cfg_attr(any(test, feature = "serde"), serde(rename = "OUT_TARGET"))]
    OutputTarget,
}

impl StateId {
    /// The stable textual id.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StateId::Initial => "INITIAL",
            StateId::Node => "NODE",
            StateId::NodeName => "NODE_NAME",
            StateId::OperationName => "OP_NAME",
            StateId::PropertyList => "PROP_LIST",
            StateId::Property => "PROPERTY",
            StateId::PropertyValue => "PROP_VALUE",
            StateId::Quotes => "QUOTES",
            StateId::Escape => "ESCAPE",
            StateId::Brackets => "BRACKETS",
            StateId::Braces => "BRACES",
            StateId::Parens => "PARENS",
            StateId::RequestEnd => "REQUEST_END",
            StateId::OutputRedirect => "OUT_REDIRECT",
            StateId::OutputTarget => "OUT_TARGET",
        }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error categories a handler can raise. The engine turns them into a
/// [`ParseError`](crate::ParseError) using the current location, or the
/// opening location of the current state for constructs left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// See [`ErrorKind::UnexpectedCharacter`](crate::ErrorKind::UnexpectedCharacter).
    UnexpectedCharacter,
    /// See [`ErrorKind::UnterminatedQuote`](crate::ErrorKind::UnterminatedQuote).
    UnterminatedQuote,
    /// See [`ErrorKind::UnmatchedBracket`](crate::ErrorKind::UnmatchedBracket).
    /// Downgraded to a no-op when
    /// [`ParserOptions::lenient_brackets`](crate::ParserOptions::lenient_brackets)
    /// is set.
    UnmatchedBracket,
    /// See [`ErrorKind::MissingCloseParen`](crate::ErrorKind::MissingCloseParen).
    MissingCloseParen,
    /// See [`ErrorKind::EmptyOperationName`](crate::ErrorKind::EmptyOperationName).
    EmptyOperationName,
    /// See [`ErrorKind::EmptyRedirectTarget`](crate::ErrorKind::EmptyRedirectTarget).
    EmptyRedirectTarget,
    /// See [`ErrorKind::DanglingEscape`](crate::ErrorKind::DanglingEscape).
    DanglingEscape,
}

/// One micro-transition, run for one character or one lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterHandler {
    /// Drop the character.
    Noop,
    /// Forward the character to the callback sink.
    Content,
    /// Push a state. The character that triggered the entry is consumed.
    Enter(&'static ParsingState),
    /// Pop the current state; the character is its closer.
    Leave,
    /// Pop the current state and push it again.
    Reenter,
    /// Pop the current state without consuming the character, so that the
    /// parent's [`Resume`](CharacterHandler::Resume) return handler processes
    /// it.
    Handback,
    /// Run the character through the current state's table.
    Reprocess,
    /// Return handler: reprocess the character if a child handed it back.
    Resume,
    /// Nested opener of an opaque literal: increment the depth and forward.
    Open,
    /// Closer of an opaque literal: at depth zero forward it and leave,
    /// otherwise decrement the depth and forward.
    Close,
    /// Escape character: enter the given state under
    /// [`QuoteEscape::Backslash`](crate::QuoteEscape::Backslash), otherwise
    /// behave like [`Content`](CharacterHandler::Content).
    Escape(&'static ParsingState),
    /// Forward the character only if the state has not forwarded anything
    /// yet, otherwise fail with an unexpected character.
    ContentOnce,
    /// Fail if the current state has not forwarded any character.
    RequireContent(Failure),
    /// Fail unconditionally.
    Fail(Failure),
    /// Run several handlers in order.
    Sequence(&'static [CharacterHandler]),
}

/// Whitespace policy of a state, applied before the table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whitespace {
    /// Whitespace goes through the table like any other character.
    Keep,
    /// Whitespace is skipped.
    Ignore,
    /// Whitespace is skipped until the state forwards its first character.
    IgnoreLeading,
}

/// A named, immutable transition table.
///
/// States compare by identity: two tables are equal only if they are the same
/// `static`.
pub struct ParsingState {
    id: StateId,
    whitespace: Whitespace,
    default_handler: CharacterHandler,
    handlers: &'static [(char, CharacterHandler)],
    enter_handler: CharacterHandler,
    leave_handler: CharacterHandler,
    return_handler: CharacterHandler,
    end_handler: CharacterHandler,
}

impl ParsingState {
    /// A state that forwards every character and does nothing on lifecycle
    /// events.
    #[must_use]
    pub const fn new(id: StateId) -> Self {
        Self {
            id,
            whitespace: Whitespace::Keep,
            default_handler: CharacterHandler::Content,
            handlers: &[],
            enter_handler: CharacterHandler::Noop,
            leave_handler: CharacterHandler::Noop,
            return_handler: CharacterHandler::Noop,
            end_handler: CharacterHandler::Noop,
        }
    }

    /// Sets the whitespace policy.
    #[must_use]
    pub const fn whitespace(mut self, policy: Whitespace) -> Self {
        self.whitespace = policy;
        self
    }

    /// Sets the handler for characters without a specific entry.
    #[must_use]
    pub const fn default_handler(mut self, handler: CharacterHandler) -> Self {
        self.default_handler = handler;
        self
    }

    /// Sets the character-specific entries.
    #[must_use]
    pub const fn handlers(mut self, handlers: &'static [(char, CharacterHandler)]) -> Self {
        self.handlers = handlers;
        self
    }

    /// Runs right after the state is pushed.
    #[must_use]
    pub const fn on_enter(mut self, handler: CharacterHandler) -> Self {
        self.enter_handler = handler;
        self
    }

    /// Runs right before the state is popped.
    #[must_use]
    pub const fn on_leave(mut self, handler: CharacterHandler) -> Self {
        self.leave_handler = handler;
        self
    }

    /// Runs when a child state has been popped and this one is on top again.
    #[must_use]
    pub const fn on_return(mut self, handler: CharacterHandler) -> Self {
        self.return_handler = handler;
        self
    }

    /// Runs when the input ends while the state is open.
    #[must_use]
    pub const fn on_end_of_content(mut self, handler: CharacterHandler) -> Self {
        self.end_handler = handler;
        self
    }

    /// The state's id.
    #[must_use]
    pub const fn id(&self) -> StateId {
        self.id
    }

    /// The whitespace policy.
    #[must_use]
    pub const fn whitespace_policy(&self) -> Whitespace {
        self.whitespace
    }

    /// Resolves the handler for `c`: the specific entry if there is one, the
    /// default handler otherwise.
    #[must_use]
    pub fn handler_for(&self, c: char) -> CharacterHandler {
        // Tables hold a handful of entries; a scan beats hashing here.
        self.handlers
            .iter()
            .find(|(key, _)| *key == c)
            .map_or(self.default_handler, |(_, handler)| *handler)
    }

    pub(crate) const fn enter_handler(&self) -> CharacterHandler {
        self.enter_handler
    }

    pub(crate) const fn leave_handler(&self) -> CharacterHandler {
        self.leave_handler
    }

    pub(crate) const fn return_handler(&self) -> CharacterHandler {
        self.return_handler
    }

    pub(crate) const fn end_handler(&self) -> CharacterHandler {
        self.end_handler
    }
}

impl PartialEq for ParsingState {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self, other)
    }
}

impl Eq for ParsingState {}

impl fmt::Debug for ParsingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tables may refer to themselves, so only the id is printed.
        f.debug_tuple("ParsingState").field(&self.id).finish()
    }
}
