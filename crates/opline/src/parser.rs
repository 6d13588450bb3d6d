//! The state-machine driver.
//!
//! [`StateParser`] feeds a line to a grammar one character at a time. Each
//! character is resolved against the table of the state on top of the stack;
//! there is no lookahead and no backtracking. When the input ends every state
//! still open is closed, so each `entered_state` event is matched by exactly
//! one `leaving_state` event.
//!
//! # Examples
//!
//! ```rust
//! use opline::{StateEvent, StateId, grammar};
//!
//! let mut events = Vec::new();
//! opline::parse(":read-resource", &mut events, &grammar::INITIAL).unwrap();
//! assert_eq!(events.first(), Some(&StateEvent::Entered {
//!     state: StateId::OperationName,
//!     offset: 0,
//! }));
//! assert_eq!(events.last(), Some(&StateEvent::Leaving {
//!     state: StateId::OperationName,
//!     offset: 14,
//!     closing: None,
//! }));
//! ```

use crate::{
    callback::ParsingStateCallbackHandler, context::ParsingContext, error::ParseError,
    options::ParserOptions, state::ParsingState,
};

/// Parses lines against a grammar. Holds only configuration, so one parser
/// can be shared freely; every call gets its own context.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateParser {
    options: ParserOptions,
}

impl StateParser {
    /// Creates a parser with the given options.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    /// The options this parser was created with.
    #[must_use]
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parses `input` starting in `initial`, reporting events to `sink`.
    ///
    /// Leading whitespace is skipped; an empty or all-whitespace line is
    /// accepted without any event.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] raised by a handler or by the sink.
    /// Parsing stops there; events already delivered are not retracted.
    pub fn parse<S>(
        &self,
        input: &str,
        sink: &mut S,
        initial: &ParsingState,
    ) -> Result<(), ParseError>
    where
        S: ParsingStateCallbackHandler + ?Sized,
    {
        let result = self.parse_internal(input, sink, initial);
        if let Err(err) = &result {
            log::debug!("rejected {input:?}: {err}");
            #[cfg(any(test, feature = "fuzzing"))]
            assert!(
                !self.options.panic_on_error,
                "Parse error at offset {}: {err}",
                err.offset
            );
        }
        result
    }

    fn parse_internal<S>(
        &self,
        input: &str,
        sink: &mut S,
        initial: &ParsingState,
    ) -> Result<(), ParseError>
    where
        S: ParsingStateCallbackHandler + ?Sized,
    {
        let content = input.trim_start_matches(|c| self.options.is_whitespace(c));
        if content.is_empty() {
            return Ok(());
        }
        let start = input.len() - content.len();

        let mut ctx = ParsingContext::new(input, self.options, initial, sink);
        for (offset, ch) in content.char_indices() {
            ctx.advance(start + offset, ch)?;
        }
        ctx.end_of_content()
    }
}

/// Parses `input` with default options. See [`StateParser::parse`].
///
/// # Errors
///
/// Returns the first [`ParseError`] raised while parsing.
pub fn parse<S>(input: &str, sink: &mut S, initial: &ParsingState) -> Result<(), ParseError>
where
    S: ParsingStateCallbackHandler + ?Sized,
{
    StateParser::default().parse(input, sink, initial)
}
