//! The per-parse cursor and state stack.
//!
//! A [`ParsingContext`] lives for exactly one call to
//! [`StateParser::parse`](crate::StateParser::parse). It owns the stack of open
//! states and interprets [`CharacterHandler`]s against it; nesting is kept on
//! this explicit stack, never on the call stack.
#![allow(clippy::enum_glob_use)]

use alloc::vec::Vec;
use core::mem;

use crate::{
    callback::ParsingStateCallbackHandler,
    error::{ErrorKind, Found, ParseError, Rejection},
    options::{ParserOptions, QuoteEscape},
    state::{CharacterHandler, Failure, ParsingState, Whitespace},
};

/// Stack entry – one per open state
#[derive(Debug, Clone, Copy)]
struct Frame<'a> {
    state: &'a ParsingState,
    opened_at: usize,
    opened_with: Option<char>,
    /// Nesting depth of same-pair openers inside an opaque literal.
    depth: usize,
    /// Number of characters this state forwarded to the sink.
    forwarded: usize,
}

pub(crate) struct ParsingContext<'a, S: ?Sized> {
    input: &'a str,
    options: ParserOptions,
    initial: &'a ParsingState,
    stack: Vec<Frame<'a>>,
    ch: Option<char>,
    offset: usize,
    handed_back: bool,
    sink: &'a mut S,
}

impl<'a, S> ParsingContext<'a, S>
where
    S: ParsingStateCallbackHandler + ?Sized,
{
    pub(crate) fn new(
        input: &'a str,
        options: ParserOptions,
        initial: &'a ParsingState,
        sink: &'a mut S,
    ) -> Self {
        Self {
            input,
            options,
            initial,
            stack: Vec::with_capacity(8),
            ch: None,
            offset: 0,
            handed_back: false,
            sink,
        }
    }

    /// The state on top of the stack, or the initial state when the stack is
    /// empty.
    pub(crate) fn current_state(&self) -> &'a ParsingState {
        self.stack.last().map_or(self.initial, |frame| frame.state)
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Moves the cursor to `ch` at byte `offset` and runs it through the
    /// current state.
    pub(crate) fn advance(&mut self, offset: usize, ch: char) -> Result<(), ParseError> {
        self.offset = offset;
        self.ch = Some(ch);
        self.dispatch()
    }

    /// Closes every state still open: each runs its end-of-content handler
    /// and is then left, unless the handler already changed the stack.
    pub(crate) fn end_of_content(&mut self) -> Result<(), ParseError> {
        self.offset = self.input.len();
        self.ch = None;
        self.handed_back = false;

        while let Some(frame) = self.stack.last() {
            let state = frame.state;
            let depth = self.stack.len();
            self.handle(state.end_handler())?;
            if self.stack.len() >= depth {
                self.leave_state()?;
            }
        }
        Ok(())
    }

    pub(crate) fn enter_state(&mut self, state: &'a ParsingState) -> Result<(), ParseError> {
        self.sink
            .entered_state(state.id(), self.offset)
            .map_err(|rejection| self.rejected(rejection))?;
        log::trace!("enter {} at {}", state.id(), self.offset);

        self.stack.push(Frame {
            state,
            opened_at: self.offset,
            opened_with: self.ch,
            depth: 0,
            forwarded: 0,
        });
        self.handle(state.enter_handler())
    }

    pub(crate) fn leave_state(&mut self) -> Result<(), ParseError> {
        let Some(state) = self.stack.last().map(|frame| frame.state) else {
            // Nothing to close: the character closes a construct that was
            // never opened.
            return Err(self.error_at(ErrorKind::UnexpectedCharacter, self.offset));
        };

        self.sink
            .leaving_state(state.id(), self.offset, self.ch)
            .map_err(|rejection| self.rejected(rejection))?;
        self.handle(state.leave_handler())?;
        self.stack.pop();
        log::trace!("leave {} at {}", state.id(), self.offset);

        if let Some(parent) = self.stack.last().map(|frame| frame.state) {
            self.handle(parent.return_handler())?;
        }
        Ok(())
    }

    pub(crate) fn reenter_state(&mut self) -> Result<(), ParseError> {
        let state = self.current_state();
        self.leave_state()?;
        self.enter_state(state)
    }

    fn dispatch(&mut self) -> Result<(), ParseError> {
        let Some(ch) = self.ch else {
            return Ok(());
        };
        let state = self.current_state();

        if self.options.is_whitespace(ch) {
            let skip = match state.whitespace_policy() {
                Whitespace::Keep => false,
                Whitespace::Ignore => true,
                Whitespace::IgnoreLeading => self.forwarded() == 0,
            };
            if skip {
                return Ok(());
            }
        }

        self.handle(state.handler_for(ch))
    }

    fn handle(&mut self, handler: CharacterHandler) -> Result<(), ParseError> {
        use CharacterHandler::*;

        match handler {
            Noop => Ok(()),
            Content => self.forward(),
            Enter(state) => self.enter_state(state),
            Leave => self.leave_state(),
            Reenter => self.reenter_state(),
            Handback => {
                self.handed_back = true;
                let result = self.leave_state();
                self.handed_back = false;
                result
            }
            Reprocess => self.dispatch(),
            Resume => {
                if mem::take(&mut self.handed_back) {
                    self.dispatch()
                } else {
                    Ok(())
                }
            }
            Open => {
                if let Some(frame) = self.stack.last_mut() {
                    frame.depth += 1;
                }
                self.forward()
            }
            Close => {
                if self.unnest() {
                    self.forward()
                } else {
                    self.forward()?;
                    self.leave_state()
                }
            }
            Escape(state) => match self.options.quote_escape {
                QuoteEscape::Backslash => self.enter_state(state),
                QuoteEscape::Verbatim => self.forward(),
            },
            ContentOnce => {
                if self.forwarded() == 0 {
                    self.forward()
                } else {
                    self.fail(Failure::UnexpectedCharacter)
                }
            }
            RequireContent(failure) => {
                if self.forwarded() == 0 {
                    self.fail(failure)
                } else {
                    Ok(())
                }
            }
            Fail(failure) => self.fail(failure),
            Sequence(handlers) => {
                for handler in handlers {
                    self.handle(*handler)?;
                }
                Ok(())
            }
        }
    }

    fn forward(&mut self) -> Result<(), ParseError> {
        let Some(ch) = self.ch else {
            return Ok(());
        };
        let state = self.current_state().id();
        if let Some(frame) = self.stack.last_mut() {
            frame.forwarded += 1;
        }
        self.sink
            .character(state, ch, self.offset)
            .map_err(|rejection| self.rejected(rejection))
    }

    fn forwarded(&self) -> usize {
        self.stack.last().map_or(0, |frame| frame.forwarded)
    }

    /// Decrements the nesting depth; `false` if the literal is at its
    /// outermost level.
    fn unnest(&mut self) -> bool {
        match self.stack.last_mut() {
            Some(frame) if frame.depth > 0 => {
                frame.depth -= 1;
                true
            }
            _ => false,
        }
    }

    fn fail(&self, failure: Failure) -> Result<(), ParseError> {
        let opening = self.stack.last().map(|frame| (frame.opened_at, frame.opened_with));
        let opened_at = opening.map_or(self.offset, |(at, _)| at);

        let (kind, offset) = match failure {
            Failure::UnexpectedCharacter => (ErrorKind::UnexpectedCharacter, self.offset),
            Failure::EmptyRedirectTarget => (ErrorKind::EmptyRedirectTarget, self.offset),
            Failure::UnterminatedQuote => (ErrorKind::UnterminatedQuote, opened_at),
            Failure::MissingCloseParen => (ErrorKind::MissingCloseParen, opened_at),
            Failure::EmptyOperationName => (ErrorKind::EmptyOperationName, opened_at),
            Failure::DanglingEscape => (ErrorKind::DanglingEscape, opened_at),
            Failure::UnmatchedBracket if self.options.lenient_brackets => return Ok(()),
            Failure::UnmatchedBracket => {
                let opener = opening.and_then(|(_, with)| with).unwrap_or_default();
                (ErrorKind::UnmatchedBracket { opener }, opened_at)
            }
        };
        Err(self.error_at(kind, offset))
    }

    fn rejected(&self, rejection: Rejection) -> ParseError {
        self.error_at(ErrorKind::Rejected(rejection.0), self.offset)
    }

    fn error_at(&self, kind: ErrorKind, offset: usize) -> ParseError {
        let found = self.ch.map_or(Found::EndOfInput, Found::Char);
        ParseError::new(kind, offset, self.current_state().id(), found)
    }
}
