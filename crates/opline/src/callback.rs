use crate::{error::Rejection, state::StateId};

/// Consumer of the parser's event stream.
///
/// The parser never materialises the request it reads. It reports, in input
/// order, every state it enters and leaves and every character a state
/// forwards; a consumer rebuilds whatever structure it needs from that.
///
/// All methods default to accepting the event, so a sink implements only what
/// it cares about. Returning an error aborts the parse with
/// [`ErrorKind::Rejected`](crate::ErrorKind::Rejected).
pub trait ParsingStateCallbackHandler {
    /// `state` was entered at byte `offset`.
    fn entered_state(&mut self, state: StateId, offset: usize) -> Result<(), Rejection> {
        let _ = (state, offset);
        Ok(())
    }

    /// `state` forwarded `ch`, found at byte `offset`.
    fn character(&mut self, state: StateId, ch: char, offset: usize) -> Result<(), Rejection> {
        let _ = (state, ch, offset);
        Ok(())
    }

    /// `state` is about to be left at byte `offset`. `closing` is the
    /// character that caused the leave, or `None` when the state is closed
    /// implicitly because the input ended.
    fn leaving_state(
        &mut self,
        state: StateId,
        offset: usize,
        closing: Option<char>,
    ) -> Result<(), Rejection> {
        let _ = (state, offset, closing);
        Ok(())
    }
}

impl<T: ParsingStateCallbackHandler + ?Sized> ParsingStateCallbackHandler for &mut T {
    fn entered_state(&mut self, state: StateId, offset: usize) -> Result<(), Rejection> {
        (**self).entered_state(state, offset)
    }

    fn character(&mut self, state: StateId, ch: char, offset: usize) -> Result<(), Rejection> {
        (**self).character(state, ch, offset)
    }

    fn leaving_state(
        &mut self,
        state: StateId,
        offset: usize,
        closing: Option<char>,
    ) -> Result<(), Rejection> {
        (**self).leaving_state(state, offset, closing)
    }
}

/// A sink that ignores every event; useful for validating a line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallbackHandler;

impl ParsingStateCallbackHandler for NoopCallbackHandler {}
