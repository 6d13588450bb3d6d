//! Recorded parser events.
//!
//! `Vec<StateEvent>` is itself a [`ParsingStateCallbackHandler`], which makes
//! it the simplest way to look at what the parser reports:
//!
//! ```
//! use opline::{StateEvent, StateId, grammar};
//!
//! let mut events = Vec::new();
//! opline::parse("(a)", &mut events, &grammar::INITIAL).unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         StateEvent::Entered { state: StateId::PropertyList, offset: 0 },
//!         StateEvent::Entered { state: StateId::Property, offset: 1 },
//!         StateEvent::Character { state: StateId::Property, ch: 'a', offset: 1 },
//!         StateEvent::Leaving { state: StateId::Property, offset: 2, closing: Some(')') },
//!         StateEvent::Leaving { state: StateId::PropertyList, offset: 2, closing: Some(')') },
//!         StateEvent::Entered { state: StateId::RequestEnd, offset: 2 },
//!         StateEvent::Leaving { state: StateId::RequestEnd, offset: 3, closing: None },
//!     ]
//! );
//! ```
use alloc::vec::Vec;
use core::fmt;

use crate::{callback::ParsingStateCallbackHandler, error::Rejection, state::StateId};

/// One callback, captured as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(any(test, feature = "serde"), serde(tag = "kind"))]
pub enum StateEvent {
    /// `state` was entered at `offset`.
    Entered {
        /// The entered state.
        state: StateId,
        /// Byte offset of the character that opened it.
        offset: usize,
    },
    /// `state` forwarded `ch`.
    Character {
        /// The forwarding state.
        state: StateId,
        /// The forwarded character.
        ch: char,
        /// Byte offset of `ch`.
        offset: usize,
    },
    /// `state` is being left.
    Leaving {
        /// The state being left.
        state: StateId,
        /// Byte offset of the closing character, or the input length.
        offset: usize,
        /// The closing character; `None` at end of input.
        closing: Option<char>,
    },
}

impl StateEvent {
    /// The state the event is about.
    #[must_use]
    pub fn state(&self) -> StateId {
        match self {
            StateEvent::Entered { state, .. }
            | StateEvent::Character { state, .. }
            | StateEvent::Leaving { state, .. } => *state,
        }
    }

    /// Byte offset of the event.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            StateEvent::Entered { offset, .. }
            | StateEvent::Character { offset, .. }
            | StateEvent::Leaving { offset, .. } => *offset,
        }
    }
}

// One event per line in the form used by the snapshot tests:
// `+NODE@0`, `NODE 'a'@1`, `-NODE@3 '/'`, `-NODE@9 eoc`.
impl fmt::Display for StateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateEvent::Entered { state, offset } => write!(f, "+{state}@{offset}"),
            StateEvent::Character { state, ch, offset } => write!(f, "{state} {ch:?}@{offset}"),
            StateEvent::Leaving {
                state,
                offset,
                closing: Some(c),
            } => write!(f, "-{state}@{offset} {c:?}"),
            StateEvent::Leaving {
                state,
                offset,
                closing: None,
            } => write!(f, "-{state}@{offset} eoc"),
        }
    }
}

impl ParsingStateCallbackHandler for Vec<StateEvent> {
    fn entered_state(&mut self, state: StateId, offset: usize) -> Result<(), Rejection> {
        self.push(StateEvent::Entered { state, offset });
        Ok(())
    }

    fn character(&mut self, state: StateId, ch: char, offset: usize) -> Result<(), Rejection> {
        self.push(StateEvent::Character { state, ch, offset });
        Ok(())
    }

    fn leaving_state(
        &mut self,
        state: StateId,
        offset: usize,
        closing: Option<char>,
    ) -> Result<(), Rejection> {
        self.push(StateEvent::Leaving {
            state,
            offset,
            closing,
        });
        Ok(())
    }
}
