use alloc::{string::String, vec::Vec};
use core::fmt::Write;

use crate::{ParseError, ParserOptions, StateEvent, StateParser, grammar};

pub(crate) fn events_with(
    input: &str,
    options: ParserOptions,
) -> Result<Vec<StateEvent>, ParseError> {
    let mut events = Vec::new();
    StateParser::new(options).parse(input, &mut events, &grammar::INITIAL)?;
    Ok(events)
}

/// Events of a line that must parse; panics with the error otherwise.
pub(crate) fn events(input: &str) -> Vec<StateEvent> {
    let options = ParserOptions {
        panic_on_error: true,
        ..ParserOptions::default()
    };
    events_with(input, options).unwrap()
}

/// One event per line.
pub(crate) fn render(input: &str) -> String {
    let mut out = String::new();
    for (i, event) in events(input).iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write!(out, "{event}").unwrap();
    }
    out
}

/// Number of enter and leave events.
pub(crate) fn balance(events: &[StateEvent]) -> (usize, usize) {
    let entered = events
        .iter()
        .filter(|e| matches!(e, StateEvent::Entered { .. }))
        .count();
    let left = events
        .iter()
        .filter(|e| matches!(e, StateEvent::Leaving { .. }))
        .count();
    (entered, left)
}
