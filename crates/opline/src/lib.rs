//! A character-by-character state machine for management-console request
//! lines such as
//!
//! ```text
//! /subsystem=logging/console-handler=CONSOLE:write-attribute(name=level,value=INFO) > out.log
//! ```
//!
//! The engine ([`StateParser`]) knows nothing about that syntax. It drives a
//! grammar made of immutable [`ParsingState`] tables, keeps the open states on
//! an explicit stack, and reports what it sees to a
//! [`ParsingStateCallbackHandler`]. The request grammar lives in [`grammar`];
//! [`RequestCollector`] turns its events back into a [`ParsedRequest`].
//!
//! ```rust
//! let request = opline::parse_request(":read-resource(recursive=true, include-runtime)").unwrap();
//! let properties = request.properties.unwrap();
//! assert_eq!(properties[0].value.as_deref(), Some("true"));
//! assert_eq!(properties[1].name, "include-runtime");
//! assert_eq!(properties[1].value, None);
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod callback;
mod context;
mod error;
mod event;
pub mod grammar;
mod options;
mod parser;
mod request;
mod state;

#[cfg(test)]
mod tests;

pub use callback::{NoopCallbackHandler, ParsingStateCallbackHandler};
pub use error::{ErrorKind, Found, ParseError, Rejection};
pub use event::StateEvent;
pub use options::{ParserOptions, QuoteEscape};
pub use parser::{StateParser, parse};
pub use request::{
    AddressStep, NodeSegment, ParsedRequest, Property, Redirect, RedirectMode, RequestCollector,
    Separator, parse_request, parse_request_with,
};
pub use state::{CharacterHandler, Failure, ParsingState, StateId, Whitespace};
