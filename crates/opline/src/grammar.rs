//! The operation-request grammar.
//!
//! ```text
//! request      := ws* address? (':' opname)? propslist? redirect? ws*
//! address      := '/'? step ('/' step)*
//! step         := segment | '..' | '.' | '.type'
//! segment      := text ('=' text)?
//! propslist    := '(' ws* (prop (',' ws* prop)*)? ws* ')'
//! prop         := name ('=' value)?
//! value        := quoted | bracketed | bareValue
//! redirect     := ('>' | '>>') ws* path
//! ```
//!
//! Parsing starts in [`INITIAL`]. The parts of a request are siblings on the
//! stack: each one closes itself and enters the next, so once a part is done
//! nothing can reopen it. After the property list only [`REQUEST_END`] is
//! reachable, which accepts whitespace and a redirection and nothing else.
//!
//! Inside a property value, quotes, brackets, braces and parentheses open
//! literal states whose content is not interpreted, so `,` and `)` in there do
//! not end the value.
#![allow(clippy::enum_glob_use)]

use crate::state::{
    CharacterHandler::{self, *},
    Failure::*,
    ParsingState, StateId, Whitespace,
};

type Table<const N: usize> = [(char, CharacterHandler); N];

static TO_OPERATION_NAME: [CharacterHandler; 2] = [Leave, Enter(&OPERATION_NAME)];
static TO_PROPERTY_LIST: [CharacterHandler; 2] = [Leave, Enter(&PROPERTY_LIST)];
static TO_REQUEST_END: [CharacterHandler; 2] = [Leave, Enter(&REQUEST_END)];
static TO_OUTPUT_REDIRECT: [CharacterHandler; 2] = [Leave, Enter(&OUTPUT_REDIRECT)];

static START_NODE: [CharacterHandler; 2] = [Enter(&NODE), Reprocess];
static START_PROPERTY: [CharacterHandler; 2] = [Enter(&PROPERTY), Reprocess];
static START_OUTPUT_TARGET: [CharacterHandler; 2] = [Enter(&OUTPUT_TARGET), Reprocess];
static FORWARD_AND_LEAVE: [CharacterHandler; 2] = [Content, Leave];
static START_ROOT: [CharacterHandler; 2] = [Content, Enter(&NODE)];

static INITIAL_TABLE: Table<4> = [
    ('/', Sequence(&START_ROOT)),
    (':', Enter(&OPERATION_NAME)),
    ('(', Enter(&PROPERTY_LIST)),
    ('>', Enter(&OUTPUT_REDIRECT)),
];

/// The implicit floor. Dispatches on the first significant character. A
/// leading `/` anchors the address at the root and is forwarded, so sinks can
/// tell `/a=b` from the relative `a=b`.
pub static INITIAL: ParsingState = ParsingState::new(StateId::Initial)
    .whitespace(Whitespace::Ignore)
    .default_handler(Sequence(&START_NODE))
    .handlers(&INITIAL_TABLE);

static NODE_TABLE: Table<8> = [
    ('=', Enter(&NODE_NAME)),
    ('/', Reenter),
    (':', Sequence(&TO_OPERATION_NAME)),
    ('(', Sequence(&TO_PROPERTY_LIST)),
    ('>', Sequence(&TO_OUTPUT_REDIRECT)),
    ('"', Enter(&QUOTES)),
    ('\\', Escape(&ESCAPE)),
    (')', Fail(UnexpectedCharacter)),
];

/// One address segment. Forwards the node type; `=` opens [`NODE_NAME`] and
/// `/` closes the segment and opens the next one. Whitespace inside the type
/// is forwarded and left for the sink to trim.
pub static NODE: ParsingState = ParsingState::new(StateId::Node)
    .whitespace(Whitespace::IgnoreLeading)
    .handlers(&NODE_TABLE)
    .on_return(Resume);

static NODE_NAME_TABLE: Table<8> = [
    ('"', Enter(&QUOTES)),
    ('\\', Escape(&ESCAPE)),
    ('/', Handback),
    (':', Handback),
    ('(', Handback),
    ('>', Handback),
    ('=', Fail(UnexpectedCharacter)),
    (')', Fail(UnexpectedCharacter)),
];

/// The node name of a segment. Separators are handed back to [`NODE`].
pub static NODE_NAME: ParsingState = ParsingState::new(StateId::NodeName)
    .whitespace(Whitespace::IgnoreLeading)
    .handlers(&NODE_NAME_TABLE)
    .on_return(Resume);

static OPERATION_NAME_TABLE: Table<6> = [
    ('(', Sequence(&TO_PROPERTY_LIST)),
    ('>', Sequence(&TO_OUTPUT_REDIRECT)),
    (':', Fail(UnexpectedCharacter)),
    ('/', Fail(UnexpectedCharacter)),
    ('=', Fail(UnexpectedCharacter)),
    (')', Fail(UnexpectedCharacter)),
];

/// The operation name after `:`. Leaving it without a name is an error.
pub static OPERATION_NAME: ParsingState = ParsingState::new(StateId::OperationName)
    .whitespace(Whitespace::IgnoreLeading)
    .handlers(&OPERATION_NAME_TABLE)
    .on_leave(RequireContent(EmptyOperationName));

static PROPERTY_LIST_TABLE: Table<1> = [(')', Sequence(&TO_REQUEST_END))];

/// `( ... )`. Every property gets a fresh [`PROPERTY`]; the list must be
/// closed before the input ends.
pub static PROPERTY_LIST: ParsingState = ParsingState::new(StateId::PropertyList)
    .whitespace(Whitespace::Ignore)
    .default_handler(Sequence(&START_PROPERTY))
    .handlers(&PROPERTY_LIST_TABLE)
    .on_return(Resume)
    .on_end_of_content(Fail(MissingCloseParen));

static PROPERTY_TABLE: Table<5> = [
    ('=', Enter(&PROPERTY_VALUE)),
    (',', Reenter),
    (')', Handback),
    ('"', Enter(&QUOTES)),
    ('\\', Escape(&ESCAPE)),
];

/// One property. Forwards the name; `,` ends it and starts the next one.
pub static PROPERTY: ParsingState = ParsingState::new(StateId::Property)
    .handlers(&PROPERTY_TABLE)
    .on_return(Resume);

static PROPERTY_VALUE_TABLE: Table<7> = [
    (',', Handback),
    (')', Handback),
    ('"', Enter(&QUOTES)),
    ('\\', Escape(&ESCAPE)),
    ('[', Enter(&BRACKETS)),
    ('{', Enter(&BRACES)),
    ('(', Enter(&PARENS)),
];

/// The value after `=`. `,` and `)` belong to the enclosing property.
pub static PROPERTY_VALUE: ParsingState = ParsingState::new(StateId::PropertyValue)
    .handlers(&PROPERTY_VALUE_TABLE)
    .on_return(Resume);

static QUOTES_TABLE: Table<2> = [('"', Leave), ('\\', Escape(&ESCAPE))];

/// A double-quoted literal. The quotes themselves are not forwarded.
pub static QUOTES: ParsingState = ParsingState::new(StateId::Quotes)
    .handlers(&QUOTES_TABLE)
    .on_end_of_content(Fail(UnterminatedQuote));

/// Forwards the one character after a backslash and leaves. A backslash
/// with nothing after it is an error.
pub static ESCAPE: ParsingState = ParsingState::new(StateId::Escape)
    .default_handler(Sequence(&FORWARD_AND_LEAVE))
    .on_end_of_content(Fail(DanglingEscape));

static BRACKETS_TABLE: Table<2> = [('[', Open), (']', Close)];
static BRACES_TABLE: Table<2> = [('{', Open), ('}', Close)];
static PARENS_TABLE: Table<2> = [('(', Open), (')', Close)];

/// `[...]`, forwarded verbatim including both brackets.
pub static BRACKETS: ParsingState = ParsingState::new(StateId::Brackets)
    .handlers(&BRACKETS_TABLE)
    .on_enter(Content)
    .on_end_of_content(Fail(UnmatchedBracket));

/// `{...}`, forwarded verbatim including both braces.
pub static BRACES: ParsingState = ParsingState::new(StateId::Braces)
    .handlers(&BRACES_TABLE)
    .on_enter(Content)
    .on_end_of_content(Fail(UnmatchedBracket));

/// `(...)` inside a value, forwarded verbatim including both parentheses.
pub static PARENS: ParsingState = ParsingState::new(StateId::Parens)
    .handlers(&PARENS_TABLE)
    .on_enter(Content)
    .on_end_of_content(Fail(UnmatchedBracket));

static REQUEST_END_TABLE: Table<1> = [('>', Sequence(&TO_OUTPUT_REDIRECT))];

/// Entered once the property list is closed.
pub static REQUEST_END: ParsingState = ParsingState::new(StateId::RequestEnd)
    .whitespace(Whitespace::Ignore)
    .default_handler(Fail(UnexpectedCharacter))
    .handlers(&REQUEST_END_TABLE);

static OUTPUT_REDIRECT_TABLE: Table<1> = [('>', ContentOnce)];

/// `>` or `>>`. A forwarded `>` means append. The target state is opened by
/// the first other character and lasts until the end of the input.
pub static OUTPUT_REDIRECT: ParsingState = ParsingState::new(StateId::OutputRedirect)
    .default_handler(Sequence(&START_OUTPUT_TARGET))
    .handlers(&OUTPUT_REDIRECT_TABLE)
    .on_return(Leave)
    .on_end_of_content(Fail(EmptyRedirectTarget));

/// The redirection target. No meta characters are recognised here.
pub static OUTPUT_TARGET: ParsingState = ParsingState::new(StateId::OutputTarget)
    .whitespace(Whitespace::IgnoreLeading)
    .on_end_of_content(RequireContent(EmptyRedirectTarget));

/// Every state reachable from [`INITIAL`].
pub static ALL: [&ParsingState; 15] = [
    &INITIAL,
    &NODE,
    &NODE_NAME,
    &OPERATION_NAME,
    &PROPERTY_LIST,
    &PROPERTY,
    &PROPERTY_VALUE,
    &QUOTES,
    &ESCAPE,
    &BRACKETS,
    &BRACES,
    &PARENS,
    &REQUEST_END,
    &OUTPUT_REDIRECT,
    &OUTPUT_TARGET,
];
