//! Rebuilding a structured request from the event stream.
//!
//! [`RequestCollector`] is a [`ParsingStateCallbackHandler`] for the grammar in
//! [`crate::grammar`]. It keeps its own mirror of the state stack and routes
//! every forwarded character to the innermost state that owns text (a node
//! type, a property value, ...). Characters that arrive through a quoted,
//! escaped or bracketed literal are kept verbatim; everything else is trimmed
//! when its owner is left.
//!
//! ```
//! use opline::{RedirectMode, parse_request};
//!
//! let request = parse_request(
//!     "/subsystem=logging/console-handler=CONSOLE:write-attribute(name=level,value=INFO) > out.log",
//! )
//! .unwrap();
//!
//! assert!(request.absolute);
//! let segment = request.address[1].segment().unwrap();
//! assert_eq!(segment.node_type, "console-handler");
//! assert_eq!(segment.name.as_deref(), Some("CONSOLE"));
//! assert_eq!(request.operation.as_deref(), Some("write-attribute"));
//! assert_eq!(request.redirect.as_ref().map(|r| r.mode), Some(RedirectMode::Overwrite));
//! assert_eq!(
//!     request.to_string(),
//!     "/subsystem=logging/console-handler=CONSOLE:write-attribute(name=level,value=INFO) > out.log"
//! );
//! ```
use alloc::{string::String, vec::Vec};
use core::{fmt, mem, ops::Range};

use crate::{
    callback::ParsingStateCallbackHandler,
    error::{ParseError, Rejection},
    grammar,
    options::ParserOptions,
    parser::StateParser,
    state::StateId,
};

/// One `type=name` pair of an address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NodeSegment {
    /// The node type, left of `=`.
    pub node_type: String,
    /// The node name; `None` when the segment has no `=`.
    pub name: Option<String>,
}

/// One entry of a property list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Property {
    /// The property name.
    pub name: String,
    /// The value. `None` for a bare `name`, `Some("")` for `name=`.
    pub value: Option<String>,
    /// Byte offset of the `=` between name and value.
    pub value_separator: Option<usize>,
}

/// One step of an address, as written.
///
/// Relative addresses navigate from a current node: `..` goes to the parent,
/// `.` stays, and `.type` drops the name of the current node so that the next
/// bare step names it. See [`ParsedRequest::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum AddressStep {
    /// A `type` or `type=name` segment.
    Node(NodeSegment),
    /// `..`
    Parent,
    /// `.`
    Current,
    /// `.type`
    NodeType,
}

impl AddressStep {
    /// The segment, unless the step is a navigation step.
    #[must_use]
    pub fn segment(&self) -> Option<&NodeSegment> {
        match self {
            AddressStep::Node(segment) => Some(segment),
            _ => None,
        }
    }

    fn navigation(text: &str) -> Option<Self> {
        match text {
            ".." => Some(AddressStep::Parent),
            "." => Some(AddressStep::Current),
            ".type" => Some(AddressStep::NodeType),
            _ => None,
        }
    }
}

/// Whether redirected output replaces or extends the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum RedirectMode {
    /// `>`
    #[default]
    Overwrite,
    /// `>>`
    Append,
}

/// The trailing `> target` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Redirect {
    /// Overwrite or append.
    pub mode: RedirectMode,
    /// The target path, trimmed.
    pub target: String,
}

/// A request line in structured form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ParsedRequest {
    /// Whether the address starts at the root (`/`). A relative address
    /// navigates from the current node.
    pub absolute: bool,
    /// Address steps in input order. Empty segments (`//`) are dropped.
    pub address: Vec<AddressStep>,
    /// The operation name.
    pub operation: Option<String>,
    /// The property list; `None` when the line has no `(`.
    pub properties: Option<Vec<Property>>,
    /// Output redirection.
    pub redirect: Option<Redirect>,
}

impl ParsedRequest {
    /// Looks up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.as_ref()?.iter().find(|p| p.name == name)
    }

    /// Applies the address to `current`, the node a relative address starts
    /// from, and returns the node it designates.
    ///
    /// A bare `type` step that follows a segment without a name supplies that
    /// name, so `b` from `a` designates `a=b`.
    ///
    /// ```
    /// use opline::{NodeSegment, parse_request};
    ///
    /// let current = [NodeSegment { node_type: "a".into(), name: Some("b".into()) }];
    /// let request = parse_request("../c=d/.type/e").unwrap();
    /// let node = request.resolve(&current);
    /// assert_eq!(node, [NodeSegment { node_type: "c".into(), name: Some("e".into()) }]);
    /// ```
    #[must_use]
    pub fn resolve(&self, current: &[NodeSegment]) -> Vec<NodeSegment> {
        let mut address = if self.absolute {
            Vec::new()
        } else {
            current.to_vec()
        };
        for step in &self.address {
            match step {
                AddressStep::Node(segment) => match address.last_mut() {
                    Some(last) if last.name.is_none() && segment.name.is_none() => {
                        last.name = Some(segment.node_type.clone());
                    }
                    _ => address.push(segment.clone()),
                },
                AddressStep::Parent => {
                    address.pop();
                }
                AddressStep::Current => {}
                AddressStep::NodeType => {
                    if let Some(last) = address.last_mut() {
                        last.name = None;
                    }
                }
            }
        }
        address
    }
}

fn needs_quotes(text: &str) -> bool {
    text.chars().any(|c| {
        c.is_whitespace()
            || matches!(
                c,
                '"' | '\\' | '/' | '=' | ':' | ',' | '(' | ')' | '[' | ']' | '{' | '}' | '>'
            )
    })
}

fn write_text(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write_text_quoted_if(f, text, needs_quotes(text))
}

fn write_text_quoted_if(f: &mut fmt::Formatter<'_>, text: &str, quote: bool) -> fmt::Result {
    if !quote {
        return f.write_str(text);
    }
    f.write_str("\"")?;
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

/// Writes the request back as a line that parses to the same request under
/// the default options. Values with meta characters or whitespace are quoted
/// with backslash escapes.
impl fmt::Display for ParsedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            f.write_str("/")?;
        }
        for (i, step) in self.address.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            match step {
                AddressStep::Node(segment) => {
                    // A nameless `..` typed as a node must not read back as
                    // navigation.
                    let quote = needs_quotes(&segment.node_type)
                        || (segment.name.is_none()
                            && AddressStep::navigation(&segment.node_type).is_some());
                    write_text_quoted_if(f, &segment.node_type, quote)?;
                    if let Some(name) = &segment.name {
                        f.write_str("=")?;
                        write_text(f, name)?;
                    }
                }
                AddressStep::Parent => f.write_str("..")?,
                AddressStep::Current => f.write_str(".")?,
                AddressStep::NodeType => f.write_str(".type")?,
            }
        }
        if let Some(operation) = &self.operation {
            write!(f, ":{operation}")?;
        }
        if let Some(properties) = &self.properties {
            f.write_str("(")?;
            for (i, property) in properties.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write_text(f, &property.name)?;
                if let Some(value) = &property.value {
                    f.write_str("=")?;
                    write_text(f, value)?;
                }
            }
            f.write_str(")")?;
        }
        if let Some(redirect) = &self.redirect {
            let op = match redirect.mode {
                RedirectMode::Overwrite => ">",
                RedirectMode::Append => ">>",
            };
            if !self.absolute
                && self.address.is_empty()
                && self.operation.is_none()
                && self.properties.is_none()
            {
                write!(f, "{op} {}", redirect.target)?;
            } else {
                write!(f, " {op} {}", redirect.target)?;
            }
        }
        Ok(())
    }
}

/// Separators a line can end on, as asked by command-line completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `/` between address segments.
    Node,
    /// `=` between node type and node name.
    NodeTypeName,
    /// `:` between the address and the operation name.
    AddressOperationName,
    /// `(` opening the property list.
    PropertyListStart,
    /// `,` between properties.
    Property,
    /// `=` between property name and value.
    PropertyValue,
}

/// Text accumulated for one owner. Characters that came through a literal are
/// protected from trimming.
#[derive(Debug, Default)]
struct Field {
    text: String,
    protected: Option<Range<usize>>,
}

impl Field {
    fn push(&mut self, ch: char, protected: bool) {
        let start = self.text.len();
        self.text.push(ch);
        if protected {
            let end = self.text.len();
            self.protected = Some(match self.protected.take() {
                Some(range) => range.start..end,
                None => start..end,
            });
        }
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn finish(&mut self, options: &ParserOptions) -> String {
        let text = mem::take(&mut self.text);
        let is_ws = |c: char| options.is_whitespace(c);
        match self.protected.take() {
            None => text.trim_matches(is_ws).into(),
            Some(range) => {
                let mut out = String::with_capacity(text.len());
                out.push_str(text[..range.start].trim_start_matches(is_ws));
                out.push_str(&text[range.clone()]);
                out.push_str(text[range.end..].trim_end_matches(is_ws));
                out
            }
        }
    }
}

#[derive(Debug, Default)]
struct PendingProperty {
    name: Field,
    value: Option<Field>,
    value_separator: Option<usize>,
}

/// Builds a [`ParsedRequest`] from parser events.
///
/// The collector also answers the questions a completer asks about a partial
/// line. Events delivered before a parse error are kept, so these work on
/// lines that do not parse yet:
///
/// ```
/// use opline::{RequestCollector, Separator, grammar};
///
/// let mut collector = RequestCollector::new();
/// opline::parse("/subsystem=logging:read-resource(recursive=", &mut collector, &grammar::INITIAL)
///     .unwrap_err();
/// assert!(collector.ends_on(Separator::PropertyValue));
/// assert!(!collector.is_request_complete());
/// ```
#[derive(Debug, Default)]
pub struct RequestCollector {
    options: ParserOptions,
    stack: Vec<StateId>,
    request: ParsedRequest,
    node_type: Field,
    node_name: Option<Field>,
    operation: Field,
    property: PendingProperty,
    redirect_mode: RedirectMode,
    target: Field,
    list_closed: bool,
    last_separator: Option<Separator>,
}

impl RequestCollector {
    /// A collector trimming the whitespace recognised by the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A collector trimming the whitespace recognised by `options`.
    #[must_use]
    pub fn with_options(options: &ParserOptions) -> Self {
        Self {
            options: *options,
            ..Self::default()
        }
    }

    /// The request collected so far.
    #[must_use]
    pub fn request(&self) -> &ParsedRequest {
        &self.request
    }

    /// Consumes the collector, returning the request.
    #[must_use]
    pub fn into_request(self) -> ParsedRequest {
        self.request
    }

    /// The separator the line ended on, if the last significant thing seen
    /// was a separator.
    #[must_use]
    pub fn last_separator(&self) -> Option<Separator> {
        self.last_separator
    }

    /// Whether the line ended on `separator`.
    #[must_use]
    pub fn ends_on(&self, separator: Separator) -> bool {
        self.last_separator == Some(separator)
    }

    /// Whether the line names an operation and its property list, if any, is
    /// closed.
    #[must_use]
    pub fn is_request_complete(&self) -> bool {
        let named = self
            .request
            .operation
            .as_ref()
            .is_some_and(|op| !op.is_empty());
        named && (self.request.properties.is_none() || self.list_closed)
    }

    fn finish_segment(&mut self) {
        let literal = self.node_type.protected.is_some();
        let node_type = self.node_type.finish(&self.options);
        let name = self.node_name.take().map(|mut f| f.finish(&self.options));
        if node_type.is_empty() && name.is_none() {
            return;
        }
        let navigation = if name.is_none() && !literal {
            AddressStep::navigation(&node_type)
        } else {
            None
        };
        let step = match navigation {
            Some(step) => step,
            None => AddressStep::Node(NodeSegment { node_type, name }),
        };
        self.request.address.push(step);
    }

    fn finish_property(&mut self) {
        let mut pending = mem::take(&mut self.property);
        let name = pending.name.finish(&self.options);
        let value = pending.value.as_mut().map(|f| f.finish(&self.options));
        if name.is_empty() && value.is_none() {
            return;
        }
        if let Some(properties) = &mut self.request.properties {
            properties.push(Property {
                name,
                value,
                value_separator: pending.value_separator,
            });
        }
    }

    /// The innermost state that owns text, and whether the character reached
    /// it through a literal.
    fn owner(&self) -> Option<(StateId, bool)> {
        let mut protected = false;
        for state in self.stack.iter().rev() {
            match state {
                StateId::Quotes
                | StateId::Escape
                | StateId::Brackets
                | StateId::Braces
                | StateId::Parens => protected = true,
                StateId::Initial | StateId::PropertyList | StateId::RequestEnd => return None,
                owner => return Some((*owner, protected)),
            }
        }
        None
    }
}

impl ParsingStateCallbackHandler for RequestCollector {
    fn entered_state(&mut self, state: StateId, offset: usize) -> Result<(), Rejection> {
        self.stack.push(state);
        self.last_separator = match state {
            StateId::Node => Some(Separator::Node),
            StateId::NodeName => {
                self.node_name = Some(Field::default());
                Some(Separator::NodeTypeName)
            }
            StateId::OperationName => Some(Separator::AddressOperationName),
            StateId::PropertyList => {
                self.request.properties = Some(Vec::new());
                self.list_closed = false;
                Some(Separator::PropertyListStart)
            }
            StateId::Property => self.last_separator,
            StateId::PropertyValue => {
                self.property.value = Some(Field::default());
                self.property.value_separator = Some(offset);
                Some(Separator::PropertyValue)
            }
            StateId::OutputRedirect => {
                self.redirect_mode = RedirectMode::Overwrite;
                None
            }
            _ => None,
        };
        Ok(())
    }

    fn character(&mut self, state: StateId, ch: char, _offset: usize) -> Result<(), Rejection> {
        if !self.options.is_whitespace(ch) {
            self.last_separator = None;
        }
        if state == StateId::Initial {
            self.request.absolute = true;
            return Ok(());
        }
        let Some((owner, protected)) = self.owner() else {
            return Ok(());
        };
        match owner {
            StateId::Node => self.node_type.push(ch, protected),
            StateId::NodeName => {
                if let Some(name) = &mut self.node_name {
                    name.push(ch, protected);
                }
            }
            StateId::OperationName => self.operation.push(ch, protected),
            StateId::Property => self.property.name.push(ch, protected),
            StateId::PropertyValue => {
                if let Some(value) = &mut self.property.value {
                    value.push(ch, protected);
                }
            }
            StateId::OutputRedirect => self.redirect_mode = RedirectMode::Append,
            StateId::OutputTarget => self.target.push(ch, protected),
            _ => {}
        }
        Ok(())
    }

    fn leaving_state(
        &mut self,
        state: StateId,
        _offset: usize,
        closing: Option<char>,
    ) -> Result<(), Rejection> {
        self.stack.pop();
        match state {
            StateId::Node => {
                self.finish_segment();
                if closing == Some('/') {
                    self.last_separator = Some(Separator::Node);
                }
            }
            StateId::OperationName => {
                if !self.operation.is_empty() {
                    self.request.operation = Some(self.operation.finish(&self.options));
                }
            }
            StateId::Property => {
                self.finish_property();
                if closing == Some(',') {
                    self.last_separator = Some(Separator::Property);
                }
            }
            StateId::PropertyList => {
                self.list_closed = closing == Some(')');
                self.last_separator = None;
            }
            StateId::OutputRedirect => {
                let target = self.target.finish(&self.options);
                self.request.redirect = Some(Redirect {
                    mode: self.redirect_mode,
                    target,
                });
            }
            _ => {}
        }
        Ok(())
    }
}

/// Parses `line` with the default options and collects the request.
///
/// # Errors
///
/// Returns the first [`ParseError`] raised while parsing.
pub fn parse_request(line: &str) -> Result<ParsedRequest, ParseError> {
    parse_request_with(line, &ParserOptions::default())
}

/// Parses `line` with `options` and collects the request.
///
/// # Errors
///
/// Returns the first [`ParseError`] raised while parsing.
pub fn parse_request_with(
    line: &str,
    options: &ParserOptions,
) -> Result<ParsedRequest, ParseError> {
    let mut collector = RequestCollector::with_options(options);
    StateParser::new(*options).parse(line, &mut collector, &grammar::INITIAL)?;
    Ok(collector.into_request())
}
