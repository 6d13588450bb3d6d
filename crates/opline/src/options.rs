/// How a backslash behaves inside quoted literals and bare property values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum QuoteEscape {
    /// `\x` yields `x` literally, so `\"` keeps a quoted literal open and `\,`
    /// keeps a bare value from ending.
    #[default]
    Backslash,
    /// A backslash is an ordinary character. A quote can only close a literal.
    Verbatim,
}

/// Configuration options for the operation-request parser.
///
/// # Examples
///
/// ```rust
/// use opline::{ParserOptions, QuoteEscape, StateParser};
///
/// let parser = StateParser::new(ParserOptions {
///     quote_escape: QuoteEscape::Verbatim,
///     ..Default::default()
/// });
/// ```
///
/// # Default
///
/// Backslash escapes, strict brackets, ASCII whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// The escape convention inside quoted literals and bare values.
    ///
    /// # Default
    ///
    /// [`QuoteEscape::Backslash`]
    pub quote_escape: QuoteEscape,

    /// Whether a bracket, brace or parenthesis literal inside a property value
    /// that is still open at end of input is closed implicitly.
    ///
    /// When `false` the parse fails with
    /// [`ErrorKind::UnmatchedBracket`](crate::ErrorKind::UnmatchedBracket).
    /// Interactive completion usually wants `true`, since the user has not
    /// finished typing the literal yet.
    ///
    /// # Default
    ///
    /// `false`
    pub lenient_brackets: bool,

    /// Whether to treat any Unicode whitespace as whitespace.
    ///
    /// By default only space (U+0020), horizontal tab (U+0009), line feed
    /// (U+000A) and carriage return (U+000D) are recognised.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,

    #[cfg(any(test, feature = "fuzzing"))]
    /// Panic on parse errors instead of returning them.
    ///
    /// Enabled only in test builds to produce backtraces on parse failures.
    pub panic_on_error: bool,
}

impl ParserOptions {
    #[inline]
    pub(crate) fn is_whitespace(&self, c: char) -> bool {
        if self.allow_unicode_whitespace {
            c.is_whitespace()
        } else {
            matches!(c, ' ' | '\t' | '\n' | '\r')
        }
    }
}
