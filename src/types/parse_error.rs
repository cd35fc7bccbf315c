//! Parse error handling
//!
//! Every failure surfaced by the parser or the layout engine is a
//! [`ParseError`]: a categorised [`ParseErrorKind`] plus, when the failure can
//! be pinned to a token, the position of that token and an excerpt of the
//! input around it.

use crate::parser::parse_node::NodeType;
use crate::symbols::Mode;
use crate::types::SourceLocation;
use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;
use thiserror::Error;

/// Error produced by the typesetter when something has gone wrong, either in
/// the expression the user provided or inside the layout engine.
#[derive(Debug, Error)]
#[error("TeX parse error: {kind}{context}")]
pub struct ParseError {
    /// Categorised reason for the failure.
    #[source]
    pub kind: Box<ParseErrorKind>,
    /// Start offset of the offending token, if known
    pub position: Option<usize>,
    /// Length of the offending token, if known
    pub length: Option<usize>,
    context: ParseErrorContext,
}

impl ParseError {
    /// Create an error with no location information
    pub fn new<T: Into<ParseErrorKind>>(kind: T) -> Self {
        Self {
            kind: Box::new(kind.into()),
            position: None,
            length: None,
            context: ParseErrorContext::None,
        }
    }

    /// Create an error pointing at a token or parse node
    pub fn with_token<T: Into<ParseErrorKind>>(kind: T, token: &dyn ErrorLocationProvider) -> Self {
        let mut error = Self::new(kind);
        if let Some(loc) = token.loc().filter(|loc| loc.start <= loc.end) {
            error.position = Some(loc.start);
            error.length = Some(loc.end - loc.start);
            error.context = ParseErrorContext::Location(loc.clone());
        }
        error
    }

    /// The bare message, without the location excerpt
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Describes the specific reason for a [`ParseError`].
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// Fixed message with no parameters
    #[error("{0}")]
    Message(&'static str),
    /// A specific token was required
    #[error("Expected '{expected}', got '{found}'")]
    ExpectedToken {
        /// What was wanted
        expected: String,
        /// What was there
        found: String,
    },
    /// The lexer met a character it cannot tokenize
    #[error("Unexpected character: '{character}'")]
    UnexpectedCharacter {
        /// Offending character
        character: String,
    },
    /// A control sequence with no function, symbol or macro
    #[error("Undefined control sequence: {name}")]
    UndefinedControlSequence {
        /// Control sequence
        name: String,
    },
    /// A function used where its arguments cannot follow
    #[error("Got function '{func}' with no arguments as {context}")]
    FunctionMissingArguments {
        /// Function name
        func: String,
        /// Where it appeared
        context: String,
    },
    /// A function outside the modes it allows
    #[error("Can't use function '{func}' in {mode} mode")]
    FunctionDisallowedInMode {
        /// Function name
        func: String,
        /// Current mode
        mode: Mode,
    },
    /// A script or command with nothing to take as argument
    #[error("Expected group after '{symbol}'")]
    ExpectedGroupAfter {
        /// Command or script marker
        symbol: String,
    },
    /// Color argument that is neither a name nor hex
    #[error("Invalid color: '{color}'")]
    InvalidColor {
        /// Argument text
        color: String,
    },
    /// Size argument that does not parse as a number and unit
    #[error("Invalid size: '{size}'")]
    InvalidSize {
        /// Argument text
        size: String,
    },
    /// Size with an unknown unit
    #[error("Invalid unit: '{unit}'")]
    InvalidUnit {
        /// Unit text
        unit: String,
    },
    /// URL rejected by the trust settings
    #[error("Forbidden protocol '{protocol}'")]
    ForbiddenProtocol {
        /// Scheme, or the whole URL when it has none
        protocol: String,
    },
    /// Delimiter not accepted by a sizing command
    #[error("Invalid delimiter: '{delimiter}' after '{function}'")]
    InvalidDelimiterAfter {
        /// Delimiter text
        delimiter: String,
        /// Sizing command
        function: String,
    },
    /// Delimiter that no size can draw
    #[error("Illegal delimiter: '{delimiter}'")]
    IllegalDelimiter {
        /// Delimiter text
        delimiter: String,
    },
    /// Delimiter glyph missing at the requested size
    #[error("Unsupported symbol {symbol} and font size {font}.")]
    UnsupportedSymbolFont {
        /// Command or script marker
        symbol: String,
        /// Font name or size
        font: String,
    },
    /// Font with no metrics table
    #[error("Font metrics not found for font: {font}.")]
    UnknownFont {
        /// Font name or size
        font: String,
    },
    /// Accent command with no glyph
    #[error("Unknown accent '{accent}'")]
    UnknownAccent {
        /// Accent command
        accent: String,
    },
    /// Accent used in a mode it does not support
    #[error("Accent {accent} unsupported in {mode} mode")]
    UnsupportedAccentInMode {
        /// Accent command
        accent: String,
        /// Current mode
        mode: Mode,
    },
    /// Stretchy label with no image
    #[error("Unknown stretchy element: {label}")]
    UnknownStretchyElement {
        /// Stretchy label
        label: String,
    },
    /// Function registered without a handler
    #[error("No function handler for {name}")]
    NoFunctionHandler {
        /// Control sequence
        name: String,
    },
    /// Node type with no layout builder
    #[error("Got group of unknown type: '{group_type}'")]
    UnknownGroupType {
        /// Node type
        group_type: NodeType,
    },
    /// Argument of the wrong node type
    #[error("Expected {expected} node")]
    ExpectedNode {
        /// What was wanted
        expected: NodeType,
    },
    /// Non-LaTeX input while strict mode is `error`
    #[error("LaTeX-incompatible input and strict mode is set to 'error': {message} [{code}]")]
    StrictModeError {
        /// Description
        message: String,
        /// Short error code
        code: String,
    },
    /// Groups nested past `max_nesting`
    #[error("Nesting too deep: more than {limit} levels")]
    NestingTooDeep {
        /// Configured limit
        limit: usize,
    },
    /// Test helper: the expression parsed but should not have
    #[error("Expected parsing to fail for '{expression}'")]
    ExpectedParseFailure {
        /// Input text
        expression: String,
    },
    /// Test helper: the expression built but should not have
    #[error("Expected building to fail for '{expression}'")]
    ExpectedBuildFailure {
        /// Input text
        expression: String,
    },
}

impl From<&'static str> for ParseErrorKind {
    fn from(message: &'static str) -> Self {
        Self::Message(message)
    }
}

#[derive(Debug)]
enum ParseErrorContext {
    None,
    Location(SourceLocation),
}

impl fmt::Display for ParseErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self::Location(SourceLocation { input, start, end }) = self else {
            return Ok(());
        };
        let (start, end) = (*start, *end);

        if start == input.len() {
            write!(f, " at end of input: ")?;
        } else {
            write!(f, " at position {}: ", start + 1)?;
        }

        let prefix_start = char_boundary(input, start.saturating_sub(15), false);
        if prefix_start > 0 {
            f.write_str("\u{2026}")?;
        }
        f.write_str(&input[prefix_start..start])?;
        for c in input[start..end].chars() {
            write!(f, "{c}\u{0332}")?;
        }
        let suffix_end = char_boundary(input, (end + 15).min(input.len()), true);
        f.write_str(&input[end..suffix_end])?;
        if suffix_end < input.len() {
            f.write_str("\u{2026}")?;
        }
        Ok(())
    }
}

fn char_boundary(input: &str, mut index: usize, forward: bool) -> usize {
    while !input.is_char_boundary(index) {
        if forward {
            index += 1;
        } else {
            index -= 1;
        }
    }
    index
}

/// Anything that can point at a span of the input for error reporting
pub trait ErrorLocationProvider {
    /// The source location, if one is known
    fn loc(&self) -> Option<&SourceLocation>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Token;
    use alloc::sync::Arc;

    fn token_at(input: &str, start: usize, end: usize) -> Token {
        let text = &input[start..end];
        Token::new(text, Some(SourceLocation::new(Arc::from(input), start, end)))
    }

    #[test]
    fn error_without_location_is_just_the_message() {
        let err = ParseError::new("Double superscript");
        assert_eq!(err.to_string(), "TeX parse error: Double superscript");
        assert_eq!(err.position, None);
    }

    #[test]
    fn error_with_token_underlines_the_span() {
        let token = token_at("x^2^3", 3, 4);
        let err = ParseError::with_token("Double superscript", &token);
        assert_eq!(err.position, Some(3));
        assert_eq!(err.length, Some(1));
        assert_eq!(
            err.to_string(),
            "TeX parse error: Double superscript at position 4: x^2^\u{332}3"
        );
    }

    #[test]
    fn long_inputs_are_elided_on_both_sides() {
        let input = "aaaaaaaaaaaaaaaaaaaa\\bad bbbbbbbbbbbbbbbbbbbb";
        let token = token_at(input, 20, 24);
        let err = ParseError::with_token(
            ParseErrorKind::UndefinedControlSequence {
                name: "\\bad".to_owned(),
            },
            &token,
        );
        let rendered = err.to_string();
        assert!(rendered.contains("at position 21: \u{2026}aaaaaaaaaaaaaaa"));
        assert!(rendered.ends_with('\u{2026}'));
    }

    #[test]
    fn end_of_input_is_reported_as_such() {
        let token = token_at("\\frac1", 6, 6);
        let err = ParseError::with_token(
            ParseErrorKind::ExpectedGroupAfter {
                symbol: "\\frac".to_owned(),
            },
            &token,
        );
        assert!(err.to_string().contains("at end of input: "));
    }

    #[test]
    fn kind_messages_match_user_facing_text() {
        let kind = ParseErrorKind::FunctionMissingArguments {
            func: "\\sqrt".to_owned(),
            context: "argument to '\\frac'".to_owned(),
        };
        assert_eq!(
            kind.to_string(),
            "Got function '\\sqrt' with no arguments as argument to '\\frac'"
        );
    }
}
