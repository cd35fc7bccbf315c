//! Core type definitions shared by the lexer, parser and layout engine

mod source_location;
pub use source_location::{SourceLocation, SourceRangeRef};

mod parse_error;
pub use parse_error::{ErrorLocationProvider, ParseError, ParseErrorKind};

mod tokens;
pub use tokens::Token;

mod settings;
pub use settings::{
    DEFAULT_ALLOWED_PROTOCOLS, DEFAULT_MAX_NESTING, Settings, StrictFunction, StrictMode, StrictSetting,
    protocol_from_url,
};

pub use crate::symbols::Mode;
use strum::{AsRefStr, EnumString};

/// Kinds of argument a command can declare.
///
/// Anything not listed here is parsed as an ordinary group in the mode the
/// parser is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// `{#rgb}`, `{#rrggbb}`, `{rrggbb}` or a named color
    Color,
    /// A dimension such as `{1.5em}`
    Size,
    /// A URL, lexed with `%` and `~` treated as ordinary characters
    Url,
    /// Raw text up to the matching close brace
    Raw,
    /// An ordinary group in whatever mode the parser is currently in
    Original,
    /// A group parsed in the given mode
    Mode(Mode),
}

/// Named stylings accepted by `\displaystyle` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StyleVariant {
    /// `\displaystyle`
    Display,
    /// `\textstyle`
    Text,
    /// `\scriptstyle`
    Script,
    /// `\scriptscriptstyle`
    ScriptScript,
}

/// Tokens that may terminate an expression early when passed as the
/// `break_on_token_text` of a sub-parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum BreakToken {
    /// End of an optional argument
    #[strum(serialize = "]")]
    RightBracket,
    /// End of a group
    #[strum(serialize = "}")]
    RightBrace,
    /// `\endgroup`
    #[strum(serialize = "\\endgroup")]
    EndGroup,
    /// End of inline math inside text
    #[strum(serialize = "$")]
    Dollar,
    /// Closing `\right`
    #[strum(serialize = "\\right")]
    Right,
    /// End of input
    #[strum(serialize = "EOF")]
    Eof,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr as _;

    #[test]
    fn break_tokens_round_trip_through_their_text() {
        assert_eq!(BreakToken::from_str("]").unwrap(), BreakToken::RightBracket);
        assert_eq!(BreakToken::Right.as_ref(), "\\right");
        assert!(BreakToken::from_str(")").is_err());
    }

    #[test]
    fn style_variants_use_latex_names() {
        assert_eq!(
            StyleVariant::from_str("scriptscript").unwrap(),
            StyleVariant::ScriptScript
        );
    }
}
