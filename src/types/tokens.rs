use crate::types::{ErrorLocationProvider, SourceLocation};

/// A single lexed token: the raw text plus the span it came from.
///
/// Tokens synthesised by macro expansion carry no location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Raw text. Control sequences keep their backslash (`"\\alpha"`),
    /// whitespace runs are collapsed to `" "`.
    pub text: String,
    /// Where in the input this token was found
    pub loc: Option<SourceLocation>,
    /// Set on tokens that must not be expanded again
    pub noexpand: bool,
}

impl Token {
    /// A token with `text` at `loc`.
    #[must_use]
    pub fn new(text: impl Into<String>, loc: Option<SourceLocation>) -> Self {
        Self {
            text: text.into(),
            loc,
            noexpand: false,
        }
    }

    /// Build a token spanning from `self` to `end_token` with the given
    /// text. Returns `None` when the two tokens come from different inputs.
    #[must_use]
    pub fn range(self, end_token: Self, text: String) -> Option<Self> {
        let loc = SourceLocation::range(self.loc, end_token.loc)?;
        Some(Self::new(text, Some(loc)))
    }
}

impl ErrorLocationProvider for Token {
    fn loc(&self) -> Option<&SourceLocation> {
        self.loc.as_ref()
    }
}

impl ErrorLocationProvider for Option<Token> {
    fn loc(&self) -> Option<&SourceLocation> {
        self.as_ref()?.loc.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::sync::Arc;

    #[test]
    fn range_merges_locations() {
        let input: Arc<str> = Arc::from("#ff0000");
        let first = Token::new("#", Some(SourceLocation::new(Arc::clone(&input), 0, 1)));
        let last = Token::new("0", Some(SourceLocation::new(Arc::clone(&input), 6, 7)));
        let merged = first.range(last, "#ff0000".to_owned()).unwrap();
        assert_eq!(merged.text, "#ff0000");
        let loc = merged.loc.unwrap();
        assert_eq!((loc.start, loc.end), (0, 7));
    }

    #[test]
    fn range_without_locations_fails() {
        let merged = Token::new("a", None).range(Token::new("b", None), "ab".to_owned());
        assert!(merged.is_none());
    }
}
