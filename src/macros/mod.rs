//! Macro definitions consumed by the [`MacroExpander`](crate::macro_expander::MacroExpander).
//!
//! Only parameterless macros are supported: a definition is the replacement
//! text, lexed afresh on every expansion.

use alloc::sync::Arc;

use crate::lexer::Lexer;
use crate::types::{ParseError, Settings, Token};

pub mod builtins;

/// Replacement text of a macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroDefinition {
    /// Compiled into the builtin table
    StaticStr(&'static str),
    /// Supplied at runtime through [`Settings::macros`]
    String(String),
}

impl MacroDefinition {
    /// Replacement text.
    #[must_use]
    pub fn body(&self) -> &str {
        match self {
            Self::StaticStr(s) => s,
            Self::String(s) => s,
        }
    }

    /// Lex the replacement text into tokens in reverse order, ready to be
    /// pushed onto the expander's stack. The tokens carry no location.
    pub fn expand(&self, settings: &Settings) -> Result<MacroExpansion, ParseError> {
        let mut lexer = Lexer::new(Arc::from(self.body()), settings);
        let mut tokens = Vec::new();
        loop {
            let mut token = lexer.lex()?;
            if token.text == "EOF" {
                break;
            }
            token.loc = None;
            tokens.push(token);
        }
        tokens.reverse();
        Ok(MacroExpansion { tokens })
    }
}

impl From<String> for MacroDefinition {
    fn from(body: String) -> Self {
        Self::String(body)
    }
}

/// The lexed replacement of one macro use, tokens in reverse order.
#[derive(Debug, Clone, Default)]
pub struct MacroExpansion {
    /// Replacement tokens
    pub tokens: Vec<Token>,
}

/// A macro argument scanned without expansion, plus the tokens that opened
/// and closed it.
#[derive(Debug, Clone)]
pub struct MacroArg {
    /// Argument content in forward order, outer braces removed
    pub tokens: Vec<Token>,
    /// Opening token, `{` for braced arguments
    pub start: Token,
    /// Closing token
    pub end: Token,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansion_tokens_are_reversed_and_unlocated() {
        let def = MacroDefinition::StaticStr("\\;\\Longrightarrow\\;");
        let expansion = def.expand(&Settings::default()).unwrap();
        let texts: Vec<_> = expansion.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["\\;", "\\Longrightarrow", "\\;"]);
        assert!(expansion.tokens.iter().all(|t| t.loc.is_none()));
    }
}
