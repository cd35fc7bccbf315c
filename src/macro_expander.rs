//! MacroExpander: the "gullet" between the lexer and the parser.
//!
//! Holds a stack of pending tokens (pushed back or produced by expansions) on
//! top of the [`Lexer`], and replaces macro tokens by their definitions until
//! a non-macro token surfaces.

use alloc::sync::Arc;

use crate::lexer::{CATCODE_ACTIVE, Lexer};
use crate::macros::builtins::BUILTIN_MACROS;
use crate::macros::{MacroArg, MacroDefinition};
use crate::namespace::{Mapping, Namespace};
use crate::types::{Mode, ParseError, ParseErrorKind, Settings, Token};

/// Expands macros until only non-macro tokens remain.
pub struct MacroExpander<'a> {
    settings: &'a Settings,
    expansion_count: usize,
    lexer: Lexer<'a>,
    macros: Namespace<MacroDefinition>,
    /// Pending tokens, in reverse order
    stack: Vec<Token>,
    mode: Mode,
}

impl<'a> MacroExpander<'a> {
    /// Expander over `input` with the settings' macros as globals.
    #[must_use]
    pub fn new(input: &str, settings: &'a Settings, mode: Mode) -> Self {
        let globals: Mapping<MacroDefinition> = settings
            .macros
            .iter()
            .map(|(name, body)| (name.clone(), MacroDefinition::from(body.clone())))
            .collect();
        Self {
            lexer: Lexer::new(Arc::from(input), settings),
            settings,
            expansion_count: 0,
            macros: Namespace::new(&BUILTIN_MACROS, globals),
            stack: Vec::new(),
            mode,
        }
    }

    /// Switch between text and math tokenization.
    pub const fn switch_mode(&mut self, new_mode: Mode) {
        self.mode = new_mode;
    }

    /// Current tokenization mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Open a macro scope.
    pub fn begin_group(&mut self) {
        self.macros.begin_group();
    }

    /// Close the innermost macro scope.
    pub fn end_group(&mut self) -> Result<(), ParseError> {
        self.macros.end_group()
    }

    /// Close every open scope.
    pub fn end_groups(&mut self) {
        self.macros.end_groups();
    }

    /// Define a macro in the current group, or globally.
    pub fn set_macro(&mut self, name: &str, body: String, global: bool) {
        self.macros.set(name, Some(MacroDefinition::String(body)), global);
    }

    /// Change the category code of `ch`.
    pub fn set_catcode(&mut self, ch: char, code: u8) {
        self.lexer.set_catcode(ch, code);
    }

    /// Push a token back so it is read next.
    pub fn push_token(&mut self, token: Token) {
        self.stack.push(token);
    }

    /// Push tokens given in reverse order.
    pub fn push_tokens(&mut self, tokens: Vec<Token>) {
        self.stack.extend(tokens);
    }

    /// The next unexpanded token, without consuming it.
    pub fn future(&mut self) -> Result<&Token, ParseError> {
        if self.stack.is_empty() {
            let token = self.lexer.lex()?;
            self.stack.push(token);
        }
        self.stack
            .last()
            .ok_or_else(|| ParseError::new("Internal error: token stack is empty"))
    }

    /// Consume the next unexpanded token.
    pub fn pop_token(&mut self) -> Result<Token, ParseError> {
        self.future()?;
        self.stack
            .pop()
            .ok_or_else(|| ParseError::new("Internal error: token stack is empty"))
    }

    /// Skip blank tokens.
    pub fn consume_spaces(&mut self) -> Result<(), ParseError> {
        while self.future()?.text == " " {
            self.stack.pop();
        }
        Ok(())
    }

    fn count_expansion(&mut self, amount: usize) -> Result<(), ParseError> {
        self.expansion_count += amount;
        if self.expansion_count > self.settings.max_expand {
            return Err(ParseError::new(
                "Too many expansions: infinite loop or need to increase maxExpand setting",
            ));
        }
        Ok(())
    }

    fn definition(&self, name: &str) -> Option<&MacroDefinition> {
        // Single characters only expand when active.
        let mut chars = name.chars();
        if let (Some(ch), None) = (chars.next(), chars.next())
            && let Some(code) = self.lexer.catcode(ch)
            && code != CATCODE_ACTIVE
        {
            return None;
        }
        self.macros.get(name)
    }

    /// Expand the next token once if it is a macro. Returns the number of
    /// tokens the expansion produced, or `None` (with the token pushed back)
    /// when it is not expandable.
    pub fn expand_once(&mut self) -> Result<Option<usize>, ParseError> {
        let token = self.pop_token()?;
        let definition = if token.noexpand {
            None
        } else {
            self.definition(&token.text).cloned()
        };
        let Some(definition) = definition else {
            self.push_token(token);
            return Ok(None);
        };
        self.count_expansion(1)?;
        log::trace!("expanding {} to {:?}", token.text, definition.body());
        let expansion = definition.expand(self.settings)?;
        let count = expansion.tokens.len();
        self.push_tokens(expansion.tokens);
        Ok(Some(count))
    }

    /// Fully expand the next token. `\relax` tokens are dropped.
    pub fn expand_next_token(&mut self) -> Result<Token, ParseError> {
        loop {
            if self.expand_once()?.is_some() {
                continue;
            }
            let token = self.pop_token()?;
            if token.text != "\\relax" {
                return Ok(token);
            }
        }
    }

    /// Whether `name` is a macro in the current scope.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.has(name)
    }

    /// Replacement text of `name` in the current scope.
    #[must_use]
    pub fn macro_body(&self, name: &str) -> Option<&str> {
        self.macros.get(name).map(MacroDefinition::body)
    }

    /// Read one macro argument without expanding it: a `{...}` group or a
    /// single token, or with `delimiter` every token up to it at brace depth
    /// zero.
    pub fn consume_arg(&mut self, delimiter: Option<&str>) -> Result<MacroArg, ParseError> {
        if delimiter.is_none() {
            self.consume_spaces()?;
        }
        let start = self.future()?.clone();
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        let end = loop {
            let token = self.pop_token()?;
            match token.text.as_str() {
                "{" => depth += 1,
                "}" => {
                    if depth == 0 {
                        return Err(ParseError::with_token("Extra }", &token));
                    }
                    depth -= 1;
                }
                "EOF" => {
                    let expected = delimiter.unwrap_or("}");
                    return Err(ParseError::with_token(
                        ParseErrorKind::ExpectedToken {
                            expected: expected.to_owned(),
                            found: "EOF".to_owned(),
                        },
                        &token,
                    ));
                }
                _ => {}
            }
            if let Some(delimiter) = delimiter {
                if depth == 0 && token.text == delimiter {
                    break token;
                }
                tokens.push(token);
            } else {
                tokens.push(token.clone());
                if depth == 0 {
                    break token;
                }
            }
        };

        if delimiter.is_none() && start.text == "{" {
            tokens.pop();
            tokens.remove(0);
        }
        Ok(MacroArg { tokens, start, end })
    }

    /// Scan an argument and push it back followed by an `EOF` marker, so the
    /// parser can read it as a self-contained expression. Returns a token
    /// spanning the argument, or `None` when an optional `[...]` argument is
    /// absent.
    pub fn scan_argument(&mut self, is_optional: bool) -> Result<Option<Token>, ParseError> {
        let (start, arg) = if is_optional {
            self.consume_spaces()?;
            if self.future()?.text != "[" {
                return Ok(None);
            }
            let start = self.pop_token()?;
            let arg = self.consume_arg(Some("]"))?;
            (start, arg)
        } else {
            let arg = self.consume_arg(None)?;
            (arg.start.clone(), arg)
        };

        let end = arg.end.clone();
        let text: String = arg.tokens.iter().map(|t| t.text.as_str()).collect();
        self.push_token(Token::new("EOF", end.loc.clone()));
        self.push_tokens(arg.tokens.into_iter().rev().collect());

        Ok(Some(start.clone().range(end, text).unwrap_or_else(|| {
            Token::new(String::new(), start.loc)
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::KeyMap;

    fn expand_all(input: &str, settings: &Settings) -> Result<Vec<String>, ParseError> {
        let mut gullet = MacroExpander::new(input, settings, Mode::Math);
        let mut out = Vec::new();
        loop {
            let token = gullet.expand_next_token()?;
            if token.text == "EOF" {
                return Ok(out);
            }
            out.push(token.text);
        }
    }

    #[test]
    fn builtin_macros_expand() {
        let texts = expand_all("a\\ne b", &Settings::default()).unwrap();
        assert_eq!(texts, ["a", "\\neq", "b"]);
        let texts = expand_all("x~y", &Settings::default()).unwrap();
        assert_eq!(texts, ["x", "\\nobreakspace", "y"]);
    }

    #[test]
    fn relax_is_dropped() {
        let texts = expand_all("\\relax x\\relax", &Settings::default()).unwrap();
        assert_eq!(texts, ["x"]);
    }

    #[test]
    fn user_macros_shadow_builtins_and_nest() {
        let mut macros = KeyMap::default();
        macros.insert("\\RR".to_owned(), "\\mathbb{R}".to_owned());
        macros.insert("\\le".to_owned(), "\\RR".to_owned());
        let settings = Settings::builder().macros(macros).build();
        let texts = expand_all("\\le", &settings).unwrap();
        assert_eq!(texts, ["\\mathbb", "{", "R", "}"]);
    }

    #[test]
    fn infinite_recursion_hits_the_expansion_limit() {
        let mut macros = KeyMap::default();
        macros.insert("\\loop".to_owned(), "\\loop".to_owned());
        let settings = Settings::builder().macros(macros).max_expand(50).build();
        let err = expand_all("\\loop", &settings).unwrap_err();
        assert!(err.message().starts_with("Too many expansions"));
    }

    #[test]
    fn group_scoping_undoes_local_definitions() {
        let settings = Settings::default();
        let mut gullet = MacroExpander::new("\\x", &settings, Mode::Math);
        gullet.begin_group();
        gullet.set_macro("\\x", "y".to_owned(), false);
        gullet.end_group().unwrap();
        assert!(!gullet.is_defined("\\x"));
        assert_eq!(gullet.expand_next_token().unwrap().text, "\\x");
    }

    #[test]
    fn scan_argument_pushes_back_the_group_contents() {
        let settings = Settings::default();
        let mut gullet = MacroExpander::new("{ab}c", &settings, Mode::Math);
        let token = gullet.scan_argument(false).unwrap().unwrap();
        assert_eq!(token.text, "ab");
        let mut texts = Vec::new();
        for _ in 0..4 {
            texts.push(gullet.pop_token().unwrap().text);
        }
        assert_eq!(texts, ["a", "b", "EOF", "c"]);
    }

    #[test]
    fn optional_argument_is_absent_without_bracket() {
        let settings = Settings::default();
        let mut gullet = MacroExpander::new("  x", &settings, Mode::Math);
        assert!(gullet.scan_argument(true).unwrap().is_none());
        assert_eq!(gullet.pop_token().unwrap().text, "x");
    }

    #[test]
    fn unbalanced_argument_fails() {
        let settings = Settings::default();
        let mut gullet = MacroExpander::new("{ab", &settings, Mode::Math);
        assert!(gullet.scan_argument(false).is_err());
    }
}
