//! Tokenizer for LaTeX source.
//!
//! Each call to [`Lexer::lex`] returns the next token, matched in this order:
//! a whitespace run, a control space, a single character with any trailing
//! combining marks, `\verb*` and `\verb` literals, a control word (trailing
//! spaces swallowed), a control symbol. Anything else is an error.

use alloc::sync::Arc;

use crate::namespace::KeyMap;
use crate::types::{ParseError, ParseErrorKind, Settings, SourceLocation, Token};

/// Category code of the comment character
pub const CATCODE_COMMENT: u8 = 14;
/// Category code of active characters such as `~`
pub const CATCODE_ACTIVE: u8 = 13;
/// Category code of ordinary characters
pub const CATCODE_OTHER: u8 = 12;

const fn is_combining_mark(ch: char) -> bool {
    matches!(ch as u32, 0x0300..=0x036F)
}

const fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\r' | '\n' | '\t')
}

fn count_while(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.chars()
        .take_while(|&c| pred(c))
        .map(char::len_utf8)
        .sum()
}

fn match_space(s: &str) -> Option<usize> {
    let len = count_while(s, is_space);
    (len > 0).then_some(len)
}

/// `\` followed by a space, tab or newline, plus the blanks after it. At
/// most one newline is swallowed.
fn match_control_space(s: &str) -> Option<usize> {
    let rest = s.strip_prefix('\\')?;
    let first = rest.chars().next()?;
    if !is_space(first) {
        return None;
    }
    let mut len = 1 + first.len_utf8();
    if first != '\n' {
        len += count_while(&s[len..], |c| matches!(c, ' ' | '\r' | '\t'));
        if s[len..].starts_with('\n') {
            len += 1;
        }
    }
    len += count_while(&s[len..], |c| matches!(c, ' ' | '\r' | '\t'));
    Some(len)
}

/// One character (excluding `\`, surrogates and the bidi controls) plus any
/// combining diacritical marks that follow it.
fn match_char_with_accents(s: &str) -> Option<usize> {
    let first = s.chars().next()?;
    let accepted = matches!(
        first as u32,
        0x0021..=0x005B | 0x005D..=0x2027 | 0x202A..=0xD7FF | 0xF900..
    );
    if !accepted {
        return None;
    }
    let len = first.len_utf8();
    Some(len + count_while(&s[len..], is_combining_mark))
}

/// `\verb<d>...<d>` or `\verb*<d>...<d>` on a single line. Without the star
/// the delimiter may not be a letter, which would make it a control word.
fn match_verb(s: &str, star: bool) -> Option<usize> {
    let prefix = if star { "\\verb*" } else { "\\verb" };
    let rest = s.strip_prefix(prefix)?;
    let mut chars = rest.char_indices();
    let (_, delim) = chars.next()?;
    if !star && delim.is_ascii_alphabetic() {
        return None;
    }
    for (i, c) in chars {
        if matches!(c, '\n' | '\r') {
            return None;
        }
        if c == delim {
            return Some(prefix.len() + i + c.len_utf8());
        }
    }
    None
}

fn match_control_word(s: &str) -> Option<usize> {
    let rest = s.strip_prefix('\\')?;
    let len = count_while(rest, |c| c.is_ascii_alphabetic() || c == '@');
    (len > 0).then_some(1 + len)
}

fn match_control_symbol(s: &str) -> Option<usize> {
    let rest = s.strip_prefix('\\')?;
    let c = rest.chars().next()?;
    Some(1 + c.len_utf8())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Space,
    ControlSpace,
    Char,
    Verb,
    /// Control word; `skip` trailing bytes of blanks are not part of the text
    ControlWord { skip: usize },
    ControlSymbol,
}

fn match_token(s: &str) -> Option<(Branch, usize)> {
    if let Some(len) = match_space(s) {
        return Some((Branch::Space, len));
    }
    if let Some(len) = match_control_space(s) {
        return Some((Branch::ControlSpace, len));
    }
    if let Some(len) = match_char_with_accents(s) {
        return Some((Branch::Char, len));
    }
    if let Some(len) = match_verb(s, true).or_else(|| match_verb(s, false)) {
        return Some((Branch::Verb, len));
    }
    if let Some(len) = match_control_word(s) {
        let skip = count_while(&s[len..], is_space);
        return Some((Branch::ControlWord { skip }, len + skip));
    }
    match_control_symbol(s).map(|len| (Branch::ControlSymbol, len))
}

/// Stateful cursor over one input string.
pub struct Lexer<'a> {
    input: Arc<str>,
    last_index: usize,
    settings: &'a Settings,
    catcodes: KeyMap<char, u8>,
}

impl<'a> Lexer<'a> {
    /// Lexer over `input` with default category codes.
    #[must_use]
    pub fn new(input: Arc<str>, settings: &'a Settings) -> Self {
        let mut catcodes = KeyMap::default();
        catcodes.insert('%', CATCODE_COMMENT);
        catcodes.insert('~', CATCODE_ACTIVE);
        Self {
            input,
            last_index: 0,
            settings,
            catcodes,
        }
    }

    /// Change how a character is lexed (used while reading URLs).
    pub fn set_catcode(&mut self, ch: char, code: u8) {
        self.catcodes.insert(ch, code);
    }

    /// Category code overridden for `ch`, if any.
    #[must_use]
    pub fn catcode(&self, ch: char) -> Option<u8> {
        self.catcodes.get(&ch).copied()
    }

    /// The whole input.
    #[must_use]
    pub fn input(&self) -> &Arc<str> {
        &self.input
    }

    fn loc(&self, start: usize, end: usize) -> Option<SourceLocation> {
        Some(SourceLocation::new(Arc::clone(&self.input), start, end))
    }

    /// Lex the next token. At the end of input this keeps returning an
    /// `EOF` token with an empty span at the input length.
    pub fn lex(&mut self) -> Result<Token, ParseError> {
        loop {
            let start = self.last_index;
            if start >= self.input.len() {
                return Ok(Token::new("EOF", self.loc(start, start)));
            }
            let slice = &self.input[start..];
            let Some((branch, len)) = match_token(slice) else {
                let ch = slice.chars().next().map_or(1, char::len_utf8);
                let text = &slice[..ch];
                let token = Token::new(text, self.loc(start, start + ch));
                return Err(ParseError::with_token(
                    ParseErrorKind::UnexpectedCharacter {
                        character: text.to_owned(),
                    },
                    &token,
                ));
            };
            let end = start + len;
            self.last_index = end;

            let text = match branch {
                Branch::Space => " ",
                Branch::ControlSpace => "\\ ",
                Branch::ControlWord { skip } => &slice[..len - skip],
                Branch::Char | Branch::Verb | Branch::ControlSymbol => &slice[..len],
            };

            if text.len() == 1
                && let Some(ch) = text.chars().next()
                && self.catcode(ch) == Some(CATCODE_COMMENT)
            {
                if let Some(newline) = self.input[end..].find('\n') {
                    self.last_index = end + newline;
                } else {
                    self.last_index = self.input.len();
                    self.settings.report_nonstrict(
                        "commentAtEnd",
                        "% comment has no terminating newline; LaTeX would fail because of commenting the end of math mode (e.g. $)",
                        None,
                    )?;
                }
                continue;
            }

            return Ok(Token::new(text, self.loc(start, end)));
        }
    }

    /// Byte offset of the next token.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.last_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StrictMode;

    fn lex_all(input: &str, settings: &Settings) -> Result<Vec<Token>, ParseError> {
        let mut lexer = Lexer::new(Arc::from(input), settings);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.lex()?;
            if token.text == "EOF" {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }

    fn texts(input: &str) -> Vec<String> {
        lex_all(input, &Settings::default())
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn splits_control_words_symbols_and_chars() {
        assert_eq!(texts("\\frac12"), ["\\frac", "1", "2"]);
        assert_eq!(texts("\\{x\\}"), ["\\{", "x", "\\}"]);
        assert_eq!(texts("\\alpha   +b"), ["\\alpha", "+", "b"]);
    }

    #[test]
    fn whitespace_runs_collapse_but_keep_their_span() {
        let tokens = lex_all("a  \n b", &Settings::default()).unwrap();
        assert_eq!(tokens[1].text, " ");
        let loc = tokens[1].loc.as_ref().unwrap();
        assert_eq!((loc.start, loc.end), (1, 5));
    }

    #[test]
    fn control_space_is_normalised() {
        assert_eq!(texts("x\\ b"), ["x", "\\ ", "b"]);
        assert_eq!(texts("x\\\tb"), ["x", "\\ ", "b"]);
    }

    #[test]
    fn combining_marks_stay_with_their_base() {
        assert_eq!(texts("e\u{301}x"), ["e\u{301}", "x"]);
    }

    #[test]
    fn verb_literals_are_single_tokens() {
        assert_eq!(texts("\\verb|a b|c"), ["\\verb|a b|", "c"]);
        assert_eq!(texts("\\verb*!x!"), ["\\verb*!x!"]);
        // Unterminated: lexes as a plain control word.
        assert_eq!(texts("\\verb|ab")[0], "\\verb");
    }

    #[test]
    fn comments_run_to_end_of_line() {
        assert_eq!(texts("a%comment\nb"), ["a", " ", "b"]);
        let strict = Settings::builder().strict(StrictMode::Error).build();
        assert!(lex_all("a%trailing", &strict).is_err());
    }

    #[test]
    fn eof_span_sits_at_the_end() {
        let settings = Settings::default();
        let mut lexer = Lexer::new(Arc::from("x"), &settings);
        lexer.lex().unwrap();
        let eof = lexer.lex().unwrap();
        assert_eq!(eof.text, "EOF");
        let loc = eof.loc.unwrap();
        assert_eq!((loc.start, loc.end), (1, 1));
    }

    #[test]
    fn unexpected_characters_fail_with_a_one_char_span() {
        let err = lex_all("a\u{2028}", &Settings::default()).unwrap_err();
        assert_eq!(err.position, Some(1));
        assert!(err.message().starts_with("Unexpected character"));
    }
}
