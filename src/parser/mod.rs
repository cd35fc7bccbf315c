use core::iter;

use phf::phf_set;

use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionSpec};
use crate::lexer::{CATCODE_ACTIVE, CATCODE_COMMENT, CATCODE_OTHER};
use crate::macro_expander::MacroExpander;
use crate::parser::parse_node::{
    ParseNode, ParseNodeAccent, ParseNodeAtom, ParseNodeColor, ParseNodeColorToken,
    ParseNodeOrdGroup, ParseNodeRaw, ParseNodeSize, ParseNodeSupSub, ParseNodeSymbol,
    ParseNodeText, ParseNodeUrl, ParseNodeVerb,
};
use crate::symbols::{Group, NonAtom};
use crate::types::{
    ArgType, BreakToken, Mode, ParseError, ParseErrorKind, Settings, SourceLocation,
    SourceRangeRef as _, Token, protocol_from_url,
};
use crate::unicode::{UNICODE_ACCENTS, UNICODE_SYMBOLS, supported_codepoint};
use crate::units::{Measurement, Unit};

pub mod parse_node;

/// Greediness of `^` and `_`: only a command greedier than this can be an
/// ungrouped script.
pub const SUPSUB_GREEDINESS: u8 = 1;

/// The parser for LaTeX math, turning source text into a tree of
/// [`ParseNode`]s.
///
/// # Parsing strategy
///
/// Recursive descent with one token of lookahead. Tokens come from the
/// [`MacroExpander`] (the "gullet"), which in turn pulls them from the lexer
/// and expands macros. Commands are looked up in the function registry of
/// the [`TypesetContext`]: its [`FunctionSpec`] says how many arguments to
/// parse and of which kind, and its handler builds the node.
///
/// An ungrouped argument such as the `\frac` in `\sqrt\frac12` is only
/// accepted when the command in it is greedier than the command taking the
/// argument; `\frac` (greediness 2) can be the argument of `\sqrt`
/// (greediness 1), but not the other way round.
///
/// # Modes
///
/// The parser is either in math or in text mode. The mode decides which
/// symbols and commands exist, whether blanks matter, and whether scripts
/// can be attached. Commands such as `\text` switch modes for their
/// arguments.
///
/// # Example
///
/// ```
/// use texbox::context::TypesetContext;
/// use texbox::parser::Parser;
/// use texbox::types::Settings;
///
/// let settings = Settings::default();
/// let mut parser = Parser::new("x^2 + \\frac{1}{2}", &settings, TypesetContext::shared());
/// let tree = parser.parse().unwrap();
/// assert_eq!(tree.len(), 3);
/// ```
pub struct Parser<'a> {
    /// Current mode, math or text
    pub mode: Mode,
    /// Token source with macro expansion
    pub gullet: MacroExpander<'a>,
    /// Settings for this parse
    pub settings: &'a Settings,
    /// Lookahead token, if one has been fetched
    pub next_token: Option<Token>,
    /// Registry of commands and symbols
    pub ctx: &'a TypesetContext,
    nesting_depth: usize,
}

/// Tokens that end an expression whatever the caller asked for.
static END_OF_EXPRESSION: phf::Set<&'static str> = phf_set!("}", "\\end", "\\right", "&");

/// Control sequences the parser handles itself rather than through the
/// registry or the symbol table.
static IMPLICIT_COMMANDS: phf::Set<&'static str> = phf_set!("^", "_", "\\limits", "\\nolimits");

fn wrap_ordgroup(mut nodes: Vec<ParseNode>, mode: Mode) -> ParseNode {
    if nodes.len() == 1 && matches!(nodes[0], ParseNode::OrdGroup(_)) {
        return nodes.remove(0);
    }
    ParseNode::ord_group(mode, nodes)
}

/// Whether `s` can still grow into a size such as `-1.5 em`.
fn is_size_prefix(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s).trim_start_matches(' ');
    let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
    let mut rest = &s[int_len..];
    if let Some(fraction) = rest.strip_prefix('.') {
        rest = fraction.trim_start_matches(|c: char| c.is_ascii_digit());
    } else if int_len == 0 {
        return rest.is_empty();
    }
    let rest = rest.trim_start_matches(' ');
    let unit_len = rest.bytes().take_while(u8::is_ascii_lowercase).count();
    unit_len <= 2 && rest[unit_len..].trim_start_matches(' ').is_empty()
}

/// Split a size such as `-1.5 em` into its number and two-letter unit.
fn parse_size_with_unit(s: &str) -> Option<(f64, String)> {
    let mut chars = s.chars().peekable();

    let mut sign = 1.0;
    if let Some(&c) = chars.peek() {
        if c == '+' {
            chars.next();
        } else if c == '-' {
            sign = -1.0;
            chars.next();
        }
    }
    while chars.next_if_eq(&' ').is_some() {}

    let mut number = String::new();
    let mut int_digits = false;
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        int_digits = true;
        number.push(c);
    }
    if chars.next_if_eq(&'.').is_some() {
        number.push('.');
        let mut frac_digits = false;
        while let Some(c) = chars.next_if(char::is_ascii_digit) {
            frac_digits = true;
            number.push(c);
        }
        if !int_digits && !frac_digits {
            return None;
        }
    } else if !int_digits {
        return None;
    }
    while chars.next_if_eq(&' ').is_some() {}

    let unit: String = chars.by_ref().take(2).collect();
    if unit.len() != 2 || !unit.chars().all(|c| c.is_ascii_lowercase()) {
        return None;
    }
    let value: f64 = number.parse().ok()?;
    Some((sign * value, unit))
}

/// Detach the combining marks at the end of `text`, if it has a base
/// character before them.
fn split_combining_marks(text: &mut String) -> Option<String> {
    let base_len = text
        .trim_end_matches(|c: char| matches!(c as u32, 0x0300..=0x036F))
        .len();
    (base_len > 0 && base_len < text.len()).then(|| text.split_off(base_len))
}

fn text_ord_text(node: &ParseNode) -> Option<&str> {
    match node {
        ParseNode::TextOrd(ord) => Some(&ord.text),
        _ => None,
    }
}

/// Merge `--`, `---`, ``` `` ``` and `''` into single ligature nodes.
fn form_ligatures(group: &mut Vec<ParseNode>) {
    let mut i = 0;
    while i + 1 < group.len() {
        let first = text_ord_text(&group[i]);
        let second = text_ord_text(&group[i + 1]);
        let third = group.get(i + 2).and_then(text_ord_text);
        let ligature = match (first, second, third) {
            (Some("-"), Some("-"), Some("-")) => Some((3, "---".to_owned())),
            (Some("-"), Some("-"), _) => Some((2, "--".to_owned())),
            (Some(quote @ ("'" | "`")), Some(next), _) if quote == next => {
                Some((2, quote.repeat(2)))
            }
            _ => None,
        };
        if let Some((len, text)) = ligature {
            let loc = group[i].loc().range_ref(group[i + len - 1].loc());
            group.drain(i + 1..i + len);
            group[i] = ParseNode::TextOrd(ParseNodeSymbol {
                mode: Mode::Text,
                loc,
                text,
            });
        }
        i += 1;
    }
}

impl<'a> Parser<'a> {
    /// A parser for `input`, starting in math mode.
    #[must_use]
    pub fn new(input: &str, settings: &'a Settings, ctx: &'a TypesetContext) -> Self {
        let mode = Mode::Math;
        Self {
            mode,
            gullet: MacroExpander::new(input, settings, mode),
            settings,
            next_token: None,
            ctx,
            nesting_depth: 0,
        }
    }

    /// Check that the lookahead token is `text`, consuming it if asked to.
    pub fn expect(&mut self, text: &str, consume: bool) -> Result<(), ParseError> {
        let token = self.fetch()?;
        if token.text != text {
            return Err(ParseError::with_token(
                ParseErrorKind::ExpectedToken {
                    expected: text.to_owned(),
                    found: token.text.clone(),
                },
                token,
            ));
        }
        if consume {
            self.consume();
        }
        Ok(())
    }

    /// Drop the lookahead token.
    pub fn consume(&mut self) {
        self.next_token = None;
    }

    /// The lookahead token, expanding the next one from the gullet if none
    /// is cached. Repeated calls without [`Parser::consume`] return the same
    /// token.
    pub fn fetch(&mut self) -> Result<&Token, ParseError> {
        match &mut self.next_token {
            Some(next_token) => Ok(next_token),
            next_token => {
                let token = self.gullet.expand_next_token()?;
                Ok(next_token.get_or_insert(token))
            }
        }
    }

    /// Hand the lookahead token back to the gullet, so that it can be
    /// rescanned without expansion.
    fn release_lookahead(&mut self) {
        if let Some(token) = self.next_token.take() {
            self.gullet.push_token(token);
        }
    }

    /// Switch mode here and in the expander.
    pub const fn switch_mode(&mut self, new_mode: Mode) {
        self.mode = new_mode;
        self.gullet.switch_mode(new_mode);
    }

    /// Parse the whole input.
    ///
    /// The expression gets its own macro group, closed again even when
    /// parsing fails. Fails when input remains after the expression.
    pub fn parse(&mut self) -> Result<Vec<ParseNode>, ParseError> {
        self.gullet.begin_group();
        let result = self.parse_input();
        if result.is_err() {
            self.gullet.end_groups();
        }
        result
    }

    fn parse_input(&mut self) -> Result<Vec<ParseNode>, ParseError> {
        let body = self.parse_expression(false, None)?;
        self.expect("EOF", true)?;
        self.gullet.end_group()?;
        Ok(body)
    }

    /// Parse atoms until the end of the expression: a closing brace,
    /// `\right`, `&`, the end of input, `break_on_token_text`, or with
    /// `break_on_infix` an infix operator such as `\over`.
    ///
    /// In text mode ligatures are formed; infix operators are rewritten
    /// into the fractions they stand for.
    pub fn parse_expression(
        &mut self,
        break_on_infix: bool,
        break_on_token_text: Option<BreakToken>,
    ) -> Result<Vec<ParseNode>, ParseError> {
        let mut body = Vec::new();
        loop {
            if self.mode == Mode::Math {
                self.consume_spaces()?;
            }
            let text = self.fetch()?.text.clone();
            if END_OF_EXPRESSION.contains(text.as_str()) {
                break;
            }
            if break_on_token_text.is_some_and(|token| text == token.as_ref()) {
                break;
            }
            if break_on_infix
                && self
                    .ctx
                    .functions
                    .get(text.as_str())
                    .is_some_and(|func| func.props.infix)
            {
                break;
            }
            match self.parse_atom(break_on_token_text)? {
                // Commands without output leave no trace in the tree.
                Some(ParseNode::Internal(_)) => {}
                Some(atom) => body.push(atom),
                None => break,
            }
        }
        if self.mode == Mode::Text {
            form_ligatures(&mut body);
        }
        self.handle_infix_nodes(body)
    }

    /// Skip blank tokens.
    pub fn consume_spaces(&mut self) -> Result<(), ParseError> {
        while self.fetch()?.text == " " {
            self.consume();
        }
        Ok(())
    }

    /// Rewrite `a \over b` and friends into the fraction the operator names.
    fn handle_infix_nodes(&mut self, body: Vec<ParseNode>) -> Result<Vec<ParseNode>, ParseError> {
        let mut over_index = None;
        for (i, node) in body.iter().enumerate() {
            if let ParseNode::Infix(infix) = node {
                if over_index.is_some() {
                    return Err(ParseError::with_token(
                        "only one infix operator per group",
                        &infix.token,
                    ));
                }
                over_index = Some(i);
            }
        }
        let Some(over_index) = over_index else {
            return Ok(body);
        };

        let mut numer_body = body;
        let denom_body = numer_body.split_off(over_index + 1);
        let Some(ParseNode::Infix(infix)) = numer_body.pop() else {
            return Err(ParseError::new("Internal error: infix operator went missing"));
        };
        let numer = wrap_ordgroup(numer_body, self.mode);
        let denom = wrap_ordgroup(denom_body, self.mode);
        let node = self.call_function(
            &infix.replace_with,
            vec![numer, denom],
            Vec::new(),
            infix.token.as_ref(),
            None,
        )?;
        Ok(vec![node])
    }

    /// Parse a base and, in math mode, the scripts, primes and limit
    /// controls after it.
    fn parse_atom(
        &mut self,
        break_on_token_text: Option<BreakToken>,
    ) -> Result<Option<ParseNode>, ParseError> {
        let mut base = self.parse_group("atom", false, None, break_on_token_text, None)?;
        if self.mode == Mode::Text || matches!(base, Some(ParseNode::Internal(_))) {
            return Ok(base);
        }

        let mut superscript = None;
        let mut subscript = None;
        loop {
            self.consume_spaces()?;
            let lex = self.fetch()?.clone();
            match lex.text.as_str() {
                "\\limits" | "\\nolimits" => {
                    let Some(ParseNode::Op(op)) = &mut base else {
                        return Err(ParseError::with_token(
                            "Limit controls must follow a math operator",
                            &lex,
                        ));
                    };
                    op.limits = lex.text == "\\limits";
                    op.always_handle_sup_sub = true;
                    self.consume();
                }
                "^" => {
                    if superscript.is_some() {
                        return Err(ParseError::with_token("Double superscript", &lex));
                    }
                    superscript = Some(self.handle_sup_subscript("superscript")?);
                }
                "_" => {
                    if subscript.is_some() {
                        return Err(ParseError::with_token("Double subscript", &lex));
                    }
                    subscript = Some(self.handle_sup_subscript("subscript")?);
                }
                "'" => {
                    if superscript.is_some() {
                        return Err(ParseError::with_token("Double superscript", &lex));
                    }
                    self.consume();
                    let mut count = 1;
                    while self.fetch()?.text == "'" {
                        count += 1;
                        self.consume();
                    }
                    let prime = ParseNode::TextOrd(ParseNodeSymbol {
                        mode: self.mode,
                        loc: None,
                        text: "\\prime".to_owned(),
                    });
                    let mut primes: Vec<ParseNode> = iter::repeat_n(prime, count).collect();
                    // A superscript after the primes joins them.
                    if self.fetch()?.text == "^" {
                        primes.push(self.handle_sup_subscript("superscript")?);
                    }
                    superscript = Some(ParseNode::ord_group(self.mode, primes));
                }
                _ => break,
            }
        }

        if superscript.is_none() && subscript.is_none() {
            return Ok(base);
        }
        Ok(Some(ParseNode::SupSub(ParseNodeSupSub {
            mode: self.mode,
            loc: None,
            base: base.map(Box::new),
            sup: superscript.map(Box::new),
            sub: subscript.map(Box::new),
        })))
    }

    /// Parse the script after `^` or `_`.
    fn handle_sup_subscript(&mut self, name: &str) -> Result<ParseNode, ParseError> {
        let symbol_token = self.fetch()?.clone();
        self.consume();
        self.consume_spaces()?;

        let mut group = self.parse_group(name, false, Some(SUPSUB_GREEDINESS), None, None)?;
        while let Some(ParseNode::Internal(_)) = group {
            group = self.parse_group(name, false, Some(SUPSUB_GREEDINESS), None, None)?;
        }
        group.ok_or_else(|| {
            ParseError::with_token(
                ParseErrorKind::ExpectedGroupAfter {
                    symbol: symbol_token.text.clone(),
                },
                &symbol_token,
            )
        })
    }

    /// Parse a group: a braced expression (bracketed when `optional`), or
    /// else a single command with its arguments or a single symbol.
    ///
    /// `greediness` is that of the command whose argument this is; a
    /// command in an ungrouped argument must be greedier. With `mode` the
    /// group is parsed in that mode. Returns `None` when there is no group,
    /// e.g. at a closing brace or when an optional argument is absent.
    pub fn parse_group(
        &mut self,
        name: &str,
        optional: bool,
        greediness: Option<u8>,
        break_on_token_text: Option<BreakToken>,
        mode: Option<Mode>,
    ) -> Result<Option<ParseNode>, ParseError> {
        self.nesting_depth += 1;
        let result = if self.nesting_depth > self.settings.max_nesting {
            Err(ParseError::with_token(
                ParseErrorKind::NestingTooDeep {
                    limit: self.settings.max_nesting,
                },
                &self.next_token,
            ))
        } else {
            self.parse_group_inner(name, optional, greediness, break_on_token_text, mode)
        };
        self.nesting_depth -= 1;
        result
    }

    fn parse_group_inner(
        &mut self,
        name: &str,
        optional: bool,
        greediness: Option<u8>,
        break_on_token_text: Option<BreakToken>,
        mode: Option<Mode>,
    ) -> Result<Option<ParseNode>, ParseError> {
        let outer_mode = self.mode;
        if let Some(mode) = mode {
            self.switch_mode(mode);
        }

        let first_token = self.fetch()?.clone();
        let text = first_token.text.as_str();
        let (open, close) = if optional {
            ("[", BreakToken::RightBracket)
        } else {
            ("{", BreakToken::RightBrace)
        };

        let result = if text == open {
            self.consume();
            self.gullet.begin_group();
            let expression = self.parse_expression(false, Some(close))?;
            let last_token = self.fetch()?.clone();
            self.gullet.end_group()?;
            self.expect(close.as_ref(), true)?;
            Some(ParseNode::OrdGroup(ParseNodeOrdGroup {
                mode: self.mode,
                loc: first_token.loc.as_ref().range_ref(last_token.loc.as_ref()),
                body: expression,
            }))
        } else if optional {
            None
        } else {
            let mut result = self.parse_function(break_on_token_text, Some(name), greediness)?;
            if result.is_none() {
                result = self.parse_symbol()?;
            }
            if result.is_none() && text.starts_with('\\') && !IMPLICIT_COMMANDS.contains(text) {
                if self.settings.throw_on_error {
                    return Err(ParseError::with_token(
                        ParseErrorKind::UndefinedControlSequence {
                            name: text.to_owned(),
                        },
                        &first_token,
                    ));
                }
                result = Some(self.format_unsupported_cmd(text).into());
                self.consume();
            }
            result
        };

        if mode.is_some() {
            self.switch_mode(outer_mode);
        }
        Ok(result)
    }

    /// The source of an unknown command as text in the error color.
    #[must_use]
    pub fn format_unsupported_cmd(&self, text: &str) -> ParseNodeColor {
        let body = text
            .chars()
            .map(|ch| {
                ParseNode::TextOrd(ParseNodeSymbol {
                    mode: Mode::Text,
                    loc: None,
                    text: ch.to_string(),
                })
            })
            .collect();
        ParseNodeColor {
            mode: self.mode,
            loc: None,
            color: self.settings.error_color.clone(),
            body: vec![ParseNode::Text(ParseNodeText {
                mode: self.mode,
                loc: None,
                body,
                font: None,
            })],
        }
    }

    /// Parse a command at the lookahead token, with its arguments. Returns
    /// `None` when the token is not a registered command.
    ///
    /// `name` describes the argument being parsed, for errors; `greediness`
    /// is that of the command taking the argument.
    pub fn parse_function(
        &mut self,
        break_on_token_text: Option<BreakToken>,
        name: Option<&str>,
        greediness: Option<u8>,
    ) -> Result<Option<ParseNode>, ParseError> {
        let token = self.fetch()?.clone();
        let func = token.text.as_str();
        let ctx = self.ctx;
        let Some(func_data) = ctx.functions.get(func) else {
            return Ok(None);
        };

        if let Some(greediness) = greediness
            && func_data.props.greediness <= greediness
        {
            return Err(ParseError::with_token(
                ParseErrorKind::FunctionMissingArguments {
                    func: func.to_owned(),
                    context: name.unwrap_or("argument").to_owned(),
                },
                &token,
            ));
        }
        let allowed = match self.mode {
            Mode::Text => func_data.props.allowed_in_text,
            Mode::Math => func_data.props.allowed_in_math,
        };
        if !allowed {
            return Err(ParseError::with_token(
                ParseErrorKind::FunctionDisallowedInMode {
                    func: func.to_owned(),
                    mode: self.mode,
                },
                &token,
            ));
        }

        if let Some(consume_mode) = func_data.props.consume_mode {
            let old_mode = self.mode;
            self.switch_mode(consume_mode);
            self.consume();
            self.switch_mode(old_mode);
        } else {
            self.consume();
        }

        let (args, opt_args) = self.parse_arguments(func, func_data)?;
        let node = self.call_function(func, args, opt_args, Some(&token), break_on_token_text)?;
        Ok(Some(node))
    }

    /// Run the handler registered for `name`.
    pub fn call_function(
        &mut self,
        name: &str,
        args: Vec<ParseNode>,
        opt_args: Vec<Option<ParseNode>>,
        token: Option<&Token>,
        break_on_token_text: Option<BreakToken>,
    ) -> Result<ParseNode, ParseError> {
        let ctx = self.ctx;
        let Some(handler) = ctx.functions.get(name).and_then(|func| func.handler) else {
            return Err(ParseError::new(ParseErrorKind::NoFunctionHandler {
                name: name.to_owned(),
            }));
        };
        let context = FunctionContext {
            func_name: name.to_owned(),
            parser: self,
            token,
            break_on_token_text,
        };
        handler(context, args, opt_args)
    }

    /// Parse the arguments of `func`, optional ones first.
    pub fn parse_arguments(
        &mut self,
        func: &str,
        func_data: &FunctionSpec,
    ) -> Result<(Vec<ParseNode>, Vec<Option<ParseNode>>), ParseError> {
        let props = &func_data.props;
        let total_args = props.num_args + props.num_optional_args;
        let mut args = Vec::with_capacity(props.num_args);
        let mut opt_args = Vec::with_capacity(props.num_optional_args);

        for i in 0..total_args {
            let arg_type = props.arg_types.as_ref().and_then(|types| types.get(i)).copied();
            let is_optional = i < props.num_optional_args;
            // Blanks before mandatory arguments are skipped, except before
            // the first one in text mode.
            if !is_optional && (i > 0 || self.mode == Mode::Math) {
                self.consume_spaces()?;
            }
            let next_token = self.fetch()?.clone();
            let arg = self.parse_group_of_type(
                &format!("argument to '{func}'"),
                arg_type,
                is_optional,
                props.greediness,
            )?;
            if is_optional {
                opt_args.push(arg);
            } else if let Some(arg) = arg {
                args.push(arg);
            } else {
                return Err(ParseError::with_token(
                    ParseErrorKind::ExpectedGroupAfter {
                        symbol: func.to_owned(),
                    },
                    &next_token,
                ));
            }
        }
        Ok((args, opt_args))
    }

    fn parse_group_of_type(
        &mut self,
        name: &str,
        arg_type: Option<ArgType>,
        optional: bool,
        greediness: u8,
    ) -> Result<Option<ParseNode>, ParseError> {
        match arg_type {
            Some(ArgType::Color) => self.parse_color_group(optional),
            Some(ArgType::Size) => Ok(self.parse_size_group(optional)?.map(ParseNode::Size)),
            Some(ArgType::Url) => self.parse_url_group(optional),
            Some(ArgType::Raw) => Ok(self.parse_string_group(optional)?.map(|token| {
                ParseNode::Raw(ParseNodeRaw {
                    mode: Mode::Text,
                    loc: token.loc,
                    string: token.text,
                })
            })),
            Some(ArgType::Mode(mode)) => {
                self.parse_group(name, optional, Some(greediness), None, Some(mode))
            }
            Some(ArgType::Original) | None => {
                self.parse_group(name, optional, Some(greediness), None, None)
            }
        }
    }

    /// An argument as a literal string, unexpanded, spanning the braces or
    /// brackets around it.
    fn parse_string_group(&mut self, optional: bool) -> Result<Option<Token>, ParseError> {
        self.release_lookahead();
        let Some(arg_token) = self.gullet.scan_argument(optional)? else {
            return Ok(None);
        };
        // The scanned tokens were pushed back for rereading; the string
        // already holds their text.
        while self.gullet.pop_token()?.text != "EOF" {}
        Ok(Some(arg_token))
    }

    /// An unbraced size: tokens are taken while the text read so far can
    /// still become a size.
    fn parse_regex_group<F>(&mut self, mut validator: F) -> Result<Token, ParseError>
    where
        F: FnMut(&str) -> bool,
    {
        let first_token = self.fetch()?.clone();
        let mut last_token = first_token.clone();
        let mut text = String::new();
        loop {
            let next_token = self.fetch()?;
            if next_token.text == "EOF" {
                break;
            }
            let candidate = format!("{text}{}", next_token.text);
            if !validator(&candidate) {
                break;
            }
            last_token = next_token.clone();
            text = candidate;
            self.consume();
        }
        if text.is_empty() {
            return Err(ParseError::with_token(
                ParseErrorKind::InvalidSize {
                    size: first_token.text.clone(),
                },
                &first_token,
            ));
        }
        Ok(Token::new(text, SourceLocation::range(first_token.loc, last_token.loc)))
    }

    /// A color: a name, `#rgb`, `#rrggbb`, or `rrggbb` (given a `#`).
    fn parse_color_group(&mut self, optional: bool) -> Result<Option<ParseNode>, ParseError> {
        let Some(token) = self.parse_string_group(optional)? else {
            return Ok(None);
        };
        let text = token.text.as_str();
        let is_hex = |s: &str, len: usize| s.len() == len && s.chars().all(|c| c.is_ascii_hexdigit());
        let color = if is_hex(text, 6) {
            format!("#{text}")
        } else if text
            .strip_prefix('#')
            .is_some_and(|hex| is_hex(hex, 3) || is_hex(hex, 6))
            || (!text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic()))
        {
            text.to_owned()
        } else {
            return Err(ParseError::with_token(
                ParseErrorKind::InvalidColor {
                    color: text.to_owned(),
                },
                &token,
            ));
        };
        Ok(Some(ParseNode::ColorToken(ParseNodeColorToken {
            mode: self.mode,
            loc: token.loc,
            color,
        })))
    }

    /// A size such as `1.5em`. An empty mandatory size is zero and marked
    /// blank.
    pub fn parse_size_group(&mut self, optional: bool) -> Result<Option<ParseNodeSize>, ParseError> {
        self.consume_spaces()?;
        let res = if !optional && self.fetch()?.text != "{" {
            Some(self.parse_regex_group(is_size_prefix)?)
        } else {
            self.parse_string_group(optional)?
        };
        let Some(mut res) = res else {
            return Ok(None);
        };

        let is_blank = !optional && res.text.is_empty();
        if is_blank {
            "0pt".clone_into(&mut res.text);
        }
        let Some((number, unit)) = parse_size_with_unit(&res.text) else {
            return Err(ParseError::with_token(
                ParseErrorKind::InvalidSize {
                    size: res.text.clone(),
                },
                &res,
            ));
        };
        let Ok(unit) = unit.parse::<Unit>() else {
            return Err(ParseError::with_token(ParseErrorKind::InvalidUnit { unit }, &res));
        };
        Ok(Some(ParseNodeSize {
            mode: self.mode,
            loc: res.loc,
            value: Measurement::new(number, unit),
            is_blank,
        }))
    }

    /// A URL, read with `%` and `~` as ordinary characters and backslash
    /// escapes removed. Its protocol must be allowed by the settings.
    fn parse_url_group(&mut self, optional: bool) -> Result<Option<ParseNode>, ParseError> {
        self.release_lookahead();
        // hyperref reads URLs with % and ~ as ordinary characters.
        self.gullet.set_catcode('%', CATCODE_ACTIVE);
        self.gullet.set_catcode('~', CATCODE_OTHER);
        let res = self.parse_string_group(optional);
        self.gullet.set_catcode('%', CATCODE_COMMENT);
        self.gullet.set_catcode('~', CATCODE_ACTIVE);

        let Some(token) = res? else {
            return Ok(None);
        };
        let mut url = String::with_capacity(token.text.len());
        let mut chars = token.text.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\'
                && let Some(escaped) = chars.next_if(|n| "#$%&~_^{}".contains(*n))
            {
                url.push(escaped);
            } else {
                url.push(c);
            }
        }

        let protocol = protocol_from_url(&url);
        if !protocol
            .as_deref()
            .is_some_and(|protocol| self.settings.is_protocol_allowed(protocol))
        {
            return Err(ParseError::with_token(
                ParseErrorKind::ForbiddenProtocol {
                    protocol: protocol.unwrap_or_else(|| url.clone()),
                },
                &token,
            ));
        }
        Ok(Some(ParseNode::Url(ParseNodeUrl {
            mode: self.mode,
            loc: token.loc,
            url,
        })))
    }

    /// Parse the symbol at the lookahead token.
    ///
    /// Handles `\verb` literals, precomposed accented letters and combining
    /// marks (both become accent nodes around the base), and characters
    /// outside the symbol table, which are reported to the strict policy
    /// and kept as text. Returns `None` for tokens that are not symbols,
    /// such as braces and the end of input.
    fn parse_symbol(&mut self) -> Result<Option<ParseNode>, ParseError> {
        let nucleus = self.fetch()?.clone();
        let mut text = nucleus.text.clone();

        if let Some(arg) = text.strip_prefix("\\verb")
            && arg.chars().next().is_some_and(|c| !c.is_ascii_alphabetic())
        {
            self.consume();
            let star = arg.starts_with('*');
            let body = if star { &arg[1..] } else { arg };
            let Some(delim) = body.chars().next() else {
                return Err(ParseError::with_token("\\verb is missing its delimiter", &nucleus));
            };
            let len = delim.len_utf8();
            if body.len() < 2 * len || !body.ends_with(delim) {
                return Err(ParseError::with_token("\\verb is missing its delimiter", &nucleus));
            }
            return Ok(Some(ParseNode::Verb(ParseNodeVerb {
                mode: Mode::Text,
                loc: nucleus.loc,
                body: body[len..body.len() - len].to_owned(),
                star,
            })));
        }

        // Precomposed letters become their base plus combining marks.
        if let Some(first_char) = text.chars().next()
            && let Some(decomposed) = UNICODE_SYMBOLS.get(&first_char)
            && !self.ctx.symbols.contains(self.mode, &first_char.to_string())
        {
            if self.mode == Mode::Math {
                self.settings.report_nonstrict(
                    "unicodeTextInMathMode",
                    &format!("Accented Unicode text character \"{first_char}\" used in math mode"),
                    Some(&nucleus),
                )?;
            }
            text = format!("{decomposed}{}", &text[first_char.len_utf8()..]);
        }

        let accents = split_combining_marks(&mut text);
        if accents.is_some() {
            // Accents go on the dotless forms.
            if text == "i" {
                "\u{131}".clone_into(&mut text);
            } else if text == "j" {
                "\u{237}".clone_into(&mut text);
            }
        }

        let mut symbol = if let Some(info) = self.ctx.symbols.get(self.mode, &text) {
            let payload = ParseNodeSymbol {
                mode: self.mode,
                loc: nucleus.loc.clone(),
                text,
            };
            match info.group {
                Group::Atom(family) => ParseNode::Atom(ParseNodeAtom {
                    mode: payload.mode,
                    loc: payload.loc,
                    family,
                    text: payload.text,
                }),
                Group::NonAtom(NonAtom::MathOrd) => ParseNode::MathOrd(payload),
                Group::NonAtom(NonAtom::TextOrd) => ParseNode::TextOrd(payload),
                Group::NonAtom(NonAtom::Spacing) => ParseNode::Spacing(payload),
                Group::NonAtom(NonAtom::AccentToken) => ParseNode::AccentToken(payload),
                Group::NonAtom(NonAtom::OpToken) => ParseNode::OpToken(payload),
            }
        } else if let Some(first_char) = text.chars().next()
            && !first_char.is_ascii()
        {
            if !supported_codepoint(first_char) {
                self.settings.report_nonstrict(
                    "unknownSymbol",
                    &format!(
                        "Unrecognized Unicode character \"{first_char}\" ({})",
                        first_char as u32
                    ),
                    Some(&nucleus),
                )?;
            } else if self.mode == Mode::Math {
                self.settings.report_nonstrict(
                    "unicodeTextInMathMode",
                    &format!("Unicode text character \"{first_char}\" used in math mode"),
                    Some(&nucleus),
                )?;
            }
            ParseNode::TextOrd(ParseNodeSymbol {
                mode: Mode::Text,
                loc: nucleus.loc.clone(),
                text,
            })
        } else {
            return Ok(None);
        };
        self.consume();

        for mark in accents.iter().flat_map(|marks| marks.chars()) {
            let Some(mapping) = UNICODE_ACCENTS.get(&mark) else {
                return Err(ParseError::with_token(
                    ParseErrorKind::UnknownAccent {
                        accent: mark.to_string(),
                    },
                    &nucleus,
                ));
            };
            let command = mapping.command(self.mode);
            if command.is_empty() {
                return Err(ParseError::with_token(
                    ParseErrorKind::UnsupportedAccentInMode {
                        accent: mark.to_string(),
                        mode: self.mode,
                    },
                    &nucleus,
                ));
            }
            symbol = ParseNode::Accent(Box::new(ParseNodeAccent {
                mode: self.mode,
                loc: nucleus.loc.clone(),
                label: command.to_owned(),
                is_stretchy: false,
                is_shifty: true,
                base: symbol,
            }));
        }

        Ok(Some(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Vec<ParseNode>, ParseError> {
        let settings = Settings::default();
        Parser::new(input, &settings, TypesetContext::shared()).parse()
    }

    fn symbol(mode: Mode, text: &str) -> ParseNode {
        ParseNode::TextOrd(ParseNodeSymbol {
            mode,
            loc: None,
            text: text.to_owned(),
        })
    }

    #[test]
    fn size_prefixes() {
        for ok in ["", "-", "+ 1", "1", "1.", ".5", "1.5e", "1.5em", "-2 mu ", "3 "] {
            assert!(is_size_prefix(ok), "{ok:?}");
        }
        for bad in ["a", "1.5emx", "1..", "--1", "1 e m"] {
            assert!(!is_size_prefix(bad), "{bad:?}");
        }
    }

    #[test]
    fn sizes_split_into_number_and_unit() {
        assert_eq!(parse_size_with_unit("-1.5em"), Some((-1.5, "em".to_owned())));
        assert_eq!(parse_size_with_unit("+ .5 mu"), Some((0.5, "mu".to_owned())));
        assert_eq!(parse_size_with_unit("3"), None);
        assert_eq!(parse_size_with_unit("."), None);
        assert_eq!(parse_size_with_unit("2EM"), None);
    }

    #[test]
    fn combining_marks_are_split_off() {
        let mut text = "e\u{301}\u{302}".to_owned();
        assert_eq!(split_combining_marks(&mut text).as_deref(), Some("\u{301}\u{302}"));
        assert_eq!(text, "e");
        let mut plain = "e".to_owned();
        assert_eq!(split_combining_marks(&mut plain), None);
    }

    #[test]
    fn ligatures_merge_text_ords() {
        let mut group: Vec<ParseNode> = ["-", "-", "-", "a", "`", "`", "-", "-"]
            .iter()
            .map(|t| symbol(Mode::Text, t))
            .collect();
        form_ligatures(&mut group);
        let texts: Vec<_> = group.iter().filter_map(ParseNode::text).collect();
        assert_eq!(texts, ["---", "a", "``", "--"]);
    }

    #[test]
    fn math_mode_skips_blanks() {
        let tree = parse("x + y").unwrap();
        assert_eq!(tree.len(), 3);
        assert!(matches!(tree[1], ParseNode::Atom(_)));
    }

    #[test]
    fn greedier_commands_can_be_ungrouped_arguments() {
        let tree = parse("\\sqrt \\frac 1 2").unwrap();
        let [ParseNode::Sqrt(sqrt)] = tree.as_slice() else {
            panic!("expected one radical, got {tree:?}");
        };
        assert!(matches!(sqrt.body, ParseNode::GenFrac(_)));

        let err = parse("\\frac \\sqrt 1 2").unwrap_err();
        assert_eq!(
            err.message(),
            "Got function '\\sqrt' with no arguments as argument to '\\frac'"
        );
    }

    #[test]
    fn double_scripts_fail() {
        assert_eq!(parse("x^2^3").unwrap_err().message(), "Double superscript");
        assert_eq!(parse("x_2_3").unwrap_err().message(), "Double subscript");
        assert_eq!(parse("x'^2'").unwrap_err().message(), "Double superscript");
        let tree = parse("x^2_3").unwrap();
        let [ParseNode::SupSub(supsub)] = tree.as_slice() else {
            panic!("expected one script node");
        };
        assert!(supsub.sup.is_some() && supsub.sub.is_some());
    }

    #[test]
    fn primes_gather_into_one_superscript() {
        let tree = parse("f''^2").unwrap();
        let [ParseNode::SupSub(supsub)] = tree.as_slice() else {
            panic!("expected one script node");
        };
        let Some(ParseNode::OrdGroup(sup)) = supsub.sup.as_deref() else {
            panic!("expected a group superscript");
        };
        assert_eq!(sup.body.len(), 3);
        assert_eq!(sup.body[0].text(), Some("\\prime"));
    }

    #[test]
    fn scripts_need_a_group() {
        assert_eq!(parse("x^").unwrap_err().message(), "Expected group after '^'");
        assert_eq!(parse("x^}").unwrap_err().message(), "Expected group after '^'");
        assert_eq!(parse("x_}").unwrap_err().message(), "Expected group after '_'");
        assert_eq!(parse("\\sqrt}").unwrap_err().message(), "Expected group after '\\sqrt'");
        assert!(parse("\\{x\\}").is_ok());
    }

    #[test]
    fn limit_controls_need_an_operator() {
        assert_eq!(
            parse("x\\limits").unwrap_err().message(),
            "Limit controls must follow a math operator"
        );
        let tree = parse("\\sum\\nolimits_i").unwrap();
        let [ParseNode::SupSub(supsub)] = tree.as_slice() else {
            panic!("expected one script node");
        };
        let Some(ParseNode::Op(op)) = supsub.base.as_deref() else {
            panic!("expected an operator base");
        };
        assert!(!op.limits);
        assert!(op.always_handle_sup_sub);
    }

    #[test]
    fn infix_operators_become_fractions() {
        let tree = parse("a+b \\over c").unwrap();
        let [ParseNode::GenFrac(frac)] = tree.as_slice() else {
            panic!("expected one fraction, got {tree:?}");
        };
        assert!(frac.has_bar_line);
        let ParseNode::OrdGroup(numer) = &frac.numer else {
            panic!("expected a group numerator");
        };
        assert_eq!(numer.body.len(), 3);

        let tree = parse("n \\choose k").unwrap();
        let [ParseNode::GenFrac(binom)] = tree.as_slice() else {
            panic!("expected one fraction");
        };
        assert!(!binom.has_bar_line);
        assert_eq!(binom.left_delim.as_deref(), Some("("));

        assert_eq!(
            parse("a \\over b \\over c").unwrap_err().message(),
            "only one infix operator per group"
        );
    }

    #[test]
    fn undefined_commands() {
        assert_eq!(
            parse("\\foo").unwrap_err().message(),
            "Undefined control sequence: \\foo"
        );

        let settings = Settings::builder().throw_on_error(false).build();
        let tree = Parser::new("\\foo", &settings, TypesetContext::shared())
            .parse()
            .unwrap();
        let [ParseNode::Color(color)] = tree.as_slice() else {
            panic!("expected colored fallback");
        };
        assert_eq!(color.color, "#cc0000");
        let ParseNode::Text(text) = &color.body[0] else {
            panic!("expected text");
        };
        assert_eq!(text.body.len(), 4);
    }

    #[test]
    fn trailing_input_fails() {
        assert_eq!(parse("x}").unwrap_err().message(), "Expected 'EOF', got '}'");
        assert_eq!(parse("{x").unwrap_err().message(), "Expected '}', got 'EOF'");
    }

    #[test]
    fn nesting_is_bounded() {
        let settings = Settings::builder().max_nesting(5).build();
        let ctx = TypesetContext::shared();
        assert!(Parser::new("{{{{x}}}}", &settings, ctx).parse().is_ok());
        let err = Parser::new("{{{{{{x}}}}}}", &settings, ctx).parse().unwrap_err();
        assert_eq!(err.message(), "Nesting too deep: more than 5 levels");
    }

    #[test]
    fn verb_keeps_its_body_verbatim() {
        let tree = parse("\\verb|a  \\b|").unwrap();
        let [ParseNode::Verb(verb)] = tree.as_slice() else {
            panic!("expected verb");
        };
        assert_eq!(verb.body, "a  \\b");
        assert!(!verb.star);
    }

    #[test]
    fn accented_letters_decompose_into_accents() {
        let tree = parse("\\text{\u{e9}}").unwrap();
        let [ParseNode::Text(text)] = tree.as_slice() else {
            panic!("expected text");
        };
        let [ParseNode::Accent(accent)] = text.body.as_slice() else {
            panic!("expected an accent");
        };
        assert_eq!(accent.label, "\\'");
        let ParseNode::TextOrd(base) = &accent.base else {
            panic!("expected a letter under the accent");
        };
        assert_eq!((base.mode, base.text.as_str()), (Mode::Text, "e"));
        assert!(base.loc.is_some());

        let strict = Settings::builder()
            .strict(crate::types::StrictMode::Error)
            .build();
        let err = Parser::new("\u{e9}", &strict, TypesetContext::shared())
            .parse()
            .unwrap_err();
        assert!(err.message().contains("[unicodeTextInMathMode]"));
    }

    #[test]
    fn colors_are_validated() {
        let tree = parse("\\textcolor{ff0000}{x}").unwrap();
        let [ParseNode::Color(color)] = tree.as_slice() else {
            panic!("expected color");
        };
        assert_eq!(color.color, "#ff0000");
        assert_eq!(
            parse("\\textcolor{#ff00}{x}").unwrap_err().message(),
            "Invalid color: '#ff00'"
        );
    }

    #[test]
    fn sizes_are_validated() {
        let tree = parse("\\kern1.5em x").unwrap();
        let ParseNode::Kern(kern) = &tree[0] else {
            panic!("expected kern");
        };
        assert_eq!(kern.dimension, Measurement::new(1.5, Unit::Em));
        assert_eq!(tree.len(), 2);

        assert_eq!(parse("\\kern{1zz}").unwrap_err().message(), "Invalid unit: 'zz'");
        assert_eq!(parse("\\kern{em}").unwrap_err().message(), "Invalid size: 'em'");
    }

    #[test]
    fn urls_are_unescaped_and_checked() {
        let tree = parse("\\url{http://a.b/\\#x%20~}").unwrap();
        let [ParseNode::Href(href)] = tree.as_slice() else {
            panic!("expected a link");
        };
        assert_eq!(href.href, "http://a.b/#x%20~");
        assert_eq!(
            parse("\\href{javascript:alert(1)}{x}").unwrap_err().message(),
            "Forbidden protocol 'javascript'"
        );
    }

    #[test]
    fn text_mode_rejects_math_commands() {
        assert_eq!(
            parse("\\text{\\frac12}").unwrap_err().message(),
            "Can't use function '\\frac' in text mode"
        );
    }
}
