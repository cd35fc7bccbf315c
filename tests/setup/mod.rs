#![allow(dead_code)]

use std::panic::{UnwindSafe, catch_unwind};

use texbox::{
    ParseError, RenderNode, Settings, Span, StrictMode, StrictSetting, TypesetContext,
    build_layout::{GroupKind, build_expression},
    build_tree::options_from_settings,
    parse,
    parser::parse_node::{OpContent, ParseNode},
    typeset,
    types::ParseErrorKind,
};

pub fn default_ctx() -> &'static TypesetContext {
    TypesetContext::shared()
}

pub struct TestExpr<'a> {
    pub expr: String,
    pub ctx: &'a TypesetContext,
    pub file: &'static str,
    pub line: u32,
}

fn strip_box(node: &mut ParseNode) {
    strip_positions(core::slice::from_mut(node));
}

fn strip_opt(node: Option<&mut ParseNode>) {
    if let Some(node) = node {
        strip_box(node);
    }
}

/// Set every `loc` to `None`, so trees parsed from different sources compare equal.
pub fn strip_positions(nodes: &mut [ParseNode]) {
    for node in nodes {
        match node {
            ParseNode::OrdGroup(n) => {
                n.loc = None;
                strip_positions(&mut n.body);
            }
            ParseNode::SupSub(n) => {
                n.loc = None;
                strip_opt(n.base.as_deref_mut());
                strip_opt(n.sup.as_deref_mut());
                strip_opt(n.sub.as_deref_mut());
            }
            ParseNode::GenFrac(n) => {
                n.loc = None;
                strip_box(&mut n.numer);
                strip_box(&mut n.denom);
            }
            ParseNode::Infix(n) => n.loc = None,
            ParseNode::Sqrt(n) => {
                n.loc = None;
                strip_box(&mut n.body);
                strip_opt(n.index.as_mut());
            }
            ParseNode::Atom(n) => n.loc = None,
            ParseNode::MathOrd(n)
            | ParseNode::TextOrd(n)
            | ParseNode::Spacing(n)
            | ParseNode::AccentToken(n)
            | ParseNode::OpToken(n) => n.loc = None,
            ParseNode::Op(n) => {
                n.loc = None;
                if let OpContent::Body(body) = &mut n.content {
                    strip_positions(body);
                }
            }
            ParseNode::Accent(n) | ParseNode::AccentUnder(n) => {
                n.loc = None;
                strip_box(&mut n.base);
            }
            ParseNode::XArrow(n) => {
                n.loc = None;
                strip_box(&mut n.body);
                strip_opt(n.below.as_mut());
            }
            ParseNode::HorizBrace(n) => {
                n.loc = None;
                strip_box(&mut n.base);
            }
            ParseNode::Underline(n) | ParseNode::Overline(n) => {
                n.loc = None;
                strip_box(&mut n.body);
            }
            ParseNode::Font(n) => {
                n.loc = None;
                strip_box(&mut n.body);
            }
            ParseNode::MClass(n) => {
                n.loc = None;
                strip_positions(&mut n.body);
            }
            ParseNode::Text(n) => {
                n.loc = None;
                strip_positions(&mut n.body);
            }
            ParseNode::Color(n) => {
                n.loc = None;
                strip_positions(&mut n.body);
            }
            ParseNode::Href(n) => {
                n.loc = None;
                strip_positions(&mut n.body);
            }
            ParseNode::LeftRight(n) => {
                n.loc = None;
                strip_positions(&mut n.body);
            }
            ParseNode::Styling(n) => {
                n.loc = None;
                strip_positions(&mut n.body);
            }
            ParseNode::ColorToken(n) => n.loc = None,
            ParseNode::Size(n) => n.loc = None,
            ParseNode::Url(n) => n.loc = None,
            ParseNode::Raw(n) => n.loc = None,
            ParseNode::Verb(n) => n.loc = None,
            ParseNode::Cr(n) => n.loc = None,
            ParseNode::LeftRightRight(n) => n.loc = None,
            ParseNode::DelimSizing(n) => n.loc = None,
            ParseNode::Kern(n) => n.loc = None,
            ParseNode::Internal(n) => n.loc = None,
        }
    }
}

impl TestExpr<'_> {
    pub fn to_parse(self, settings: &Settings) -> Result<(), ParseError> {
        parse(self.ctx, &self.expr, settings).map(|_| ())
    }

    pub fn not_to_parse(self, settings: &Settings) -> Result<(), ParseError> {
        match parse(self.ctx, &self.expr, settings) {
            Ok(_) => Err(ParseError::new(ParseErrorKind::ExpectedParseFailure {
                expression: self.expr.clone(),
            })),
            Err(_) => Ok(()),
        }
    }

    pub fn to_parse_like(self, other: &str, settings: &Settings) -> Result<(), ParseError> {
        let mut tree1 = parse(self.ctx, &self.expr, settings)?;
        let mut tree2 = parse(self.ctx, other, settings)?;

        strip_positions(&mut tree1);
        strip_positions(&mut tree2);

        assert_eq!(
            tree1, tree2,
            "Parse trees do not match between '{}' and '{}' ({}:{})",
            self.expr, other, self.file, self.line
        );
        Ok(())
    }

    pub fn to_build(self, settings: &Settings) -> Result<(), ParseError> {
        typeset(self.ctx, &self.expr, settings).map(|_| ())
    }

    pub fn not_to_build(self, settings: &Settings) -> Result<(), ParseError> {
        match typeset(self.ctx, &self.expr, settings) {
            Ok(_) => Err(ParseError::new(ParseErrorKind::ExpectedBuildFailure {
                expression: self.expr.clone(),
            })),
            Err(_) => Ok(()),
        }
    }
}

pub fn expect_impl(expr: &str, file: &'static str, line: u32) -> TestExpr<'static> {
    TestExpr {
        expr: expr.to_owned(),
        ctx: default_ctx(),
        file,
        line,
    }
}

#[macro_export]
macro_rules! expect {
    ($e:expr) => {
        $crate::setup::expect_impl($e, file!(), line!())
    };
}

/// Run a test body that reports failure through `ParseError`.
pub fn it<F>(desc: &str, test_fn: F)
where
    F: FnOnce() -> Result<(), ParseError> + UnwindSafe,
{
    match catch_unwind(test_fn) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test '{desc}' failed with Result::Err: {e}"),
        Err(panic_payload) => {
            let msg = panic_payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| panic_payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "<non-string panic payload>".to_owned());
            panic!("Test '{desc}' panicked: {msg}");
        }
    }
}

pub fn strict_settings() -> Settings {
    Settings::builder()
        .strict(StrictSetting::Mode(StrictMode::Error))
        .build()
}

pub fn nonstrict_settings() -> Settings {
    Settings::builder()
        .throw_on_error(false)
        .strict(StrictSetting::Mode(StrictMode::Ignore))
        .build()
}

pub fn display_settings() -> Settings {
    Settings::builder().display_mode(true).build()
}

pub fn get_parsed(expr: &str, settings: &Settings) -> Result<Vec<ParseNode>, ParseError> {
    parse(default_ctx(), expr, settings)
}

/// The laid out formula's boxes, with the line-break runs and struts
/// taken away.
pub fn get_built(expr: &str, settings: &Settings) -> Result<Vec<RenderNode>, ParseError> {
    let root = typeset(default_ctx(), expr, settings)?;
    let katex = if root.classes.iter().any(|c| c == "katex-display") {
        match root.children.first() {
            Some(RenderNode::Span(span)) => span.clone(),
            _ => return Err(ParseError::new("Expected a katex span in the display wrapper")),
        }
    } else {
        root
    };
    let Some(RenderNode::Span(html)) = katex.children.first() else {
        return Err(ParseError::new("Expected a katex-html span"));
    };
    Ok(html
        .children
        .iter()
        .flat_map(RenderNode::children)
        .filter(|node| !node.has_class("strut"))
        .cloned()
        .collect())
}

/// The boxes of the outermost expression, before it is split into runs.
pub fn get_expression(expr: &str, settings: &Settings) -> Result<Vec<RenderNode>, ParseError> {
    let ctx = default_ctx();
    let tree = parse(ctx, expr, settings)?;
    build_expression(ctx, &tree, &options_from_settings(settings), GroupKind::Root, (None, None))
}

pub fn get_span(expr: &str, settings: &Settings) -> Result<Span, ParseError> {
    typeset(default_ctx(), expr, settings)
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[macro_export]
macro_rules! assert_let {
    ($pat:pat = $expr:expr, $($arg:tt)+) => {
        let $pat = $expr else {
            panic!($($arg)+);
        };
    };
    ($pat:pat = $expr:expr) => {
        let $pat = $expr else {
            panic!(
                "assert_let failed: pattern `{}` did not match {} at {}:{}\n{:#?}",
                stringify!($pat), stringify!($expr),
                file!(), line!(),
                $expr
            );
        };
    };
}
