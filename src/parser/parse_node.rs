//! Parse tree node types
//!
//! The parser turns input into a tree of [`ParseNode`]s, one variant per
//! construct. Every variant records the [`Mode`] it was parsed in and, when
//! known, the span of input it came from. The tree is strictly owned: nodes
//! are never shared between parents.

use strum::{AsRefStr, Display, EnumDiscriminants};

use crate::style::Style;
use crate::symbols::Atom;
use crate::types::{ErrorLocationProvider, Mode, ParseError, ParseErrorKind, SourceLocation, Token};
use crate::units::Measurement;

/// A node of the parse tree.
///
/// The discriminant type [`NodeType`] identifies the variant without
/// borrowing its payload; the function registry keys layout builders by it.
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(vis(pub))]
#[strum_discriminants(derive(Display, Hash, AsRefStr), strum(serialize_all = "lowercase"))]
#[strum_discriminants(name(NodeType))]
pub enum ParseNode {
    /// `{...}` group
    OrdGroup(ParseNodeOrdGroup),
    /// Base with superscript and/or subscript
    SupSub(ParseNodeSupSub),
    /// Fraction-like construct, `\frac`, `\binom` and friends
    GenFrac(Box<ParseNodeGenFrac>),
    /// `\over`-style operator before it is rewritten into a fraction
    Infix(ParseNodeInfix),
    /// Radical, with optional index
    Sqrt(Box<ParseNodeSqrt>),
    /// Symbol with an atom class (bin, rel, open, ...)
    Atom(ParseNodeAtom),
    /// Italic-by-default math letter
    MathOrd(ParseNodeSymbol),
    /// Upright ordinary symbol
    TextOrd(ParseNodeSymbol),
    /// Fixed-width space symbol such as `\ `
    Spacing(ParseNodeSymbol),
    /// Glyph used by an accent command
    AccentToken(ParseNodeSymbol),
    /// Glyph used by a big operator
    OpToken(ParseNodeSymbol),
    /// Big operator, named operator or `\mathop`
    Op(ParseNodeOp),
    /// Accent over a base
    Accent(Box<ParseNodeAccent>),
    /// Accent under a base
    AccentUnder(Box<ParseNodeAccent>),
    /// Extensible arrow with labels
    XArrow(Box<ParseNodeXArrow>),
    /// `\overbrace` and `\underbrace`
    HorizBrace(Box<ParseNodeHorizBrace>),
    /// `\underline`
    Underline(ParseNodeLine),
    /// `\overline`
    Overline(ParseNodeLine),
    /// Font switch such as `\mathbf`
    Font(ParseNodeFont),
    /// Explicit atom class, `\mathrel` and friends
    MClass(ParseNodeMClass),
    /// Text-mode content inside math
    Text(ParseNodeText),
    /// Colored content
    Color(ParseNodeColor),
    /// Color argument as parsed
    ColorToken(ParseNodeColorToken),
    /// Size argument as parsed
    Size(ParseNodeSize),
    /// URL argument as parsed
    Url(ParseNodeUrl),
    /// Raw string argument
    Raw(ParseNodeRaw),
    /// Link around content
    Href(ParseNodeHref),
    /// `\verb` literal
    Verb(ParseNodeVerb),
    /// Line break
    Cr(ParseNodeCr),
    /// `\left ... \right`
    LeftRight(ParseNodeLeftRight),
    /// `\right` before it is attached to its `\left`
    LeftRightRight(ParseNodeLeftRightRight),
    /// `\big`-family fixed-size delimiter
    DelimSizing(ParseNodeDelimSizing),
    /// `\displaystyle` and friends
    Styling(ParseNodeStyling),
    /// Explicit horizontal kern
    Kern(ParseNodeKern),
    /// Command with no output; dropped from the tree
    Internal(ParseNodeInternal),
}

/// A braced group, laid out as one ordinary atom.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeOrdGroup {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Contents of the group
    pub body: Vec<ParseNode>,
}

/// A base with its scripts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeSupSub {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Missing when the script has nothing to attach to, as in `^2`
    pub base: Option<Box<ParseNode>>,
    /// Superscript, including merged primes
    pub sup: Option<Box<ParseNode>>,
    /// Subscript
    pub sub: Option<Box<ParseNode>>,
}

/// A fraction or binomial, with optional delimiters and a forced style.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeGenFrac {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// `\cfrac`: numerator is strutted and not shrunk
    pub continued: bool,
    /// Numerator
    pub numer: ParseNode,
    /// Denominator
    pub denom: ParseNode,
    /// Draw the fraction bar; `false` for `\binom` and `\atop`
    pub has_bar_line: bool,
    /// Delimiter on the left, e.g. `(` for `\binom`
    pub left_delim: Option<String>,
    /// Delimiter on the right
    pub right_delim: Option<String>,
    /// Forced style; `None` follows the surrounding style
    pub size: Option<Style>,
}

/// An infix fraction operator such as `\over`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeInfix {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Name of the fraction command the operator becomes
    pub replace_with: String,
    /// The operator token, for error locations
    pub token: Option<Token>,
}

/// A radical.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeSqrt {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Radicand
    pub body: ParseNode,
    /// Root index, from `\sqrt[n]`
    pub index: Option<ParseNode>,
}

/// A symbol with an atom class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeAtom {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Atom class, deciding spacing
    pub family: Atom,
    /// Symbol name as written, e.g. `+` or `\leq`
    pub text: String,
}

/// Payload shared by the non-atom symbol variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeSymbol {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Symbol name as written
    pub text: String,
}

/// What an operator draws.
#[derive(Debug, Clone, PartialEq)]
pub enum OpContent {
    /// A big operator glyph, e.g. `\sum`
    Symbol(String),
    /// A named operator typeset upright, e.g. `\sin`
    Name(String),
    /// Arbitrary content, from `\mathop{...}`
    Body(Vec<ParseNode>),
}

/// A large or named operator.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeOp {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Scripts go above and below in display style
    pub limits: bool,
    /// Set by `\limits`/`\nolimits`: scripts follow `limits` in every style
    pub always_handle_sup_sub: bool,
    /// Keep the base on the baseline instead of centering it on the axis
    pub suppress_base_shift: bool,
    /// What the operator draws
    pub content: OpContent,
}

impl ParseNodeOp {
    /// Whether the operator draws a single big glyph.
    #[must_use]
    pub const fn is_symbol(&self) -> bool {
        matches!(self.content, OpContent::Symbol(_))
    }
}

/// An accent above or below a base.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeAccent {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Accent command, e.g. `\hat`
    pub label: String,
    /// Drawn as an image stretched across the base
    pub is_stretchy: bool,
    /// Shifted horizontally by the base glyph's skew
    pub is_shifty: bool,
    /// Accented content
    pub base: ParseNode,
}

/// An extensible arrow, `\xrightarrow` and friends.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeXArrow {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Arrow command, e.g. `\xrightarrow`
    pub label: String,
    /// Label above the arrow
    pub body: ParseNode,
    /// Label below the arrow
    pub below: Option<ParseNode>,
}

/// A horizontal brace over or under a base.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeHorizBrace {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Brace command, `\overbrace` or `\underbrace`
    pub label: String,
    /// The brace goes above the base
    pub is_over: bool,
    /// Braced content
    pub base: ParseNode,
}

/// Payload of `\underline` and `\overline`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeLine {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Content the rule is drawn against
    pub body: Box<ParseNode>,
}

/// Content in an explicit math font.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeFont {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Font name without backslash, e.g. `mathbf`
    pub font: String,
    /// Content drawn in the font
    pub body: Box<ParseNode>,
}

/// Content forced into an atom class.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeMClass {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Atom class of the result, e.g. `mrel`
    pub mclass: String,
    /// Content of the atom
    pub body: Vec<ParseNode>,
}

/// Text-mode content inside math.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeText {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Text-mode nodes
    pub body: Vec<ParseNode>,
    /// Text font command, e.g. `\textbf`
    pub font: Option<String>,
}

/// Colored content.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeColor {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Color as written: a name, `#rgb` or `#rrggbb`
    pub color: String,
    /// Content drawn in the color
    pub body: Vec<ParseNode>,
}

/// A parsed color argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeColorToken {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Validated color
    pub color: String,
}

/// A parsed size argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeSize {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// The size, in its own unit
    pub value: Measurement,
    /// The argument was empty and defaulted to zero
    pub is_blank: bool,
}

/// A parsed URL argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeUrl {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// URL with TeX escapes removed
    pub url: String,
}

/// A raw string argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeRaw {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Text between the braces
    pub string: String,
}

/// A link around content.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeHref {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Link target
    pub href: String,
    /// Linked content
    pub body: Vec<ParseNode>,
}

/// A `\verb` literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeVerb {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Text between the delimiters
    pub body: String,
    /// `\verb*`: spaces are shown
    pub star: bool,
}

/// A line break.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeCr {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Break the line here
    pub new_line: bool,
    /// `\cr`, which only makes sense inside tables
    pub new_row: bool,
    /// Extra space below the line, from `\\[1em]`
    pub size: Option<Measurement>,
}

/// A `\left ... \right` group.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeLeftRight {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Content between the delimiters
    pub body: Vec<ParseNode>,
    /// Left delimiter; `.` for none
    pub left: String,
    /// Right delimiter; `.` for none
    pub right: String,
    /// Color in effect at the `\right`
    pub right_color: Option<String>,
}

/// A `\right` and its delimiter, read by the `\left` handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeLeftRightRight {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// The delimiter
    pub delim: String,
    /// Color in effect at the `\right`
    pub color: Option<String>,
}

/// A delimiter at a fixed size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeDelimSizing {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// 1 to 4, from `\big` to `\Bigg`
    pub size: usize,
    /// Atom class, `mopen`, `mclose` or `mrel`
    pub mclass: String,
    /// The delimiter
    pub delim: String,
}

/// Content in a forced style.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeStyling {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Style the content is laid out in
    pub style: Style,
    /// Content up to the end of the group
    pub body: Vec<ParseNode>,
}

/// Horizontal space of a given size.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNodeKern {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
    /// Width of the space
    pub dimension: Measurement,
}

/// A command that leaves nothing in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeInternal {
    /// Mode the node was parsed in
    pub mode: Mode,
    /// Input span the node came from, when known
    pub loc: Option<SourceLocation>,
}

/// Apply `$body` to the payload of whichever variant `$node` is.
macro_rules! with_payload {
    ($node:expr, $payload:ident => $body:expr) => {
        match $node {
            ParseNode::OrdGroup($payload) => $body,
            ParseNode::SupSub($payload) => $body,
            ParseNode::GenFrac($payload) => $body,
            ParseNode::Infix($payload) => $body,
            ParseNode::Sqrt($payload) => $body,
            ParseNode::Atom($payload) => $body,
            ParseNode::MathOrd($payload)
            | ParseNode::TextOrd($payload)
            | ParseNode::Spacing($payload)
            | ParseNode::AccentToken($payload)
            | ParseNode::OpToken($payload) => $body,
            ParseNode::Op($payload) => $body,
            ParseNode::Accent($payload) | ParseNode::AccentUnder($payload) => $body,
            ParseNode::XArrow($payload) => $body,
            ParseNode::HorizBrace($payload) => $body,
            ParseNode::Underline($payload) | ParseNode::Overline($payload) => $body,
            ParseNode::Font($payload) => $body,
            ParseNode::MClass($payload) => $body,
            ParseNode::Text($payload) => $body,
            ParseNode::Color($payload) => $body,
            ParseNode::ColorToken($payload) => $body,
            ParseNode::Size($payload) => $body,
            ParseNode::Url($payload) => $body,
            ParseNode::Raw($payload) => $body,
            ParseNode::Href($payload) => $body,
            ParseNode::Verb($payload) => $body,
            ParseNode::Cr($payload) => $body,
            ParseNode::LeftRight($payload) => $body,
            ParseNode::LeftRightRight($payload) => $body,
            ParseNode::DelimSizing($payload) => $body,
            ParseNode::Styling($payload) => $body,
            ParseNode::Kern($payload) => $body,
            ParseNode::Internal($payload) => $body,
        }
    };
}

impl ParseNode {
    /// Mode the node was parsed in.
    #[must_use]
    pub fn mode(&self) -> Mode {
        with_payload!(self, node => node.mode)
    }

    /// Input span the node came from, if known.
    #[must_use]
    pub fn loc(&self) -> Option<&SourceLocation> {
        with_payload!(self, node => node.loc.as_ref())
    }

    /// Text of a symbol node.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Atom(node) => Some(&node.text),
            Self::MathOrd(node)
            | Self::TextOrd(node)
            | Self::Spacing(node)
            | Self::AccentToken(node)
            | Self::OpToken(node) => Some(&node.text),
            _ => None,
        }
    }

    /// The innermost element of single-element groups: ordgroups and colors
    /// with one child, and font switches, are seen through.
    #[must_use]
    pub fn base_elem(&self) -> &Self {
        match self {
            Self::OrdGroup(group) if group.body.len() == 1 => group.body[0].base_elem(),
            Self::Color(color) if color.body.len() == 1 => color.body[0].base_elem(),
            Self::Font(font) => font.body.base_elem(),
            _ => self,
        }
    }

    /// Whether this is a "character box" in the TeXbook sense: a group
    /// whose innermost element is a single character.
    #[must_use]
    pub fn is_character_box(&self) -> bool {
        matches!(
            self.base_elem(),
            Self::MathOrd(_) | Self::TextOrd(_) | Self::Atom(_)
        )
    }

    /// A single-node ordgroup in `mode`.
    #[must_use]
    pub fn ord_group(mode: Mode, body: Vec<Self>) -> Self {
        Self::OrdGroup(ParseNodeOrdGroup {
            mode,
            loc: None,
            body,
        })
    }
}

impl ErrorLocationProvider for ParseNode {
    fn loc(&self) -> Option<&SourceLocation> {
        Self::loc(self)
    }
}

impl From<ParseNodeColor> for ParseNode {
    fn from(node: ParseNodeColor) -> Self {
        Self::Color(node)
    }
}

/// Fail with an internal error unless `node` is of type `expected`. Layout
/// builders only receive the node types they are registered for, so a
/// mismatch is a broken registry binding.
pub fn assert_node_type(node: &ParseNode, expected: NodeType) -> Result<(), ParseError> {
    if NodeType::from(node) == expected {
        Ok(())
    } else {
        Err(ParseError::with_token(
            ParseErrorKind::ExpectedNode { expected },
            node,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn math_ord(text: &str) -> ParseNode {
        ParseNode::MathOrd(ParseNodeSymbol {
            mode: Mode::Math,
            loc: None,
            text: text.to_owned(),
        })
    }

    #[test]
    fn node_types_display_in_lowercase() {
        assert_eq!(NodeType::from(&math_ord("x")).to_string(), "mathord");
        assert_eq!(NodeType::SupSub.as_ref(), "supsub");
        assert_eq!(NodeType::LeftRightRight.to_string(), "leftrightright");
    }

    #[test]
    fn base_elem_sees_through_single_groups() {
        let inner = math_ord("x");
        let group = ParseNode::ord_group(Mode::Math, vec![inner.clone()]);
        let font = ParseNode::Font(ParseNodeFont {
            mode: Mode::Math,
            loc: None,
            font: "mathbf".to_owned(),
            body: Box::new(group),
        });
        assert_eq!(font.base_elem(), &inner);
        assert!(font.is_character_box());

        let pair = ParseNode::ord_group(Mode::Math, vec![math_ord("x"), math_ord("y")]);
        assert!(!pair.is_character_box());
    }

    #[test]
    fn assert_node_type_reports_the_expected_type() {
        let err = assert_node_type(&math_ord("x"), NodeType::GenFrac).unwrap_err();
        assert_eq!(err.message(), "Expected genfrac node");
        assert!(assert_node_type(&math_ord("x"), NodeType::MathOrd).is_ok());
    }
}
