//! Function definition plumbing
//!
//! Every LaTeX command is described by a [`FunctionDefSpec`]: its names, how
//! its arguments are parsed, the handler that turns those arguments into a
//! [`ParseNode`], and the builder that lays that node out. Specs are
//! registered once into a [`TypesetContext`].

use crate::box_tree::RenderNode;
use crate::context::TypesetContext;
use crate::options::Options;
use crate::parser::Parser;
use crate::parser::parse_node::{NodeType, ParseNode};
use crate::types::{ArgType, BreakToken, ErrorLocationProvider as _, Mode, SourceLocation};
use crate::types::{ParseError, Token};

/// Greediness of commands that don't declare one.
pub const DEFAULT_GREEDINESS: u8 = 1;

/// What a handler gets to see of the parse in progress.
pub struct FunctionContext<'a, 'b> {
    /// Command name, with backslash
    pub func_name: String,
    /// The parser, positioned after the arguments
    pub parser: &'a mut Parser<'b>,
    /// The command token
    pub token: Option<&'a Token>,
    /// Token that ends the enclosing expression, if any
    pub break_on_token_text: Option<BreakToken>,
}

impl FunctionContext<'_, '_> {
    /// Location of the command token.
    #[must_use]
    pub fn loc(&self) -> Option<SourceLocation> {
        self.token?.loc().cloned()
    }

    /// Mode the command was read in.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.parser.mode
    }
}

/// Builds a parse node from a command's parsed arguments.
pub type FunctionHandler = fn(
    context: FunctionContext,
    args: Vec<ParseNode>,
    opt_args: Vec<Option<ParseNode>>,
) -> Result<ParseNode, ParseError>;

/// Lays out a parse node of the type it is registered for.
pub type BoxBuilder =
    fn(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError>;

/// How a command's arguments are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionPropSpec {
    /// Mandatory arguments
    pub num_args: usize,

    /// Type of each argument, optional ones first. `None` parses every
    /// argument as an ordinary group.
    pub arg_types: Option<Vec<ArgType>>,

    /// Precedence when competing for an ungrouped argument: a command can
    /// only be an argument of a command with lower greediness.
    pub greediness: u8,

    /// Usable in text mode
    pub allowed_in_text: bool,

    /// Usable in math mode
    pub allowed_in_math: bool,

    /// Bracketed arguments before the mandatory ones
    pub num_optional_args: usize,

    /// Infix operators such as `\over` split the enclosing group
    pub infix: bool,

    /// Mode to lex the token after the command in
    pub consume_mode: Option<Mode>,
}

impl Default for FunctionPropSpec {
    fn default() -> Self {
        Self {
            num_args: 0,
            arg_types: None,
            greediness: DEFAULT_GREEDINESS,
            allowed_in_text: false,
            allowed_in_math: true,
            num_optional_args: 0,
            infix: false,
            consume_mode: None,
        }
    }
}

/// A command definition as handed to [`TypesetContext::define_function`].
pub struct FunctionDefSpec<'b> {
    /// Type of the nodes the handler produces; keys the builder
    pub node_type: Option<NodeType>,

    /// Commands sharing this definition
    pub names: &'b [&'b str],

    /// Argument parsing
    pub props: FunctionPropSpec,

    /// Produces the parse node; absent for builder-only node types
    pub handler: Option<FunctionHandler>,

    /// Lays out `node_type` nodes
    pub builder: Option<BoxBuilder>,
}

/// Registered form of a command, as the parser consults it.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    /// Type of the nodes the handler produces
    pub node_type: Option<NodeType>,
    /// Argument parsing
    pub props: FunctionPropSpec,
    /// Produces the parse node
    pub handler: Option<FunctionHandler>,
}

impl FunctionSpec {
    /// Whether two registrations under one name describe the same command.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.node_type == other.node_type
            && self.props == other.props
            && self.handler.map(|h| h as usize) == other.handler.map(|h| h as usize)
    }
}

/// Unwrap an argument that is a group of exactly one node.
#[must_use]
pub fn normalize_argument(arg: &ParseNode) -> &ParseNode {
    if let ParseNode::OrdGroup(ord) = arg
        && ord.body.len() == 1
    {
        return &ord.body[0];
    }
    arg
}

/// The nodes of an argument: a group's body, or the argument itself.
#[must_use]
pub fn ord_argument(arg: ParseNode) -> Vec<ParseNode> {
    if let ParseNode::OrdGroup(ord) = arg {
        return ord.body;
    }
    vec![arg]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_node::ParseNodeSymbol;

    fn ord(text: &str) -> ParseNode {
        ParseNode::MathOrd(ParseNodeSymbol {
            mode: Mode::Math,
            loc: None,
            text: text.to_owned(),
        })
    }

    #[test]
    fn single_node_groups_are_unwrapped() {
        let group = ParseNode::ord_group(Mode::Math, vec![ord("x")]);
        assert_eq!(normalize_argument(&group), &ord("x"));
        let pair = ParseNode::ord_group(Mode::Math, vec![ord("x"), ord("y")]);
        assert_eq!(normalize_argument(&pair), &pair);
    }

    #[test]
    fn ord_argument_flattens_groups() {
        let group = ParseNode::ord_group(Mode::Math, vec![ord("x"), ord("y")]);
        assert_eq!(ord_argument(group).len(), 2);
        assert_eq!(ord_argument(ord("z")), [ord("z")]);
    }

    #[test]
    fn default_props_are_math_only_with_base_greediness() {
        let props = FunctionPropSpec::default();
        assert_eq!(props.greediness, DEFAULT_GREEDINESS);
        assert!(props.allowed_in_math);
        assert!(!props.allowed_in_text);
    }
}
