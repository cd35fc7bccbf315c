//! `\textcolor{color}{body}` and the declaration `\color{color}`, which
//! colors the rest of the group.

use crate::box_tree::RenderNode;
use crate::build_common::make_fragment;
use crate::build_layout::{GroupKind, build_expression};
use crate::context::TypesetContext;
use crate::define_function::{FunctionContext, FunctionDefSpec, FunctionPropSpec, ord_argument};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeColor, assert_node_type};
use crate::types::{ArgType, ParseError};

/// Macro holding the color in effect, read back by `\right`.
pub const CURRENT_COLOR: &str = "\\current@color";

fn color_of(arg: Option<ParseNode>) -> Result<String, ParseError> {
    match arg {
        Some(ParseNode::ColorToken(token)) => Ok(token.color),
        _ => Err(ParseError::new("Expected a color argument")),
    }
}

/// Registers `\color` and `\textcolor`
pub fn define_color(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Color),
        names: &["\\textcolor"],
        props: FunctionPropSpec {
            num_args: 2,
            arg_types: Some(vec![ArgType::Color, ArgType::Original]),
            greediness: 3,
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let mut args = args.into_iter();
            let color = color_of(args.next())?;
            let body = args
                .next()
                .ok_or_else(|| ParseError::new("\\textcolor needs a body"))?;
            Ok(ParseNode::Color(ParseNodeColor {
                mode: context.mode(),
                loc: context.loc(),
                color,
                body: ord_argument(body),
            }))
        }),
        builder: Some(builder),
    });

    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Color),
        names: &["\\color"],
        props: FunctionPropSpec {
            num_args: 1,
            arg_types: Some(vec![ArgType::Color]),
            greediness: 3,
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context: FunctionContext, args, _opt_args| {
            let color = color_of(args.into_iter().next())?;
            let mode = context.mode();
            let loc = context.loc();
            context.parser.gullet.set_macro(CURRENT_COLOR, color.clone(), false);
            let body = context.parser.parse_expression(true, context.break_on_token_text)?;
            Ok(ParseNode::Color(ParseNodeColor { mode, loc, color, body }))
        }),
        builder: Some(builder),
    });
}

/// Colored content is a fragment: it takes part in its parent's spacing.
fn builder(node: &ParseNode, options: &Options, ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    let ParseNode::Color(group) = node else {
        assert_node_type(node, NodeType::Color)?;
        return Err(ParseError::new("Expected Color node"));
    };
    let elements = build_expression(
        ctx,
        &group.body,
        &options.with_color(group.color.clone()),
        GroupKind::Partial,
        (None, None),
    )?;
    Ok(make_fragment(elements).into())
}
