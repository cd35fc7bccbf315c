//! Commands that only matter to environments we don't lay out:
//! `\nonumber` and `\notag`.

use crate::box_tree::RenderNode;
use crate::build_common::make_fragment;
use crate::context::TypesetContext;
use crate::define_function::{FunctionDefSpec, FunctionPropSpec};
use crate::options::Options;
use crate::parser::parse_node::{NodeType, ParseNode, ParseNodeInternal};
use crate::types::ParseError;

/// Registers `\relax`
pub fn define_relax(ctx: &mut TypesetContext) {
    ctx.define_function(FunctionDefSpec {
        node_type: Some(NodeType::Internal),
        names: &["\\nonumber", "\\notag"],
        props: FunctionPropSpec {
            allowed_in_text: true,
            ..Default::default()
        },
        handler: Some(|context, _args, _opt_args| {
            Ok(ParseNode::Internal(ParseNodeInternal {
                mode: context.mode(),
                loc: context.loc(),
            }))
        }),
        builder: Some(builder),
    });
}

/// Lists drop these nodes while parsing; one used as an argument lays out
/// as nothing.
fn builder(_node: &ParseNode, _options: &Options, _ctx: &TypesetContext) -> Result<RenderNode, ParseError> {
    Ok(make_fragment(Vec::new()).into())
}
